// Role enforcement. A USER reaching an ADMIN route gets 403 without a
// challenge; nobody reaches a protected route without authenticating first.

use actix_web::http::{Method, StatusCode};
use actix_web::test;
use deal_backend::auth::role::Role;
use deal_backend::domain::deal::DealStage;
use serde_json::{json, Value};

use crate::common::{assert_forbidden, assert_unauthenticated};
use crate::support::create_test_app;
use crate::support::factory::{bearer, create_deal, create_user, test_state};

fn request(
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<Value>,
) -> actix_http::Request {
    let mut req = test::TestRequest::default().method(method).uri(uri);
    if let Some(value) = authorization {
        req = req.insert_header(("Authorization", value.to_string()));
    }
    if let Some(body) = body {
        req = req.set_json(body);
    }
    req.to_request()
}

#[actix_web::test]
async fn test_user_on_admin_routes_is_forbidden() {
    let state = test_state().await;
    let admin = create_user(&state, Role::Admin).await;
    let user = create_user(&state, Role::User).await;
    let deal = create_deal(&state, &admin, DealStage::Prospect).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(&state, &user.username);

    let admin_only = [
        (Method::GET, "/api/admin/users".to_string(), None),
        (
            Method::POST,
            "/api/admin/users".to_string(),
            Some(json!({
                "username": "eve",
                "email": "eve@investbank.com",
                "password": "pw",
                "role": "ADMIN"
            })),
        ),
        (
            Method::PUT,
            format!("/api/admin/users/{}/status?active=false", admin.id),
            None,
        ),
        (
            Method::PATCH,
            format!("/api/deals/{}/value", deal.id),
            Some(json!({ "deal_value": 1 })),
        ),
        (Method::DELETE, format!("/api/deals/{}", deal.id), None),
    ];

    for (method, uri, body) in admin_only {
        let resp = test::call_service(&app, request(method, &uri, Some(&auth), body)).await;
        assert!(resp.headers().get("www-authenticate").is_none());
        assert_forbidden(resp).await;
    }

    // Nothing changed
    let stored = state.deals.get(deal.id).await.unwrap().unwrap();
    assert_eq!(stored.deal_value, deal.deal_value);
    assert!(state.users.find_by_username("eve").await.unwrap().is_none());
    assert!(state.users.find_by_id(admin.id).await.unwrap().unwrap().active);
}

#[actix_web::test]
async fn test_admin_passes_admin_routes() {
    let state = test_state().await;
    let admin = create_user(&state, Role::Admin).await;
    let deal = create_deal(&state, &admin, DealStage::Prospect).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(&state, &admin.username);

    let resp = test::call_service(
        &app,
        request(Method::GET, "/api/admin/users", Some(&auth), None),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        request(
            Method::PATCH,
            &format!("/api/deals/{}/value", deal.id),
            Some(&auth),
            Some(json!({ "deal_value": 99 })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["deal_value"], 99);
}

#[actix_web::test]
async fn test_both_roles_reach_shared_routes() {
    let state = test_state().await;
    let admin = create_user(&state, Role::Admin).await;
    let user = create_user(&state, Role::User).await;
    let app = create_test_app(state.clone()).await;

    for who in [&admin, &user] {
        let auth = bearer(&state, &who.username);
        for uri in ["/api/deals", "/api/deals/summary", "/api/users/me"] {
            let resp = test::call_service(&app, request(Method::GET, uri, Some(&auth), None)).await;
            assert_eq!(resp.status(), StatusCode::OK, "{} on {uri}", who.role);
        }
    }
}

#[actix_web::test]
async fn test_unauthenticated_beats_forbidden() {
    let state = test_state().await;
    let app = create_test_app(state).await;

    for uri in ["/api/admin/users", "/api/deals"] {
        let resp = test::call_service(&app, request(Method::GET, uri, None, None)).await;
        assert_unauthenticated(resp).await;
    }
}

#[actix_web::test]
async fn test_forbidden_is_decided_before_body_validation() {
    let state = test_state().await;
    let user = create_user(&state, Role::User).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(&state, &user.username);

    let resp = test::call_service(
        &app,
        request(
            Method::POST,
            "/api/admin/users",
            Some(&auth),
            Some(json!({ "unexpected": true })),
        ),
    )
    .await;
    assert_forbidden(resp).await;
}
