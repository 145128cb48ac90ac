// Every error leaves the service as application/problem+json with a trace id
// matching the response header.

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details;
use deal_backend::auth::role::Role;
use serde_json::Value;

use crate::support::create_test_app;
use crate::support::factory::{bearer, create_user, test_state};

#[actix_web::test]
async fn test_problem_type_is_derived_from_code() {
    let state = test_state().await;
    let app = create_test_app(state).await;

    let req = test::TestRequest::get().uri("/api/deals").to_request();
    let resp = test::call_service(&app, req).await;
    let problem = assert_problem_details(
        resp,
        StatusCode::UNAUTHORIZED,
        "UNAUTHORIZED",
        "Authentication required",
    )
    .await;
    assert!(problem.type_.ends_with("/UNAUTHORIZED"));
    assert_eq!(problem.status, 401);
    assert!(!problem.trace_id.is_empty());
}

#[actix_web::test]
async fn test_trace_id_matches_request_id() {
    let state = test_state().await;
    let user = create_user(&state, Role::User).await;
    let app = create_test_app(state.clone()).await;

    let req = test::TestRequest::get()
        .uri("/api/deals/xyz")
        .insert_header(("Authorization", bearer(&state, &user.username)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let request_id = resp
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let problem =
        assert_problem_details(resp, StatusCode::BAD_REQUEST, "INVALID_ID", "Invalid id: xyz")
            .await;
    assert_eq!(request_id.as_deref(), Some(problem.trace_id.as_str()));
}

#[actix_web::test]
async fn test_unknown_json_shape_is_bad_request() {
    let state = test_state().await;
    let user = create_user(&state, Role::User).await;
    let app = create_test_app(state.clone()).await;

    let req = test::TestRequest::post()
        .uri("/api/deals")
        .insert_header(("Authorization", bearer(&state, &user.username)))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("[1, 2, 3]")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/problem+json")
    );

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "BAD_REQUEST");
}
