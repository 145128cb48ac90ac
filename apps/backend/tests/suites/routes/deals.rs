// Deal pipeline routes: role-scoped projection, filtering, lifecycle events.

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details;
use deal_backend::auth::role::Role;
use deal_backend::domain::deal::DealStage;
use deal_backend::services::deals as deal_service;
use deal_backend::services::events::DealEvent;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::support::create_test_app;
use crate::support::factory::{
    bearer, create_deal, create_user, test_state, test_state_with_events,
};

fn new_deal_body() -> Value {
    json!({
        "client_name": "Globex",
        "deal_type": "IPO",
        "sector": "Energy",
        "deal_value": 750_000_000_i64,
        "current_stage": "Prospect",
        "summary": "Dual listing"
    })
}

// ============================================================================
// Value visibility
// ============================================================================

#[actix_web::test]
async fn test_value_is_hidden_from_user_and_shown_to_admin() {
    let state = test_state().await;
    let admin = create_user(&state, Role::Admin).await;
    let user = create_user(&state, Role::User).await;
    let deal = create_deal(&state, &admin, DealStage::UnderEvaluation).await;
    let app = create_test_app(state.clone()).await;
    let uri = format!("/api/deals/{}", deal.id);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(("Authorization", bearer(&state, &user.username)))
        .to_request();
    let as_user: Value = test::call_and_read_body_json(&app, req).await;
    assert!(as_user.get("deal_value").is_none());
    assert_eq!(as_user["client_name"], "Initech");
    assert_eq!(as_user["current_stage"], "UnderEvaluation");

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(("Authorization", bearer(&state, &admin.username)))
        .to_request();
    let as_admin: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(as_admin["deal_value"], 42_000_000);

    // Same deal otherwise
    let mut without_value = as_admin.clone();
    if let Some(fields) = without_value.as_object_mut() {
        fields.remove("deal_value");
    }
    assert_eq!(without_value, as_user);
}

#[actix_web::test]
async fn test_user_creating_a_deal_does_not_see_its_value() {
    let state = test_state().await;
    let user = create_user(&state, Role::User).await;
    let app = create_test_app(state.clone()).await;

    let req = test::TestRequest::post()
        .uri("/api/deals")
        .insert_header(("Authorization", bearer(&state, &user.username)))
        .set_json(new_deal_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert!(body.get("deal_value").is_none());
    assert_eq!(body["created_by"], user.id.to_string());
    assert_eq!(body["assigned_to"], user.id.to_string());

    let id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
    let stored = state.deals.get(id).await.unwrap().unwrap();
    assert_eq!(stored.deal_value, 750_000_000);
}

#[actix_web::test]
async fn test_list_projects_every_deal_for_the_caller() {
    let state = test_state().await;
    let admin = create_user(&state, Role::Admin).await;
    let user = create_user(&state, Role::User).await;
    create_deal(&state, &admin, DealStage::Prospect).await;
    create_deal(&state, &admin, DealStage::Closed).await;
    let app = create_test_app(state.clone()).await;

    let req = test::TestRequest::get()
        .uri("/api/deals")
        .insert_header(("Authorization", bearer(&state, &user.username)))
        .to_request();
    let deals: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(deals.len(), 2);
    assert!(deals.iter().all(|d| d.get("deal_value").is_none()));

    let req = test::TestRequest::get()
        .uri("/api/deals")
        .insert_header(("Authorization", bearer(&state, &admin.username)))
        .to_request();
    let deals: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(deals.iter().all(|d| d["deal_value"] == 42_000_000));
}

#[actix_web::test]
async fn test_summary_never_carries_value() {
    let state = test_state().await;
    let admin = create_user(&state, Role::Admin).await;
    create_deal(&state, &admin, DealStage::TermSheetSubmitted).await;
    let app = create_test_app(state.clone()).await;

    let req = test::TestRequest::get()
        .uri("/api/deals/summary")
        .insert_header(("Authorization", bearer(&state, &admin.username)))
        .to_request();
    let rows: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(rows.len(), 1);
    assert!(rows[0].get("deal_value").is_none());
    assert!(rows[0].get("notes").is_none());
    assert_eq!(rows[0]["current_stage"], "TermSheetSubmitted");
}

// ============================================================================
// Filtering and lookup
// ============================================================================

#[actix_web::test]
async fn test_stage_filter() {
    let state = test_state().await;
    let admin = create_user(&state, Role::Admin).await;
    let prospect = create_deal(&state, &admin, DealStage::Prospect).await;
    create_deal(&state, &admin, DealStage::Lost).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(&state, &admin.username);

    let req = test::TestRequest::get()
        .uri("/api/deals?stage=Prospect")
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let deals: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(deals.len(), 1);
    assert_eq!(deals[0]["id"], prospect.id.to_string());

    let req = test::TestRequest::get()
        .uri("/api/deals?stage=Closed")
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let deals: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(deals.is_empty());

    let req = test::TestRequest::get()
        .uri("/api/deals?stage=Signed")
        .insert_header(("Authorization", auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_bad_id_and_missing_deal() {
    let state = test_state().await;
    let user = create_user(&state, Role::User).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(&state, &user.username);

    let req = test::TestRequest::get()
        .uri("/api/deals/not-a-uuid")
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(
        resp,
        StatusCode::BAD_REQUEST,
        "INVALID_ID",
        "Invalid id: not-a-uuid",
    )
    .await;

    let missing = Uuid::new_v4();
    let req = test::TestRequest::get()
        .uri(&format!("/api/deals/{missing}"))
        .insert_header(("Authorization", auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(
        resp,
        StatusCode::NOT_FOUND,
        "DEAL_NOT_FOUND",
        &format!("Deal not found with id: {missing}"),
    )
    .await;
}

// ============================================================================
// Mutations
// ============================================================================

#[actix_web::test]
async fn test_create_validation() {
    let state = test_state().await;
    let user = create_user(&state, Role::User).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(&state, &user.username);

    let mut zero_value = new_deal_body();
    zero_value["deal_value"] = json!(0);
    let req = test::TestRequest::post()
        .uri("/api/deals")
        .insert_header(("Authorization", auth.clone()))
        .set_json(zero_value)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(
        resp,
        StatusCode::BAD_REQUEST,
        "VALIDATION_ERROR",
        "Deal value must be positive",
    )
    .await;

    let mut blank_client = new_deal_body();
    blank_client["client_name"] = json!("   ");
    let req = test::TestRequest::post()
        .uri("/api/deals")
        .insert_header(("Authorization", auth.clone()))
        .set_json(blank_client)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(
        resp,
        StatusCode::BAD_REQUEST,
        "VALIDATION_ERROR",
        "Client name is required",
    )
    .await;

    let mut unknown_assignee = new_deal_body();
    unknown_assignee["assigned_to"] = json!(Uuid::new_v4());
    let req = test::TestRequest::post()
        .uri("/api/deals")
        .insert_header(("Authorization", auth))
        .set_json(unknown_assignee)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(
        resp,
        StatusCode::BAD_REQUEST,
        "VALIDATION_ERROR",
        "Assigned user does not exist",
    )
    .await;

    assert!(state.deals.list(None).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_update_changes_only_given_fields() {
    let state = test_state().await;
    let admin = create_user(&state, Role::Admin).await;
    let user = create_user(&state, Role::User).await;
    let deal = create_deal(&state, &admin, DealStage::Prospect).await;
    let app = create_test_app(state.clone()).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/deals/{}", deal.id))
        .insert_header(("Authorization", bearer(&state, &user.username)))
        .set_json(json!({ "sector": "Fintech", "assigned_to": user.id }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["sector"], "Fintech");
    assert_eq!(body["client_name"], "Initech");
    assert_eq!(body["assigned_to"], user.id.to_string());
    assert!(body["updated_at"].is_string());
}

#[actix_web::test]
async fn test_stage_change_publishes_event() {
    let (state, mut events) = test_state_with_events().await;
    let user = create_user(&state, Role::User).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(&state, &user.username);

    let req = test::TestRequest::post()
        .uri("/api/deals")
        .insert_header(("Authorization", auth.clone()))
        .set_json(new_deal_body())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id: Uuid = created["id"].as_str().unwrap().parse().unwrap();

    let event = events.try_recv().expect("creation event");
    assert_eq!(event.event_type(), "DEAL_CREATED");
    assert_eq!(event.deal_id(), id);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/deals/{id}/stage"))
        .insert_header(("Authorization", auth))
        .set_json(json!({ "stage": "UnderEvaluation" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["current_stage"], "UnderEvaluation");

    match events.try_recv().expect("stage event") {
        DealEvent::DealStageUpdated {
            deal_id,
            previous_stage,
            new_stage,
            updated_by,
            ..
        } => {
            assert_eq!(deal_id, id);
            assert_eq!(previous_stage, DealStage::Prospect);
            assert_eq!(new_stage, DealStage::UnderEvaluation);
            assert_eq!(updated_by, user.username);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(events.try_recv().is_err());
}

#[actix_web::test]
async fn test_events_never_carry_value() {
    let (state, mut events) = test_state_with_events().await;
    let admin = create_user(&state, Role::Admin).await;
    create_deal(&state, &admin, DealStage::Prospect).await;

    let event = events.try_recv().expect("creation event");
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["event_type"], "DEAL_CREATED");
    assert_eq!(json["summary"], "Strategic acquisition");
    assert_eq!(json["assigned_to"], admin.id.to_string());
    assert!(json.get("deal_value").is_none());
}

#[actix_web::test]
async fn test_notes_are_appended_in_order() {
    let state = test_state().await;
    let admin = create_user(&state, Role::Admin).await;
    let user = create_user(&state, Role::User).await;
    let deal = create_deal(&state, &admin, DealStage::Prospect).await;
    let app = create_test_app(state.clone()).await;
    let uri = format!("/api/deals/{}/notes", deal.id);

    for (who, text) in [(&admin, "first"), (&user, "second")] {
        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(("Authorization", bearer(&state, &who.username)))
            .set_json(json!({ "note": text }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let stored = state.deals.get(deal.id).await.unwrap().unwrap();
    let notes: Vec<(&str, Uuid)> = stored
        .notes
        .iter()
        .map(|n| (n.note.as_str(), n.user_id))
        .collect();
    assert_eq!(notes, vec![("first", admin.id), ("second", user.id)]);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(("Authorization", bearer(&state, &user.username)))
        .set_json(json!({ "note": "  " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(
        resp,
        StatusCode::BAD_REQUEST,
        "VALIDATION_ERROR",
        "Note cannot be empty",
    )
    .await;
}

#[actix_web::test]
async fn test_admin_deletes_deal() {
    let state = test_state().await;
    let admin = create_user(&state, Role::Admin).await;
    let deal = create_deal(&state, &admin, DealStage::Lost).await;
    let app = create_test_app(state.clone()).await;
    let uri = format!("/api/deals/{}", deal.id);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(("Authorization", bearer(&state, &admin.username)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(state.deals.get(deal.id).await.unwrap().is_none());

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(("Authorization", bearer(&state, &admin.username)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_value_update_rejects_non_positive() {
    let state = test_state().await;
    let admin = create_user(&state, Role::Admin).await;
    let deal = create_deal(&state, &admin, DealStage::Prospect).await;
    let app = create_test_app(state.clone()).await;

    let req = test::TestRequest::patch()
        .uri(&format!("/api/deals/{}/value", deal.id))
        .insert_header(("Authorization", bearer(&state, &admin.username)))
        .set_json(json!({ "deal_value": -10 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        state.deals.get(deal.id).await.unwrap().unwrap().deal_value,
        42_000_000
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_notes_are_all_kept() {
    let state = test_state().await;
    let admin = create_user(&state, Role::Admin).await;
    let deal = create_deal(&state, &admin, DealStage::Prospect).await;
    let author = admin.principal();
    let deal_id = deal.id;

    let tasks: Vec<_> = (0..24)
        .map(|i| {
            let state = state.clone();
            let author = author.clone();
            tokio::spawn(async move {
                deal_service::add_note(&state, &author, deal_id, &format!("note {i}")).await
            })
        })
        .collect();
    for task in tasks {
        task.await.expect("task should not panic").expect("note should be added");
    }

    let stored = state.deals.get(deal_id).await.unwrap().unwrap();
    assert_eq!(stored.notes.len(), 24);
}
