//! `/api/deals`. Every deal in a response goes through the role-scoped
//! projection for the caller's role.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use super::parse_id;
use crate::auth::authorization::{AdminOnly, AnyRole};
use crate::domain::deal::DealStage;
use crate::domain::projection::{summarize_deal, DealResponse, DealSummaryResponse};
use crate::error::AppError;
use crate::extractors::{Authorized, ValidatedJson};
use crate::services::deals::{self as deal_service, CreateDeal, UpdateDeal};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateDealRequest {
    pub client_name: String,
    pub deal_type: String,
    pub sector: String,
    pub deal_value: i64,
    pub current_stage: DealStage,
    pub summary: Option<String>,
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDealRequest {
    pub client_name: Option<String>,
    pub deal_type: Option<String>,
    pub sector: Option<String>,
    pub summary: Option<String>,
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStageRequest {
    pub stage: DealStage,
}

#[derive(Debug, Deserialize)]
pub struct UpdateValueRequest {
    pub deal_value: i64,
}

#[derive(Debug, Deserialize)]
pub struct AddNoteRequest {
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct StageFilter {
    pub stage: Option<DealStage>,
}

async fn create_deal(
    caller: Authorized<AnyRole>,
    body: ValidatedJson<CreateDealRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let deal = deal_service::create_deal(
        &app_state,
        &caller,
        CreateDeal {
            client_name: req.client_name,
            deal_type: req.deal_type,
            sector: req.sector,
            deal_value: req.deal_value,
            current_stage: req.current_stage,
            summary: req.summary,
            assigned_to: req.assigned_to,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(DealResponse::for_role(&deal, caller.role)))
}

async fn list_deals(
    caller: Authorized<AnyRole>,
    filter: web::Query<StageFilter>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let deals: Vec<DealResponse> = deal_service::list_deals(&app_state, filter.stage)
        .await?
        .iter()
        .map(|deal| DealResponse::for_role(deal, caller.role))
        .collect();
    Ok(HttpResponse::Ok().json(deals))
}

async fn list_summaries(
    _caller: Authorized<AnyRole>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let summaries: Vec<DealSummaryResponse> = deal_service::list_deals(&app_state, None)
        .await?
        .iter()
        .map(summarize_deal)
        .collect();
    Ok(HttpResponse::Ok().json(summaries))
}

async fn get_deal(
    caller: Authorized<AnyRole>,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    let deal = deal_service::get_deal(&app_state, id).await?;
    Ok(HttpResponse::Ok().json(DealResponse::for_role(&deal, caller.role)))
}

async fn update_deal(
    caller: Authorized<AnyRole>,
    path: web::Path<String>,
    body: ValidatedJson<UpdateDealRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    let req = body.into_inner();
    let deal = deal_service::update_deal(
        &app_state,
        &caller,
        id,
        UpdateDeal {
            client_name: req.client_name,
            deal_type: req.deal_type,
            sector: req.sector,
            summary: req.summary,
            assigned_to: req.assigned_to,
        },
    )
    .await?;
    Ok(HttpResponse::Ok().json(DealResponse::for_role(&deal, caller.role)))
}

async fn update_stage(
    caller: Authorized<AnyRole>,
    path: web::Path<String>,
    body: ValidatedJson<UpdateStageRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    let deal = deal_service::update_stage(&app_state, &caller, id, body.stage).await?;
    Ok(HttpResponse::Ok().json(DealResponse::for_role(&deal, caller.role)))
}

async fn update_value(
    caller: Authorized<AdminOnly>,
    path: web::Path<String>,
    body: ValidatedJson<UpdateValueRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    let deal = deal_service::update_value(&app_state, &caller, id, body.deal_value).await?;
    Ok(HttpResponse::Ok().json(DealResponse::for_role(&deal, caller.role)))
}

async fn add_note(
    caller: Authorized<AnyRole>,
    path: web::Path<String>,
    body: ValidatedJson<AddNoteRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    let deal = deal_service::add_note(&app_state, &caller, id, &body.note).await?;
    Ok(HttpResponse::Ok().json(DealResponse::for_role(&deal, caller.role)))
}

async fn delete_deal(
    caller: Authorized<AdminOnly>,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    deal_service::delete_deal(&app_state, &caller, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_deal))
            .route(web::get().to(list_deals)),
    )
    // Registered before "/{id}" so "summary" is not taken for an id
    .service(web::resource("/summary").route(web::get().to(list_summaries)))
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_deal))
            .route(web::put().to(update_deal))
            .route(web::delete().to(delete_deal)),
    )
    .service(web::resource("/{id}/stage").route(web::patch().to(update_stage)))
    .service(web::resource("/{id}/value").route(web::patch().to(update_value)))
    .service(web::resource("/{id}/notes").route(web::post().to(add_note)));
}
