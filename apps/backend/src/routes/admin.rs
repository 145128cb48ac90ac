use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::parse_id;
use super::users::UserResponse;
use crate::auth::authorization::AdminOnly;
use crate::auth::role::Role;
use crate::error::AppError;
use crate::extractors::{Authorized, ValidatedJson};
use crate::services::users::{self as user_service, CreateUser};
use crate::state::app_state::AppState;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub active: bool,
}

async fn create_user(
    _admin: Authorized<AdminOnly>,
    body: ValidatedJson<CreateUserRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let CreateUserRequest {
        username,
        email,
        password,
        role,
    } = body.into_inner();

    let record = user_service::create_user(
        &app_state,
        CreateUser {
            username,
            email,
            password,
            role,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(UserResponse::from(record)))
}

async fn list_users(
    _admin: Authorized<AdminOnly>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let users: Vec<UserResponse> = user_service::list_users(&app_state)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(users))
}

async fn set_status(
    _admin: Authorized<AdminOnly>,
    path: web::Path<String>,
    query: web::Query<StatusQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    let record = user_service::set_user_active(&app_state, id, query.active).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(record)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/users")
            .route(web::post().to(create_user))
            .route(web::get().to(list_users)),
    )
    .service(web::resource("/users/{id}/status").route(web::put().to(set_status)));
}
