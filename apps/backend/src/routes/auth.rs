use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::role::Role;
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::services::auth as auth_service;
use crate::state::app_state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}

async fn login(
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let LoginRequest { username, password } = body.into_inner();

    let result = auth_service::login(&app_state, &username, &password).await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token: result.token,
        username: result.username,
        email: result.email,
        role: result.role,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/login").route(web::post().to(login)));
}
