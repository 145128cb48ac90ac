use actix_web::{web, HttpResponse};
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::principal::Principal;
use crate::auth::role::Role;
use crate::error::AppError;
use crate::services::users as user_service;
use crate::state::app_state::AppState;
use crate::store::users::UserRecord;

/// Outward view of a user. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<UserRecord> for UserResponse {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            email: record.email,
            role: record.role,
            active: record.active,
            created_at: record.created_at,
        }
    }
}

async fn me(principal: Principal, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let record = user_service::get_user(&app_state, principal.user_id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(record)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/me").route(web::get().to(me)));
}
