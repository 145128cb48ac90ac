use actix_web::{error, web};
use uuid::Uuid;

use crate::error::AppError;
use crate::errors::ErrorCode;

pub mod admin;
pub mod auth;
pub mod deals;
pub mod health;
pub mod users;

/// Register every route. Middleware is applied by the caller (`main.rs`,
/// or the test app builder) so tests can choose which layers to include.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::bad_request(ErrorCode::BadRequest, err.to_string()))
    }));

    // Health check: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Login: /api/auth/**
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));

    // Own profile: /api/users/**
    cfg.service(web::scope("/api/users").configure(users::configure_routes));

    // User administration: /api/admin/**
    cfg.service(web::scope("/api/admin").configure(admin::configure_routes));

    // Deal pipeline: /api/deals/**
    cfg.service(web::scope("/api/deals").configure(deals::configure_routes));
}

/// Parse a path id. Anything that is not a UUID is `400 INVALID_ID`.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::bad_request(ErrorCode::InvalidId, format!("Invalid id: {raw}")))
}
