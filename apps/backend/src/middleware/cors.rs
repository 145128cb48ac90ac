use actix_cors::Cors;
use actix_web::http::header;

/// CORS for browser clients. Only the configured origins are allowed; with
/// none configured, only local development origins are.
pub fn cors_middleware(allowed_origins: &[String]) -> Cors {
    let defaults = ["http://localhost:3000", "http://127.0.0.1:3000"];

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .max_age(3600);

    if allowed_origins.is_empty() {
        for origin in defaults {
            cors = cors.allowed_origin(origin);
        }
    } else {
        for origin in allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}
