#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod trace_ctx;


// Re-exports for public API
pub use auth::principal::Principal;
pub use auth::token::TokenCodec;
pub use error::AppError;
pub use infra::state::build_state;
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
