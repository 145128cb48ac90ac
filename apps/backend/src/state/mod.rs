pub mod app_state;
pub mod clock;
pub mod security_config;
