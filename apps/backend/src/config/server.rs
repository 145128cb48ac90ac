//! Process configuration read once from the environment at startup.
//!
//! | Variable               | Default   | Notes                              |
//! |------------------------|-----------|------------------------------------|
//! | `BACKEND_HOST`         | `0.0.0.0` |                                    |
//! | `BACKEND_PORT`         | `8080`    |                                    |
//! | `BACKEND_JWT_SECRET`   | required  | at least 32 bytes                  |
//! | `BACKEND_JWT_TTL_SECS` | `86400`   | token lifetime, 1s to 30 days      |
//! | `SEED_DEFAULT_USERS`   | `false`   | seed dev users into an empty store |
//! | `CORS_ALLOWED_ORIGINS` | empty     | comma separated `http(s)://` URLs  |

use std::time::Duration;

use crate::error::AppError;
use crate::state::security_config::{SecurityConfig, DEFAULT_TOKEN_TTL, MAX_TOKEN_TTL};

pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub security: SecurityConfig,
    pub seed_default_users: bool,
    pub cors_allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("BACKEND_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::config("BACKEND_PORT must be a valid port number"))?,
            None => 8080,
        };

        let secret = lookup("BACKEND_JWT_SECRET")
            .ok_or_else(|| AppError::config("BACKEND_JWT_SECRET must be set"))?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(AppError::config(format!(
                "BACKEND_JWT_SECRET must be at least {MIN_SECRET_LEN} bytes"
            )));
        }

        let token_ttl = match lookup("BACKEND_JWT_TTL_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 && secs <= MAX_TOKEN_TTL.as_secs() => {
                    Duration::from_secs(secs)
                }
                _ => {
                    return Err(AppError::config(format!(
                        "BACKEND_JWT_TTL_SECS must be between 1 and {} seconds",
                        MAX_TOKEN_TTL.as_secs()
                    )))
                }
            },
            None => DEFAULT_TOKEN_TTL,
        };

        let seed_default_users = match lookup("SEED_DEFAULT_USERS") {
            Some(raw) => raw
                .trim()
                .parse::<bool>()
                .map_err(|_| AppError::config("SEED_DEFAULT_USERS must be true or false"))?,
            None => false,
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            security: SecurityConfig::new(secret.into_bytes()).with_token_ttl(token_ttl),
            seed_default_users,
            cors_allowed_origins,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect()
}
