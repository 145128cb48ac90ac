use std::fmt;
use std::time::Duration;

use jsonwebtoken::Algorithm;

/// Default token lifetime: 24 hours.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Longest lifetime accepted from configuration: 30 days.
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Configuration for JWT security settings.
///
/// Loaded once at startup and never mutated.
#[derive(Clone)]
pub struct SecurityConfig {
    /// JWT secret key for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// JWT algorithm to use (HS256)
    pub algorithm: Algorithm,
    /// Lifetime of every issued token
    pub token_ttl: Duration,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given JWT secret and the default lifetime
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            token_ttl: DEFAULT_TOKEN_TTL,
        }
    }

    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    /// Fixed config for unit and integration tests.
    pub fn for_tests() -> Self {
        Self::new(b"test_secret_key_for_testing_purposes_only".to_vec())
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}
