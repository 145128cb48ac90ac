//! Bearer token codec: mints and verifies HS256 JWTs.
//!
//! The codec is a pure function of its input, the supplied `now` and the
//! process-wide secret. Verification never panics; every failure comes back
//! as a [`TokenError`].
//!
//! Expiry is compared explicitly against the caller's `now` with second
//! resolution and no leeway: a token is invalid from the second `exp` is
//! reached. The library's own `exp` check (which uses the system clock and a
//! default leeway) is disabled.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::auth::claims::Claims;
use crate::state::security_config::SecurityConfig;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature does not verify")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("failed to encode token: {0}")]
    Encode(String),
    #[error("system clock is outside the representable range")]
    Clock,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(security: &SecurityConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(&security.jwt_secret),
            decoding: DecodingKey::from_secret(&security.jwt_secret),
            algorithm: security.algorithm,
            ttl: security.token_ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a token for `username` valid from `now` until `now + ttl`.
    pub fn issue(&self, username: &str, now: SystemTime) -> Result<String, TokenError> {
        let iat = unix_secs(now)?;
        let exp = i64::try_from(self.ttl.as_secs())
            .ok()
            .and_then(|ttl| iat.checked_add(ttl))
            .ok_or_else(|| TokenError::Encode("token lifetime out of range".to_string()))?;

        let claims = Claims {
            sub: username.to_string(),
            iat,
            exp,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    /// Verify signature and expiry, returning the claims on success.
    pub fn verify(&self, token: &str, now: SystemTime) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            })?;

        if unix_secs(now)? >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

fn unix_secs(now: SystemTime) -> Result<i64, TokenError> {
    now.duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| i64::try_from(d.as_secs()).ok())
        .ok_or(TokenError::Clock)
}
