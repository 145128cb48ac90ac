//! One-way salted password hashing (Argon2id, PHC string format).

use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier, Version};
use once_cell::sync::OnceCell;
use password_hash::{PasswordHash, SaltString};
use std::sync::Arc;
use thiserror::Error;

const SALT_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to generate salt: {0}")]
    Salt(String),
    #[error("failed to hash password: {0}")]
    Hash(String),
}

/// Argon2id hasher shared through application state.
///
/// Also holds a lazily computed hash of a throwaway password so login can
/// spend the same work on unknown usernames as on known ones.
#[derive(Clone)]
pub struct PasswordHasher {
    argon: Argon2<'static>,
    dummy: Arc<OnceCell<String>>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::with_argon(Argon2::default())
    }
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimal-cost parameters so test suites stay fast.
    pub fn for_tests() -> Self {
        let params = Params::new(1024, 1, 1, None).unwrap_or_default();
        Self::with_argon(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    fn with_argon(argon: Argon2<'static>) -> Self {
        Self {
            argon,
            dummy: Arc::new(OnceCell::new()),
        }
    }

    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        getrandom::getrandom(&mut salt_bytes).map_err(|e| PasswordError::Salt(e.to_string()))?;
        let salt =
            SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError::Salt(e.to_string()))?;

        self.argon
            .hash_password(password.as_bytes(), &salt)
            .map(|phc| phc.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }

    /// True only when `password` matches the stored PHC string. An
    /// unparseable stored hash never matches.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        match PasswordHash::new(stored) {
            Ok(parsed) => self
                .argon
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash is not a valid PHC string");
                false
            }
        }
    }

    /// Burn one verification against a throwaway hash. Always false.
    pub fn verify_dummy(&self, password: &str) -> bool {
        let dummy = self
            .dummy
            .get_or_try_init(|| self.hash("dummy-password-for-timing"));

        match dummy {
            Ok(hash) => {
                let _ = self.verify(password, hash);
            }
            Err(e) => tracing::warn!(error = %e, "could not prepare dummy password hash"),
        }
        false
    }
}
