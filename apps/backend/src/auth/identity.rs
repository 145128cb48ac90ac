//! Identity resolution and login-time credential checks.

use thiserror::Error;
use tracing::debug;

use crate::auth::password::PasswordHasher;
use crate::auth::principal::Principal;
use crate::errors::domain::DomainError;
use crate::store::users::{CredentialStore, UserRecord};

/// Why an identity could not be resolved or authenticated. Callers at the
/// HTTP boundary collapse all of these into one uniform failure.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity not found")]
    IdentityNotFound,
    #[error("account disabled")]
    AccountDisabled,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("credential store error: {0}")]
    Store(#[from] DomainError),
}

pub struct IdentityResolver<'a> {
    store: &'a dyn CredentialStore,
    hasher: &'a PasswordHasher,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(store: &'a dyn CredentialStore, hasher: &'a PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Look up `username` and build its principal. Re-checks the active flag
    /// on every call, so deactivation applies to tokens already issued.
    pub async fn resolve(&self, username: &str) -> Result<Principal, AuthError> {
        let record = self
            .store
            .find_by_username(username)
            .await?
            .ok_or(AuthError::IdentityNotFound)?;

        if !record.active {
            return Err(AuthError::AccountDisabled);
        }

        Ok(Principal::from_record(&record))
    }

    /// Check a username/password pair.
    ///
    /// An unknown username still costs one hash verification. The active flag
    /// is only consulted after the password has verified.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserRecord, AuthError> {
        let Some(record) = self.store.find_by_username(username).await? else {
            self.hasher.verify_dummy(password);
            debug!("login for unknown username");
            return Err(AuthError::IdentityNotFound);
        };

        if !self.hasher.verify(password, &record.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        if !record.active {
            return Err(AuthError::AccountDisabled);
        }

        Ok(record)
    }
}
