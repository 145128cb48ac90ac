//! Development user seeding.

use tracing::info;

use crate::auth::password::PasswordHasher;
use crate::auth::role::Role;
use crate::error::AppError;
use crate::store::users::{CredentialStore, NewUser};

pub const DEFAULT_USERS: [(&str, &str, &str, Role); 3] = [
    ("admin", "admin@investbank.com", "admin123", Role::Admin),
    ("user1", "user1@investbank.com", "user123", Role::User),
    ("user2", "user2@investbank.com", "user123", Role::User),
];

/// Insert [`DEFAULT_USERS`] when the store is empty. Returns how many users
/// were created.
pub async fn seed_default_users(
    store: &dyn CredentialStore,
    hasher: &PasswordHasher,
) -> Result<usize, AppError> {
    if store.count().await? > 0 {
        info!("users already exist; skipping default user seeding");
        return Ok(0);
    }

    for (username, email, password, role) in DEFAULT_USERS {
        let password_hash = hasher
            .hash(password)
            .map_err(|e| AppError::internal(e.to_string()))?;
        store
            .insert(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                role,
            })
            .await?;
        info!(username, role = %role, "default user created");
    }

    Ok(DEFAULT_USERS.len())
}
