//! Credential store: identity records keyed by id, unique by username and email.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use parking_lot::RwLock;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::role::Role;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::logging::pii::Redacted;

/// Stored identity. Never serialized; `Debug` hides the hash.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
    pub created_at: OffsetDateTime,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &Redacted(&self.email))
            .field("password_hash", &"[REDACTED]")
            .field("role", &self.role)
            .field("active", &self.active)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Input for [`CredentialStore::insert`]. The password is already hashed.
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, DomainError>;

    /// Insert a new active user. Fails with a conflict when the username or
    /// email is already present.
    async fn insert(&self, user: NewUser) -> Result<UserRecord, DomainError>;

    async fn list(&self) -> Result<Vec<UserRecord>, DomainError>;

    async fn set_active(&self, id: Uuid, active: bool) -> Result<UserRecord, DomainError>;

    async fn count(&self) -> Result<usize, DomainError>;
}

#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, DomainError> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, DomainError> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, DomainError> {
        let mut users = self.users.write();

        if users.values().any(|u| u.username == user.username) {
            return Err(DomainError::conflict(
                ConflictKind::UniqueUsername,
                "Username already exists",
            ));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::conflict(
                ConflictKind::UniqueEmail,
                "Email already exists",
            ));
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            active: true,
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<UserRecord>, DomainError> {
        let mut all: Vec<UserRecord> = self.users.read().values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.username.cmp(&b.username)));
        Ok(all)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<UserRecord, DomainError> {
        let mut users = self.users.write();
        let record = users.get_mut(&id).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::User, format!("User not found with id: {id}"))
        })?;
        record.active = active;
        Ok(record.clone())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.users.read().len())
    }
}
