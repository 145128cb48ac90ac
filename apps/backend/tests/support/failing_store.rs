use async_trait::async_trait;
use deal_backend::errors::domain::{DomainError, InfraErrorKind};
use deal_backend::store::users::{CredentialStore, NewUser, UserRecord};
use uuid::Uuid;

/// Credential store whose every call fails as if the backend were down.
#[derive(Debug, Default)]
pub struct FailingCredentialStore;

fn outage() -> DomainError {
    DomainError::infra(InfraErrorKind::StoreUnavailable, "credential store offline")
}

#[async_trait]
impl CredentialStore for FailingCredentialStore {
    async fn find_by_username(&self, _username: &str) -> Result<Option<UserRecord>, DomainError> {
        Err(outage())
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<UserRecord>, DomainError> {
        Err(outage())
    }

    async fn insert(&self, _user: NewUser) -> Result<UserRecord, DomainError> {
        Err(outage())
    }

    async fn list(&self) -> Result<Vec<UserRecord>, DomainError> {
        Err(outage())
    }

    async fn set_active(&self, _id: Uuid, _active: bool) -> Result<UserRecord, DomainError> {
        Err(outage())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Err(outage())
    }
}
