//! Deal store.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::deal::{Deal, DealStage};
use crate::errors::domain::{DomainError, NotFoundKind};

#[async_trait]
pub trait DealStore: Send + Sync {
    async fn insert(&self, deal: Deal) -> Result<Deal, DomainError>;

    async fn get(&self, id: Uuid) -> Result<Option<Deal>, DomainError>;

    /// All deals ordered by creation time, optionally restricted to a stage.
    async fn list(&self, stage: Option<DealStage>) -> Result<Vec<Deal>, DomainError>;

    /// Apply `change` to an existing deal as one atomic step. Concurrent
    /// modifications of the same deal are serialized, never lost.
    async fn modify(&self, id: Uuid, change: DealChange) -> Result<Modified, DomainError>;

    /// Returns whether a deal was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

/// In-place edit run while the store holds the deal exclusively.
pub type DealChange = Box<dyn FnOnce(&mut Deal) + Send>;

/// A deal as it was right before and right after a [`DealStore::modify`].
#[derive(Debug, Clone)]
pub struct Modified {
    pub previous: Deal,
    pub current: Deal,
}

pub(crate) fn deal_not_found(id: Uuid) -> DomainError {
    DomainError::not_found(NotFoundKind::Deal, format!("Deal not found with id: {id}"))
}

#[derive(Debug, Default)]
pub struct InMemoryDealStore {
    deals: RwLock<HashMap<Uuid, Deal>>,
}

impl InMemoryDealStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DealStore for InMemoryDealStore {
    async fn insert(&self, deal: Deal) -> Result<Deal, DomainError> {
        self.deals.write().insert(deal.id, deal.clone());
        Ok(deal)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Deal>, DomainError> {
        Ok(self.deals.read().get(&id).cloned())
    }

    async fn list(&self, stage: Option<DealStage>) -> Result<Vec<Deal>, DomainError> {
        let mut deals: Vec<Deal> = self
            .deals
            .read()
            .values()
            .filter(|d| stage.is_none_or(|s| d.current_stage == s))
            .cloned()
            .collect();
        deals.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(deals)
    }

    async fn modify(&self, id: Uuid, change: DealChange) -> Result<Modified, DomainError> {
        let mut deals = self.deals.write();
        let slot = deals.get_mut(&id).ok_or_else(|| deal_not_found(id))?;
        let previous = slot.clone();
        change(slot);
        Ok(Modified {
            previous,
            current: slot.clone(),
        })
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.deals.write().remove(&id).is_some())
    }
}
