use std::sync::Arc;

use crate::auth::password::PasswordHasher;
use crate::error::AppError;
use crate::infra::seed::seed_default_users;
use crate::services::events::DealEventPublisher;
use crate::state::app_state::AppState;
use crate::state::clock::Clock;
use crate::state::security_config::SecurityConfig;
use crate::store::deals::{DealStore, InMemoryDealStore};
use crate::store::users::{CredentialStore, InMemoryCredentialStore};

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    passwords: Option<PasswordHasher>,
    users: Option<Arc<dyn CredentialStore>>,
    deals: Option<Arc<dyn DealStore>>,
    events: Option<DealEventPublisher>,
    clock: Clock,
    seed_default_users: bool,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::for_tests(),
            passwords: None,
            users: None,
            deals: None,
            events: None,
            clock: Clock::system(),
            seed_default_users: false,
        }
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    pub fn with_password_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.passwords = Some(hasher);
        self
    }

    pub fn with_credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.users = Some(store);
        self
    }

    pub fn with_deal_store(mut self, store: Arc<dyn DealStore>) -> Self {
        self.deals = Some(store);
        self
    }

    pub fn with_event_publisher(mut self, events: DealEventPublisher) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_default_users(mut self, seed: bool) -> Self {
        self.seed_default_users = seed;
        self
    }

    /// Must run inside a tokio runtime when no publisher was supplied, since
    /// the default one spawns its logging consumer.
    pub async fn build(self) -> Result<AppState, AppError> {
        let passwords = self.passwords.unwrap_or_default();
        let users = self
            .users
            .unwrap_or_else(|| Arc::new(InMemoryCredentialStore::new()) as Arc<dyn CredentialStore>);
        let deals = self
            .deals
            .unwrap_or_else(|| Arc::new(InMemoryDealStore::new()) as Arc<dyn DealStore>);
        let events = self
            .events
            .unwrap_or_else(DealEventPublisher::spawn_logging);

        if self.seed_default_users {
            seed_default_users(users.as_ref(), &passwords).await?;
        }

        Ok(AppState::new(
            self.security_config,
            passwords,
            users,
            deals,
            events,
            self.clock,
        ))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
