use std::fmt;
use std::sync::Arc;

use super::clock::Clock;
use super::security_config::SecurityConfig;
use crate::auth::password::PasswordHasher;
use crate::auth::token::TokenCodec;
use crate::services::events::DealEventPublisher;
use crate::store::deals::DealStore;
use crate::store::users::CredentialStore;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Security configuration including JWT settings
    pub security: SecurityConfig,
    /// Token codec built once from `security`
    pub tokens: TokenCodec,
    pub passwords: PasswordHasher,
    pub users: Arc<dyn CredentialStore>,
    pub deals: Arc<dyn DealStore>,
    pub events: DealEventPublisher,
    pub clock: Clock,
}

impl AppState {
    pub fn new(
        security: SecurityConfig,
        passwords: PasswordHasher,
        users: Arc<dyn CredentialStore>,
        deals: Arc<dyn DealStore>,
        events: DealEventPublisher,
        clock: Clock,
    ) -> Self {
        Self {
            tokens: TokenCodec::new(&security),
            security,
            passwords,
            users,
            deals,
            events,
            clock,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("security", &self.security)
            .field("tokens", &self.tokens)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
