use uuid::Uuid;

use crate::auth::role::{Authority, Role};
use crate::store::users::UserRecord;

/// Authenticated identity attached to a single request.
///
/// Built by the authenticator once per request and stored in the request's
/// extensions; handlers obtain it through the `Principal` / `Authorized<P>`
/// extractors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
    pub authorities: Vec<Authority>,
}

impl Principal {
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            user_id: record.id,
            username: record.username.clone(),
            role: record.role,
            authorities: record.role.authorities().to_vec(),
        }
    }

    pub fn has_authority(&self, authority: Authority) -> bool {
        self.authorities.contains(&authority)
    }
}
