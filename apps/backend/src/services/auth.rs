use tracing::{info, warn};

use crate::auth::identity::{AuthError, IdentityResolver};
use crate::auth::role::Role;
use crate::error::AppError;
use crate::state::app_state::AppState;

/// Successful login: a fresh bearer token and who it was issued to.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}

/// Check credentials and mint a token.
///
/// Unknown username, wrong password and disabled account all produce the
/// same `InvalidCredentials` error. Only store outages surface differently.
pub async fn login(state: &AppState, username: &str, password: &str) -> Result<LoginResult, AppError> {
    let resolver = IdentityResolver::new(state.users.as_ref(), &state.passwords);

    let record = match resolver.authenticate(username, password).await {
        Ok(record) => record,
        Err(AuthError::Store(e)) => return Err(e.into()),
        Err(e) => {
            warn!(reason = %e, "login rejected");
            return Err(AppError::invalid_credentials());
        }
    };

    let token = state
        .tokens
        .issue(&record.username, state.clock.now())
        .map_err(|e| AppError::internal(format!("token issuance failed: {e}")))?;

    info!(user_id = %record.id, role = %record.role, "login succeeded");

    Ok(LoginResult {
        token,
        username: record.username,
        email: record.email,
        role: record.role,
    })
}
