//! User administration.

use tracing::info;
use uuid::Uuid;

use crate::auth::role::Role;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::state::app_state::AppState;
use crate::store::users::{NewUser, UserRecord};

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

fn validate(input: &CreateUser) -> Result<(), DomainError> {
    if input.username.trim().is_empty() {
        return Err(DomainError::validation("Username is required"));
    }
    if input.password.is_empty() {
        return Err(DomainError::validation("Password is required"));
    }
    let email = input.email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(DomainError::validation("Email must be a valid address")),
    }
}

/// Register a new active user. Duplicate username or email is a conflict.
pub async fn create_user(state: &AppState, input: CreateUser) -> Result<UserRecord, AppError> {
    validate(&input)?;

    let password_hash = state
        .passwords
        .hash(&input.password)
        .map_err(|e| AppError::internal(e.to_string()))?;

    let record = state
        .users
        .insert(NewUser {
            username: input.username.trim().to_string(),
            email: input.email.trim().to_string(),
            password_hash,
            role: input.role,
        })
        .await?;

    info!(
        user_id = %record.id,
        email = %Redacted(&record.email),
        role = %record.role,
        "user created"
    );
    Ok(record)
}

pub async fn list_users(state: &AppState) -> Result<Vec<UserRecord>, AppError> {
    Ok(state.users.list().await?)
}

pub async fn get_user(state: &AppState, id: Uuid) -> Result<UserRecord, AppError> {
    state.users.find_by_id(id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::User, format!("User not found with id: {id}")).into()
    })
}

/// Enable or disable an account. Takes effect on the user's next request.
pub async fn set_user_active(
    state: &AppState,
    id: Uuid,
    active: bool,
) -> Result<UserRecord, AppError> {
    let record = state.users.set_active(id, active).await?;
    info!(user_id = %id, active, "user status changed");
    Ok(record)
}
