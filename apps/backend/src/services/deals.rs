//! Deal pipeline operations.
//!
//! Every operation runs under the caller's [`Principal`]. Results come back
//! as stored [`Deal`]s; projecting them for the caller's role is the route
//! layer's job.

use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::auth::principal::Principal;
use crate::auth::role::Role;
use crate::domain::deal::{Deal, DealStage, Note};
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::services::events::DealEvent;
use crate::state::app_state::AppState;
use crate::store::deals::{deal_not_found, DealChange, Modified};

#[derive(Debug, Clone)]
pub struct CreateDeal {
    pub client_name: String,
    pub deal_type: String,
    pub sector: String,
    pub deal_value: i64,
    pub current_stage: DealStage,
    pub summary: Option<String>,
    pub assigned_to: Option<Uuid>,
}

/// Partial update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateDeal {
    pub client_name: Option<String>,
    pub deal_type: Option<String>,
    pub sector: Option<String>,
    pub summary: Option<String>,
    pub assigned_to: Option<Uuid>,
}

fn require_text(value: &str, message: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(message));
    }
    Ok(trimmed.to_string())
}

fn require_positive(value: i64) -> Result<i64, DomainError> {
    if value <= 0 {
        return Err(DomainError::validation("Deal value must be positive"));
    }
    Ok(value)
}

async fn require_user(state: &AppState, id: Uuid) -> Result<Uuid, AppError> {
    match state.users.find_by_id(id).await? {
        Some(_) => Ok(id),
        None => Err(DomainError::validation("Assigned user does not exist").into()),
    }
}

async fn load(state: &AppState, id: Uuid) -> Result<Deal, AppError> {
    state
        .deals
        .get(id)
        .await?
        .ok_or_else(|| deal_not_found(id).into())
}

/// Atomic read-modify-write that also stamps `updated_at`.
async fn modify(state: &AppState, id: Uuid, change: DealChange) -> Result<Modified, AppError> {
    Ok(state
        .deals
        .modify(
            id,
            Box::new(move |deal: &mut Deal| {
                change(&mut *deal);
                deal.updated_at = Some(OffsetDateTime::now_utc());
            }),
        )
        .await?)
}

pub async fn create_deal(
    state: &AppState,
    actor: &Principal,
    input: CreateDeal,
) -> Result<Deal, AppError> {
    let assigned_to = match input.assigned_to {
        Some(id) => require_user(state, id).await?,
        None => actor.user_id,
    };

    let deal = Deal {
        id: Uuid::new_v4(),
        client_name: require_text(&input.client_name, "Client name is required")?,
        deal_type: require_text(&input.deal_type, "Deal type is required")?,
        sector: require_text(&input.sector, "Sector is required")?,
        deal_value: require_positive(input.deal_value)?,
        current_stage: input.current_stage,
        summary: input.summary,
        notes: Vec::new(),
        created_by: actor.user_id,
        assigned_to,
        created_at: OffsetDateTime::now_utc(),
        updated_at: None,
    };

    let deal = state.deals.insert(deal).await?;
    info!(deal_id = %deal.id, user_id = %actor.user_id, "deal created");
    state.events.publish(DealEvent::created(&deal));
    Ok(deal)
}

pub async fn list_deals(state: &AppState, stage: Option<DealStage>) -> Result<Vec<Deal>, AppError> {
    Ok(state.deals.list(stage).await?)
}

pub async fn get_deal(state: &AppState, id: Uuid) -> Result<Deal, AppError> {
    load(state, id).await
}

pub async fn update_deal(
    state: &AppState,
    actor: &Principal,
    id: Uuid,
    changes: UpdateDeal,
) -> Result<Deal, AppError> {
    let client_name = changes
        .client_name
        .map(|v| require_text(&v, "Client name must not be blank"))
        .transpose()?;
    let deal_type = changes
        .deal_type
        .map(|v| require_text(&v, "Deal type must not be blank"))
        .transpose()?;
    let sector = changes
        .sector
        .map(|v| require_text(&v, "Sector must not be blank"))
        .transpose()?;
    let assigned_to = match changes.assigned_to {
        Some(assignee) => Some(require_user(state, assignee).await?),
        None => None,
    };
    let summary = changes.summary;

    let deal = modify(
        state,
        id,
        Box::new(move |deal: &mut Deal| {
            if let Some(name) = client_name {
                deal.client_name = name;
            }
            if let Some(deal_type) = deal_type {
                deal.deal_type = deal_type;
            }
            if let Some(sector) = sector {
                deal.sector = sector;
            }
            if let Some(summary) = summary {
                deal.summary = Some(summary);
            }
            if let Some(assignee) = assigned_to {
                deal.assigned_to = assignee;
            }
        }),
    )
    .await?
    .current;

    info!(deal_id = %deal.id, user_id = %actor.user_id, "deal updated");
    Ok(deal)
}

pub async fn update_stage(
    state: &AppState,
    actor: &Principal,
    id: Uuid,
    stage: DealStage,
) -> Result<Deal, AppError> {
    let change: DealChange = Box::new(move |deal: &mut Deal| deal.current_stage = stage);
    let Modified { previous, current } = modify(state, id, change).await?;
    let from = previous.current_stage;

    info!(deal_id = %current.id, from = %from, to = %stage, "deal stage changed");
    state
        .events
        .publish(DealEvent::stage_updated(&current, from, &actor.username));
    Ok(current)
}

/// Change the monetary value. ADMIN only, enforced here as well as at the
/// route.
pub async fn update_value(
    state: &AppState,
    actor: &Principal,
    id: Uuid,
    deal_value: i64,
) -> Result<Deal, AppError> {
    match actor.role {
        Role::Admin => {}
        Role::User => {
            return Err(DomainError::forbidden("Only ADMIN can update deal value").into())
        }
    }

    let deal_value = require_positive(deal_value)?;
    let change: DealChange = Box::new(move |deal: &mut Deal| deal.deal_value = deal_value);
    let deal = modify(state, id, change).await?.current;

    info!(deal_id = %deal.id, user_id = %actor.user_id, "deal value changed");
    Ok(deal)
}

pub async fn add_note(
    state: &AppState,
    actor: &Principal,
    id: Uuid,
    note: &str,
) -> Result<Deal, AppError> {
    let note = require_text(note, "Note cannot be empty")?;
    let user_id = actor.user_id;

    let modified = modify(
        state,
        id,
        Box::new(move |deal: &mut Deal| {
            deal.notes.push(Note {
                user_id,
                note,
                timestamp: OffsetDateTime::now_utc(),
            })
        }),
    )
    .await?;
    Ok(modified.current)
}

pub async fn delete_deal(state: &AppState, actor: &Principal, id: Uuid) -> Result<(), AppError> {
    if !state.deals.delete(id).await? {
        return Err(deal_not_found(id).into());
    }
    info!(deal_id = %id, user_id = %actor.user_id, "deal deleted");
    Ok(())
}
