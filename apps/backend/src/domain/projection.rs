//! Role-scoped view of a deal: which fields a caller gets to see.
//!
//! Only the monetary value is gated. Everything else about a deal is visible
//! to any authenticated role. Both functions here are pure and total; route
//! handlers never serialize a [`Deal`] directly.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::role::Role;
use crate::domain::deal::{Deal, DealStage, Note};

/// Outward representation of a deal. `deal_value` is omitted entirely
/// (not `null`) when the caller may not see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DealResponse {
    pub id: Uuid,
    pub client_name: String,
    pub deal_type: String,
    pub sector: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_value: Option<i64>,
    pub current_stage: DealStage,
    pub summary: Option<String>,
    pub notes: Vec<Note>,
    pub created_by: Uuid,
    pub assigned_to: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// Pipeline overview row. Never carries the value, whatever the role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DealSummaryResponse {
    pub id: Uuid,
    pub client_name: String,
    pub deal_type: String,
    pub sector: String,
    pub current_stage: DealStage,
    pub summary: Option<String>,
}

pub const fn can_view_value(role: Role) -> bool {
    match role {
        Role::Admin => true,
        Role::User => false,
    }
}

pub fn project_deal(deal: Option<&Deal>, role: Role) -> Option<DealResponse> {
    deal.map(|deal| DealResponse::for_role(deal, role))
}

impl DealResponse {
    pub fn for_role(deal: &Deal, role: Role) -> Self {
        Self {
            id: deal.id,
            client_name: deal.client_name.clone(),
            deal_type: deal.deal_type.clone(),
            sector: deal.sector.clone(),
            deal_value: can_view_value(role).then_some(deal.deal_value),
            current_stage: deal.current_stage,
            summary: deal.summary.clone(),
            notes: deal.notes.clone(),
            created_by: deal.created_by,
            assigned_to: deal.assigned_to,
            created_at: deal.created_at,
            updated_at: deal.updated_at,
        }
    }
}

pub fn summarize_deal(deal: &Deal) -> DealSummaryResponse {
    DealSummaryResponse {
        id: deal.id,
        client_name: deal.client_name.clone(),
        deal_type: deal.deal_type.clone(),
        sector: deal.sector.clone(),
        current_stage: deal.current_stage,
        summary: deal.summary.clone(),
    }
}
