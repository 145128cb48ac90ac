//! Deal lifecycle notifications.
//!
//! Publishing is fire-and-forget onto an in-process channel. The only
//! consumer logs each payload. A failed publish is logged and never reaches
//! the caller that triggered it.

use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::deal::{Deal, DealStage};

/// Lifecycle event payload. Events are visible to every log reader, so the
/// ADMIN-only `deal_value` is never part of one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DealEvent {
    DealCreated {
        event_id: Uuid,
        #[serde(with = "time::serde::rfc3339")]
        timestamp: OffsetDateTime,
        deal_id: Uuid,
        client_name: String,
        deal_type: String,
        sector: String,
        current_stage: DealStage,
        summary: Option<String>,
        created_by: Uuid,
        assigned_to: Uuid,
    },
    DealStageUpdated {
        event_id: Uuid,
        #[serde(with = "time::serde::rfc3339")]
        timestamp: OffsetDateTime,
        deal_id: Uuid,
        client_name: String,
        previous_stage: DealStage,
        new_stage: DealStage,
        updated_by: String,
    },
}

impl DealEvent {
    pub fn created(deal: &Deal) -> Self {
        DealEvent::DealCreated {
            event_id: Uuid::new_v4(),
            timestamp: OffsetDateTime::now_utc(),
            deal_id: deal.id,
            client_name: deal.client_name.clone(),
            deal_type: deal.deal_type.clone(),
            sector: deal.sector.clone(),
            current_stage: deal.current_stage,
            summary: deal.summary.clone(),
            created_by: deal.created_by,
            assigned_to: deal.assigned_to,
        }
    }

    pub fn stage_updated(deal: &Deal, previous_stage: DealStage, updated_by: &str) -> Self {
        DealEvent::DealStageUpdated {
            event_id: Uuid::new_v4(),
            timestamp: OffsetDateTime::now_utc(),
            deal_id: deal.id,
            client_name: deal.client_name.clone(),
            previous_stage,
            new_stage: deal.current_stage,
            updated_by: updated_by.to_string(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            DealEvent::DealCreated { .. } => "DEAL_CREATED",
            DealEvent::DealStageUpdated { .. } => "DEAL_STAGE_UPDATED",
        }
    }

    pub fn deal_id(&self) -> Uuid {
        match self {
            DealEvent::DealCreated { deal_id, .. } | DealEvent::DealStageUpdated { deal_id, .. } => {
                *deal_id
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct DealEventPublisher {
    tx: mpsc::UnboundedSender<DealEvent>,
}

impl DealEventPublisher {
    /// Publisher plus the receiving end, for callers that consume events
    /// themselves.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DealEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Publisher backed by a spawned task that logs every event. Must be
    /// called inside a tokio runtime.
    pub fn spawn_logging() -> Self {
        let (publisher, rx) = Self::channel();
        tokio::spawn(log_events(rx));
        publisher
    }

    pub fn publish(&self, event: DealEvent) {
        let event_type = event.event_type();
        let deal_id = event.deal_id();
        if self.tx.send(event).is_err() {
            warn!(event_type, %deal_id, "deal event dropped: no consumer");
        }
    }
}

pub async fn log_events(mut rx: mpsc::UnboundedReceiver<DealEvent>) {
    while let Some(event) = rx.recv().await {
        match serde_json::to_string(&event) {
            Ok(payload) => info!(
                event_type = event.event_type(),
                deal_id = %event.deal_id(),
                payload = %payload,
                "deal event"
            ),
            Err(e) => warn!(error = %e, "failed to serialize deal event"),
        }
    }
}
