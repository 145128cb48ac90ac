//! Deal entity and pipeline stages.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Pipeline stage of a deal. Serialized by variant name (`"TermSheetSubmitted"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DealStage {
    Prospect,
    UnderEvaluation,
    TermSheetSubmitted,
    Closed,
    Lost,
}

impl DealStage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DealStage::Prospect => "Prospect",
            DealStage::UnderEvaluation => "UnderEvaluation",
            DealStage::TermSheetSubmitted => "TermSheetSubmitted",
            DealStage::Closed => "Closed",
            DealStage::Lost => "Lost",
        }
    }
}

impl std::fmt::Display for DealStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub user_id: Uuid,
    pub note: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub id: Uuid,
    pub client_name: String,
    pub deal_type: String,
    pub sector: String,
    /// Monetary value in whole currency units; always positive.
    pub deal_value: i64,
    pub current_stage: DealStage,
    pub summary: Option<String>,
    pub notes: Vec<Note>,
    pub created_by: Uuid,
    pub assigned_to: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}
