//! Domain layer: deal types and the role-scoped projection.

pub mod deal;
pub mod projection;

pub use deal::{Deal, DealStage, Note};
pub use projection::{project_deal, summarize_deal, DealResponse, DealSummaryResponse};
