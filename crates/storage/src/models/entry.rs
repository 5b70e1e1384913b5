use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Team;

/// An append-only ledger record. `km` is signed: corrections are logged
/// as negative entries, never as edits of existing rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DistanceEntry {
    pub entry_id: Uuid,
    pub person_id: Uuid,
    pub km: f64,
    /// Team the person belonged to when this entry was logged.
    pub team: Option<Team>,
    pub created_at: DateTime<Utc>,
    pub proof_path: Option<String>,
}
