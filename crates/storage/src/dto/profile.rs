use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Team;

/// A history line as shown in the profile view; `proof_url` is the
/// public locator of the attached evidence image, if any.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntry {
    pub entry_id: Uuid,
    pub km: f64,
    pub team: Option<Team>,
    pub created_at: DateTime<Utc>,
    pub proof_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProofItem {
    pub entry_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub proof_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StreakResponse {
    pub streak: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProofUploadResponse {
    pub proof_url: String,
    pub message: String,
}
