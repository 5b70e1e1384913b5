use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Team;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Person {
    pub person_id: Uuid,
    pub name: String,
    pub is_admin: bool,
    /// Current assignment; only future ledger entries are stamped with it.
    pub team: Option<Team>,
    pub created_at: DateTime<Utc>,
}
