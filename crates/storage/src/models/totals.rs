use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Team;

/// One row of the read-only `person_totals` view: a person's summed
/// distance within one team attribution.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MemberTotal {
    pub person_id: Uuid,
    pub name: Option<String>,
    pub team: Option<Team>,
    pub total: f64,
}

/// One row of the read-only `team_totals` view.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TeamTotal {
    pub team: Team,
    pub total: f64,
}
