use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::profile::HistoryEntry;
use crate::models::TeamSelection;

/// Activity types and their fixed scoring multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Running,
    Walking,
    InlineSkating,
    Cycling,
    Swimming,
}

impl ActivityKind {
    pub const fn multiplier(self) -> f64 {
        match self {
            ActivityKind::Running => 2.0,
            ActivityKind::Walking => 1.6,
            ActivityKind::InlineSkating => 1.4,
            ActivityKind::Cycling => 1.25,
            ActivityKind::Swimming => 3.0,
        }
    }
}

/// Whether the logged distance adds to or subtracts from the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Add,
    Subtract,
}

impl Direction {
    pub const fn sign(self) -> f64 {
        match self {
            Direction::Add => 1.0,
            Direction::Subtract => -1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecordActivityRequest {
    pub distance_km: f64,
    pub activity: ActivityKind,
    #[serde(default)]
    pub direction: Direction,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetTeamRequest {
    pub team: TeamSelection,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityOutcome {
    pub entry: HistoryEntry,
    pub message: String,
}
