use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One of the two competing teams. Wire and storage values 2 and 3 are
/// kept from the original deployment so existing rows stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum Team {
    Blue = 2,
    Red = 3,
}

impl Team {
    pub fn label(self) -> &'static str {
        match self {
            Team::Blue => "Blue Team",
            Team::Red => "Red Team",
        }
    }
}

/// A person's team choice. `None` is stored as an explicit NULL, never
/// silently defaulted to a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TeamSelection {
    None,
    Blue,
    Red,
}

impl TeamSelection {
    pub fn team(self) -> Option<Team> {
        match self {
            TeamSelection::None => None,
            TeamSelection::Blue => Some(Team::Blue),
            TeamSelection::Red => Some(Team::Red),
        }
    }
}

impl From<Option<Team>> for TeamSelection {
    fn from(team: Option<Team>) -> Self {
        match team {
            None => TeamSelection::None,
            Some(Team::Blue) => TeamSelection::Blue,
            Some(Team::Red) => TeamSelection::Red,
        }
    }
}
