//! Admin checks and the team randomizer.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::Team;
use crate::store::Ledger;

/// How admin status is decided, chosen once from configuration: a
/// static allowlist of person ids, or the `is_admin` flag on the
/// person record when no allowlist is configured.
#[derive(Debug, Clone)]
pub enum AdminPolicy {
    Allowlist(HashSet<Uuid>),
    StoreFlag,
}

impl AdminPolicy {
    pub fn from_comma_separated(ids_str: &str) -> Self {
        let ids: HashSet<Uuid> = ids_str
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| Uuid::parse_str(s).ok())
            .collect();

        if ids.is_empty() {
            AdminPolicy::StoreFlag
        } else {
            AdminPolicy::Allowlist(ids)
        }
    }

    pub async fn is_admin(&self, ledger: &dyn Ledger, person_id: Uuid) -> Result<bool> {
        match self {
            AdminPolicy::Allowlist(ids) => Ok(ids.contains(&person_id)),
            AdminPolicy::StoreFlag => ledger.is_admin_flag(person_id).await,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct TeamDraw {
    pub blue: Vec<Uuid>,
    pub red: Vec<Uuid>,
}

/// Shuffle the selected people and split them in half, blue first.
pub fn draw_teams(mut people: Vec<Uuid>, rng: &mut impl Rng) -> Result<TeamDraw> {
    if people.len() < 2 {
        return Err(StorageError::InvalidInput(
            "select at least 2 people".to_string(),
        ));
    }

    people.shuffle(rng);
    let mid = people.len().div_ceil(2);
    let red = people.split_off(mid);

    Ok(TeamDraw { blue: people, red })
}

/// Draw fresh teams and apply them: every assignment is reset to NULL
/// first, then the two halves are assigned. Unselected people end up
/// unassigned.
pub async fn randomize_teams(ledger: &dyn Ledger, people: Vec<Uuid>) -> Result<TeamDraw> {
    let draw = draw_teams(people, &mut rand::thread_rng())?;

    ledger.reset_all_teams().await?;
    ledger.assign_team(&draw.blue, Team::Blue).await?;
    ledger.assign_team(&draw.red, Team::Red).await?;

    Ok(draw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemLedger;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn draw_splits_blue_heavy() {
        let people: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        let draw = draw_teams(people.clone(), &mut StdRng::seed_from_u64(7)).unwrap();

        assert_eq!(draw.blue.len(), 3);
        assert_eq!(draw.red.len(), 2);

        let mut drawn: Vec<Uuid> = draw.blue.iter().chain(&draw.red).copied().collect();
        drawn.sort();
        let mut expected = people;
        expected.sort();
        assert_eq!(drawn, expected);
    }

    #[test]
    fn draw_needs_at_least_two() {
        let err = draw_teams(vec![Uuid::new_v4()], &mut StdRng::seed_from_u64(7)).unwrap_err();
        assert!(matches!(err, StorageError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn randomize_resets_unselected_people() {
        let ledger = MemLedger::new();
        let mut selected = Vec::new();
        for name in ["ana", "bo", "cy", "dee"] {
            let id = Uuid::new_v4();
            ledger.create_person(id, name).await.unwrap();
            selected.push(id);
        }
        let bystander = Uuid::new_v4();
        ledger.create_person(bystander, "eve").await.unwrap();
        ledger.set_team(bystander, Some(Team::Red)).await.unwrap();

        let draw = randomize_teams(&ledger, selected.clone()).await.unwrap();

        assert_eq!(draw.blue.len() + draw.red.len(), selected.len());
        assert_eq!(ledger.person(bystander).await.unwrap().team, None);
        for id in &draw.blue {
            assert_eq!(ledger.person(*id).await.unwrap().team, Some(Team::Blue));
        }
        for id in &draw.red {
            assert_eq!(ledger.person(*id).await.unwrap().team, Some(Team::Red));
        }
    }

    #[tokio::test]
    async fn allowlist_policy_skips_the_store() {
        let ledger = MemLedger::new();
        let admin = Uuid::new_v4();
        let other = Uuid::new_v4();

        let policy = AdminPolicy::from_comma_separated(&format!(" {admin} , "));
        assert!(matches!(policy, AdminPolicy::Allowlist(_)));
        // Neither id exists in the ledger; the allowlist answers anyway.
        assert!(policy.is_admin(&ledger, admin).await.unwrap());
        assert!(!policy.is_admin(&ledger, other).await.unwrap());
    }

    #[tokio::test]
    async fn empty_allowlist_falls_back_to_store_flag() {
        let ledger = MemLedger::new();
        let person = Uuid::new_v4();
        ledger.create_person(person, "ana").await.unwrap();

        let policy = AdminPolicy::from_comma_separated("");
        assert!(matches!(policy, AdminPolicy::StoreFlag));
        assert!(!policy.is_admin(&ledger, person).await.unwrap());
    }
}
