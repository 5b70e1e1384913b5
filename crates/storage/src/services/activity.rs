//! Activity logging and team assignment over the ledger contract.

use uuid::Uuid;

use crate::dto::activity::{ActivityKind, Direction};
use crate::error::{Result, StorageError};
use crate::feed::{LedgerEvent, LedgerEventKind, LedgerFeed};
use crate::models::{DistanceEntry, TeamSelection};
use crate::store::{Ledger, ProofStore};

/// Signed distance for one logged activity.
pub fn signed_km(distance_km: f64, activity: ActivityKind, direction: Direction) -> Result<f64> {
    if !distance_km.is_finite() || distance_km == 0.0 {
        return Err(StorageError::InvalidInput(
            "distance must be a non-zero number".to_string(),
        ));
    }
    Ok(direction.sign() * distance_km * activity.multiplier())
}

/// Append a ledger entry stamped with the person's current team.
pub async fn record_activity(
    ledger: &dyn Ledger,
    feed: &LedgerFeed,
    person_id: Uuid,
    distance_km: f64,
    activity: ActivityKind,
    direction: Direction,
) -> Result<DistanceEntry> {
    let km = signed_km(distance_km, activity, direction)?;
    let entry = ledger.stamped_entry(person_id, km).await?;

    feed.publish(LedgerEvent {
        kind: LedgerEventKind::EntryInserted,
        team: entry.team,
        entry_id: entry.entry_id,
    });

    Ok(entry)
}

/// Change the person's current team. Purely a metadata update: no
/// historical entry is touched and nothing is recomputed.
pub async fn set_team(
    ledger: &dyn Ledger,
    person_id: Uuid,
    selection: TeamSelection,
) -> Result<()> {
    ledger.set_team(person_id, selection.team()).await
}

/// Delete an entry the owner logged. An attached proof object is
/// released first; if that release fails the record stays put, so a
/// retried delete can release it again instead of orphaning it.
pub async fn delete_entry(
    ledger: &dyn Ledger,
    proofs: &dyn ProofStore,
    feed: &LedgerFeed,
    entry_id: Uuid,
    owner: Uuid,
) -> Result<()> {
    let entry = ledger.entry_for_owner(entry_id, owner).await?;

    if let Some(path) = &entry.proof_path {
        proofs.delete(path).await?;
    }
    ledger.delete_entry(entry_id, owner).await?;

    feed.publish(LedgerEvent {
        kind: LedgerEventKind::EntryDeleted,
        team: entry.team,
        entry_id,
    });

    Ok(())
}
