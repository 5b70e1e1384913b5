use chrono::Local;
use storage::dto::common::PaginationParams;
use storage::dto::profile::HistoryEntry;
use storage::error::Result;
use storage::models::{MemberTotal, TeamSelection};
use storage::services::{activity, scoring};
use storage::store::{Ledger, ProofStore};
use uuid::Uuid;

/// The person's summed distances, one row per team attribution.
pub async fn totals(ledger: &dyn Ledger, person_id: Uuid) -> Result<Vec<MemberTotal>> {
    ledger.person_totals(person_id).await
}

pub async fn set_team(
    ledger: &dyn Ledger,
    person_id: Uuid,
    selection: TeamSelection,
) -> Result<()> {
    activity::set_team(ledger, person_id, selection).await
}

/// Non-zero entries, newest first, with resolved proof URLs.
pub async fn history(
    ledger: &dyn Ledger,
    proofs: &dyn ProofStore,
    person_id: Uuid,
    pagination: &PaginationParams,
) -> Result<(Vec<HistoryEntry>, i64)> {
    let entries = ledger
        .history(
            person_id,
            pagination.limit() as i64,
            pagination.offset() as i64,
        )
        .await?;
    let total_items = ledger.history_count(person_id).await?;

    let entries = entries
        .into_iter()
        .map(|entry| HistoryEntry {
            entry_id: entry.entry_id,
            km: entry.km,
            team: entry.team,
            created_at: entry.created_at,
            proof_url: entry.proof_path.as_deref().map(|p| proofs.public_url(p)),
        })
        .collect();

    Ok((entries, total_items))
}

/// Consecutive-day streak in the server's local time zone.
pub async fn streak(ledger: &dyn Ledger, person_id: Uuid) -> Result<u32> {
    let timestamps = ledger.entry_timestamps(person_id).await?;
    let today = Local::now().date_naive();
    Ok(scoring::streak_from_timestamps(&timestamps, &Local, today))
}
