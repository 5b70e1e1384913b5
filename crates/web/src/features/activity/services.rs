use storage::dto::activity::RecordActivityRequest;
use storage::error::Result;
use storage::feed::LedgerFeed;
use storage::models::DistanceEntry;
use storage::services::activity;
use storage::store::{Ledger, ProofStore};
use uuid::Uuid;

pub async fn record(
    ledger: &dyn Ledger,
    feed: &LedgerFeed,
    person_id: Uuid,
    request: &RecordActivityRequest,
) -> Result<DistanceEntry> {
    activity::record_activity(
        ledger,
        feed,
        person_id,
        request.distance_km,
        request.activity,
        request.direction,
    )
    .await
}

pub async fn delete(
    ledger: &dyn Ledger,
    proofs: &dyn ProofStore,
    feed: &LedgerFeed,
    entry_id: Uuid,
    owner: Uuid,
) -> Result<()> {
    activity::delete_entry(ledger, proofs, feed, entry_id, owner).await
}

/// "+10.00 pts added." / "-10.00 pts subtracted."
pub fn outcome_message(km: f64) -> String {
    if km > 0.0 {
        format!("+{km:.2} pts added.")
    } else {
        format!("{km:.2} pts subtracted.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_message_reflects_sign() {
        assert_eq!(outcome_message(10.0), "+10.00 pts added.");
        assert_eq!(outcome_message(-7.5), "-7.50 pts subtracted.");
    }
}
