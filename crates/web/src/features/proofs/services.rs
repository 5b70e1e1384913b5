use storage::dto::profile::ProofItem;
use storage::error::Result;
use storage::feed::LedgerFeed;
use storage::services::proofs;
use storage::services::proofs::ImageLimits;
use storage::store::{Ledger, ProofStore, ProofTarget};
use uuid::Uuid;

pub async fn attach(
    ledger: &dyn Ledger,
    store: &dyn ProofStore,
    feed: &LedgerFeed,
    limits: ImageLimits,
    person_id: Uuid,
    target: ProofTarget,
    bytes: &[u8],
) -> Result<String> {
    proofs::attach_proof(ledger, store, feed, limits, person_id, target, bytes).await
}

pub async fn detach(
    ledger: &dyn Ledger,
    store: &dyn ProofStore,
    feed: &LedgerFeed,
    entry_id: Uuid,
    owner: Uuid,
) -> Result<()> {
    proofs::detach_proof(ledger, store, feed, entry_id, owner).await
}

pub async fn gallery(
    ledger: &dyn Ledger,
    store: &dyn ProofStore,
    person_id: Uuid,
) -> Result<Vec<ProofItem>> {
    proofs::proof_gallery(ledger, store, person_id).await
}
