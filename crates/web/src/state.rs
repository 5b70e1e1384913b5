use std::sync::Arc;

use storage::feed::LedgerFeed;
use storage::services::admin::AdminPolicy;
use storage::services::proofs::ImageLimits;
use storage::store::{Identity, Ledger, ProofStore};

/// Backend collaborators, constructed once at startup and injected into
/// every handler. Tests build the same state from the in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn Ledger>,
    pub proofs: Arc<dyn ProofStore>,
    pub identity: Arc<dyn Identity>,
    pub feed: LedgerFeed,
    pub admin: Arc<AdminPolicy>,
    pub image_limits: ImageLimits,
}
