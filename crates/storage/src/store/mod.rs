//! Backend contracts. Every remote collaborator the services touch is a
//! trait here, constructed once at startup and passed in explicitly, so
//! the whole core runs against the in-memory fakes without a live
//! backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{DistanceEntry, MemberTotal, Person, Team};

pub mod identity;
pub mod memory;
pub mod objects;
pub mod postgres;

pub use identity::HttpIdentity;
pub use memory::{MemIdentity, MemLedger, MemProofStore};
pub use objects::DiskProofStore;
pub use postgres::PgLedger;

/// Which ledger entry a proof attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofTarget {
    /// The person's newest entry.
    Latest,
    Entry(Uuid),
}

/// The relational backend: people, team assignment, the append-only
/// distance ledger, and the derived totals views.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn create_person(&self, person_id: Uuid, name: &str) -> Result<Person>;
    async fn person(&self, person_id: Uuid) -> Result<Person>;
    async fn list_people(&self) -> Result<Vec<Person>>;
    async fn is_admin_flag(&self, person_id: Uuid) -> Result<bool>;

    /// Update the person's current team. NULL is an explicit choice;
    /// past entries keep the team they were stamped with.
    async fn set_team(&self, person_id: Uuid, team: Option<Team>) -> Result<()>;
    async fn reset_all_teams(&self) -> Result<()>;
    async fn assign_team(&self, people: &[Uuid], team: Team) -> Result<()>;

    /// Raw append with an explicit team attribution.
    async fn append_entry(
        &self,
        person_id: Uuid,
        km: f64,
        team: Option<Team>,
    ) -> Result<DistanceEntry>;

    /// Append an entry stamped with the person's current team. The read
    /// of the assignment and the insert happen atomically; a NULL
    /// assignment fails with `NoTeamAssigned` and appends nothing.
    async fn stamped_entry(&self, person_id: Uuid, km: f64) -> Result<DistanceEntry>;

    async fn entry_for_owner(&self, entry_id: Uuid, owner: Uuid) -> Result<DistanceEntry>;
    async fn latest_entry(&self, person_id: Uuid) -> Result<DistanceEntry>;
    async fn delete_entry(&self, entry_id: Uuid, owner: Uuid) -> Result<()>;

    /// Set the proof reference, guarded so an existing reference is
    /// never overwritten (`AlreadyHasProof`).
    async fn set_proof(&self, entry_id: Uuid, proof_path: &str) -> Result<()>;
    /// Clear the proof reference; `NotFound` if none is set.
    async fn clear_proof(&self, entry_id: Uuid) -> Result<()>;

    /// Non-zero entries, newest first. The zero-distance seed entry
    /// created at registration never shows up here.
    async fn history(
        &self,
        person_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DistanceEntry>>;
    async fn history_count(&self, person_id: Uuid) -> Result<i64>;
    async fn entry_timestamps(&self, person_id: Uuid) -> Result<Vec<DateTime<Utc>>>;
    async fn proofed_entries(&self, person_id: Uuid) -> Result<Vec<DistanceEntry>>;

    async fn member_totals(&self, team: Team) -> Result<Vec<MemberTotal>>;
    async fn team_total(&self, team: Team) -> Result<f64>;
    async fn person_totals(&self, person_id: Uuid) -> Result<Vec<MemberTotal>>;
}

/// Object storage for proof images.
#[async_trait]
pub trait ProofStore: Send + Sync {
    /// Store an object and return its public URL.
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<String>;
    async fn delete(&self, path: &str) -> Result<()>;
    fn public_url(&self, path: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
}

/// The hosted identity provider. Callers hand it the synthetic email
/// derived from the username; no real email ever reaches it.
#[async_trait]
pub trait Identity: Send + Sync {
    async fn register(&self, email: &str, password: &str) -> Result<Uuid>;
    async fn login(&self, email: &str, password: &str) -> Result<String>;
    async fn logout(&self, token: &str) -> Result<()>;
    /// `Ok(None)` for an unknown or expired token.
    async fn session(&self, token: &str) -> Result<Option<Session>>;
}
