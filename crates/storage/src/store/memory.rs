//! In-memory fakes for the backend contracts. Tests run the full
//! service layer against these instead of a live backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{DistanceEntry, MemberTotal, Person, Team};
use crate::store::{Identity, Ledger, ProofStore, Session};

#[derive(Default)]
struct LedgerState {
    people: HashMap<Uuid, Person>,
    /// Insertion order doubles as created_at order.
    entries: Vec<DistanceEntry>,
}

/// Fake relational backend. A single lock held across each operation
/// gives the same read-and-stamp atomicity the Postgres implementation
/// gets from its single-statement insert.
#[derive(Default)]
pub struct MemLedger {
    state: Mutex<LedgerState>,
}

impl MemLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: append an entry with an explicit timestamp.
    pub fn append_entry_at(
        &self,
        person_id: Uuid,
        km: f64,
        team: Option<Team>,
        created_at: DateTime<Utc>,
    ) -> DistanceEntry {
        let mut state = self.state.lock();
        let entry = DistanceEntry {
            entry_id: Uuid::new_v4(),
            person_id,
            km,
            team,
            created_at,
            proof_path: None,
        };
        state.entries.push(entry.clone());
        entry
    }

    pub fn entry_count(&self) -> usize {
        self.state.lock().entries.len()
    }

    fn totals_grouped(
        entries: &[DistanceEntry],
        people: &HashMap<Uuid, Person>,
        filter: impl Fn(&DistanceEntry) -> bool,
    ) -> Vec<MemberTotal> {
        let mut grouped: HashMap<(Uuid, Option<Team>), f64> = HashMap::new();
        for entry in entries.iter().filter(|e| filter(e)) {
            *grouped.entry((entry.person_id, entry.team)).or_default() += entry.km;
        }
        grouped
            .into_iter()
            .map(|((person_id, team), total)| MemberTotal {
                person_id,
                name: people.get(&person_id).map(|p| p.name.clone()),
                team,
                total,
            })
            .collect()
    }
}

#[async_trait]
impl Ledger for MemLedger {
    async fn create_person(&self, person_id: Uuid, name: &str) -> Result<Person> {
        let mut state = self.state.lock();
        if state.people.contains_key(&person_id) {
            return Err(StorageError::ConstraintViolation(
                "person already exists".to_string(),
            ));
        }
        let person = Person {
            person_id,
            name: name.to_string(),
            is_admin: false,
            team: None,
            created_at: Utc::now(),
        };
        state.people.insert(person_id, person.clone());
        Ok(person)
    }

    async fn person(&self, person_id: Uuid) -> Result<Person> {
        self.state
            .lock()
            .people
            .get(&person_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_people(&self) -> Result<Vec<Person>> {
        let mut people: Vec<Person> = self.state.lock().people.values().cloned().collect();
        people.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(people)
    }

    async fn is_admin_flag(&self, person_id: Uuid) -> Result<bool> {
        Ok(self.person(person_id).await?.is_admin)
    }

    async fn set_team(&self, person_id: Uuid, team: Option<Team>) -> Result<()> {
        let mut state = self.state.lock();
        let person = state
            .people
            .get_mut(&person_id)
            .ok_or(StorageError::NotFound)?;
        person.team = team;
        Ok(())
    }

    async fn reset_all_teams(&self) -> Result<()> {
        let mut state = self.state.lock();
        for person in state.people.values_mut() {
            person.team = None;
        }
        Ok(())
    }

    async fn assign_team(&self, people: &[Uuid], team: Team) -> Result<()> {
        let mut state = self.state.lock();
        for person_id in people {
            if let Some(person) = state.people.get_mut(person_id) {
                person.team = Some(team);
            }
        }
        Ok(())
    }

    async fn append_entry(
        &self,
        person_id: Uuid,
        km: f64,
        team: Option<Team>,
    ) -> Result<DistanceEntry> {
        Ok(self.append_entry_at(person_id, km, team, Utc::now()))
    }

    async fn stamped_entry(&self, person_id: Uuid, km: f64) -> Result<DistanceEntry> {
        let mut state = self.state.lock();
        let team = state
            .people
            .get(&person_id)
            .ok_or(StorageError::NotFound)?
            .team
            .ok_or(StorageError::NoTeamAssigned)?;
        let entry = DistanceEntry {
            entry_id: Uuid::new_v4(),
            person_id,
            km,
            team: Some(team),
            created_at: Utc::now(),
            proof_path: None,
        };
        state.entries.push(entry.clone());
        Ok(entry)
    }

    async fn entry_for_owner(&self, entry_id: Uuid, owner: Uuid) -> Result<DistanceEntry> {
        self.state
            .lock()
            .entries
            .iter()
            .find(|e| e.entry_id == entry_id && e.person_id == owner)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn latest_entry(&self, person_id: Uuid) -> Result<DistanceEntry> {
        self.state
            .lock()
            .entries
            .iter()
            .rev()
            .find(|e| e.person_id == person_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn delete_entry(&self, entry_id: Uuid, owner: Uuid) -> Result<()> {
        let mut state = self.state.lock();
        let before = state.entries.len();
        state
            .entries
            .retain(|e| !(e.entry_id == entry_id && e.person_id == owner));
        if state.entries.len() == before {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn set_proof(&self, entry_id: Uuid, proof_path: &str) -> Result<()> {
        let mut state = self.state.lock();
        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.entry_id == entry_id)
            .ok_or(StorageError::NotFound)?;
        if entry.proof_path.is_some() {
            return Err(StorageError::AlreadyHasProof);
        }
        entry.proof_path = Some(proof_path.to_string());
        Ok(())
    }

    async fn clear_proof(&self, entry_id: Uuid) -> Result<()> {
        let mut state = self.state.lock();
        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.entry_id == entry_id)
            .ok_or(StorageError::NotFound)?;
        if entry.proof_path.is_none() {
            return Err(StorageError::NotFound);
        }
        entry.proof_path = None;
        Ok(())
    }

    async fn history(
        &self,
        person_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DistanceEntry>> {
        Ok(self
            .state
            .lock()
            .entries
            .iter()
            .rev()
            .filter(|e| e.person_id == person_id && e.km != 0.0)
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn history_count(&self, person_id: Uuid) -> Result<i64> {
        Ok(self
            .state
            .lock()
            .entries
            .iter()
            .filter(|e| e.person_id == person_id && e.km != 0.0)
            .count() as i64)
    }

    async fn entry_timestamps(&self, person_id: Uuid) -> Result<Vec<DateTime<Utc>>> {
        Ok(self
            .state
            .lock()
            .entries
            .iter()
            .filter(|e| e.person_id == person_id && e.km != 0.0)
            .map(|e| e.created_at)
            .collect())
    }

    async fn proofed_entries(&self, person_id: Uuid) -> Result<Vec<DistanceEntry>> {
        Ok(self
            .state
            .lock()
            .entries
            .iter()
            .rev()
            .filter(|e| e.person_id == person_id && e.proof_path.is_some())
            .cloned()
            .collect())
    }

    async fn member_totals(&self, team: Team) -> Result<Vec<MemberTotal>> {
        let state = self.state.lock();
        Ok(Self::totals_grouped(&state.entries, &state.people, |e| {
            e.team == Some(team)
        }))
    }

    async fn team_total(&self, team: Team) -> Result<f64> {
        Ok(self
            .state
            .lock()
            .entries
            .iter()
            .filter(|e| e.team == Some(team))
            .map(|e| e.km)
            .sum())
    }

    async fn person_totals(&self, person_id: Uuid) -> Result<Vec<MemberTotal>> {
        let state = self.state.lock();
        Ok(Self::totals_grouped(&state.entries, &state.people, |e| {
            e.person_id == person_id
        }))
    }
}

/// Fake object store with programmable delete failures.
#[derive(Default)]
pub struct MemProofStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    fail_deletes: AtomicBool,
    delete_count: AtomicUsize,
}

impl MemProofStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `delete` fail, for no-partial-detach tests.
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.lock().contains_key(path)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().len()
    }

    /// Number of `delete` calls attempted, including failed ones.
    pub fn delete_count(&self) -> usize {
        self.delete_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProofStore for MemProofStore {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<String> {
        self.objects.lock().insert(path.to_string(), bytes.to_vec());
        Ok(self.public_url(path))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.delete_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Remote("object delete failed".to_string()));
        }
        self.objects
            .lock()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StorageError::Remote("object missing".to_string()))
    }

    fn public_url(&self, path: &str) -> String {
        format!("mem://proofs/{path}")
    }
}

struct Account {
    user_id: Uuid,
    password: String,
}

/// Fake identity provider: accounts and bearer tokens in memory.
#[derive(Default)]
pub struct MemIdentity {
    accounts: Mutex<HashMap<String, Account>>,
    tokens: Mutex<HashMap<String, Session>>,
}

impl MemIdentity {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Identity for MemIdentity {
    async fn register(&self, email: &str, password: &str) -> Result<Uuid> {
        let mut accounts = self.accounts.lock();
        if accounts.contains_key(email) {
            return Err(StorageError::ConstraintViolation(
                "email already registered".to_string(),
            ));
        }
        let user_id = Uuid::new_v4();
        accounts.insert(
            email.to_string(),
            Account {
                user_id,
                password: password.to_string(),
            },
        );
        Ok(user_id)
    }

    async fn login(&self, email: &str, password: &str) -> Result<String> {
        let accounts = self.accounts.lock();
        let account = accounts
            .get(email)
            .filter(|a| a.password == password)
            .ok_or_else(|| {
                StorageError::InvalidInput("invalid username or password".to_string())
            })?;

        let token = Uuid::new_v4().simple().to_string();
        self.tokens.lock().insert(
            token.clone(),
            Session {
                user_id: account.user_id,
                email: email.to_string(),
            },
        );
        Ok(token)
    }

    async fn logout(&self, token: &str) -> Result<()> {
        self.tokens.lock().remove(token);
        Ok(())
    }

    async fn session(&self, token: &str) -> Result<Option<Session>> {
        Ok(self.tokens.lock().get(token).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stamped_entry_requires_team() {
        let ledger = MemLedger::new();
        let person = Uuid::new_v4();
        ledger.create_person(person, "ana").await.unwrap();

        let err = ledger.stamped_entry(person, 5.0).await.unwrap_err();
        assert!(matches!(err, StorageError::NoTeamAssigned));
        assert_eq!(ledger.entry_count(), 0);

        ledger.set_team(person, Some(Team::Blue)).await.unwrap();
        let entry = ledger.stamped_entry(person, 5.0).await.unwrap();
        assert_eq!(entry.team, Some(Team::Blue));
    }

    #[tokio::test]
    async fn stamped_entry_unknown_person_is_not_found() {
        let ledger = MemLedger::new();
        let err = ledger.stamped_entry(Uuid::new_v4(), 5.0).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn set_proof_never_overwrites() {
        let ledger = MemLedger::new();
        let person = Uuid::new_v4();
        ledger.create_person(person, "ana").await.unwrap();
        let entry = ledger
            .append_entry(person, 4.0, Some(Team::Red))
            .await
            .unwrap();

        ledger.set_proof(entry.entry_id, "proof/a.jpg").await.unwrap();
        let err = ledger
            .set_proof(entry.entry_id, "proof/b.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::AlreadyHasProof));

        let stored = ledger.entry_for_owner(entry.entry_id, person).await.unwrap();
        assert_eq!(stored.proof_path.as_deref(), Some("proof/a.jpg"));
    }

    #[tokio::test]
    async fn history_hides_seed_entry() {
        let ledger = MemLedger::new();
        let person = Uuid::new_v4();
        ledger.create_person(person, "ana").await.unwrap();
        ledger.append_entry(person, 0.0, None).await.unwrap();
        ledger
            .append_entry(person, 3.0, Some(Team::Blue))
            .await
            .unwrap();

        let history = ledger.history(person, 50, 0).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].km, 3.0);
        assert_eq!(ledger.history_count(person).await.unwrap(), 1);

        // The seed entry is still the latest for proof targeting.
        assert_eq!(ledger.latest_entry(person).await.unwrap().km, 3.0);
    }

    #[tokio::test]
    async fn entry_timestamps_skip_the_seed_entry() {
        use chrono::TimeZone;

        let ledger = MemLedger::new();
        let person = Uuid::new_v4();
        ledger.create_person(person, "ana").await.unwrap();
        ledger.append_entry_at(
            person,
            0.0,
            None,
            Utc.with_ymd_and_hms(2025, 6, 9, 8, 0, 0).unwrap(),
        );
        ledger.append_entry_at(
            person,
            4.0,
            Some(Team::Blue),
            Utc.with_ymd_and_hms(2025, 6, 10, 8, 0, 0).unwrap(),
        );

        let timestamps = ledger.entry_timestamps(person).await.unwrap();
        assert_eq!(timestamps.len(), 1);
        assert_eq!(
            timestamps[0],
            Utc.with_ymd_and_hms(2025, 6, 10, 8, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn totals_partition_by_stamped_team() {
        let ledger = MemLedger::new();
        let ana = Uuid::new_v4();
        let bo = Uuid::new_v4();
        ledger.create_person(ana, "ana").await.unwrap();
        ledger.create_person(bo, "bo").await.unwrap();
        ledger.append_entry(ana, 10.0, Some(Team::Blue)).await.unwrap();
        ledger.append_entry(ana, -2.0, Some(Team::Blue)).await.unwrap();
        ledger.append_entry(bo, 5.0, Some(Team::Red)).await.unwrap();

        // Reassignment moves no historical points.
        ledger.set_team(ana, Some(Team::Red)).await.unwrap();

        assert_eq!(ledger.team_total(Team::Blue).await.unwrap(), 8.0);
        assert_eq!(ledger.team_total(Team::Red).await.unwrap(), 5.0);

        let blue = ledger.member_totals(Team::Blue).await.unwrap();
        let member_sum: f64 = blue.iter().map(|m| m.total).sum();
        assert_eq!(member_sum, ledger.team_total(Team::Blue).await.unwrap());
    }

    #[tokio::test]
    async fn identity_round_trip() {
        let identity = MemIdentity::new();
        let user_id = identity.register("ana@fake.mail", "secret1").await.unwrap();

        let err = identity.login("ana@fake.mail", "wrong").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidInput(_)));

        let token = identity.login("ana@fake.mail", "secret1").await.unwrap();
        let session = identity.session(&token).await.unwrap().unwrap();
        assert_eq!(session.user_id, user_id);

        identity.logout(&token).await.unwrap();
        assert!(identity.session(&token).await.unwrap().is_none());
    }
}
