use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{DistanceEntry, MemberTotal, Person, Team};
use crate::store::Ledger;

const ENTRY_COLUMNS: &str = "entry_id, person_id, km, team, created_at, proof_path";
const PERSON_COLUMNS: &str = "person_id, name, is_admin, team, created_at";

/// Postgres-backed ledger. Single writes rely on row-level atomicity;
/// the stamped insert reads the team assignment and writes the entry in
/// one statement.
#[derive(Clone)]
pub struct PgLedger {
    pool: PgPool,
}

impl PgLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Ledger for PgLedger {
    async fn create_person(&self, person_id: Uuid, name: &str) -> Result<Person> {
        let person = sqlx::query_as::<_, Person>(&format!(
            "INSERT INTO people (person_id, name) VALUES ($1, $2) RETURNING {PERSON_COLUMNS}"
        ))
        .bind(person_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(person)
    }

    async fn person(&self, person_id: Uuid) -> Result<Person> {
        let person = sqlx::query_as::<_, Person>(&format!(
            "SELECT {PERSON_COLUMNS} FROM people WHERE person_id = $1"
        ))
        .bind(person_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(person)
    }

    async fn list_people(&self) -> Result<Vec<Person>> {
        let people = sqlx::query_as::<_, Person>(&format!(
            "SELECT {PERSON_COLUMNS} FROM people ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(people)
    }

    async fn is_admin_flag(&self, person_id: Uuid) -> Result<bool> {
        let is_admin =
            sqlx::query_scalar::<_, bool>("SELECT is_admin FROM people WHERE person_id = $1")
                .bind(person_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(StorageError::NotFound)?;

        Ok(is_admin)
    }

    async fn set_team(&self, person_id: Uuid, team: Option<Team>) -> Result<()> {
        let result = sqlx::query("UPDATE people SET team = $2 WHERE person_id = $1")
            .bind(person_id)
            .bind(team)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    async fn reset_all_teams(&self) -> Result<()> {
        sqlx::query("UPDATE people SET team = NULL")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn assign_team(&self, people: &[Uuid], team: Team) -> Result<()> {
        sqlx::query("UPDATE people SET team = $1 WHERE person_id = ANY($2)")
            .bind(team)
            .bind(people)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn append_entry(
        &self,
        person_id: Uuid,
        km: f64,
        team: Option<Team>,
    ) -> Result<DistanceEntry> {
        let entry = sqlx::query_as::<_, DistanceEntry>(&format!(
            "INSERT INTO distance_entries (person_id, km, team) VALUES ($1, $2, $3) \
             RETURNING {ENTRY_COLUMNS}"
        ))
        .bind(person_id)
        .bind(km)
        .bind(team)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn stamped_entry(&self, person_id: Uuid, km: f64) -> Result<DistanceEntry> {
        // Read-and-stamp in one statement so a concurrent reassignment
        // cannot slip between the team lookup and the insert.
        let entry = sqlx::query_as::<_, DistanceEntry>(&format!(
            "INSERT INTO distance_entries (person_id, km, team) \
             SELECT p.person_id, $2, p.team FROM people p \
             WHERE p.person_id = $1 AND p.team IS NOT NULL \
             RETURNING {ENTRY_COLUMNS}"
        ))
        .bind(person_id)
        .bind(km)
        .fetch_optional(&self.pool)
        .await?;

        match entry {
            Some(entry) => Ok(entry),
            // Zero rows: either the person is missing or unassigned.
            None => match self.person(person_id).await {
                Ok(_) => Err(StorageError::NoTeamAssigned),
                Err(e) => Err(e),
            },
        }
    }

    async fn entry_for_owner(&self, entry_id: Uuid, owner: Uuid) -> Result<DistanceEntry> {
        let entry = sqlx::query_as::<_, DistanceEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM distance_entries WHERE entry_id = $1 AND person_id = $2"
        ))
        .bind(entry_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(entry)
    }

    async fn latest_entry(&self, person_id: Uuid) -> Result<DistanceEntry> {
        let entry = sqlx::query_as::<_, DistanceEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM distance_entries WHERE person_id = $1 \
             ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(person_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(entry)
    }

    async fn delete_entry(&self, entry_id: Uuid, owner: Uuid) -> Result<()> {
        let result =
            sqlx::query("DELETE FROM distance_entries WHERE entry_id = $1 AND person_id = $2")
                .bind(entry_id)
                .bind(owner)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    async fn set_proof(&self, entry_id: Uuid, proof_path: &str) -> Result<()> {
        // Guarded update: an existing reference is never overwritten.
        let result = sqlx::query(
            "UPDATE distance_entries SET proof_path = $2 \
             WHERE entry_id = $1 AND proof_path IS NULL",
        )
        .bind(entry_id)
        .bind(proof_path)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM distance_entries WHERE entry_id = $1)",
            )
            .bind(entry_id)
            .fetch_one(&self.pool)
            .await?;

            return Err(if exists {
                StorageError::AlreadyHasProof
            } else {
                StorageError::NotFound
            });
        }

        Ok(())
    }

    async fn clear_proof(&self, entry_id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE distance_entries SET proof_path = NULL \
             WHERE entry_id = $1 AND proof_path IS NOT NULL",
        )
        .bind(entry_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    async fn history(
        &self,
        person_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DistanceEntry>> {
        let entries = sqlx::query_as::<_, DistanceEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM distance_entries \
             WHERE person_id = $1 AND km <> 0 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(person_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn history_count(&self, person_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM distance_entries WHERE person_id = $1 AND km <> 0",
        )
        .bind(person_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn entry_timestamps(&self, person_id: Uuid) -> Result<Vec<DateTime<Utc>>> {
        let timestamps = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT created_at FROM distance_entries WHERE person_id = $1 AND km <> 0",
        )
        .bind(person_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(timestamps)
    }

    async fn proofed_entries(&self, person_id: Uuid) -> Result<Vec<DistanceEntry>> {
        let entries = sqlx::query_as::<_, DistanceEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM distance_entries \
             WHERE person_id = $1 AND proof_path IS NOT NULL \
             ORDER BY created_at DESC"
        ))
        .bind(person_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn member_totals(&self, team: Team) -> Result<Vec<MemberTotal>> {
        let totals = sqlx::query_as::<_, MemberTotal>(
            "SELECT person_id, name, team, total FROM person_totals WHERE team = $1",
        )
        .bind(team)
        .fetch_all(&self.pool)
        .await?;

        Ok(totals)
    }

    async fn team_total(&self, team: Team) -> Result<f64> {
        let total = sqlx::query_scalar::<_, f64>("SELECT total FROM team_totals WHERE team = $1")
            .bind(team)
            .fetch_optional(&self.pool)
            .await?;

        Ok(total.unwrap_or(0.0))
    }

    async fn person_totals(&self, person_id: Uuid) -> Result<Vec<MemberTotal>> {
        let totals = sqlx::query_as::<_, MemberTotal>(
            "SELECT person_id, name, team, total FROM person_totals WHERE person_id = $1",
        )
        .bind(person_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(totals)
    }
}
