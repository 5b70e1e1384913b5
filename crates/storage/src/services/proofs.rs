//! Proof image lifecycle: attach, detach, gallery.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::dto::profile::ProofItem;
use crate::error::{Result, StorageError};
use crate::feed::{LedgerEvent, LedgerEventKind, LedgerFeed};
use crate::store::{Ledger, ProofStore, ProofTarget};

/// Limits the client-side compression pipeline is expected to meet.
/// The server enforces the byte cap; dimension normalization is the
/// image collaborator's job and is not re-checked here.
#[derive(Debug, Clone, Copy)]
pub struct ImageLimits {
    pub max_bytes: usize,
    pub max_dimension: u32,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_bytes: 300 * 1024,
            max_dimension: 1280,
        }
    }
}

impl ImageLimits {
    pub fn check(&self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Err(StorageError::InvalidInput("empty image".to_string()));
        }
        if bytes.len() > self.max_bytes {
            return Err(StorageError::InvalidInput(format!(
                "image exceeds {} bytes",
                self.max_bytes
            )));
        }
        Ok(())
    }
}

fn object_path(person_id: Uuid, at: DateTime<Utc>) -> String {
    format!("proof/{}/{}_screen.jpg", person_id, at.timestamp_millis())
}

/// Attach an evidence image to a ledger entry. At most one proof per
/// entry; an existing reference fails the operation up front and is
/// never overwritten. The object is stored before the reference is
/// written, so a reference never points at a missing object. The
/// reverse gap exists: a reference write that fails after the object
/// upload leaves an orphan, surfaced as `PartialFailure` for
/// out-of-band cleanup.
pub async fn attach_proof(
    ledger: &dyn Ledger,
    proofs: &dyn ProofStore,
    feed: &LedgerFeed,
    limits: ImageLimits,
    person_id: Uuid,
    target: ProofTarget,
    bytes: &[u8],
) -> Result<String> {
    limits.check(bytes)?;

    let entry = match target {
        ProofTarget::Latest => ledger.latest_entry(person_id).await?,
        ProofTarget::Entry(entry_id) => ledger.entry_for_owner(entry_id, person_id).await?,
    };
    if entry.proof_path.is_some() {
        return Err(StorageError::AlreadyHasProof);
    }

    let path = object_path(person_id, Utc::now());
    let url = proofs.put(&path, bytes).await?;

    if let Err(e) = ledger.set_proof(entry.entry_id, &path).await {
        return Err(StorageError::PartialFailure(format!(
            "proof object {path} stored but reference update failed: {e}"
        )));
    }

    feed.publish(LedgerEvent {
        kind: LedgerEventKind::EntryUpdated,
        team: entry.team,
        entry_id: entry.entry_id,
    });

    Ok(url)
}

/// Remove an entry's proof. The object goes first; if its removal
/// fails, the reference stays intact and the operation fails whole.
pub async fn detach_proof(
    ledger: &dyn Ledger,
    proofs: &dyn ProofStore,
    feed: &LedgerFeed,
    entry_id: Uuid,
    owner: Uuid,
) -> Result<()> {
    let entry = ledger.entry_for_owner(entry_id, owner).await?;
    let path = entry.proof_path.ok_or(StorageError::NotFound)?;

    proofs.delete(&path).await?;
    ledger.clear_proof(entry_id).await?;

    feed.publish(LedgerEvent {
        kind: LedgerEventKind::EntryUpdated,
        team: entry.team,
        entry_id,
    });

    Ok(())
}

/// The person's proofed entries, newest first.
pub async fn proof_gallery(
    ledger: &dyn Ledger,
    proofs: &dyn ProofStore,
    person_id: Uuid,
) -> Result<Vec<ProofItem>> {
    let entries = ledger.proofed_entries(person_id).await?;

    Ok(entries
        .into_iter()
        .filter_map(|entry| {
            entry.proof_path.map(|path| ProofItem {
                entry_id: entry.entry_id,
                created_at: entry.created_at,
                proof_url: proofs.public_url(&path),
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Team;
    use crate::services::activity;
    use crate::store::{MemLedger, MemProofStore};

    const IMG: &[u8] = b"jpeg bytes";

    async fn setup() -> (MemLedger, MemProofStore, LedgerFeed, Uuid) {
        let ledger = MemLedger::new();
        let person = Uuid::new_v4();
        ledger.create_person(person, "ana").await.unwrap();
        ledger.set_team(person, Some(Team::Blue)).await.unwrap();
        (ledger, MemProofStore::new(), LedgerFeed::new(), person)
    }

    #[tokio::test]
    async fn attach_to_latest_entry() {
        let (ledger, proofs, feed, person) = setup().await;
        ledger.append_entry(person, 3.0, Some(Team::Blue)).await.unwrap();
        let latest = ledger.append_entry(person, 5.0, Some(Team::Blue)).await.unwrap();

        let url = attach_proof(
            &ledger,
            &proofs,
            &feed,
            ImageLimits::default(),
            person,
            ProofTarget::Latest,
            IMG,
        )
        .await
        .unwrap();

        let stored = ledger.entry_for_owner(latest.entry_id, person).await.unwrap();
        let path = stored.proof_path.expect("proof attached");
        assert!(path.starts_with(&format!("proof/{person}/")));
        assert!(path.ends_with("_screen.jpg"));
        assert_eq!(url, proofs.public_url(&path));
        assert!(proofs.contains(&path));
    }

    #[tokio::test]
    async fn second_attach_fails_and_keeps_first_reference() {
        let (ledger, proofs, feed, person) = setup().await;
        let entry = ledger.append_entry(person, 5.0, Some(Team::Blue)).await.unwrap();

        attach_proof(
            &ledger,
            &proofs,
            &feed,
            ImageLimits::default(),
            person,
            ProofTarget::Entry(entry.entry_id),
            IMG,
        )
        .await
        .unwrap();
        let first = ledger
            .entry_for_owner(entry.entry_id, person)
            .await
            .unwrap()
            .proof_path;

        let err = attach_proof(
            &ledger,
            &proofs,
            &feed,
            ImageLimits::default(),
            person,
            ProofTarget::Entry(entry.entry_id),
            IMG,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, StorageError::AlreadyHasProof));
        let kept = ledger
            .entry_for_owner(entry.entry_id, person)
            .await
            .unwrap()
            .proof_path;
        assert_eq!(kept, first);
        assert_eq!(proofs.object_count(), 1);
    }

    #[tokio::test]
    async fn attach_rejects_oversized_image() {
        let (ledger, proofs, feed, person) = setup().await;
        ledger.append_entry(person, 5.0, Some(Team::Blue)).await.unwrap();

        let big = vec![0u8; 301 * 1024];
        let err = attach_proof(
            &ledger,
            &proofs,
            &feed,
            ImageLimits::default(),
            person,
            ProofTarget::Latest,
            &big,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, StorageError::InvalidInput(_)));
        assert_eq!(proofs.object_count(), 0);
    }

    #[tokio::test]
    async fn attach_after_delete_is_not_found() {
        let (ledger, proofs, feed, person) = setup().await;
        let entry = ledger.append_entry(person, 5.0, Some(Team::Blue)).await.unwrap();

        activity::delete_entry(&ledger, &proofs, &feed, entry.entry_id, person)
            .await
            .unwrap();

        let err = attach_proof(
            &ledger,
            &proofs,
            &feed,
            ImageLimits::default(),
            person,
            ProofTarget::Entry(entry.entry_id),
            IMG,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn detach_removes_object_then_reference() {
        let (ledger, proofs, feed, person) = setup().await;
        let entry = ledger.append_entry(person, 5.0, Some(Team::Blue)).await.unwrap();
        attach_proof(
            &ledger,
            &proofs,
            &feed,
            ImageLimits::default(),
            person,
            ProofTarget::Latest,
            IMG,
        )
        .await
        .unwrap();

        detach_proof(&ledger, &proofs, &feed, entry.entry_id, person)
            .await
            .unwrap();

        assert_eq!(proofs.object_count(), 0);
        let cleared = ledger.entry_for_owner(entry.entry_id, person).await.unwrap();
        assert_eq!(cleared.proof_path, None);
    }

    #[tokio::test]
    async fn second_detach_is_not_found_and_skips_object_store() {
        let (ledger, proofs, feed, person) = setup().await;
        let entry = ledger.append_entry(person, 5.0, Some(Team::Blue)).await.unwrap();
        attach_proof(
            &ledger,
            &proofs,
            &feed,
            ImageLimits::default(),
            person,
            ProofTarget::Latest,
            IMG,
        )
        .await
        .unwrap();

        detach_proof(&ledger, &proofs, &feed, entry.entry_id, person)
            .await
            .unwrap();
        let deletes_after_first = proofs.delete_count();

        let err = detach_proof(&ledger, &proofs, &feed, entry.entry_id, person)
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::NotFound));
        assert_eq!(proofs.delete_count(), deletes_after_first);
    }

    #[tokio::test]
    async fn failed_object_removal_keeps_reference() {
        let (ledger, proofs, feed, person) = setup().await;
        let entry = ledger.append_entry(person, 5.0, Some(Team::Blue)).await.unwrap();
        attach_proof(
            &ledger,
            &proofs,
            &feed,
            ImageLimits::default(),
            person,
            ProofTarget::Latest,
            IMG,
        )
        .await
        .unwrap();
        proofs.set_fail_deletes(true);

        let err = detach_proof(&ledger, &proofs, &feed, entry.entry_id, person)
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Remote(_)));
        let kept = ledger.entry_for_owner(entry.entry_id, person).await.unwrap();
        assert!(kept.proof_path.is_some());
    }

    #[tokio::test]
    async fn gallery_lists_proofed_entries_newest_first() {
        let (ledger, proofs, feed, person) = setup().await;
        ledger.append_entry(person, 1.0, Some(Team::Blue)).await.unwrap();
        let proofed = ledger.append_entry(person, 2.0, Some(Team::Blue)).await.unwrap();
        attach_proof(
            &ledger,
            &proofs,
            &feed,
            ImageLimits::default(),
            person,
            ProofTarget::Entry(proofed.entry_id),
            IMG,
        )
        .await
        .unwrap();

        let gallery = proof_gallery(&ledger, &proofs, person).await.unwrap();
        assert_eq!(gallery.len(), 1);
        assert_eq!(gallery[0].entry_id, proofed.entry_id);
        assert!(gallery[0].proof_url.starts_with("mem://proofs/"));
    }
}
