//! Registration and login over the identity collaborator.

use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::store::{Identity, Ledger};

/// Map a username to the synthetic address the identity provider sees.
/// No real email is ever collected.
pub fn synthetic_email(username: &str) -> String {
    format!("{}@fake.mail", username.trim().to_lowercase())
}

/// Create the account, the person record, and the zero-distance seed
/// entry the proof-upload flow targets before any activity is logged.
pub async fn register(
    identity: &dyn Identity,
    ledger: &dyn Ledger,
    username: &str,
    password: &str,
) -> Result<Uuid> {
    let email = synthetic_email(username);
    let user_id = identity.register(&email, password).await?;

    let created = ledger.create_person(user_id, username.trim()).await;
    if let Err(e) = created {
        if e.is_unique_violation() {
            return Err(StorageError::ConstraintViolation(
                "username already taken".to_string(),
            ));
        }
        return Err(e);
    }

    ledger.append_entry(user_id, 0.0, None).await?;
    Ok(user_id)
}

pub async fn login(identity: &dyn Identity, username: &str, password: &str) -> Result<String> {
    identity.login(&synthetic_email(username), password).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemIdentity, MemLedger};

    #[test]
    fn email_is_lowercased_and_trimmed() {
        assert_eq!(synthetic_email("  Ana "), "ana@fake.mail");
    }

    #[tokio::test]
    async fn register_seeds_a_team_less_zero_entry() {
        let identity = MemIdentity::new();
        let ledger = MemLedger::new();

        let user_id = register(&identity, &ledger, "Ana", "secret1").await.unwrap();

        let person = ledger.person(user_id).await.unwrap();
        assert_eq!(person.name, "Ana");
        assert_eq!(person.team, None);

        let seed = ledger.latest_entry(user_id).await.unwrap();
        assert_eq!(seed.km, 0.0);
        assert_eq!(seed.team, None);
        // The seed never surfaces as loggable history.
        assert_eq!(ledger.history_count(user_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn login_uses_the_synthetic_email() {
        let identity = MemIdentity::new();
        let ledger = MemLedger::new();
        register(&identity, &ledger, "Ana", "secret1").await.unwrap();

        let token = login(&identity, "ANA", "secret1").await.unwrap();
        let session = identity.session(&token).await.unwrap().unwrap();
        assert_eq!(session.email, "ana@fake.mail");
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let identity = MemIdentity::new();
        let ledger = MemLedger::new();
        register(&identity, &ledger, "Ana", "secret1").await.unwrap();

        let err = register(&identity, &ledger, "ana", "other99").await.unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));
    }
}
