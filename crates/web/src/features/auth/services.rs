use storage::error::Result;
use storage::services::accounts;
use storage::store::{Identity, Ledger};
use uuid::Uuid;

/// Register a new account and its person record.
pub async fn register(
    identity: &dyn Identity,
    ledger: &dyn Ledger,
    username: &str,
    password: &str,
) -> Result<Uuid> {
    accounts::register(identity, ledger, username, password).await
}

/// Exchange credentials for a bearer token.
pub async fn login(identity: &dyn Identity, username: &str, password: &str) -> Result<String> {
    accounts::login(identity, username, password).await
}

/// Invalidate a bearer token.
pub async fn logout(identity: &dyn Identity, token: &str) -> Result<()> {
    identity.logout(token).await
}
