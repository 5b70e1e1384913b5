use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub identity_url: String,
    pub identity_api_key: String,
    pub proof_storage_root: String,
    pub proof_public_base: String,
    pub admin_ids: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("PORT must be a number")?
                .parse()?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            identity_url: std::env::var("IDENTITY_URL")
                .context("Cannot load IDENTITY_URL env variable")?,
            identity_api_key: std::env::var("IDENTITY_API_KEY").unwrap_or_default(),
            proof_storage_root: std::env::var("PROOF_STORAGE_ROOT")
                .unwrap_or_else(|_| "data/proofs".to_string()),
            proof_public_base: std::env::var("PROOF_PUBLIC_BASE")
                .context("Cannot load PROOF_PUBLIC_BASE env variable")?,
            admin_ids: std::env::var("ADMIN_IDS").unwrap_or_default(),
        })
    }
}
