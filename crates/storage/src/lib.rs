pub mod dto;
pub mod error;
pub mod feed;
pub mod models;
pub mod services;
pub mod store;

pub use error::{Result, StorageError};

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Connection pool wrapper with embedded migrations.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}
