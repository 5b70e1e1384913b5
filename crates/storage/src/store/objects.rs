use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{Result, StorageError};
use crate::store::ProofStore;

/// Object store backed by a local directory, served publicly from
/// `public_base` by whatever fronts the deployment.
pub struct DiskProofStore {
    root: PathBuf,
    public_base: String,
}

impl DiskProofStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }
}

#[async_trait]
impl ProofStore for DiskProofStore {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<String> {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Remote(format!("object store mkdir failed: {e}")))?;
        }
        tokio::fs::write(&full, bytes)
            .await
            .map_err(|e| StorageError::Remote(format!("object write failed: {e}")))?;

        Ok(self.public_url(path))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        tokio::fs::remove_file(self.root.join(path))
            .await
            .map_err(|e| StorageError::Remote(format!("object delete failed: {e}")))
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base.trim_end_matches('/'), path)
    }
}
