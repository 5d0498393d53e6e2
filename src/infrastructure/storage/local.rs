use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use time::OffsetDateTime;
use tracing::info;

/// Upload directory holding both originals and processed outputs. Files are
/// never deleted by this service.
#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("creating upload directory {}", root.display()))?;

        info!("Upload directory ready at {}", root.display());

        Ok(Self { root })
    }

    /// Persists an upload verbatim under `{unix-seconds}_{name}` and returns
    /// its path.
    pub fn store(&self, name: &str, data: &[u8]) -> Result<PathBuf> {
        self.store_at(OffsetDateTime::now_utc().unix_timestamp(), name, data)
    }

    pub fn store_at(&self, timestamp: i64, name: &str, data: &[u8]) -> Result<PathBuf> {
        let path = self.root.join(format!("{timestamp}_{name}"));
        fs::write(&path, data).with_context(|| format!("writing upload {}", path.display()))?;
        Ok(path)
    }
}
