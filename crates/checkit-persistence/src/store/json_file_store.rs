use crate::store::atomic_writer::AtomicWriter;
use crate::traits::{ConfigKey, ConfigStore, PersistedConfig};
use async_trait::async_trait;
use checkit_core::{CheckitError, CheckitResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const FORMAT_VERSION: u32 = 1;

/// On-disk layout of the store file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonEnvelope {
    version: u32,
    saved_at: DateTime<Utc>,
    data: PersistedConfig,
}

/// Config store kept in a single JSON file.
///
/// Writes read the current file, apply the patch and replace the file
/// atomically. A missing file reads as an empty config.
#[derive(Debug)]
pub struct JsonConfigStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonConfigStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    async fn read_all(&self) -> CheckitResult<PersistedConfig> {
        let Some(bytes) = AtomicWriter::read_optional(&self.path).await? else {
            return Ok(PersistedConfig::default());
        };

        let envelope: JsonEnvelope = serde_json::from_slice(&bytes)
            .map_err(|e| CheckitError::Serialization(e.to_string()))?;
        if envelope.version != FORMAT_VERSION {
            return Err(CheckitError::Serialization(format!(
                "Unsupported store format version: {}",
                envelope.version
            )));
        }
        Ok(envelope.data)
    }
}

#[async_trait]
impl ConfigStore for JsonConfigStore {
    async fn get(&self, keys: &[ConfigKey]) -> CheckitResult<PersistedConfig> {
        Ok(self.read_all().await?.only(keys))
    }

    async fn set(&self, patch: PersistedConfig) -> CheckitResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut config = self.read_all().await?;
        config.merge(patch);

        let envelope = JsonEnvelope {
            version: FORMAT_VERSION,
            saved_at: Utc::now(),
            data: config,
        };
        let bytes = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| CheckitError::Serialization(e.to_string()))?;
        AtomicWriter::write_atomic(&self.path, &bytes).await?;

        tracing::info!("Saved config to {}", self.path.display());
        Ok(())
    }
}
