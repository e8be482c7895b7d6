use crate::traits::{ConfigKey, ConfigStore, PersistedConfig};
use async_trait::async_trait;
use checkit_core::CheckitResult;
use tokio::sync::RwLock;

/// Process-local config store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    config: RwLock<PersistedConfig>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PersistedConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    pub async fn snapshot(&self) -> PersistedConfig {
        self.config.read().await.clone()
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn get(&self, keys: &[ConfigKey]) -> CheckitResult<PersistedConfig> {
        Ok(self.config.read().await.clone().only(keys))
    }

    async fn set(&self, patch: PersistedConfig) -> CheckitResult<()> {
        self.config.write().await.merge(patch);
        Ok(())
    }
}
