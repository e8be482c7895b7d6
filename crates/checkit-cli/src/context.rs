use checkit_core::{AppConfig, CheckitError, CheckitResult};
use checkit_domain::{TabModel, TabSelection};
use checkit_persistence::{ConfigKey, ConfigStore, JsonConfigStore, PersistedConfig};
use checkit_sheets::{HttpSheetSource, SheetLoader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Settings and the config store shared by every subcommand.
pub struct CliContext {
    pub settings: AppConfig,
    store: Arc<JsonConfigStore>,
}

impl CliContext {
    pub fn load(store_override: Option<PathBuf>) -> CheckitResult<Self> {
        let settings = AppConfig::load();
        let path = store_override
            .or_else(|| settings.effective_store_path())
            .ok_or_else(|| {
                CheckitError::Internal("Could not determine where to keep the config store".into())
            })?;
        tracing::debug!("Using config store at {}", path.display());

        Ok(Self {
            settings,
            store: Arc::new(JsonConfigStore::new(path)),
        })
    }

    pub fn store(&self) -> Arc<JsonConfigStore> {
        self.store.clone()
    }

    pub fn store_path(&self) -> &Path {
        self.store.path()
    }

    pub async fn config(&self) -> CheckitResult<PersistedConfig> {
        self.store.get(&ConfigKey::ALL).await
    }

    pub async fn update(&self, patch: PersistedConfig) -> CheckitResult<PersistedConfig> {
        self.store.set(patch).await?;
        self.config().await
    }

    pub fn loader(&self) -> CheckitResult<SheetLoader> {
        let source = HttpSheetSource::new(&self.settings)?;
        Ok(SheetLoader::new(Arc::new(source)))
    }

    /// Loads the checklist for the stored deployment. `tab` overrides the
    /// stored tab selection.
    pub async fn load_model(
        &self,
        config: &PersistedConfig,
        tab: Option<&str>,
    ) -> CheckitResult<TabModel> {
        let deployment_id = config
            .deployment_id()
            .ok_or(CheckitError::ConfigurationMissing)?;
        let selection = match tab {
            Some(title) => TabSelection::Only(title.to_string()),
            None => TabSelection::from_selected_title(config.selected_title.clone()),
        };
        self.loader()?.load(deployment_id, &selection).await
    }
}
