use async_trait::async_trait;
use checkit_core::CheckitResult;
use checkit_domain::CustomOrder;
use serde::{Deserialize, Serialize};

/// Keys of the persisted config record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    DeploymentId,
    UserName,
    /// Legacy single-tab mode.
    SelectedTitle,
    CustomOrder,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::DeploymentId,
        ConfigKey::UserName,
        ConfigKey::SelectedTitle,
        ConfigKey::CustomOrder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeploymentId => "deploymentId",
            Self::UserName => "userName",
            Self::SelectedTitle => "selectedTitle",
            Self::CustomOrder => "customOrder",
        }
    }
}

/// Durable key-value record. Absent keys mean "not configured".
///
/// Used both as the result of a read and as a write patch: every `Some`
/// field of a patch overwrites the stored key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_order: Option<CustomOrder>,
}

impl PersistedConfig {
    /// Keeps only the requested keys.
    pub fn only(self, keys: &[ConfigKey]) -> Self {
        let wants = |key| keys.contains(&key);
        Self {
            deployment_id: self.deployment_id.filter(|_| wants(ConfigKey::DeploymentId)),
            user_name: self.user_name.filter(|_| wants(ConfigKey::UserName)),
            selected_title: self.selected_title.filter(|_| wants(ConfigKey::SelectedTitle)),
            custom_order: self.custom_order.filter(|_| wants(ConfigKey::CustomOrder)),
        }
    }

    /// Applies a patch, last write wins per key.
    pub fn merge(&mut self, patch: PersistedConfig) {
        if patch.deployment_id.is_some() {
            self.deployment_id = patch.deployment_id;
        }
        if patch.user_name.is_some() {
            self.user_name = patch.user_name;
        }
        if patch.selected_title.is_some() {
            self.selected_title = patch.selected_title;
        }
        if patch.custom_order.is_some() {
            self.custom_order = patch.custom_order;
        }
    }

    /// The deployment id, if one is configured and not blank.
    pub fn deployment_id(&self) -> Option<&str> {
        self.deployment_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn custom_order(&self) -> CustomOrder {
        self.custom_order.clone().unwrap_or_default()
    }
}

/// Asynchronous key-value store backing the persisted config.
///
/// No transactions across keys; concurrent writers race and the last write
/// of each key wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Reads the requested keys. Keys never written come back as `None`.
    async fn get(&self, keys: &[ConfigKey]) -> CheckitResult<PersistedConfig>;

    /// Writes every `Some` field of `patch`.
    async fn set(&self, patch: PersistedConfig) -> CheckitResult<()>;
}

/// Reads keys, treating an unavailable store as an empty one.
pub async fn load_or_default(store: &dyn ConfigStore, keys: &[ConfigKey]) -> PersistedConfig {
    match store.get(keys).await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Config store unavailable, continuing unconfigured: {}", e);
            PersistedConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkit_core::CheckitError;
    use checkit_domain::ItemId;

    #[test]
    fn test_only_filters_keys() {
        let config = PersistedConfig {
            deployment_id: Some("dep".into()),
            user_name: Some("Alex".into()),
            selected_title: Some("Main".into()),
            custom_order: Some(CustomOrder::new()),
        };
        let partial = config.only(&[ConfigKey::DeploymentId, ConfigKey::SelectedTitle]);
        assert_eq!(partial.deployment_id.as_deref(), Some("dep"));
        assert_eq!(partial.selected_title.as_deref(), Some("Main"));
        assert!(partial.user_name.is_none());
        assert!(partial.custom_order.is_none());
    }

    #[test]
    fn test_merge_is_last_write_wins_per_key() {
        let mut config = PersistedConfig {
            deployment_id: Some("old".into()),
            user_name: Some("Alex".into()),
            ..Default::default()
        };
        config.merge(PersistedConfig {
            deployment_id: Some("new".into()),
            ..Default::default()
        });
        assert_eq!(config.deployment_id.as_deref(), Some("new"));
        assert_eq!(config.user_name.as_deref(), Some("Alex"));
    }

    #[test]
    fn test_blank_values_are_unconfigured() {
        let config = PersistedConfig {
            deployment_id: Some("   ".into()),
            user_name: Some("".into()),
            ..Default::default()
        };
        assert!(config.deployment_id().is_none());
        assert!(config.user_name().is_none());
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let mut order = CustomOrder::new();
        order.record("Main", "Access", vec![ItemId::from("abc")]);
        let config = PersistedConfig {
            deployment_id: Some("dep".into()),
            custom_order: Some(order),
            ..Default::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "deploymentId": "dep",
                "customOrder": { "Main-Access": ["abc"] }
            })
        );
        assert_eq!(ConfigKey::CustomOrder.as_str(), "customOrder");
    }

    #[tokio::test]
    async fn test_load_or_default_degrades_on_failure() {
        let mut store = MockConfigStore::new();
        store
            .expect_get()
            .returning(|_| Err(CheckitError::Io(std::io::Error::other("storage offline"))));

        let config = load_or_default(&store, &ConfigKey::ALL).await;
        assert_eq!(config, PersistedConfig::default());
    }

    #[tokio::test]
    async fn test_load_or_default_passes_through() {
        let mut store = MockConfigStore::new();
        store.expect_get().times(1).returning(|_| {
            Ok(PersistedConfig {
                deployment_id: Some("dep".into()),
                ..Default::default()
            })
        });

        let config = load_or_default(&store, &[ConfigKey::DeploymentId]).await;
        assert_eq!(config.deployment_id(), Some("dep"));
    }
}
