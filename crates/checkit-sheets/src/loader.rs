use crate::source::SheetSource;
use checkit_core::CheckitResult;
use checkit_domain::{RawSheet, TabModel, TabSelection};
use std::sync::Arc;

/// Turns a deployment id into a normalized checklist.
///
/// No retries: a failed load is reported once and the caller decides when
/// to try again.
#[derive(Clone)]
pub struct SheetLoader {
    source: Arc<dyn SheetSource>,
}

impl SheetLoader {
    pub fn new(source: Arc<dyn SheetSource>) -> Self {
        Self { source }
    }

    pub async fn load(&self, deployment_id: &str, selection: &TabSelection) -> CheckitResult<TabModel> {
        let body = self.source.fetch(deployment_id).await?;
        let sheet = RawSheet::from_slice(&body)?.select(selection)?;
        let model = sheet.normalize();
        if model.is_empty() {
            tracing::warn!("Deployment {} returned no tabs", deployment_id);
        }

        tracing::info!(
            "Loaded {} tabs with {} items for deployment {}",
            model.tabs.len(),
            model.item_count(),
            deployment_id
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use checkit_core::CheckitError;
    use serde_json::json;

    struct StaticSource(CheckitResult<Vec<u8>>);

    #[async_trait]
    impl SheetSource for StaticSource {
        async fn fetch(&self, _deployment_id: &str) -> CheckitResult<Vec<u8>> {
            match &self.0 {
                Ok(body) => Ok(body.clone()),
                Err(e) => Err(CheckitError::Network(e.to_string())),
            }
        }
    }

    fn loader_with(body: serde_json::Value) -> SheetLoader {
        SheetLoader::new(Arc::new(StaticSource(Ok(serde_json::to_vec(&body).unwrap()))))
    }

    #[tokio::test]
    async fn test_load_normalizes_all_tabs() {
        let loader = loader_with(json!({
            "Main": [["Date", "Category", "Content"], ["", "Access", "Create account"]],
            "Extra": [["Date", "Category", "Content"], ["", "Access", ""]]
        }));

        let model = loader.load("dep", &TabSelection::All).await.unwrap();
        assert_eq!(model.tabs.len(), 2);
        assert_eq!(model.item_count(), 1);
    }

    #[tokio::test]
    async fn test_load_single_tab() {
        let loader = loader_with(json!({
            "Main": [["h"], ["", "Access", "Create account"]],
            "Extra": [["h"], ["", "Access", "Other"]]
        }));

        let model = loader
            .load("dep", &TabSelection::Only("Extra".into()))
            .await
            .unwrap();
        assert_eq!(model.tabs.len(), 1);
        assert_eq!(model.tabs[0].title, "Extra");

        let missing = loader.load("dep", &TabSelection::Only("Gone".into())).await;
        assert!(matches!(missing, Err(CheckitError::Format(_))));
    }

    #[tokio::test]
    async fn test_load_accepts_payload_without_tabs() {
        let model = loader_with(json!({})).load("dep", &TabSelection::All).await.unwrap();
        assert!(model.is_empty());
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_json() {
        let loader = SheetLoader::new(Arc::new(StaticSource(Ok(b"<!doctype html>".to_vec()))));
        assert!(matches!(
            loader.load("dep", &TabSelection::All).await,
            Err(CheckitError::Format(_))
        ));
    }

    #[tokio::test]
    async fn test_load_propagates_network_errors() {
        let loader = SheetLoader::new(Arc::new(StaticSource(Err(CheckitError::Network(
            "HTTP error! status: 500".into(),
        )))));
        assert!(matches!(
            loader.load("dep", &TabSelection::All).await,
            Err(CheckitError::Network(_))
        ));
    }
}
