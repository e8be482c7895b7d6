use async_trait::async_trait;
use checkit_core::{AppConfig, CheckitError, CheckitResult};

/// Transport for sheet payloads.
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Returns the raw response body for a deployment.
    async fn fetch(&self, deployment_id: &str) -> CheckitResult<Vec<u8>>;
}

/// Fetches sheets over HTTP with a bounded request time.
#[derive(Debug, Clone)]
pub struct HttpSheetSource {
    client: reqwest::Client,
    settings: AppConfig,
}

impl HttpSheetSource {
    pub fn new(config: &AppConfig) -> CheckitResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| CheckitError::Network(e.to_string()))?;
        Ok(Self {
            client,
            settings: config.clone(),
        })
    }

    pub fn url_for(&self, deployment_id: &str) -> String {
        self.settings.endpoint_url(deployment_id)
    }
}

#[async_trait]
impl SheetSource for HttpSheetSource {
    async fn fetch(&self, deployment_id: &str) -> CheckitResult<Vec<u8>> {
        let url = self.url_for(deployment_id);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CheckitError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckitError::Network(format!(
                "HTTP error! status: {}",
                status.as_u16()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CheckitError::Network(e.to_string()))?;
        tracing::debug!("Received {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}
