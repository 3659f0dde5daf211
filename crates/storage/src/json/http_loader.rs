use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::{Question, Stage};
use reqwest::Client;
use reqwest::header::CACHE_CONTROL;
use url::Url;

use super::mapping::decode_pool;
use crate::repository::{PoolLoader, StageResources, StorageError};

/// Upper bound on a whole pool request, body included.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetches stage pools from JSON resources under a base URL.
#[derive(Debug, Clone)]
pub struct HttpPoolLoader {
    client: Client,
    base_url: Url,
    resources: StageResources,
    timeout: Duration,
}

impl HttpPoolLoader {
    /// Create a loader rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the URL cannot be parsed or cannot
    /// serve as a base, or if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, StorageError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| StorageError::Unavailable(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(StorageError::Unavailable(format!(
                "not a base url: {base_url}"
            )));
        }
        // Keep the last path segment when joining resource names.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            resources: StageResources::default(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_resources(mut self, resources: StageResources) -> Self {
        self.resources = resources;
        self
    }

    /// Fail requests that take longer than `timeout` end to end.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve the resource URL for a stage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the resource name does not form a
    /// valid URL.
    pub fn url_for(&self, stage: Stage) -> Result<Url, StorageError> {
        self.base_url
            .join(self.resources.resource_for(stage))
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl PoolLoader for HttpPoolLoader {
    async fn load_pool(&self, stage: Stage) -> Result<Vec<Question>, StorageError> {
        let url = self.url_for(stage)?;
        tracing::debug!(%url, %stage, timeout_ms = self.timeout.as_millis() as u64, "fetching question pool");

        let response = self
            .client
            .get(url.clone())
            .header(CACHE_CONTROL, "no-store")
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound {
                resource: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(StorageError::HttpStatus(status));
        }

        let body = response.bytes().await?;
        decode_pool(&body)
    }
}
