//! Thin JSON client for the graph/preferences backend.
//!
//! Every request carries the `device-id` header so the backend can key
//! preferences per device. Responses use the `{ success, data, error }`
//! envelope, unwrapped by [`ApiResponse::into_data`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::Result;
use crate::services::types::ApiResponse;

/// Shared HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    device_id: String,
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            device_id: config.device_id.clone().unwrap_or_default(),
        })
    }

    /// Override the base URL (used to point at mock servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        debug!(endpoint, "[GET] request");
        let response = self
            .client
            .get(self.url(endpoint))
            .header("device-id", &self.device_id)
            .send()
            .await
            .inspect_err(|e| warn!(endpoint, "[GET] request failed: {e}"))?;
        let envelope: ApiResponse<T> = response.json().await?;
        envelope.into_data(endpoint)
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        debug!(endpoint, "[PUT] request");
        let response = self
            .client
            .put(self.url(endpoint))
            .header("device-id", &self.device_id)
            .json(body)
            .send()
            .await
            .inspect_err(|e| warn!(endpoint, "[PUT] request failed: {e}"))?;
        let envelope: ApiResponse<T> = response.json().await?;
        envelope.into_data(endpoint)
    }
}
