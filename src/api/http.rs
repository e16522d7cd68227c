//! reqwest-backed implementation of the backend contract.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::backend::{ApiError, BackendApi};
use super::types::{
    ChatRequest, ChatResponse, ExampleCatalog, HealthResponse, LiteratureRequest,
    LiteratureResponse,
};

/// Talks to a BioQuery backend over HTTP.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Creates a backend client for the given base URL.
    ///
    /// # Arguments
    /// * `base_url` - Backend root, e.g. `http://localhost:5001`
    /// * `timeout` - Per-request timeout applied to every call
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { base_url, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Checks the HTTP status and decodes the JSON body.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        debug!("Backend response status: {status}");

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Backend API error: {} - {}", status.as_u16(), message);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn check_health(&self) -> Result<HealthResponse, ApiError> {
        debug!("Health check: GET {}/", self.base_url);
        self.get_json("/").await
    }

    async fn load_examples(&self) -> Result<ExampleCatalog, ApiError> {
        debug!("Loading examples: GET {}/api/examples", self.base_url);
        self.get_json("/api/examples").await
    }

    async fn send_chat(
        &self,
        message: &str,
        include_literature: bool,
    ) -> Result<ChatResponse, ApiError> {
        let request = ChatRequest {
            message: message.to_string(),
            include_literature,
        };
        info!(
            "Chat request: {} chars, include_literature={}",
            request.message.len(),
            include_literature
        );
        self.post_json("/api/chat", &request).await
    }

    async fn search_literature(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<LiteratureResponse, ApiError> {
        let request = LiteratureRequest {
            query: query.to_string(),
            max_results,
        };
        info!("Literature search: \"{}\" (max {})", query, max_results);
        self.post_json("/api/search-literature", &request).await
    }
}
