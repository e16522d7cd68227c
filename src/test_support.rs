//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{
    ApiError, BackendApi, ChatResponse, ExampleCatalog, HealthResponse, LiteratureResponse, Usage,
};
use crate::core::config::ResolvedConfig;
use crate::core::state::{App, BackendStatus};

/// A canned backend for tests that don't need real HTTP calls.
pub struct StubBackend;

#[async_trait]
impl BackendApi for StubBackend {
    fn base_url(&self) -> &str {
        "http://stub"
    }

    async fn check_health(&self) -> Result<HealthResponse, ApiError> {
        Ok(HealthResponse {
            status: "healthy".to_string(),
            message: None,
            version: None,
        })
    }

    async fn load_examples(&self) -> Result<ExampleCatalog, ApiError> {
        Ok(ExampleCatalog::new())
    }

    async fn send_chat(
        &self,
        _message: &str,
        include_literature: bool,
    ) -> Result<ChatResponse, ApiError> {
        Ok(ChatResponse {
            response: "stub reply".to_string(),
            query_type: "general_bio".to_string(),
            literature_included: include_literature,
            usage: Some(Usage {
                prompt_tokens: 1,
                completion_tokens: 2,
                total_tokens: 3,
            }),
        })
    }

    async fn search_literature(
        &self,
        query: &str,
        _max_results: u32,
    ) -> Result<LiteratureResponse, ApiError> {
        Ok(LiteratureResponse {
            query: query.to_string(),
            results: Vec::new(),
            count: 0,
        })
    }
}

fn test_config() -> ResolvedConfig {
    ResolvedConfig {
        base_url: "http://stub".to_string(),
        timeout: Duration::from_secs(5),
        include_literature: false,
        export_dir: PathBuf::from("."),
    }
}

/// Creates a test App backed by a stub.
pub fn test_app() -> App {
    App::new(Arc::new(StubBackend), &test_config())
}

/// Like [`test_app`], but the health check has already passed so sends are
/// enabled.
pub fn connected_app() -> App {
    let mut app = test_app();
    app.backend_status = BackendStatus::Connected;
    app
}
