use std::fmt;

use async_trait::async_trait;

use super::types::{ChatResponse, ExampleCatalog, HealthResponse, LiteratureResponse};

/// Errors that can occur while talking to the backend.
/// The variant distinguishes transport failures from server-side ones, which
/// is what the connection state machine keys off.
#[derive(Debug)]
pub enum ApiError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Backend returned a non-2xx response.
    Api { status: u16, message: String },
    /// Response body did not match the expected shape.
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The backend's HTTP contract, one method per endpoint.
///
/// Every call is a single request/response round trip: no retry, no backoff,
/// no streaming. The trait seam exists so core logic and tests can run
/// against a stub instead of a live server.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Base URL this backend talks to, for display and logging.
    fn base_url(&self) -> &str;

    /// `GET /` - reachability probe.
    async fn check_health(&self) -> Result<HealthResponse, ApiError>;

    /// `GET /api/examples` - example prompts grouped by category.
    async fn load_examples(&self) -> Result<ExampleCatalog, ApiError>;

    /// `POST /api/chat` - submit a question, get one completed answer.
    async fn send_chat(
        &self,
        message: &str,
        include_literature: bool,
    ) -> Result<ChatResponse, ApiError>;

    /// `POST /api/search-literature` - direct PubMed search.
    async fn search_literature(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<LiteratureResponse, ApiError>;
}
