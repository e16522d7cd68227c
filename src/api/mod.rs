pub mod backend;
pub mod http;
pub mod types;

pub use backend::{ApiError, BackendApi};
pub use http::HttpBackend;
pub use types::{
    ChatRequest, ChatResponse, ExampleCatalog, HealthResponse, LiteratureRequest,
    LiteratureResponse, Paper, Usage,
};
