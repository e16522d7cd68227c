use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/chat`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub include_literature: bool,
}

/// Token accounting attached to every chat completion.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Response body for `POST /api/chat`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub response: String,
    pub query_type: String,
    pub literature_included: bool,
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// Response body for `GET /`.
///
/// Only `status` matters for reachability; `message` and `version` are
/// informational and may be absent.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Category name to ordered example prompts, as served by `GET /api/examples`.
/// A BTreeMap keeps category iteration order stable across runs.
pub type ExampleCatalog = BTreeMap<String, Vec<String>>;

/// Request body for `POST /api/search-literature`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LiteratureRequest {
    pub query: String,
    pub max_results: u32,
}

/// A single PubMed article as returned by the backend's NCBI service.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Paper {
    pub pmid: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub journal: String,
    #[serde(default)]
    pub url: String,
}

/// Response body for `POST /api/search-literature`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LiteratureResponse {
    pub query: String,
    pub results: Vec<Paper>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Contract test: the chat request must serialize to the exact wire shape
    /// the backend expects.
    #[test]
    fn test_chat_request_serialization() {
        let req = ChatRequest {
            message: "Why is my PCR failing?".to_string(),
            include_literature: true,
        };

        let serialized = serde_json::to_string(&req).unwrap();
        let expected = r#"{"message":"Why is my PCR failing?","include_literature":true}"#;
        assert_eq!(serialized, expected);
    }

    #[test]
    fn test_chat_response_deserialization() {
        let json = r#"{
            "response": "Check your annealing temperature.",
            "query_type": "pcr_troubleshooting",
            "literature_included": false,
            "usage": {"prompt_tokens": 120, "completion_tokens": 45, "total_tokens": 165}
        }"#;

        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.response, "Check your annealing temperature.");
        assert_eq!(resp.query_type, "pcr_troubleshooting");
        assert!(!resp.literature_included);
        assert_eq!(resp.usage.unwrap().total_tokens, 165);
    }

    #[test]
    fn test_chat_response_without_usage() {
        let json = r#"{"response":"ok","query_type":"general_bio","literature_included":false}"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(resp.usage.is_none());
    }

    #[test]
    fn test_health_response_minimal_shape() {
        let resp: HealthResponse = serde_json::from_str(r#"{"status":"healthy"}"#).unwrap();
        assert!(resp.is_healthy());
        assert!(resp.message.is_none());

        let resp: HealthResponse =
            serde_json::from_str(r#"{"status":"degraded","version":"1.0.0"}"#).unwrap();
        assert!(!resp.is_healthy());
        assert_eq!(resp.version.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_example_catalog_keeps_stable_order() {
        let json = r#"{
            "protocol_help": ["How do I prepare competent cells?"],
            "experimental_design": ["What controls do I need?"]
        }"#;
        let catalog: ExampleCatalog = serde_json::from_str(json).unwrap();
        let categories: Vec<&str> = catalog.keys().map(String::as_str).collect();
        assert_eq!(categories, vec!["experimental_design", "protocol_help"]);
    }

    #[test]
    fn test_paper_abstract_field_rename() {
        let json = r#"{
            "pmid": "12345",
            "title": "CRISPR screening at scale",
            "authors": ["Doe, Jane", "Roe, Max"],
            "abstract": "We describe a method...",
            "year": "2024",
            "journal": "Nat Methods",
            "url": "https://pubmed.ncbi.nlm.nih.gov/12345/"
        }"#;

        let paper: Paper = serde_json::from_str(json).unwrap();
        assert_eq!(paper.abstract_text, "We describe a method...");
        assert_eq!(paper.authors.len(), 2);
    }

    #[test]
    fn test_literature_request_serialization() {
        let req = LiteratureRequest {
            query: "mRNA vaccine".to_string(),
            max_results: 5,
        };
        let serialized = serde_json::to_string(&req).unwrap();
        assert_eq!(serialized, r#"{"query":"mRNA vaccine","max_results":5}"#);
    }
}
