use chrono::{DateTime, Utc};

use crate::api::Usage;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    /// Uppercase label used in exported transcripts.
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "USER",
            Sender::Assistant => "ASSISTANT",
        }
    }
}

/// One conversation entry. Immutable once constructed; owned by the session
/// that contains it.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Monotonically increasing within an app run.
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    /// True for the fallback bubble appended when a chat request fails.
    pub is_error: bool,
    /// Classification tag returned by the backend (e.g. "pcr_troubleshooting").
    pub query_type: Option<String>,
    /// Whether the backend folded recent literature into the answer.
    pub literature_included: Option<bool>,
    pub usage: Option<Usage>,
}

impl Message {
    fn new(id: u64, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sender,
            timestamp: Utc::now(),
            is_error: false,
            query_type: None,
            literature_included: None,
            usage: None,
        }
    }

    pub fn user(id: u64, text: impl Into<String>) -> Self {
        Self::new(id, Sender::User, text)
    }

    pub fn assistant(id: u64, text: impl Into<String>) -> Self {
        Self::new(id, Sender::Assistant, text)
    }

    /// An assistant-role error bubble.
    pub fn error(id: u64, text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::new(id, Sender::Assistant, text)
        }
    }
}
