//! # Chat Session Store
//!
//! In-memory collection of named conversations. The list is ordered
//! most-recently-created first and is never reordered by activity; the
//! active-session pointer lives in [`App`](crate::core::state::App), not here.

use chrono::{DateTime, Utc};

use crate::core::message::Message;

/// Titles are cut at this many characters, with "..." appended.
pub const TITLE_MAX_CHARS: usize = 50;

/// One saved conversation thread.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

/// Generate a new unique session ID.
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Derive a session title from the first user message.
/// Truncation counts characters, not bytes, so multibyte text stays intact.
pub fn derive_title(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() > TITLE_MAX_CHARS {
        let truncated: String = text.chars().take(TITLE_MAX_CHARS).collect();
        format!("{truncated}...")
    } else {
        text.to_string()
    }
}

#[derive(Debug, Default)]
pub struct ChatStore {
    sessions: Vec<Session>,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session titled after `first_text` and prepends it, keeping
    /// the list most-recently-created first. Returns the new session's id.
    pub fn create(&mut self, first_text: &str) -> String {
        let session = Session {
            id: new_session_id(),
            title: derive_title(first_text),
            messages: Vec::new(),
            created_at: Utc::now(),
        };
        let id = session.id.clone();
        self.sessions.insert(0, session);
        id
    }

    /// Replaces the message sequence of the matching session. No-op when the
    /// id is unknown.
    pub fn sync_messages(&mut self, id: &str, messages: &[Message]) {
        if let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) {
            session.messages = messages.to_vec();
        }
    }

    /// Removes the session. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        self.sessions.len() != before
    }

    /// Looks up a session without any state change.
    pub fn select(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
