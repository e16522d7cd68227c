//! # Application State
//!
//! Core business state for the BioQuery client. This module contains domain
//! logic only - no TUI-specific types. Presentation state lives in the `tui`
//! module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn BackendApi>   // HTTP adapter
//! ├── store: ChatStore               // saved conversations
//! ├── active_session_id: Option      // back-reference into the store
//! ├── messages: Vec<Message>         // the conversation on screen
//! ├── view: View                     // welcome screen vs. chat
//! ├── backend_status: BackendStatus  // reachability state machine
//! ├── examples: ExampleCatalog       // prompt suggestions from the backend
//! ├── include_literature: bool       // fold PubMed context into answers
//! ├── is_loading: bool               // a chat request is outstanding
//! └── status_message: String         // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{BackendApi, ExampleCatalog};
use crate::core::config::ResolvedConfig;
use crate::core::message::Message;
use crate::core::store::ChatStore;

/// What the main area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// No active conversation: greeting, example prompts, quick actions.
    Welcome,
    /// An active conversation's message list.
    Chat,
}

/// Backend reachability. Transitions happen only on health-check results;
/// getting back to `Checking` requires an explicit reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    Checking,
    Connected,
    Disconnected,
    Error,
}

impl BackendStatus {
    /// Short label for the status bar.
    pub fn label(self) -> &'static str {
        match self {
            BackendStatus::Checking => "checking",
            BackendStatus::Connected => "connected",
            BackendStatus::Disconnected => "disconnected",
            BackendStatus::Error => "error",
        }
    }
}

pub struct App {
    pub backend: Arc<dyn BackendApi>,
    pub store: ChatStore,
    /// Non-owning back-reference into the store (None = no active session).
    pub active_session_id: Option<String>,
    /// Messages of the active conversation, in send order.
    pub messages: Vec<Message>,
    pub view: View,
    pub backend_status: BackendStatus,
    pub examples: ExampleCatalog,
    pub include_literature: bool,
    pub is_loading: bool,
    pub status_message: String,
    pub export_dir: PathBuf,
    next_message_id: u64,
}

impl App {
    pub fn new(backend: Arc<dyn BackendApi>, config: &ResolvedConfig) -> Self {
        Self {
            backend,
            store: ChatStore::new(),
            active_session_id: None,
            messages: Vec::new(),
            view: View::Welcome,
            backend_status: BackendStatus::Checking,
            examples: ExampleCatalog::new(),
            include_literature: config.include_literature,
            is_loading: false,
            status_message: String::from("Welcome to BioQuery!"),
            export_dir: config.export_dir.clone(),
            next_message_id: 0,
        }
    }

    /// Hands out the next monotonic message id.
    pub fn next_message_id(&mut self) -> u64 {
        self.next_message_id += 1;
        self.next_message_id
    }

    /// Whether the send control is enabled right now.
    pub fn can_send(&self) -> bool {
        self.backend_status == BackendStatus::Connected && !self.is_loading
    }
}
