//! # Actions
//!
//! Everything that can happen in the client becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! The backend answers? That's `Action::ChatCompleted(result)`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns an `Effect` naming whatever I/O the caller must now
//! perform. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  State' + Effect
//! ```
//!
//! This makes the conversation flow testable without a terminal or a server.

use log::{info, warn};

use crate::api::{ApiError, ChatResponse, ExampleCatalog, HealthResponse, LiteratureResponse};
use crate::core::message::{Message, Sender};
use crate::core::state::{App, BackendStatus, View};

/// Text of the assistant bubble shown when a chat request fails. The failure
/// is surfaced here and nowhere else; nothing is retried automatically.
pub const FALLBACK_ERROR_TEXT: &str =
    "Sorry, I ran into a problem reaching the BioQuery backend. Please try again.";

/// Results requested per `/lit` search.
pub const LITERATURE_RESULTS: u32 = 5;

#[derive(Debug)]
pub enum Action {
    /// User submitted the input box.
    Submit(String),
    /// Re-ask the question preceding the assistant message at `index`.
    Regenerate { index: usize },
    /// A chat round trip finished, one way or the other.
    ChatCompleted(Result<ChatResponse, ApiError>),
    /// User ran a `/lit <query>` literature search.
    LiteratureSearch(String),
    LiteratureCompleted(Result<LiteratureResponse, ApiError>),
    /// Start a fresh conversation.
    NewSession,
    SelectSession(String),
    DeleteSession(String),
    /// A health probe finished.
    HealthChecked(Result<HealthResponse, ApiError>),
    ExamplesLoaded(Result<ExampleCatalog, ApiError>),
    /// Toggle the include-literature flag for subsequent questions.
    ToggleLiterature,
    /// Re-probe the backend (the only way back into `Checking`).
    Reload,
    ExportTranscript,
    Quit,
}

/// I/O the caller must perform after an update.
#[derive(Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    SendChat {
        message: String,
        include_literature: bool,
    },
    SearchLiterature {
        query: String,
    },
    /// Probe health and reload examples.
    Refresh,
    ExportTranscript,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => {
            let text = text.trim().to_string();
            if text.is_empty() {
                return Effect::None;
            }
            // Only one outstanding request at a time; the send control is
            // disabled while loading.
            if app.is_loading {
                return Effect::None;
            }
            if app.backend_status != BackendStatus::Connected {
                app.status_message = String::from("Backend unavailable - cannot send right now");
                return Effect::None;
            }
            submit_message(app, text)
        }

        Action::Regenerate { index } => {
            if !app.can_send() {
                return Effect::None;
            }
            let Some(original) = preceding_user_text(app, index) else {
                return Effect::None;
            };
            info!("Regenerating response for message index {index}");
            submit_message(app, original)
        }

        Action::ChatCompleted(result) => {
            let id = app.next_message_id();
            let message = match result {
                Ok(resp) => {
                    let mut reply = Message::assistant(id, resp.response);
                    reply.query_type = Some(resp.query_type);
                    reply.literature_included = Some(resp.literature_included);
                    reply.usage = resp.usage;
                    reply
                }
                Err(e) => {
                    warn!("Chat request failed: {e}");
                    Message::error(id, FALLBACK_ERROR_TEXT)
                }
            };
            app.messages.push(message);
            mirror_active_session(app);
            app.is_loading = false;
            app.status_message.clear();
            Effect::None
        }

        Action::LiteratureSearch(query) => {
            let query = query.trim().to_string();
            if query.is_empty() {
                return Effect::None;
            }
            if app.is_loading {
                return Effect::None;
            }
            if app.backend_status != BackendStatus::Connected {
                app.status_message = String::from("Backend unavailable - cannot send right now");
                return Effect::None;
            }
            ensure_active_session(app, &query);
            let id = app.next_message_id();
            app.messages
                .push(Message::user(id, format!("/lit {query}")));
            mirror_active_session(app);
            app.is_loading = true;
            app.status_message = String::from("Searching PubMed...");
            Effect::SearchLiterature { query }
        }

        Action::LiteratureCompleted(result) => {
            let id = app.next_message_id();
            let message = match result {
                Ok(resp) => Message::assistant(id, format_papers(&resp)),
                Err(e) => {
                    warn!("Literature search failed: {e}");
                    Message::error(id, FALLBACK_ERROR_TEXT)
                }
            };
            app.messages.push(message);
            mirror_active_session(app);
            app.is_loading = false;
            app.status_message.clear();
            Effect::None
        }

        Action::NewSession => {
            app.active_session_id = None;
            app.messages.clear();
            app.view = View::Welcome;
            app.status_message = String::from("New chat");
            Effect::None
        }

        Action::SelectSession(id) => {
            // Silent on a missing id: no state change.
            if let Some(session) = app.store.select(&id) {
                app.messages = session.messages.clone();
                app.active_session_id = Some(id);
                app.view = View::Chat;
            }
            Effect::None
        }

        Action::DeleteSession(id) => {
            let was_active = app.active_session_id.as_deref() == Some(id.as_str());
            if app.store.delete(&id) && was_active {
                app.active_session_id = None;
                app.messages.clear();
                app.view = View::Welcome;
            }
            Effect::None
        }

        Action::HealthChecked(result) => {
            app.backend_status = match result {
                Ok(health) if health.is_healthy() => {
                    info!(
                        "Backend healthy{}",
                        health
                            .version
                            .as_deref()
                            .map(|v| format!(" (v{v})"))
                            .unwrap_or_default()
                    );
                    BackendStatus::Connected
                }
                Ok(health) => {
                    warn!("Unexpected health status: {}", health.status);
                    BackendStatus::Error
                }
                Err(ApiError::Network(e)) => {
                    warn!("Backend unreachable: {e}");
                    BackendStatus::Disconnected
                }
                Err(e) => {
                    warn!("Health check failed: {e}");
                    BackendStatus::Error
                }
            };
            app.status_message = match app.backend_status {
                BackendStatus::Connected => String::from("Connected"),
                BackendStatus::Disconnected => String::from("Backend unreachable"),
                _ => String::from("Backend error"),
            };
            Effect::None
        }

        Action::ExamplesLoaded(result) => {
            match result {
                Ok(examples) => app.examples = examples,
                // Keep whatever we had; the welcome screen just shows fewer
                // suggestions.
                Err(e) => warn!("Failed to load examples: {e}"),
            }
            Effect::None
        }

        Action::ToggleLiterature => {
            app.include_literature = !app.include_literature;
            app.status_message = format!(
                "Literature context: {}",
                if app.include_literature { "on" } else { "off" }
            );
            Effect::None
        }

        Action::Reload => {
            app.backend_status = BackendStatus::Checking;
            app.status_message = String::from("Checking backend...");
            Effect::Refresh
        }

        Action::ExportTranscript => {
            if app.messages.is_empty() {
                app.status_message = String::from("Nothing to export");
                return Effect::None;
            }
            Effect::ExportTranscript
        }

        Action::Quit => Effect::Quit,
    }
}

/// Shared submit path for Submit and Regenerate: optimistic user message,
/// loading flag, chat effect. `text` is already trimmed and non-empty.
fn submit_message(app: &mut App, text: String) -> Effect {
    ensure_active_session(app, &text);
    let id = app.next_message_id();
    app.messages.push(Message::user(id, text.clone()));
    mirror_active_session(app);
    app.is_loading = true;
    app.status_message = String::from("Thinking...");
    Effect::SendChat {
        message: text,
        include_literature: app.include_literature,
    }
}

/// Creates and activates a session on the first message of a conversation.
fn ensure_active_session(app: &mut App, first_text: &str) {
    if app.active_session_id.is_none() {
        let id = app.store.create(first_text);
        app.active_session_id = Some(id);
        app.view = View::Chat;
    }
}

/// Mirrors the on-screen message list into the active session.
fn mirror_active_session(app: &mut App) {
    if let Some(id) = app.active_session_id.clone() {
        app.store.sync_messages(&id, &app.messages);
    }
}

/// For a regenerate on the assistant message at `index`, returns the text of
/// the user message immediately before it, if there is one.
fn preceding_user_text(app: &App, index: usize) -> Option<String> {
    let target = app.messages.get(index)?;
    if target.sender != Sender::Assistant {
        return None;
    }
    let prev = app.messages.get(index.checked_sub(1)?)?;
    if prev.sender != Sender::User {
        return None;
    }
    Some(prev.text.clone())
}

/// Renders literature results as a readable assistant bubble.
fn format_papers(resp: &LiteratureResponse) -> String {
    if resp.results.is_empty() {
        return format!("No PubMed results for \"{}\".", resp.query);
    }
    let mut out = format!("Found {} result(s) for \"{}\":\n", resp.count, resp.query);
    for paper in &resp.results {
        out.push_str(&format!(
            "\n{} ({}, {})\n  {}\n  {}\n",
            paper.title,
            paper.journal,
            paper.year,
            paper.authors.join("; "),
            paper.url
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Paper, Usage};
    use crate::test_support::{connected_app, test_app};

    fn ok_response(text: &str) -> Result<ChatResponse, ApiError> {
        Ok(ChatResponse {
            response: text.to_string(),
            query_type: "general_bio".to_string(),
            literature_included: false,
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 20,
                total_tokens: 30,
            }),
        })
    }

    #[test]
    fn test_submit_appends_user_message_and_sends() {
        let mut app = connected_app();
        let effect = update(&mut app, Action::Submit("Why is my gel smearing?".into()));

        assert_eq!(
            effect,
            Effect::SendChat {
                message: "Why is my gel smearing?".into(),
                include_literature: false,
            }
        );
        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.messages[0].sender, Sender::User);
        assert!(app.is_loading);
        assert_eq!(app.view, View::Chat);
    }

    #[test]
    fn test_submit_creates_session_with_derived_title() {
        let mut app = connected_app();
        update(&mut app, Action::Submit("How many replicates for RNA-seq?".into()));

        let id = app.active_session_id.clone().unwrap();
        let session = app.store.select(&id).unwrap();
        assert_eq!(session.title, "How many replicates for RNA-seq?");
        assert_eq!(session.messages.len(), 1);
    }

    #[test]
    fn test_submit_reuses_active_session() {
        let mut app = connected_app();
        update(&mut app, Action::Submit("first".into()));
        update(&mut app, Action::ChatCompleted(ok_response("answer")));
        update(&mut app, Action::Submit("second".into()));

        assert_eq!(app.store.sessions().len(), 1);
        assert_eq!(app.messages.len(), 3);
    }

    #[test]
    fn test_submit_whitespace_only_is_noop() {
        let mut app = connected_app();
        let effect = update(&mut app, Action::Submit("   \t  ".into()));

        assert_eq!(effect, Effect::None);
        assert!(app.messages.is_empty());
        assert!(app.active_session_id.is_none());
        assert!(app.store.is_empty());
        assert!(!app.is_loading);
    }

    #[test]
    fn test_submit_trims_before_sending() {
        let mut app = connected_app();
        let effect = update(&mut app, Action::Submit("  hello  ".into()));
        assert_eq!(
            effect,
            Effect::SendChat {
                message: "hello".into(),
                include_literature: false,
            }
        );
        assert_eq!(app.messages[0].text, "hello");
    }

    #[test]
    fn test_submit_blocked_while_loading() {
        let mut app = connected_app();
        update(&mut app, Action::Submit("first".into()));
        let effect = update(&mut app, Action::Submit("second".into()));

        assert_eq!(effect, Effect::None);
        assert_eq!(app.messages.len(), 1);
    }

    #[test]
    fn test_submit_blocked_unless_connected() {
        let mut app = test_app(); // still Checking
        let effect = update(&mut app, Action::Submit("hello".into()));
        assert_eq!(effect, Effect::None);
        assert!(app.messages.is_empty());
    }

    #[test]
    fn test_chat_success_appends_exactly_one_assistant_message() {
        let mut app = connected_app();
        update(&mut app, Action::Submit("question".into()));
        update(&mut app, Action::ChatCompleted(ok_response("the answer")));

        assert_eq!(app.messages.len(), 2);
        let reply = &app.messages[1];
        assert_eq!(reply.sender, Sender::Assistant);
        assert_eq!(reply.text, "the answer");
        assert!(!reply.is_error);
        assert_eq!(reply.query_type.as_deref(), Some("general_bio"));
        assert_eq!(reply.literature_included, Some(false));
        assert_eq!(reply.usage.unwrap().total_tokens, 30);
        assert!(!app.is_loading);
    }

    #[test]
    fn test_chat_failure_appends_error_bubble_and_clears_loading() {
        let mut app = connected_app();
        update(&mut app, Action::Submit("question".into()));
        update(
            &mut app,
            Action::ChatCompleted(Err(ApiError::Network("connection refused".into()))),
        );

        assert_eq!(app.messages.len(), 2);
        let reply = &app.messages[1];
        assert!(reply.is_error);
        assert_eq!(reply.sender, Sender::Assistant);
        assert_eq!(reply.text, FALLBACK_ERROR_TEXT);
        assert!(!app.is_loading);

        // The error bubble is mirrored into the session like any message.
        let id = app.active_session_id.clone().unwrap();
        assert_eq!(app.store.select(&id).unwrap().messages.len(), 2);
    }

    #[test]
    fn test_round_trip_net_message_count_is_two() {
        let mut app = connected_app();
        update(&mut app, Action::Submit("q".into()));
        update(&mut app, Action::ChatCompleted(ok_response("a")));
        assert_eq!(app.messages.len(), 2);

        update(&mut app, Action::Submit("q2".into()));
        update(
            &mut app,
            Action::ChatCompleted(Err(ApiError::Api {
                status: 500,
                message: "boom".into(),
            })),
        );
        assert_eq!(app.messages.len(), 4);
    }

    #[test]
    fn test_regenerate_reissues_preceding_user_text() {
        let mut app = connected_app();
        update(&mut app, Action::Submit("original question".into()));
        update(&mut app, Action::ChatCompleted(ok_response("first answer")));

        let effect = update(&mut app, Action::Regenerate { index: 1 });
        assert_eq!(
            effect,
            Effect::SendChat {
                message: "original question".into(),
                include_literature: false,
            }
        );
        // A fresh user message was appended; the pair completes on response.
        assert_eq!(app.messages.len(), 3);
        assert_eq!(app.messages[2].text, "original question");
        assert_eq!(app.messages[2].sender, Sender::User);
    }

    #[test]
    fn test_regenerate_on_user_message_is_noop() {
        let mut app = connected_app();
        update(&mut app, Action::Submit("question".into()));
        update(&mut app, Action::ChatCompleted(ok_response("answer")));

        let effect = update(&mut app, Action::Regenerate { index: 0 });
        assert_eq!(effect, Effect::None);
        assert_eq!(app.messages.len(), 2);
    }

    #[test]
    fn test_regenerate_without_predecessor_is_noop() {
        let mut app = connected_app();
        // An assistant message at index 0 has nothing before it.
        let id = app.next_message_id();
        app.messages.push(Message::assistant(id, "orphan"));

        let effect = update(&mut app, Action::Regenerate { index: 0 });
        assert_eq!(effect, Effect::None);
        assert_eq!(app.messages.len(), 1);
    }

    #[test]
    fn test_regenerate_out_of_bounds_is_noop() {
        let mut app = connected_app();
        let effect = update(&mut app, Action::Regenerate { index: 7 });
        assert_eq!(effect, Effect::None);
    }

    #[test]
    fn test_delete_active_session_resets_view() {
        let mut app = connected_app();
        update(&mut app, Action::Submit("question".into()));
        update(&mut app, Action::ChatCompleted(ok_response("answer")));

        let id = app.active_session_id.clone().unwrap();
        update(&mut app, Action::DeleteSession(id));

        assert!(app.active_session_id.is_none());
        assert!(app.messages.is_empty());
        assert_eq!(app.view, View::Welcome);
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_delete_other_session_leaves_active_untouched() {
        let mut app = connected_app();
        update(&mut app, Action::Submit("first chat".into()));
        update(&mut app, Action::ChatCompleted(ok_response("a")));
        let first_id = app.active_session_id.clone().unwrap();

        update(&mut app, Action::NewSession);
        update(&mut app, Action::Submit("second chat".into()));
        update(&mut app, Action::ChatCompleted(ok_response("b")));

        update(&mut app, Action::DeleteSession(first_id));

        assert_eq!(app.view, View::Chat);
        assert_eq!(app.messages.len(), 2);
        assert_eq!(app.store.sessions().len(), 1);
    }

    #[test]
    fn test_select_session_restores_messages() {
        let mut app = connected_app();
        update(&mut app, Action::Submit("first chat".into()));
        update(&mut app, Action::ChatCompleted(ok_response("a")));
        let first_id = app.active_session_id.clone().unwrap();

        update(&mut app, Action::NewSession);
        assert_eq!(app.view, View::Welcome);

        update(&mut app, Action::SelectSession(first_id.clone()));
        assert_eq!(app.active_session_id.as_deref(), Some(first_id.as_str()));
        assert_eq!(app.messages.len(), 2);
        assert_eq!(app.view, View::Chat);
    }

    #[test]
    fn test_select_unknown_session_changes_nothing() {
        let mut app = connected_app();
        update(&mut app, Action::Submit("chat".into()));
        let active = app.active_session_id.clone();

        update(&mut app, Action::SelectSession("missing".into()));
        assert_eq!(app.active_session_id, active);
        assert_eq!(app.messages.len(), 1);
    }

    #[test]
    fn test_health_ok_connects_and_enables_send() {
        let mut app = test_app();
        update(
            &mut app,
            Action::HealthChecked(Ok(HealthResponse {
                status: "healthy".into(),
                message: None,
                version: Some("1.0.0".into()),
            })),
        );
        assert_eq!(app.backend_status, BackendStatus::Connected);
        assert!(app.can_send());
    }

    #[test]
    fn test_health_bad_shape_is_error() {
        let mut app = test_app();
        update(
            &mut app,
            Action::HealthChecked(Ok(HealthResponse {
                status: "degraded".into(),
                message: None,
                version: None,
            })),
        );
        assert_eq!(app.backend_status, BackendStatus::Error);
    }

    #[test]
    fn test_health_network_failure_is_disconnected() {
        let mut app = test_app();
        update(
            &mut app,
            Action::HealthChecked(Err(ApiError::Network("timeout".into()))),
        );
        assert_eq!(app.backend_status, BackendStatus::Disconnected);
        assert!(!app.can_send());
    }

    #[test]
    fn test_reload_is_only_way_back_to_checking() {
        let mut app = test_app();
        update(
            &mut app,
            Action::HealthChecked(Err(ApiError::Network("down".into()))),
        );
        assert_eq!(app.backend_status, BackendStatus::Disconnected);

        let effect = update(&mut app, Action::Reload);
        assert_eq!(effect, Effect::Refresh);
        assert_eq!(app.backend_status, BackendStatus::Checking);
    }

    #[test]
    fn test_examples_failure_keeps_previous_examples() {
        let mut app = test_app();
        let mut catalog = ExampleCatalog::new();
        catalog.insert("pcr".into(), vec!["example one".into()]);
        update(&mut app, Action::ExamplesLoaded(Ok(catalog.clone())));
        assert_eq!(app.examples, catalog);

        update(
            &mut app,
            Action::ExamplesLoaded(Err(ApiError::Network("down".into()))),
        );
        assert_eq!(app.examples, catalog);
    }

    #[test]
    fn test_toggle_literature_flows_into_requests() {
        let mut app = connected_app();
        update(&mut app, Action::ToggleLiterature);
        assert!(app.include_literature);

        let effect = update(&mut app, Action::Submit("q".into()));
        assert_eq!(
            effect,
            Effect::SendChat {
                message: "q".into(),
                include_literature: true,
            }
        );
    }

    #[test]
    fn test_literature_search_round_trip() {
        let mut app = connected_app();
        let effect = update(&mut app, Action::LiteratureSearch("CRISPR delivery".into()));
        assert_eq!(
            effect,
            Effect::SearchLiterature {
                query: "CRISPR delivery".into(),
            }
        );
        assert_eq!(app.messages[0].text, "/lit CRISPR delivery");
        assert!(app.is_loading);

        update(
            &mut app,
            Action::LiteratureCompleted(Ok(LiteratureResponse {
                query: "CRISPR delivery".into(),
                results: vec![Paper {
                    pmid: "1".into(),
                    title: "Lipid nanoparticles for CRISPR".into(),
                    authors: vec!["Doe, Jane".into()],
                    abstract_text: "...".into(),
                    year: "2024".into(),
                    journal: "Cell".into(),
                    url: "https://pubmed.ncbi.nlm.nih.gov/1/".into(),
                }],
                count: 1,
            })),
        );
        assert_eq!(app.messages.len(), 2);
        assert!(app.messages[1].text.contains("Lipid nanoparticles"));
        assert!(!app.is_loading);
    }

    #[test]
    fn test_export_with_no_messages_is_noop() {
        let mut app = connected_app();
        let effect = update(&mut app, Action::ExportTranscript);
        assert_eq!(effect, Effect::None);
        assert_eq!(app.status_message, "Nothing to export");
    }

    #[test]
    fn test_export_with_messages_requests_effect() {
        let mut app = connected_app();
        update(&mut app, Action::Submit("q".into()));
        update(&mut app, Action::ChatCompleted(ok_response("a")));
        assert_eq!(update(&mut app, Action::ExportTranscript), Effect::ExportTranscript);
    }

    #[test]
    fn test_format_papers_empty() {
        let resp = LiteratureResponse {
            query: "obscure topic".into(),
            results: vec![],
            count: 0,
        };
        assert_eq!(format_papers(&resp), "No PubMed results for \"obscure topic\".");
    }
}
