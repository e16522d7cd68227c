//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//! Network calls run on tokio tasks that post their results back to the
//! event loop through an mpsc channel, so the reducer stays the single
//! writer of application state.

mod event;
mod ui;

use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use log::{debug, info, warn};
use tui_scrollview::ScrollViewState;

use crate::api::{BackendApi, HttpBackend};
use crate::core::action::{Action, Effect, LITERATURE_RESULTS, update};
use crate::core::config::ResolvedConfig;
use crate::core::export;
use crate::core::message::Sender;
use crate::core::state::{App, View};
use crate::tui::event::{TuiEvent, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub input_buffer: String,
    pub scroll_state: ScrollViewState,
    pub stick_to_bottom: bool,
    pub sidebar_open: bool,
    pub sidebar_selected: usize,
    /// Example prompts matching the current input.
    pub suggestions: Vec<String>,
    pub suggestion_index: Option<usize>,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            input_buffer: String::new(),
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true,
            sidebar_open: false,
            sidebar_selected: 0,
            suggestions: Vec::new(),
            suggestion_index: None,
        }
    }

    fn refresh_suggestions(&mut self, app: &App) {
        self.suggestions = ui::suggestions(app, &self.input_buffer);
        self.suggestion_index = None;
    }

    fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.suggestions.clear();
        self.suggestion_index = None;
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!("Terminal modes enabled (mouse capture, bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend: Arc<dyn BackendApi> =
        Arc::new(HttpBackend::new(config.base_url.clone(), config.timeout));
    let mut app = App::new(backend, &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()?;

    // Channel for actions coming back from background tasks
    let (tx, rx) = mpsc::channel();

    // Initial probe: health + examples
    spawn_refresh(&app, &tx);

    let mut spinner_frame = 0usize;
    let mut should_quit = false;

    while !should_quit {
        terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;

        // Short timeout while loading keeps the spinner moving; long timeout
        // when idle keeps the loop cheap.
        let timeout = if app.is_loading {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(250)
        };
        if app.is_loading {
            spinner_frame = spinner_frame.wrapping_add(1);
        }

        if let Some(tui_event) = poll_event_timeout(timeout) {
            should_quit |= handle_event(tui_event, &mut app, &mut tui, &tx);
        }

        // Results from background tasks (chat replies, health probes)
        while let Ok(action) = rx.try_recv() {
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            should_quit |= handle_effect(effect, &mut app, &tx);
        }
    }

    ratatui::restore();
    Ok(())
}

/// Translates a terminal event into state changes and core actions.
/// Returns true when the app should quit.
fn handle_event(
    tui_event: TuiEvent,
    app: &mut App,
    tui: &mut TuiState,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match tui_event {
        TuiEvent::ForceQuit => return dispatch(Action::Quit, app, tx),
        TuiEvent::Resize => {}

        TuiEvent::Escape => {
            if tui.sidebar_open {
                tui.sidebar_open = false;
            } else if !tui.suggestions.is_empty() {
                tui.suggestions.clear();
                tui.suggestion_index = None;
            } else {
                return dispatch(Action::Quit, app, tx);
            }
        }

        TuiEvent::Submit => {
            if tui.sidebar_open {
                if let Some(session) = app.store.sessions().get(tui.sidebar_selected) {
                    let id = session.id.clone();
                    tui.sidebar_open = false;
                    tui.stick_to_bottom = true;
                    return dispatch(Action::SelectSession(id), app, tx);
                }
            } else if let Some(i) = tui.suggestion_index {
                // Accept the highlighted suggestion into the input box.
                if let Some(suggestion) = tui.suggestions.get(i) {
                    tui.input_buffer = suggestion.clone();
                }
                tui.suggestions.clear();
                tui.suggestion_index = None;
            } else {
                let text = tui.input_buffer.clone();
                let action = match text.strip_prefix("/lit ") {
                    Some(query) => Action::LiteratureSearch(query.to_string()),
                    None => Action::Submit(text),
                };
                let effect = update(app, action);
                if effect != Effect::None {
                    tui.clear_input();
                    tui.stick_to_bottom = true;
                }
                return handle_effect(effect, app, tx);
            }
        }

        TuiEvent::InputChar(c) => {
            // Digit shortcuts fire quick actions from the welcome screen.
            if app.view == View::Welcome && tui.input_buffer.is_empty() {
                if let Some(index) = c.to_digit(10) {
                    let index = index as usize;
                    if (1..=ui::QUICK_ACTIONS.len()).contains(&index) {
                        return dispatch(
                            Action::Submit(ui::QUICK_ACTIONS[index - 1].to_string()),
                            app,
                            tx,
                        );
                    }
                }
            }
            tui.input_buffer.push(c);
            tui.refresh_suggestions(app);
        }

        TuiEvent::Paste(data) => {
            // The input box is single-line; flatten pasted newlines.
            let flattened = data.replace(['\r', '\n'], " ");
            tui.input_buffer.push_str(&flattened);
            tui.refresh_suggestions(app);
        }

        TuiEvent::Backspace => {
            tui.input_buffer.pop();
            tui.refresh_suggestions(app);
        }

        TuiEvent::Tab => {
            if !tui.suggestions.is_empty() {
                tui.suggestion_index = Some(match tui.suggestion_index {
                    Some(i) => (i + 1) % tui.suggestions.len(),
                    None => 0,
                });
            }
        }

        TuiEvent::ToggleSidebar => {
            tui.sidebar_open = !tui.sidebar_open;
            tui.sidebar_selected = 0;
        }

        TuiEvent::CursorUp => {
            if tui.sidebar_open {
                tui.sidebar_selected = tui.sidebar_selected.saturating_sub(1);
            } else {
                tui.stick_to_bottom = false;
                tui.scroll_state.scroll_up();
            }
        }

        TuiEvent::CursorDown => {
            if tui.sidebar_open {
                let last = app.store.sessions().len().saturating_sub(1);
                tui.sidebar_selected = (tui.sidebar_selected + 1).min(last);
            } else {
                tui.scroll_state.scroll_down();
            }
        }

        TuiEvent::ScrollPageUp => {
            tui.stick_to_bottom = false;
            tui.scroll_state.scroll_page_up();
        }
        TuiEvent::ScrollPageDown => tui.scroll_state.scroll_page_down(),
        TuiEvent::ScrollToBottom => {
            tui.stick_to_bottom = true;
            tui.scroll_state.scroll_to_bottom();
        }

        TuiEvent::DeleteKey => {
            if tui.sidebar_open {
                if let Some(session) = app.store.sessions().get(tui.sidebar_selected) {
                    let id = session.id.clone();
                    return dispatch(Action::DeleteSession(id), app, tx);
                }
            }
        }

        TuiEvent::NewChat => {
            tui.clear_input();
            tui.scroll_state = ScrollViewState::default();
            return dispatch(Action::NewSession, app, tx);
        }
        TuiEvent::Reload => return dispatch(Action::Reload, app, tx),
        TuiEvent::ToggleLiterature => return dispatch(Action::ToggleLiterature, app, tx),
        TuiEvent::Export => return dispatch(Action::ExportTranscript, app, tx),

        TuiEvent::RegenerateLast => {
            // Regenerate the most recent assistant message.
            if let Some(index) = app
                .messages
                .iter()
                .rposition(|m| m.sender == Sender::Assistant)
            {
                tui.stick_to_bottom = true;
                return dispatch(Action::Regenerate { index }, app, tx);
            }
        }
    }
    false
}

fn dispatch(action: Action, app: &mut App, tx: &mpsc::Sender<Action>) -> bool {
    let effect = update(app, action);
    handle_effect(effect, app, tx)
}

/// Performs the I/O an update asked for. Returns true when the app should quit.
fn handle_effect(effect: Effect, app: &mut App, tx: &mpsc::Sender<Action>) -> bool {
    match effect {
        Effect::None => false,
        Effect::SendChat {
            message,
            include_literature,
        } => {
            spawn_chat(app, message, include_literature, tx.clone());
            false
        }
        Effect::SearchLiterature { query } => {
            spawn_literature(app, query, tx.clone());
            false
        }
        Effect::Refresh => {
            spawn_refresh(app, tx);
            false
        }
        Effect::ExportTranscript => {
            export_transcript(app);
            false
        }
        Effect::Quit => true,
    }
}

fn export_transcript(app: &mut App) {
    let title = app
        .active_session_id
        .as_deref()
        .and_then(|id| app.store.select(id))
        .map(|s| s.title.clone())
        .unwrap_or_else(|| String::from("chat"));

    match export::write_transcript(&title, &app.messages, &app.export_dir) {
        Ok(path) => app.status_message = format!("Exported to {}", path.display()),
        Err(e) => {
            warn!("Export failed: {e}");
            app.status_message = format!("Export failed: {e}");
        }
    }
}

fn spawn_chat(app: &App, message: String, include_literature: bool, tx: mpsc::Sender<Action>) {
    info!("Spawning chat request");
    let backend = app.backend.clone();
    tokio::spawn(async move {
        let result = backend.send_chat(&message, include_literature).await;
        if tx.send(Action::ChatCompleted(result)).is_err() {
            warn!("Failed to send chat result: receiver dropped");
        }
    });
}

fn spawn_literature(app: &App, query: String, tx: mpsc::Sender<Action>) {
    info!("Spawning literature search");
    let backend = app.backend.clone();
    tokio::spawn(async move {
        let result = backend.search_literature(&query, LITERATURE_RESULTS).await;
        if tx.send(Action::LiteratureCompleted(result)).is_err() {
            warn!("Failed to send literature result: receiver dropped");
        }
    });
}

/// Fires the health probe and the examples fetch as independent tasks.
fn spawn_refresh(app: &App, tx: &mpsc::Sender<Action>) {
    info!("Spawning backend refresh (health + examples)");
    let backend = app.backend.clone();
    let health_tx = tx.clone();
    tokio::spawn(async move {
        let result = backend.check_health().await;
        if health_tx.send(Action::HealthChecked(result)).is_err() {
            warn!("Failed to send health result: receiver dropped");
        }
    });

    let backend = app.backend.clone();
    let examples_tx = tx.clone();
    tokio::spawn(async move {
        let result = backend.load_examples().await;
        if examples_tx.send(Action::ExamplesLoaded(result)).is_err() {
            warn!("Failed to send examples: receiver dropped");
        }
    });
}
