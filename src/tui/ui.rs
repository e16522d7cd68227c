use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollbarVisibility};
use unicode_width::UnicodeWidthStr;

use crate::core::message::{Message, Sender};
use crate::core::state::{App, BackendStatus, View};
use crate::tui::TuiState;

/// Canned shortcuts shown on the welcome screen; digit keys send them.
pub const QUICK_ACTIONS: &[&str] = &[
    "My PCR isn't producing any product - where do I start troubleshooting?",
    "What controls should a gene expression experiment include?",
    "How do I isolate high-quality RNA from tissue samples?",
    "Find recent papers about CRISPR applications in cancer therapy",
];

const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// How many suggestions are shown under the input box.
pub const MAX_SUGGESTIONS: usize = 3;

/// Example prompts matching the current input, for the suggestion strip.
pub fn suggestions(app: &App, input: &str) -> Vec<String> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    app.examples
        .values()
        .flatten()
        .filter(|example| example.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect()
}

struct RenderedMessage<'a> {
    paragraph: Paragraph<'a>,
    height: u16,
}

impl<'a> RenderedMessage<'a> {
    fn new(message: &'a Message, window_area: Rect) -> Self {
        let role = format_role(message);
        let base_style = role_style(message);

        let paragraph = Paragraph::new(message.text.trim())
            .block(
                Block::bordered()
                    .title(role)
                    .border_style(base_style.add_modifier(Modifier::DIM))
                    .title_style(base_style),
            )
            .style(base_style)
            .wrap(Wrap { trim: true });

        let inner_width = window_area.width.saturating_sub(2);
        let height = paragraph.line_count(inner_width) as u16;

        RenderedMessage { paragraph, height }
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let suggestion_rows = tui.suggestions.len() as u16;
    let layout = Layout::vertical([Length(1), Min(0), Length(suggestion_rows), Length(3), Length(1)]);
    let [title_area, main_area, suggestion_area, input_area, help_area] =
        layout.areas(frame.area());

    draw_title_bar(frame, title_area, app);

    // Main area, optionally split for the history sidebar
    let content_area = if tui.sidebar_open {
        let [sidebar_area, content_area] =
            Layout::horizontal([Length(32), Min(0)]).areas(main_area);
        draw_sidebar(frame, sidebar_area, app, tui);
        content_area
    } else {
        main_area
    };

    match app.view {
        View::Welcome => draw_welcome(frame, content_area, app),
        View::Chat => draw_messages(frame, content_area, app, tui, spinner_frame),
    }

    draw_suggestions(frame, suggestion_area, tui);
    draw_input(frame, input_area, app, tui);

    let help = "Enter send · Tab suggest · Ctrl+N new · Ctrl+H history · Ctrl+L literature · Ctrl+G regen · Ctrl+E export · Ctrl+R reload · Esc quit";
    frame.render_widget(
        Span::styled(help, Style::default().fg(Color::DarkGray)),
        help_area,
    );
}

fn draw_title_bar(frame: &mut Frame, area: Rect, app: &App) {
    let status_color = match app.backend_status {
        BackendStatus::Connected => Color::Green,
        BackendStatus::Checking => Color::Yellow,
        BackendStatus::Disconnected | BackendStatus::Error => Color::Red,
    };
    let line = Line::from(vec![
        Span::styled("BioQuery Assistant", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" ({}) | ", app.backend.base_url())),
        Span::styled(app.backend_status.label(), Style::default().fg(status_color)),
        Span::raw(format!(
            " | literature {}",
            if app.include_literature { "on" } else { "off" }
        )),
        Span::raw(if app.status_message.is_empty() {
            String::new()
        } else {
            format!(" | {}", app.status_message)
        }),
    ]);
    frame.render_widget(line, area);
}

fn draw_welcome(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Welcome to BioQuery",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::raw("Your research assistant for molecular biology questions."),
        Line::raw(""),
        Line::from(Span::styled("Quick actions", Style::default().fg(Color::Yellow))),
    ];
    for (i, action) in QUICK_ACTIONS.iter().enumerate() {
        lines.push(Line::raw(format!("  {}. {}", i + 1, action)));
    }

    if !app.examples.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "Example questions",
            Style::default().fg(Color::Yellow),
        )));
        for (category, examples) in &app.examples {
            lines.push(Line::from(Span::styled(
                format!("  {}", category.replace('_', " ")),
                Style::default().fg(Color::Cyan),
            )));
            for example in examples {
                lines.push(Line::raw(format!("    - {example}")));
            }
        }
    }

    lines.push(Line::raw(""));
    lines.push(Line::raw(
        "Type a question below, or /lit <topic> to search PubMed directly.",
    ));

    let paragraph = Paragraph::new(lines)
        .block(Block::bordered().border_style(Style::default().add_modifier(Modifier::DIM)))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn draw_messages(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    tui: &mut TuiState,
    spinner_frame: usize,
) {
    let content_width = area.width.saturating_sub(1);

    let mut rendered: Vec<RenderedMessage> = app
        .messages
        .iter()
        .map(|message| RenderedMessage::new(message, area))
        .collect();

    // While a request is outstanding, a spinner bubble sits where the answer
    // will appear.
    if app.is_loading {
        let spinner = SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()];
        let paragraph = Paragraph::new(format!("{spinner} thinking..."))
            .block(
                Block::bordered()
                    .title("bioquery")
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .style(Style::default().fg(Color::DarkGray));
        rendered.push(RenderedMessage { paragraph, height: 3 });
    }

    let total_height: u16 = rendered.iter().map(|r| r.height).sum();

    let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
        .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
        .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

    let mut y_offset: u16 = 0;
    for message in &rendered {
        let rect = Rect::new(0, y_offset, content_width, message.height);
        scroll_view.render_widget(message.paragraph.clone(), rect);
        y_offset += message.height;
    }

    if tui.stick_to_bottom {
        tui.scroll_state.scroll_to_bottom();
    }
    frame.render_stateful_widget(scroll_view, area, &mut tui.scroll_state);
}

fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    let items: Vec<ListItem> = app
        .store
        .sessions()
        .iter()
        .map(|session| {
            let active = app.active_session_id.as_deref() == Some(session.id.as_str());
            let marker = if active { "* " } else { "  " };
            ListItem::new(format!(
                "{}{} ({})",
                marker,
                session.title,
                session.messages.len()
            ))
        })
        .collect();

    let list = List::new(items)
        .block(Block::bordered().title("History"))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.store.is_empty() {
        tui.sidebar_selected = tui.sidebar_selected.min(app.store.sessions().len() - 1);
        state.select(Some(tui.sidebar_selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_suggestions(frame: &mut Frame, area: Rect, tui: &TuiState) {
    if tui.suggestions.is_empty() {
        return;
    }
    let lines: Vec<Line> = tui
        .suggestions
        .iter()
        .enumerate()
        .map(|(i, suggestion)| {
            let style = if tui.suggestion_index == Some(i) {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::Cyan)
            };
            Line::from(Span::styled(format!("> {suggestion}"), style))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_input(frame: &mut Frame, area: Rect, app: &App, tui: &TuiState) {
    let title = if app.can_send() {
        "Input"
    } else if app.is_loading {
        "Input (waiting for reply)"
    } else {
        "Input (backend unavailable)"
    };
    let input = Paragraph::new(tui.input_buffer.as_str()).block(Block::bordered().title(title));
    frame.render_widget(input, area);

    // Cursor sits after the typed text, clamped to the box.
    let cursor_x = area.x + 1 + UnicodeWidthStr::width(tui.input_buffer.as_str()) as u16;
    frame.set_cursor_position((cursor_x.min(area.x + area.width.saturating_sub(2)), area.y + 1));
}

fn format_role(message: &Message) -> &'static str {
    if message.is_error {
        return "error";
    }
    match message.sender {
        Sender::User => "user",
        Sender::Assistant => "bioquery",
    }
}

fn role_style(message: &Message) -> Style {
    if message.is_error {
        return Style::default().fg(Color::Red);
    }
    match message.sender {
        Sender::User => Style::default().fg(Color::Cyan),
        Sender::Assistant => Style::default().fg(Color::Green),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::test_support::test_app;

    #[test]
    fn test_format_role() {
        let user = Message::user(1, "hi");
        let reply = Message::assistant(2, "hello");
        let failed = Message::error(3, "oops");
        assert_eq!(format_role(&user), "user");
        assert_eq!(format_role(&reply), "bioquery");
        assert_eq!(format_role(&failed), "error");
    }

    #[test]
    fn test_draw_ui_welcome() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let app = test_app();
        let mut tui = TuiState::new();
        terminal.draw(|f| draw_ui(f, &app, &mut tui, 0)).unwrap();
    }

    #[test]
    fn test_draw_ui_chat_with_sidebar() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = test_app();
        app.view = View::Chat;
        let id = app.next_message_id();
        app.messages.push(Message::user(id, "hi"));
        let id = app.next_message_id();
        app.messages.push(Message::assistant(id, "hello"));
        app.is_loading = true;

        let mut tui = TuiState::new();
        tui.sidebar_open = true;
        terminal.draw(|f| draw_ui(f, &app, &mut tui, 3)).unwrap();
    }

    #[test]
    fn test_suggestions_match_case_insensitively() {
        let mut app = test_app();
        app.examples.insert(
            "pcr_troubleshooting".into(),
            vec![
                "My PCR isn't working".into(),
                "Multiple bands in my PCR".into(),
            ],
        );
        app.examples
            .insert("protocol_help".into(), vec!["RNA isolation method".into()]);

        let hits = suggestions(&app, "pcr");
        assert_eq!(hits.len(), 2);

        let hits = suggestions(&app, "rna ISOLATION");
        assert_eq!(hits, vec!["RNA isolation method".to_string()]);
    }

    #[test]
    fn test_suggestions_empty_input_yields_nothing() {
        let mut app = test_app();
        app.examples
            .insert("protocol_help".into(), vec!["anything".into()]);
        assert!(suggestions(&app, "   ").is_empty());
    }

    #[test]
    fn test_rendered_message_height_includes_borders() {
        let message = Message::user(1, "Single line");
        let area = Rect {
            x: 0,
            y: 0,
            width: 80,
            height: 100,
        };
        let rendered = RenderedMessage::new(&message, area);
        // 1 line of content + 2 for borders = 3
        assert_eq!(rendered.height, 3);
    }
}
