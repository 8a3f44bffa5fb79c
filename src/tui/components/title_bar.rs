//! # TitleBar Component
//!
//! One-line status bar: server endpoint, the short form of the session id,
//! the status message, and a "↓ New" marker when the transcript has content
//! below the current scroll position.
//!
//! Stateless: every field is a prop copied from `App` or `TuiState` each frame.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

/// Characters of the session id shown in the bar.
const SESSION_PREFIX_LEN: usize = 8;

pub struct TitleBar {
    pub endpoint: String,
    pub session_id: String,
    pub status_message: String,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(
        endpoint: String,
        session_id: String,
        status_message: String,
        has_unseen_content: bool,
    ) -> Self {
        Self {
            endpoint,
            session_id,
            status_message,
            has_unseen_content,
        }
    }

    fn short_session(&self) -> &str {
        match self.session_id.char_indices().nth(SESSION_PREFIX_LEN) {
            Some((end, _)) => &self.session_id[..end],
            None => &self.session_id,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let dim = Style::default().fg(Color::DarkGray);
        let mut spans = vec![
            Span::styled(
                "🤖 RAG Assistant",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" | {}", self.endpoint), dim),
            Span::styled(format!(" | session {}", self.short_session()), dim),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }
        if self.has_unseen_content {
            spans.push(Span::styled(" | ↓ New", Style::default().fg(Color::Yellow)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
