//! # Welcome Component
//!
//! Placeholder shown while the conversation is empty: a greeting and the
//! four suggestion chips (Alt+1..4).

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::SUGGESTIONS;
use crate::tui::component::Component;

pub struct Welcome;

impl Welcome {
    fn lines() -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                "👋 Welcome to the RAG Assistant",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "I can search your documents, query the database and answer questions.",
                Style::default().fg(Color::Gray),
            )),
            Line::raw(""),
            Line::from(Span::styled(
                "Try asking:",
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        for (i, (label, _)) in SUGGESTIONS.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" Alt+{} ", i + 1),
                    Style::default().fg(Color::Black).bg(Color::Cyan),
                ),
                Span::raw(format!(" {label}")),
            ]));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            format!("v{}  ·  F1 for help", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        )));
        lines
    }
}

impl Component for Welcome {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = Self::lines();
        let [centered] = Layout::vertical([Constraint::Length(lines.len() as u16)])
            .flex(Flex::Center)
            .areas(area);
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), centered);
    }
}
