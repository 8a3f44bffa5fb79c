//! # File Zone Component
//!
//! The drop target bound to one upload buffer. A terminal has no drag and
//! drop: dropping a file onto it pastes the file's path, so a paste while
//! the zone is focused counts as a drop. Activating the zone opens a
//! `PathPrompt` where paths can be typed or pasted instead.
//!
//! The same component serves both the knowledge-base zone and the
//! attachment zone, parameterized by `IntakeTarget`.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Wrap};

use crate::core::files::{IntakeTarget, PendingFile, parse_dropped_paths};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::overlay::centered_rect;
use crate::tui::event::TuiEvent;

/// Rows the zone takes in the sidebar.
pub const ZONE_HEIGHT: u16 = 4;

/// Turn dropped or typed text into pending files for a buffer.
pub fn files_from_text(text: &str) -> Vec<PendingFile> {
    parse_dropped_paths(text)
        .into_iter()
        .map(PendingFile::from_path)
        .collect()
}

pub struct FileZone {
    pub target: IntakeTarget,
    pub selected: usize,
    /// Mouse is over the zone, or a prompt for it is open.
    pub highlighted: bool,
    pub focused: bool,
}

impl Component for FileZone {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let style = if self.highlighted {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else if self.focused {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let text = if self.selected > 0 {
            format!("{} files selected", self.selected)
        } else {
            "📁 Drop files here, or press Enter to choose".to_string()
        };
        let block = Block::bordered()
            .border_type(if self.highlighted {
                BorderType::Thick
            } else {
                BorderType::Plain
            })
            .border_style(style)
            .title(self.target.label());
        frame.render_widget(
            Paragraph::new(text)
                .style(style)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block),
            area,
        );
    }
}

/// Events emitted by the path prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptEvent {
    Picked(IntakeTarget, Vec<PendingFile>),
    Dismissed,
}

/// Modal path entry for one intake zone.
pub struct PathPrompt {
    pub target: IntakeTarget,
    pub buffer: String,
}

impl PathPrompt {
    pub fn new(target: IntakeTarget) -> Self {
        Self {
            target,
            buffer: String::new(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 30, area);
        frame.render_widget(Clear, overlay);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" Add files: {} ", self.target.label()))
            .title_bottom(Line::from(" Enter Confirm  Esc Cancel ").centered());
        let lines = vec![
            Line::styled(
                "Type or paste file paths (drag files onto the terminal to paste them):",
                Style::default().fg(Color::Gray),
            ),
            Line::raw(""),
            Line::raw(format!("> {}", self.buffer)),
        ];
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
            overlay,
        );
    }
}

impl EventHandler for PathPrompt {
    type Event = PromptEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.push(*c);
                None
            }
            TuiEvent::Paste(text) => {
                self.buffer.push_str(text);
                None
            }
            TuiEvent::Backspace => {
                self.buffer.pop();
                None
            }
            TuiEvent::Submit => {
                let files = files_from_text(&self.buffer);
                if files.is_empty() {
                    Some(PromptEvent::Dismissed)
                } else {
                    Some(PromptEvent::Picked(self.target, files))
                }
            }
            TuiEvent::Escape => Some(PromptEvent::Dismissed),
            _ => None,
        }
    }
}
