//! # InputBox Component
//!
//! Multi-line query editor that grows with its content.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste, Shift+Enter / Ctrl+J newlines)
//! - Edit at a cursor (left/right/home/end, backspace/delete)
//! - Report submission (Enter) and whether the buffer is blank
//! - Grow from one row up to `MAX_VISIBLE_LINES`, scrolling beyond that
//!
//! The buffer is not cleared on submit: the core decides whether the text
//! was sendable and answers with `Effect::ClearInput`.

use std::ops::Range;

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Most text rows shown before the box starts scrolling.
pub const MAX_VISIBLE_LINES: u16 = 6;
/// Borders (top + bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// Borders (left + right).
const HORIZONTAL_OVERHEAD: u16 = 2;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed; carries the raw buffer.
    Submit(String),
    /// Buffer changed. `empty` is true when only whitespace remains.
    Changed { empty: bool },
}

pub struct InputBox {
    pub buffer: String,
    /// Byte offset of the cursor in `buffer`.
    cursor: usize,
    /// First visible wrapped row.
    scroll_row: u16,
    /// Dimmed when another part of the screen has focus (prop).
    pub focused: bool,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            scroll_row: 0,
            focused: true,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.scroll_row = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Height for the current content at `outer_width`, clamped to
    /// `[1, MAX_VISIBLE_LINES]` text rows plus borders.
    pub fn calculate_height(&self, outer_width: u16) -> u16 {
        let rows = wrap_rows(&self.buffer, inner_width(outer_width)).len() as u16;
        rows.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn changed(&self) -> Option<InputEvent> {
        Some(InputEvent::Changed {
            empty: self.buffer.trim().is_empty(),
        })
    }

    fn insert_str(&mut self, text: &str) -> Option<InputEvent> {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
        self.changed()
    }

    fn prev_boundary(&self) -> usize {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.buffer.len())
    }

    /// Keep the cursor row inside the visible window.
    fn follow_cursor(&mut self, rows: &[Range<usize>]) {
        let (row, _) = cursor_position(&self.buffer, rows, self.cursor);
        let row = row as u16;
        if row < self.scroll_row {
            self.scroll_row = row;
        } else if row >= self.scroll_row + MAX_VISIBLE_LINES {
            self.scroll_row = row + 1 - MAX_VISIBLE_LINES;
        }
        let max_scroll = (rows.len() as u16).saturating_sub(MAX_VISIBLE_LINES);
        self.scroll_row = self.scroll_row.min(max_scroll);
    }
}

fn inner_width(outer_width: u16) -> usize {
    usize::from(outer_width.saturating_sub(HORIZONTAL_OVERHEAD)).max(1)
}

/// Split `text` into display rows of at most `width` columns. Hard-wraps
/// at character boundaries; `\n` always starts a new row. Ranges are byte
/// offsets and exclude the newline itself.
fn wrap_rows(text: &str, width: usize) -> Vec<Range<usize>> {
    let mut rows = Vec::new();
    let mut start = 0;
    let mut col = 0;
    for (i, c) in text.char_indices() {
        if c == '\n' {
            rows.push(start..i);
            start = i + 1;
            col = 0;
            continue;
        }
        let w = c.width().unwrap_or(0);
        if col + w > width && col > 0 {
            rows.push(start..i);
            start = i;
            col = 0;
        }
        col += w;
    }
    rows.push(start..text.len());
    rows
}

/// (row, column) of byte offset `cursor`. At a soft wrap the cursor sits at
/// the start of the following row.
fn cursor_position(text: &str, rows: &[Range<usize>], cursor: usize) -> (usize, usize) {
    let row = rows
        .iter()
        .rposition(|r| r.start <= cursor)
        .unwrap_or(0);
    let start = rows.get(row).map(|r| r.start).unwrap_or(0);
    let col = text.get(start..cursor).map(UnicodeWidthStr::width).unwrap_or(0);
    (row, col)
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        let rows = wrap_rows(&self.buffer, width);
        self.follow_cursor(&rows);

        let visible = usize::from(area.height.saturating_sub(VERTICAL_OVERHEAD)).max(1);
        let lines: Vec<Line> = rows
            .iter()
            .skip(usize::from(self.scroll_row))
            .take(visible)
            .map(|r| Line::raw(&self.buffer[r.clone()]))
            .collect();

        let border_style = if self.focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title("Ask a question (Enter to send, Shift+Enter for newline)");

        let text_style = if self.focused {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        frame.render_widget(Paragraph::new(lines).style(text_style).block(block), area);

        if self.focused {
            let (row, col) = cursor_position(&self.buffer, &rows, self.cursor);
            let row = (row as u16).saturating_sub(self.scroll_row);
            let x = area.x + 1 + (col as u16).min(area.width.saturating_sub(3));
            let y = area.y + 1 + row.min(area.height.saturating_sub(3));
            frame.set_cursor_position(Position { x, y });
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut encoded = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut encoded))
            }
            TuiEvent::Newline => self.insert_str("\n"),
            TuiEvent::Paste(text) => {
                let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
                self.insert_str(&normalized)
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = self.prev_boundary();
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                self.changed()
            }
            TuiEvent::Delete if self.cursor < self.buffer.len() => {
                let next = self.next_boundary();
                self.buffer.drain(self.cursor..next);
                self.changed()
            }
            TuiEvent::CursorLeft => {
                self.cursor = self.prev_boundary();
                None
            }
            TuiEvent::CursorRight => {
                self.cursor = self.next_boundary();
                None
            }
            TuiEvent::CursorHome => {
                self.cursor = self.buffer[..self.cursor]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                None
            }
            TuiEvent::CursorEnd => {
                self.cursor = self.buffer[self.cursor..]
                    .find('\n')
                    .map(|i| self.cursor + i)
                    .unwrap_or(self.buffer.len());
                None
            }
            TuiEvent::Submit => Some(InputEvent::Submit(self.buffer.clone())),
            _ => None,
        }
    }
}
