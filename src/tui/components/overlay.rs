//! # Overlays
//!
//! Modal boxes drawn over the main screen: the loading indicator, notices
//! (alerts), confirmation prompts and the help screen. Each one clears the
//! area it covers first. Key handling for them lives in the event loop since
//! they only map a handful of keys to core actions.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph, Wrap};

use crate::core::state::{Confirm, Notice, NoticeLevel};
use crate::tui::component::Component;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Compute a centered rect using percentage of the outer rect.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

/// A box of fixed size centered in `outer`, shrunk to fit.
fn fixed_center(width: u16, height: u16, outer: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(outer.height))])
        .flex(Flex::Center)
        .areas(outer);
    let [center] = Layout::horizontal([Constraint::Length(width.min(outer.width))])
        .flex(Flex::Center)
        .areas(row);
    center
}

/// Rows needed for `text` wrapped at `width`, plus borders and the hint row.
fn dialog_height(text: &str, width: u16) -> u16 {
    let inner = width.saturating_sub(4).max(1) as usize;
    let rows = textwrap::wrap(text, inner).len() as u16;
    rows.max(1) + 4
}

pub struct LoadingOverlay {
    pub spinner_frame: usize,
}

impl Component for LoadingOverlay {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
        let overlay = fixed_center(24, 3, area);
        frame.render_widget(Clear, overlay);
        frame.render_widget(
            Paragraph::new(format!("{spinner} Working..."))
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Cyan))
                .block(Block::bordered().border_type(BorderType::Rounded)),
            overlay,
        );
    }
}

pub struct NoticeDialog<'a> {
    pub notice: &'a Notice,
}

impl<'a> Component for NoticeDialog<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (title, color) = match self.notice.level {
            NoticeLevel::Info => (" Notice ", Color::Cyan),
            NoticeLevel::Warning => (" Warning ", Color::Yellow),
            NoticeLevel::Error => (" Error ", Color::Red),
        };
        let width = 50.min(area.width);
        let overlay = fixed_center(width, dialog_height(&self.notice.text, width), area);
        frame.render_widget(Clear, overlay);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color))
            .title(Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD)))
            .title_bottom(Line::from(" Enter OK ").centered());
        frame.render_widget(
            Paragraph::new(self.notice.text.as_str())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block.padding(Padding::new(1, 1, 1, 0))),
            overlay,
        );
    }
}

pub struct ConfirmDialog<'a> {
    pub confirm: &'a Confirm,
}

impl<'a> Component for ConfirmDialog<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let prompt = self.confirm.prompt();
        let width = 56.min(area.width);
        let overlay = fixed_center(width, dialog_height(&prompt, width), area);
        frame.render_widget(Clear, overlay);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Red))
            .title(" Confirm ")
            .title_bottom(Line::from(" y Yes  n No ").centered());
        frame.render_widget(
            Paragraph::new(prompt)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block.padding(Padding::new(1, 1, 1, 0))),
            overlay,
        );
    }
}

const HELP: [(&str, &str); 14] = [
    ("Enter", "Send the question"),
    ("Shift+Enter", "New line"),
    ("Alt+1..4", "Send a suggestion (empty chat)"),
    ("Tab", "Switch focus: input / sidebar"),
    ("←/→", "Sidebar tabs"),
    ("Space", "Toggle a source"),
    ("o / Enter", "Pick files for the zone"),
    ("a / r / c", "KB: add, refresh, clear"),
    ("d", "Remove attachment / delete KB file"),
    ("PgUp/PgDn", "Scroll the conversation"),
    ("Ctrl+K", "New conversation"),
    ("Ctrl+S", "Export conversation"),
    ("Ctrl+B", "Toggle sidebar"),
    ("Ctrl+C", "Quit"),
];

pub struct HelpDialog;

impl Component for HelpDialog {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = HELP
            .iter()
            .map(|(key, what)| {
                Line::from(vec![
                    Span::styled(
                        format!("{key:>12}  "),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(*what),
                ])
            })
            .collect();
        let overlay = fixed_center(52, lines.len() as u16 + 2, area);
        frame.render_widget(Clear, overlay);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(" Help ")
                    .title_bottom(Line::from(" any key to close ").centered()),
            ),
            overlay,
        );
    }
}
