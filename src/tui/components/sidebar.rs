//! # Sidebar Component
//!
//! Tabbed panel beside the transcript:
//!
//! ```text
//! ┌ Sources │ Files │ KB │ Settings ┐
//! │ [x] 📄 Documents                 │
//! │ [ ] 🗄  Database                  │
//! └──────────────────────────────────┘
//! ```
//!
//! - **Sources**: which retrieval sources the next query uses
//! - **Files**: attachments for the next query (drop zone + list)
//! - **KB**: pending knowledge-base uploads and the indexed file listing
//! - **Settings**: provider and search depth from the server config
//!
//! `SidebarState` keeps the per-tab cursors and the hit areas recorded on
//! the last render so mouse clicks can be resolved to tabs and the zone.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::core::action::Action;
use crate::core::files::IntakeTarget;
use crate::core::render::{EMPTY_KNOWLEDGE_BASE, format_size};
use crate::core::state::{App, SidebarTab, SourceKind};
use crate::tui::component::Component;
use crate::tui::components::file_zone::{FileZone, ZONE_HEIGHT};
use crate::tui::event::TuiEvent;

pub const SIDEBAR_WIDTH: u16 = 38;

const SOURCES: [(SourceKind, &str); 2] = [
    (SourceKind::Docs, "📄 Documents"),
    (SourceKind::Db, "🗄  Database"),
];

/// What a sidebar key press asks the event loop to do.
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarEvent {
    Dispatch(Action),
    OpenPrompt(IntakeTarget),
}

#[derive(Default)]
pub struct SidebarState {
    source_cursor: usize,
    attachment_cursor: usize,
    kb_cursor: usize,
    /// Tab title hit areas from the last render.
    tab_areas: Vec<(Rect, SidebarTab)>,
    /// Drop zone area from the last render, if the tab shows one.
    zone_area: Option<Rect>,
}

impl SidebarState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab_at(&self, column: u16, row: u16) -> Option<SidebarTab> {
        let position = Position::new(column, row);
        self.tab_areas
            .iter()
            .find(|(area, _)| area.contains(position))
            .map(|(_, tab)| *tab)
    }

    pub fn zone_contains(&self, column: u16, row: u16) -> bool {
        self.zone_area
            .is_some_and(|area| area.contains(Position::new(column, row)))
    }

    /// Handle a key while the sidebar has focus.
    pub fn handle_key(&mut self, event: &TuiEvent, app: &App) -> Option<SidebarEvent> {
        match event {
            TuiEvent::CursorLeft => {
                return Some(SidebarEvent::Dispatch(Action::ShowTab(app.sidebar_tab.prev())));
            }
            TuiEvent::CursorRight => {
                return Some(SidebarEvent::Dispatch(Action::ShowTab(app.sidebar_tab.next())));
            }
            _ => {}
        }

        match app.sidebar_tab {
            SidebarTab::Sources => match event {
                TuiEvent::CursorUp => {
                    self.source_cursor = self.source_cursor.saturating_sub(1);
                    None
                }
                TuiEvent::CursorDown => {
                    self.source_cursor = (self.source_cursor + 1).min(SOURCES.len() - 1);
                    None
                }
                TuiEvent::Submit | TuiEvent::InputChar(' ') => {
                    let (kind, _) = SOURCES[self.source_cursor.min(SOURCES.len() - 1)];
                    Some(SidebarEvent::Dispatch(Action::ToggleSource(kind)))
                }
                _ => None,
            },
            SidebarTab::Attachments => {
                let count = app.temp_files.len();
                match event {
                    TuiEvent::Submit | TuiEvent::InputChar('o') => {
                        Some(SidebarEvent::OpenPrompt(IntakeTarget::Temporary))
                    }
                    TuiEvent::CursorUp => {
                        self.attachment_cursor = self.attachment_cursor.saturating_sub(1);
                        None
                    }
                    TuiEvent::CursorDown => {
                        self.attachment_cursor =
                            (self.attachment_cursor + 1).min(count.saturating_sub(1));
                        None
                    }
                    TuiEvent::InputChar('d') | TuiEvent::Delete if count > 0 => {
                        let index = self.attachment_cursor.min(count - 1);
                        self.attachment_cursor = index.min(count.saturating_sub(2));
                        Some(SidebarEvent::Dispatch(Action::RemoveTempFile(index)))
                    }
                    _ => None,
                }
            }
            SidebarTab::KnowledgeBase => {
                let count = app.indexed_files.len();
                match event {
                    TuiEvent::Submit | TuiEvent::InputChar('o') => {
                        Some(SidebarEvent::OpenPrompt(IntakeTarget::KnowledgeBase))
                    }
                    TuiEvent::InputChar('a') => {
                        Some(SidebarEvent::Dispatch(Action::AddToKnowledgeBase))
                    }
                    TuiEvent::InputChar('r') => {
                        Some(SidebarEvent::Dispatch(Action::RefreshKnowledgeBase))
                    }
                    TuiEvent::InputChar('c') => {
                        Some(SidebarEvent::Dispatch(Action::ClearKnowledgeBase))
                    }
                    TuiEvent::CursorUp => {
                        self.kb_cursor = self.kb_cursor.saturating_sub(1);
                        None
                    }
                    TuiEvent::CursorDown => {
                        self.kb_cursor = (self.kb_cursor + 1).min(count.saturating_sub(1));
                        None
                    }
                    TuiEvent::InputChar('d') | TuiEvent::Delete if count > 0 => {
                        let index = self.kb_cursor.min(count - 1);
                        Some(SidebarEvent::Dispatch(Action::DeleteIndexedFile(index)))
                    }
                    _ => None,
                }
            }
            SidebarTab::Settings => match event {
                TuiEvent::InputChar('+') | TuiEvent::InputChar('=') | TuiEvent::CursorUp => {
                    Some(SidebarEvent::Dispatch(Action::AdjustSearchK(1)))
                }
                TuiEvent::InputChar('-') | TuiEvent::CursorDown => {
                    Some(SidebarEvent::Dispatch(Action::AdjustSearchK(-1)))
                }
                TuiEvent::InputChar('p') | TuiEvent::Submit => {
                    Some(SidebarEvent::Dispatch(Action::CycleProvider))
                }
                _ => None,
            },
        }
    }
}

/// Transient renderer over `SidebarState` and the app.
pub struct Sidebar<'a> {
    pub state: &'a mut SidebarState,
    pub app: &'a App,
    pub focused: bool,
    /// Drop zone highlight (mouse hover or open prompt).
    pub zone_highlighted: bool,
}

impl<'a> Sidebar<'a> {
    fn render_tabs(&mut self, frame: &mut Frame, area: Rect) {
        self.state.tab_areas.clear();
        let mut spans = Vec::new();
        let mut x = area.x;
        for (i, tab) in SidebarTab::ALL.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
                x = x.saturating_add(1);
            }
            let title = format!(" {} ", tab.title());
            let width = title.width() as u16;
            let style = if *tab == self.app.sidebar_tab {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            self.state
                .tab_areas
                .push((Rect::new(x, area.y, width, 1).intersection(area), *tab));
            x = x.saturating_add(width);
            spans.push(Span::styled(title, style));
        }
        frame.render_widget(Line::from(spans), area);
    }

    fn render_sources(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = SOURCES
            .iter()
            .map(|(kind, label)| {
                let mark = if self.app.sources.is_enabled(*kind) { "[x]" } else { "[ ]" };
                ListItem::new(format!("{mark} {label}"))
            })
            .collect();
        let mut list_state = ListState::default().with_selected(Some(self.state.source_cursor));
        let [list_area, hint_area] =
            Layout::vertical([Constraint::Length(SOURCES.len() as u16), Constraint::Min(0)])
                .areas(area);
        frame.render_stateful_widget(
            List::new(items).highlight_style(self.highlight()),
            list_area,
            &mut list_state,
        );
        frame.render_widget(hint("Space toggles the selected source"), hint_area);
    }

    fn render_attachments(&mut self, frame: &mut Frame, area: Rect) {
        let [zone_area, list_area, hint_area] = Layout::vertical([
            Constraint::Length(ZONE_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);
        self.render_zone(frame, zone_area, IntakeTarget::Temporary);

        let items: Vec<ListItem> = self
            .app
            .temp_files
            .files()
            .iter()
            .map(|file| match file.size {
                Some(size) => ListItem::new(format!("📎 {} ({})", file.name, format_size(size))),
                None => ListItem::new(format!("📎 {}", file.name)),
            })
            .collect();
        let selected = (!items.is_empty()).then_some(self.state.attachment_cursor);
        let mut list_state = ListState::default().with_selected(selected);
        frame.render_stateful_widget(
            List::new(items).highlight_style(self.highlight()),
            list_area,
            &mut list_state,
        );
        frame.render_widget(hint("Enter pick  d remove"), hint_area);
    }

    fn render_knowledge_base(&mut self, frame: &mut Frame, area: Rect) {
        let [zone_area, pending_area, list_area, hint_area] = Layout::vertical([
            Constraint::Length(ZONE_HEIGHT),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);
        self.render_zone(frame, zone_area, IntakeTarget::KnowledgeBase);

        let pending = match self.app.kb_files.len() {
            0 => "No files waiting to be added".to_string(),
            n => format!("{n} files ready, press a to add"),
        };
        frame.render_widget(hint(&pending), pending_area);

        let block = Block::bordered()
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Indexed files");
        if self.app.indexed_files.is_empty() {
            frame.render_widget(
                Paragraph::new(EMPTY_KNOWLEDGE_BASE)
                    .style(Style::default().fg(Color::DarkGray))
                    .block(block),
                list_area,
            );
        } else {
            let items: Vec<ListItem> = self
                .app
                .indexed_files
                .iter()
                .map(|file| {
                    ListItem::new(vec![
                        Line::raw(format!("📄 {}", file.name)),
                        Line::styled(
                            format!("   {} · {}", file.date, format_size(file.size)),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ])
                })
                .collect();
            let mut list_state = ListState::default().with_selected(Some(self.state.kb_cursor));
            frame.render_stateful_widget(
                List::new(items).highlight_style(self.highlight()).block(block),
                list_area,
                &mut list_state,
            );
        }
        frame.render_widget(hint("a add  r refresh  c clear  d delete"), hint_area);
    }

    fn render_settings(&mut self, frame: &mut Frame, area: Rect) {
        let lines = match &self.app.remote_config {
            Some(config) => vec![
                Line::from(vec![
                    Span::styled("LLM provider: ", Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(config.llm_provider.clone()),
                ]),
                Line::from(vec![
                    Span::styled(
                        "Search depth (k): ",
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(config.search_k.to_string()),
                ]),
                Line::raw(""),
                Line::styled(
                    "p cycles provider, +/- adjusts k. Changes apply to this window only.",
                    Style::default().fg(Color::DarkGray),
                ),
            ],
            None => vec![Line::styled(
                "Server configuration not loaded",
                Style::default().fg(Color::DarkGray),
            )],
        };
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
    }

    fn render_zone(&mut self, frame: &mut Frame, area: Rect, target: IntakeTarget) {
        self.state.zone_area = Some(area);
        FileZone {
            target,
            selected: self.app.buffer(target).len(),
            highlighted: self.zone_highlighted,
            focused: self.focused,
        }
        .render(frame, area);
    }

    fn highlight(&self) -> Style {
        if self.focused {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().add_modifier(Modifier::REVERSED)
        }
    }
}

fn hint(text: &str) -> Paragraph<'_> {
    Paragraph::new(text).style(Style::default().fg(Color::DarkGray))
}

impl<'a> Component for Sidebar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [tabs_area, content_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(inner);
        self.render_tabs(
            frame,
            Rect {
                height: 1,
                ..tabs_area
            },
        );

        self.state.zone_area = None;
        match self.app.sidebar_tab {
            SidebarTab::Sources => self.render_sources(frame, content_area),
            SidebarTab::Attachments => self.render_attachments(frame, content_area),
            SidebarTab::KnowledgeBase => self.render_knowledge_base(frame, content_area),
            SidebarTab::Settings => self.render_settings(frame, content_area),
        }
    }
}
