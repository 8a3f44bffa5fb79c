//! # MessageList Component
//!
//! Scrollable view of the conversation.
//!
//! ## Responsibilities
//!
//! - Lay out message bubbles top to bottom in insertion order
//! - Keep the view pinned to the newest message after every append
//! - Cache bubble heights so only new messages are measured
//!
//! ## Architecture
//!
//! `MessageList` is transient (created each frame) and wraps
//! `&'a mut MessageListState` (persistent) plus the message slice (props).
//! Messages are never edited, so a cached height stays valid until the
//! width changes or the conversation is cleared.
//!
//! The conversation grows without bound, so offsets are `usize`. Each frame
//! the bubbles around the viewport are drawn into a `ScrollView` sized to
//! just that window, and a separate `Scrollbar` reports the real position.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect, Size};
use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::conversation::Message as ChatMessage;
use crate::core::render::render_message;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Rows scrolled past, counted over the whole transcript.
    pub offset: usize,
    /// Scroll state of the rendered window only; rebuilt each frame.
    window_scroll: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Whether content exists below the viewport, as of the last render
    pub has_unseen_content: bool,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            offset: 0,
            window_scroll: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            viewport_height: 0,
            has_unseen_content: false,
        }
    }

    fn max_offset(&self) -> usize {
        self.layout
            .total_height()
            .saturating_sub(usize::from(self.viewport_height))
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }

    /// Re-engage auto-scroll once the user scrolls back to the end.
    pub fn repin_if_at_bottom(&mut self) {
        let max_offset = self.max_offset();
        if self.offset >= max_offset {
            self.stick_to_bottom = true;
            self.offset = max_offset;
        }
    }

    fn scroll_up(&mut self, rows: usize) {
        self.offset = self.offset.saturating_sub(rows);
        self.stick_to_bottom = false;
    }

    fn scroll_down(&mut self, rows: usize) {
        self.offset = self.offset.saturating_add(rows);
        self.repin_if_at_bottom();
    }
}

/// Scrollable conversation view component.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [ChatMessage],
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState, messages: &'a [ChatMessage]) -> Self {
        Self { state, messages }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar
        let count = self.messages.len();

        // 1. Measure new messages only
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(count, content_width);
        if count > layout.message_count {
            // A message was appended: follow it
            self.state.stick_to_bottom = true;
        }
        layout.heights.truncate(reusable);
        for message in self.messages.iter().skip(layout.heights.len()) {
            let view = render_message(message);
            layout.heights.push(Message::calculate_height(&view, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(count, content_width);

        let total_height = self.state.layout.total_height();

        // 2. Resolve the absolute offset
        self.state.viewport_height = area.height;
        if self.state.stick_to_bottom {
            self.state.offset = self.state.max_offset();
        } else {
            self.state.clamp_scroll();
        }
        let offset = self.state.offset;

        // 3. Render only the window of bubbles around the viewport. The
        // transcript can outgrow u16 rows; a window never does.
        let layout = &self.state.layout;
        let visible_range = layout.visible_range(offset, area.height);
        let window_top = layout.top_of(visible_range.start);
        let window_height = visible_range
            .clone()
            .map(|i| layout.heights[i])
            .fold(0u16, u16::saturating_add);

        let mut scroll_view = ScrollView::new(Size::new(content_width, window_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Never)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y: u16 = 0;
        for i in visible_range {
            let height = layout.heights[i];
            let Some(bottom) = y.checked_add(height) else {
                break;
            };
            let view = render_message(&self.messages[i]);
            scroll_view.render_widget(Message::new(&view), Rect::new(0, y, content_width, height));
            y = bottom;
        }

        let local_offset = u16::try_from(offset.saturating_sub(window_top)).unwrap_or(u16::MAX);
        self.state.window_scroll.set_offset(Position {
            x: 0,
            y: local_offset,
        });
        let [view_area, _] =
            Layout::horizontal([Constraint::Length(content_width), Constraint::Min(0)]).areas(area);
        frame.render_stateful_widget(scroll_view, view_area, &mut self.state.window_scroll);

        let mut scrollbar_state = ScrollbarState::new(self.state.max_offset())
            .position(offset)
            .viewport_content_length(usize::from(area.height));
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area,
            &mut scrollbar_state,
        );

        self.state.has_unseen_content =
            offset < total_height.saturating_sub(usize::from(area.height));
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let page = usize::from(self.viewport_height.max(1));
        match event {
            TuiEvent::ScrollUp | TuiEvent::CursorUp => self.scroll_up(1),
            TuiEvent::ScrollDown | TuiEvent::CursorDown => self.scroll_down(1),
            TuiEvent::ScrollPageUp => self.scroll_up(page),
            TuiEvent::ScrollPageDown => self.scroll_down(page),
            _ => {}
        }
        None
    }
}

/// Cached bubble heights and their running sums.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    /// Bottom row of each bubble, counted from the top of the transcript.
    pub prefix_heights: Vec<usize>,
    message_count: usize,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            message_count: 0,
            content_width: 0,
        }
    }

    /// How many cached heights are still valid for `message_count` messages
    /// at `content_width`.
    pub fn reusable_count(&self, message_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width || message_count < self.message_count {
            // Resized, or the conversation was cleared
            return 0;
        }
        self.heights.len().min(message_count)
    }

    pub fn update_metadata(&mut self, message_count: usize, content_width: u16) {
        self.message_count = message_count;
        self.content_width = content_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0usize, |acc, &h| {
                *acc += usize::from(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> usize {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Top row of the bubble at `index`.
    pub fn top_of(&self, index: usize) -> usize {
        match index {
            0 => 0,
            i => self.prefix_heights.get(i - 1).copied().unwrap_or(0),
        }
    }

    /// Indices worth drawing: the viewport plus half a screen either side.
    pub fn visible_range(
        &self,
        scroll_offset: usize,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let viewport_height = usize::from(viewport_height);
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset + viewport_height + buffer;

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end.max(start)
    }
}
