use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::overlay::{ConfirmDialog, HelpDialog, LoadingOverlay, NoticeDialog};
use crate::tui::components::sidebar::SIDEBAR_WIDTH;
use crate::tui::components::{MessageList, Sidebar, TitleBar, Welcome};
use crate::tui::{Focus, TuiState};

/// Below this width an expanded sidebar is not docked beside the
/// transcript. It takes over the whole body while it has focus instead.
pub const MIN_WIDTH_FOR_SIDEBAR: u16 = 80;

/// Screen regions from the last draw, kept for mouse hit testing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    pub title: Rect,
    pub transcript: Rect,
    pub input: Rect,
    pub sidebar: Option<Rect>,
    /// The sidebar covers the transcript and input box (narrow terminals).
    pub sidebar_fills_body: bool,
}

impl ScreenLayout {
    /// Split `area` into title bar, transcript, input box and (optionally)
    /// the sidebar on the right. The input box never takes more than half
    /// of the rows left under the title bar.
    ///
    /// In a narrow terminal a focused, expanded sidebar fills the body.
    pub fn compute(
        area: Rect,
        show_sidebar: bool,
        sidebar_focused: bool,
        input_height: impl Fn(u16) -> u16,
    ) -> Self {
        use Constraint::{Length, Min};
        let [title, body] = Layout::vertical([Length(1), Min(0)]).areas(area);

        let docked = show_sidebar && area.width >= MIN_WIDTH_FOR_SIDEBAR;
        let sidebar_fills_body = show_sidebar && sidebar_focused && !docked;
        let (main, sidebar) = if docked {
            let [main, sidebar] = Layout::horizontal([Min(0), Length(SIDEBAR_WIDTH)]).areas(body);
            (main, Some(sidebar))
        } else if sidebar_fills_body {
            (body, Some(body))
        } else {
            (body, None)
        };

        let input_rows = input_height(main.width).min((body.height / 2).max(3));
        let [transcript, input] = Layout::vertical([Min(0), Length(input_rows)]).areas(main);

        Self {
            title,
            transcript,
            input,
            sidebar,
            sidebar_fills_body,
        }
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let layout = ScreenLayout::compute(
        frame.area(),
        !app.sidebar_collapsed,
        tui.focus == Focus::Sidebar,
        |width| tui.input_box.calculate_height(width),
    );
    tui.layout = layout;

    // Transcript first so the title bar sees this frame's unseen-content flag
    if !layout.sidebar_fills_body {
        if app.show_welcome && app.conversation.is_empty() {
            Welcome.render(frame, layout.transcript);
        } else {
            MessageList::new(&mut tui.message_list, app.conversation.messages())
                .render(frame, layout.transcript);
        }
    }

    TitleBar::new(
        tui.endpoint.clone(),
        app.session_id.clone(),
        app.status_message.clone(),
        tui.message_list.has_unseen_content,
    )
    .render(frame, layout.title);

    let modal_open = tui.path_prompt.is_some()
        || app.notice.is_some()
        || app.pending_confirm.is_some()
        || app.help_visible;
    tui.input_box.focused = tui.focus == Focus::Input && !modal_open;
    if !layout.sidebar_fills_body {
        tui.input_box.render(frame, layout.input);
    }

    if let Some(sidebar_area) = layout.sidebar {
        let zone_highlighted = tui.zone_hovered || tui.path_prompt.is_some();
        Sidebar {
            state: &mut tui.sidebar,
            app,
            focused: tui.focus == Focus::Sidebar && !modal_open,
            zone_highlighted,
        }
        .render(frame, sidebar_area);
    }

    // Overlays, lowest first
    if app.is_loading() {
        LoadingOverlay { spinner_frame }.render(frame, layout.transcript);
    }
    let area = frame.area();
    if let Some(prompt) = &tui.path_prompt {
        prompt.render(frame, area);
    }
    if let Some(notice) = &app.notice {
        NoticeDialog { notice }.render(frame, area);
    }
    if let Some(confirm) = &app.pending_confirm {
        ConfirmDialog { confirm }.render(frame, area);
    }
    if app.help_visible {
        HelpDialog.render(frame, area);
    }
}
