//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates terminal events into core `Action` values and carries out the
//! `Effect`s that `update()` returns.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Routing
//!
//! Events go to the topmost thing that can take them, in this order:
//! help screen, confirm prompt, notice, path prompt, global shortcuts,
//! scrolling and mouse, then whichever of input box or sidebar has focus.
//! `route_event` does the routing and never touches the network, so it is
//! tested directly.
//!
//! ## Redraw Strategy
//!
//! While a request holds the loading indicator the loop draws every ~80ms
//! to animate the spinner. Otherwise it sleeps up to 250ms and only redraws
//! after input or a background response.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::collections::VecDeque;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::layout::Position;
use tokio::task::JoinHandle;

use crate::api::dispatch::spawn_request;
use crate::api::{HttpBackend, RagBackend};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::export::save_export;
use crate::core::session::{self, SessionStore};
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::file_zone::files_from_text;
use crate::tui::components::{
    InputBox, InputEvent, MessageListState, PathPrompt, PromptEvent, SidebarEvent, SidebarState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::ui::ScreenLayout;

/// Which part of the screen receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Sidebar,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub sidebar: SidebarState,
    pub focus: Focus,
    /// Open path prompt for a drop zone (None = hidden)
    pub path_prompt: Option<PathPrompt>,
    /// Mouse is over the visible drop zone
    pub zone_hovered: bool,
    /// Regions from the last draw
    pub layout: ScreenLayout,
    pub endpoint: String,
}

impl TuiState {
    pub fn new(endpoint: String) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            sidebar: SidebarState::new(),
            focus: Focus::Input, // User expects to type immediately
            path_prompt: None,
            zone_hovered: false,
            layout: ScreenLayout::default(),
            endpoint,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter through; terminals without
        // it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Carries out effects: network tasks, session persistence, export files.
struct Runtime {
    backend: Arc<dyn RagBackend>,
    tx: mpsc::Sender<Action>,
    store: Box<dyn SessionStore>,
    export_dir: PathBuf,
    tasks: Vec<JoinHandle<()>>,
}

impl Runtime {
    /// Apply `action` and every effect that follows from it.
    /// Returns true when the app should quit.
    fn dispatch(&mut self, app: &mut App, tui: &mut TuiState, action: Action) -> bool {
        let mut pending = VecDeque::from(update(app, action).into_vec());
        let mut quit = false;
        while let Some(effect) = pending.pop_front() {
            match effect {
                Effect::None => {}
                Effect::Batch(effects) => pending.extend(effects),
                Effect::Quit => quit = true,
                Effect::ClearInput => tui.input_box.clear(),
                Effect::Dispatch(ticket) => {
                    self.tasks.retain(|task| !task.is_finished());
                    self.tasks
                        .push(spawn_request(self.backend.clone(), ticket, self.tx.clone()));
                }
                Effect::PersistSession(id) => {
                    session::persist_session_id(self.store.as_mut(), &id);
                    // Fresh conversation: drop cached heights and scroll
                    tui.message_list = MessageListState::new();
                }
                Effect::SaveExport {
                    file_name,
                    contents,
                } => {
                    let result = save_export(&self.export_dir, &file_name, &contents)
                        .map_err(|e| e.to_string());
                    pending.extend(update(app, Action::ExportSaved(result)).into_vec());
                }
            }
        }
        quit
    }

    fn shutdown(&mut self) {
        let running = self.tasks.iter().filter(|t| !t.is_finished()).count();
        if running > 0 {
            info!("Aborting {} outstanding requests", running);
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

/// Map one terminal event to at most one core action, updating
/// presentation state along the way.
fn route_event(app: &App, tui: &mut TuiState, event: TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::Resize => return None,
        TuiEvent::ForceQuit => return Some(Action::Quit),
        _ => {}
    }

    if app.help_visible {
        return match event {
            TuiEvent::MouseMove(..) => None,
            _ => Some(Action::CloseHelp),
        };
    }

    if app.pending_confirm.is_some() {
        return match event {
            TuiEvent::InputChar('y' | 'Y') | TuiEvent::Submit => Some(Action::Confirm),
            TuiEvent::InputChar('n' | 'N') | TuiEvent::Escape => Some(Action::Cancel),
            _ => None,
        };
    }

    if app.notice.is_some() {
        return match event {
            TuiEvent::Submit | TuiEvent::Escape | TuiEvent::InputChar(' ') => {
                Some(Action::DismissNotice)
            }
            _ => None,
        };
    }

    if let Some(prompt) = tui.path_prompt.as_mut() {
        return match prompt.handle_event(&event) {
            Some(PromptEvent::Picked(target, files)) => {
                tui.path_prompt = None;
                Some(Action::FilesSelected { target, files })
            }
            Some(PromptEvent::Dismissed) => {
                tui.path_prompt = None;
                None
            }
            None => None,
        };
    }

    match event {
        TuiEvent::NewChat => Some(Action::NewChat),
        TuiEvent::ExportChat => Some(Action::ExportChat),
        TuiEvent::ToggleSidebar => {
            if !app.sidebar_collapsed {
                tui.focus = Focus::Input;
            }
            Some(Action::ToggleSidebar)
        }
        TuiEvent::Help => Some(Action::ShowHelp),
        TuiEvent::Suggestion(index) => (app.show_welcome && app.conversation.is_empty())
            .then_some(Action::SendSuggestion(index)),
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(&event);
            None
        }
        TuiEvent::MouseMove(column, row) => {
            tui.zone_hovered =
                tui.layout.sidebar.is_some() && tui.sidebar.zone_contains(column, row);
            None
        }
        TuiEvent::MouseClick(column, row) => click(app, tui, column, row),
        TuiEvent::FocusNext | TuiEvent::FocusPrev => {
            tui.focus = match tui.focus {
                Focus::Input if !app.sidebar_collapsed => Focus::Sidebar,
                _ => Focus::Input,
            };
            None
        }
        _ => match tui.focus {
            Focus::Input => input_event(tui, event),
            Focus::Sidebar => sidebar_event(app, tui, event),
        },
    }
}

fn input_event(tui: &mut TuiState, event: TuiEvent) -> Option<Action> {
    if matches!(event, TuiEvent::CursorUp | TuiEvent::CursorDown) {
        tui.message_list.handle_event(&event);
        return None;
    }
    match tui.input_box.handle_event(&event)? {
        InputEvent::Submit(text) => Some(Action::Send(text)),
        InputEvent::Changed { empty } => Some(Action::InputEdited { empty }),
    }
}

fn sidebar_event(app: &App, tui: &mut TuiState, event: TuiEvent) -> Option<Action> {
    if let TuiEvent::Escape = event {
        tui.focus = Focus::Input;
        return None;
    }
    // Dropping files on a terminal pastes their paths
    if let (TuiEvent::Paste(text), Some(target)) = (&event, app.sidebar_tab.intake_target()) {
        let files = files_from_text(text);
        if files.is_empty() {
            return None;
        }
        return Some(Action::FilesSelected { target, files });
    }
    match tui.sidebar.handle_key(&event, app)? {
        SidebarEvent::Dispatch(action) => Some(action),
        SidebarEvent::OpenPrompt(target) => {
            tui.path_prompt = Some(PathPrompt::new(target));
            None
        }
    }
}

fn click(app: &App, tui: &mut TuiState, column: u16, row: u16) -> Option<Action> {
    let position = Position::new(column, row);
    if let Some(sidebar) = tui.layout.sidebar
        && sidebar.contains(position)
    {
        tui.focus = Focus::Sidebar;
        if let Some(tab) = tui.sidebar.tab_at(column, row) {
            return Some(Action::ShowTab(tab));
        }
        if tui.sidebar.zone_contains(column, row)
            && let Some(target) = app.sidebar_tab.intake_target()
        {
            tui.path_prompt = Some(PathPrompt::new(target));
        }
        return None;
    }
    if tui.layout.input.contains(position) {
        tui.focus = Focus::Input;
    }
    None
}

pub fn run(config: ResolvedConfig, mut store: Box<dyn SessionStore>) -> std::io::Result<()> {
    let session_id = session::bootstrap(store.as_mut());
    let mut app = App::from_config(session_id, &config);
    let backend: Arc<dyn RagBackend> = Arc::new(HttpBackend::new(config.base_url.clone()));
    let mut tui = TuiState::new(backend.endpoint().to_string());

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut runtime = Runtime {
        backend,
        tx,
        store,
        export_dir: config.export_dir.clone(),
        tasks: Vec::new(),
    };

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()
        .inspect_err(|e| warn!("Could not enable terminal modes: {}", e))
        .ok();

    let mut should_quit = runtime.dispatch(&mut app, &mut tui, Action::Started);

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    while !should_quit {
        if tui.focus == Focus::Sidebar && app.sidebar_collapsed {
            tui.focus = Focus::Input;
        }

        let animating = app.is_loading();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(250)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Drain every pending event before the next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = route_event(&app, &mut tui, event)
                && runtime.dispatch(&mut app, &mut tui, action)
            {
                should_quit = true;
                break;
            }
        }

        // Responses from background requests
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if runtime.dispatch(&mut app, &mut tui, action) {
                should_quit = true;
            }
        }
    }

    runtime.shutdown();
    ratatui::restore();
    info!("Session {} closed", app.session_id);
    Ok(())
}
