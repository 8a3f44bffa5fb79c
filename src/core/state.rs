//! # Application State
//!
//! The chat client controller. This module contains domain state only:
//! no terminal types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── session_id: String             // active conversation token
//! ├── conversation: Conversation     // append-only transcript
//! ├── kb_files: FileBuffer           // pending knowledge-base uploads
//! ├── temp_files: FileBuffer         // attachments for the next query
//! ├── sources: SourceToggles         // docs / db checkboxes
//! ├── remote_config: Option<..>      // server config snapshot
//! ├── indexed_files: Vec<..>         // last knowledge-base listing
//! ├── phase: SendPhase               // send flow state machine
//! ├── loading: BTreeSet<RequestId>   // requests holding the loading indicator
//! ├── notice / pending_confirm       // alert and confirm dialogs
//! └── sidebar_tab, help_visible, …   // UI flags the core decides on
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::collections::BTreeSet;

use log::{debug, warn};

use crate::api::types::{IndexedFile, RemoteConfig};
use crate::core::action::{Request, RequestId, Ticket};
use crate::core::config::ResolvedConfig;
use crate::core::config::DEFAULT_CONTEXT_WINDOW;
use crate::core::conversation::Conversation;
use crate::core::files::{FileBuffer, IntakeTarget};

/// Welcome-screen suggestions: (chip label, query sent).
pub const SUGGESTIONS: [(&str, &str); 4] = [
    ("Search document contents", "Help me search the relevant documents"),
    ("Analyze an uploaded file", "Analyze the contents of this file"),
    ("Query database information", "Look up the related information in the database"),
    ("Answer a technical question", "Explain this technical concept"),
];

/// LLM providers the server knows how to run.
pub const KNOWN_PROVIDERS: [&str; 4] = ["openai", "claude", "anthropic", "ollama"];

/// Transcript entry appended when a send fails for any reason.
pub const SEND_FAILED_TEXT: &str =
    "An error occurred processing your request, please try again later.";

/// Send flow state machine.
///
/// `Rendering` and `ErrorRendering` only exist while a response is being
/// applied; every exit ends in `Idle` (or `Sending` if other sends are in flight).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendPhase {
    Idle,
    Composing,
    Sending,
    Rendering,
    ErrorRendering,
}

/// A retrieval channel the user can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Docs,
    Db,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Docs => "docs",
            SourceKind::Db => "db",
        }
    }
}

/// The source checkboxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceToggles {
    pub docs: bool,
    pub db: bool,
}

impl SourceToggles {
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut toggles = Self::default();
        for name in names {
            match name.as_ref() {
                "docs" => toggles.docs = true,
                "db" => toggles.db = true,
                other => warn!("Ignoring unknown source '{}'", other),
            }
        }
        toggles
    }

    pub fn toggle(&mut self, kind: SourceKind) {
        match kind {
            SourceKind::Docs => self.docs = !self.docs,
            SourceKind::Db => self.db = !self.db,
        }
    }

    pub fn is_enabled(&self, kind: SourceKind) -> bool {
        match kind {
            SourceKind::Docs => self.docs,
            SourceKind::Db => self.db,
        }
    }

    /// Checked sources, docs before db.
    pub fn selected(&self) -> Vec<String> {
        [SourceKind::Docs, SourceKind::Db]
            .into_iter()
            .filter(|kind| self.is_enabled(*kind))
            .map(|kind| kind.as_str().to_string())
            .collect()
    }
}

/// Sidebar tabs. Switching always names the tab explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarTab {
    Sources,
    Attachments,
    KnowledgeBase,
    Settings,
}

impl SidebarTab {
    pub const ALL: [SidebarTab; 4] = [
        SidebarTab::Sources,
        SidebarTab::Attachments,
        SidebarTab::KnowledgeBase,
        SidebarTab::Settings,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SidebarTab::Sources => "Sources",
            SidebarTab::Attachments => "Files",
            SidebarTab::KnowledgeBase => "KB",
            SidebarTab::Settings => "Settings",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// The file intake zone shown on this tab, if any.
    pub fn intake_target(&self) -> Option<IntakeTarget> {
        match self {
            SidebarTab::Attachments => Some(IntakeTarget::Temporary),
            SidebarTab::KnowledgeBase => Some(IntakeTarget::KnowledgeBase),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A blocking message the user must dismiss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// A destructive action waiting for the user's yes/no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirm {
    NewChat,
    ClearKnowledgeBase,
    DeleteFile { id: String, name: String },
}

impl Confirm {
    pub fn prompt(&self) -> String {
        match self {
            Confirm::NewChat => {
                "Start a new conversation? The current conversation will be cleared.".to_string()
            }
            Confirm::ClearKnowledgeBase => {
                "Clear the entire knowledge base? This cannot be undone.".to_string()
            }
            Confirm::DeleteFile { name, .. } => {
                format!("Remove '{name}' from the knowledge base?")
            }
        }
    }
}

pub struct App {
    pub session_id: String,
    pub conversation: Conversation,
    pub kb_files: FileBuffer,
    pub temp_files: FileBuffer,
    pub sources: SourceToggles,
    pub remote_config: Option<RemoteConfig>,
    pub indexed_files: Vec<IndexedFile>,
    pub phase: SendPhase,
    /// Requests currently holding the loading indicator.
    pub loading: BTreeSet<RequestId>,
    /// Chat requests dispatched but not yet answered.
    pub chats_in_flight: usize,
    pub show_welcome: bool,
    pub sidebar_tab: SidebarTab,
    pub sidebar_collapsed: bool,
    pub help_visible: bool,
    pub notice: Option<Notice>,
    pub pending_confirm: Option<Confirm>,
    pub status_message: String,
    /// How many prior messages accompany a JSON chat request.
    pub context_window: usize,
    next_request_id: u64,
}

impl App {
    pub fn new(session_id: String) -> Self {
        Self {
            session_id,
            conversation: Conversation::new(),
            kb_files: FileBuffer::new(),
            temp_files: FileBuffer::new(),
            sources: SourceToggles::from_names(&["docs"]),
            remote_config: None,
            indexed_files: Vec::new(),
            phase: SendPhase::Idle,
            loading: BTreeSet::new(),
            chats_in_flight: 0,
            show_welcome: true,
            sidebar_tab: SidebarTab::Sources,
            sidebar_collapsed: false,
            help_visible: false,
            notice: None,
            pending_confirm: None,
            status_message: String::from("Ready"),
            context_window: DEFAULT_CONTEXT_WINDOW,
            next_request_id: 0,
        }
    }

    pub fn from_config(session_id: String, config: &ResolvedConfig) -> Self {
        Self {
            sources: config.default_sources,
            context_window: config.context_window,
            ..Self::new(session_id)
        }
    }

    pub fn is_loading(&self) -> bool {
        !self.loading.is_empty()
    }

    pub fn buffer_mut(&mut self, target: IntakeTarget) -> &mut FileBuffer {
        match target {
            IntakeTarget::KnowledgeBase => &mut self.kb_files,
            IntakeTarget::Temporary => &mut self.temp_files,
        }
    }

    pub fn buffer(&self, target: IntakeTarget) -> &FileBuffer {
        match target {
            IntakeTarget::KnowledgeBase => &self.kb_files,
            IntakeTarget::Temporary => &self.temp_files,
        }
    }

    /// Allocate a ticket for `request`, taking the loading indicator if the
    /// request shows it.
    pub fn issue(&mut self, request: Request) -> Ticket {
        self.next_request_id += 1;
        let id = RequestId(self.next_request_id);
        if request.shows_loading() {
            self.loading.insert(id);
        }
        if request.is_chat() {
            self.chats_in_flight += 1;
        }
        debug!("Issued {:?} for {}", id, request.describe());
        Ticket { id, request }
    }

    pub fn transition(&mut self, to: SendPhase) {
        if self.phase != to {
            debug!("Send phase: {:?} -> {:?}", self.phase, to);
            self.phase = to;
        }
    }

    /// Leave a rendering phase: back to `Sending` while other chats are
    /// outstanding, otherwise `Idle`.
    pub fn settle(&mut self) {
        if self.chats_in_flight > 0 {
            self.transition(SendPhase::Sending);
        } else {
            self.transition(SendPhase::Idle);
        }
    }
}
