//! # Actions
//!
//! Everything that can happen in the client becomes an `Action`.
//! User presses Enter? That's `Action::Send(text)`.
//! Server answers? That's `Action::Response { id, response }`.
//!
//! `update()` takes the current state and an action, mutates the state and
//! returns an `Effect` describing the I/O the adapter should perform.
//! No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Network work is described by a `Ticket` (request id + `Request`). The
//! adapter executes it and feeds the matching `Response` back in, so the
//! whole send flow is testable without a terminal or a server.

use std::path::PathBuf;

use chrono::Utc;
use log::{debug, info, warn};

use crate::api::backend::ApiError;
use crate::api::types::{
    ChatRequest, ChatResponse, FileListing, OperationResult, RemoteConfig, UploadRequest,
};
use crate::core::conversation::Message;
use crate::core::export::export_file_name;
use crate::core::files::{IntakeTarget, PendingFile};
use crate::core::session::generate_session_id;
use crate::core::state::{
    App, Confirm, KNOWN_PROVIDERS, Notice, SEND_FAILED_TEXT, SUGGESTIONS, SendPhase, SidebarTab,
    SourceKind,
};

/// Identifies one dispatched request so its response can release the
/// loading indicator it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

/// A server call the core wants made.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// JSON chat with recent history.
    Chat(ChatRequest),
    /// Multipart chat with temporary files attached.
    ChatUpload(UploadRequest),
    Export(Vec<Message>),
    ListFiles,
    AddFiles(Vec<PendingFile>),
    ClearKnowledgeBase,
    DeleteFile { id: String },
    LoadConfig,
}

impl Request {
    /// Whether the loading overlay stays up until this request resolves.
    pub fn shows_loading(&self) -> bool {
        matches!(
            self,
            Request::Chat(_)
                | Request::ChatUpload(_)
                | Request::AddFiles(_)
                | Request::ClearKnowledgeBase
                | Request::DeleteFile { .. }
        )
    }

    pub fn is_chat(&self) -> bool {
        matches!(self, Request::Chat(_) | Request::ChatUpload(_))
    }

    /// Short label for logs.
    pub fn describe(&self) -> &'static str {
        match self {
            Request::Chat(_) => "POST /api/chat",
            Request::ChatUpload(_) => "POST /api/chat/upload",
            Request::Export(_) => "POST /api/export-chat",
            Request::ListFiles => "GET /api/knowledge-base/files",
            Request::AddFiles(_) => "POST /api/knowledge-base/add",
            Request::ClearKnowledgeBase => "DELETE /api/knowledge-base/clear",
            Request::DeleteFile { .. } => "DELETE /api/knowledge-base/files/{id}",
            Request::LoadConfig => "GET /api/config",
        }
    }

    /// The response this request produces when it fails with `error`.
    pub fn failure(&self, error: ApiError) -> Response {
        match self {
            Request::Chat(_) | Request::ChatUpload(_) => Response::Chat(Err(error)),
            Request::Export(_) => Response::Export(Err(error)),
            Request::ListFiles => Response::Files(Err(error)),
            Request::AddFiles(_) => Response::Added(Err(error)),
            Request::ClearKnowledgeBase => Response::Cleared(Err(error)),
            Request::DeleteFile { .. } => Response::Deleted(Err(error)),
            Request::LoadConfig => Response::Config(Err(error)),
        }
    }
}

/// A request paired with the id its response will carry.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub id: RequestId,
    pub request: Request,
}

/// Outcome of a `Request`, one variant per request family.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Chat(Result<ChatResponse, ApiError>),
    Export(Result<serde_json::Value, ApiError>),
    Files(Result<FileListing, ApiError>),
    Added(Result<OperationResult, ApiError>),
    Cleared(Result<OperationResult, ApiError>),
    Deleted(Result<OperationResult, ApiError>),
    Config(Result<RemoteConfig, ApiError>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// App launched: fetch server config and the knowledge-base listing.
    Started,
    /// Send the input box contents.
    Send(String),
    /// Send one of the welcome-screen suggestions by index.
    SendSuggestion(usize),
    /// The input box changed; `empty` is true when it holds only whitespace.
    InputEdited { empty: bool },
    ToggleSource(SourceKind),
    /// Paths were dropped or picked for an intake zone.
    FilesSelected {
        target: IntakeTarget,
        files: Vec<PendingFile>,
    },
    RemoveTempFile(usize),
    RefreshKnowledgeBase,
    AddToKnowledgeBase,
    ClearKnowledgeBase,
    /// Delete the indexed file at this position of the listing.
    DeleteIndexedFile(usize),
    NewChat,
    ExportChat,
    /// The adapter finished writing an export file.
    ExportSaved(Result<PathBuf, String>),
    Confirm,
    Cancel,
    DismissNotice,
    ShowTab(SidebarTab),
    ToggleSidebar,
    ShowHelp,
    CloseHelp,
    AdjustSearchK(i32),
    CycleProvider,
    Response { id: RequestId, response: Response },
    Quit,
}

/// Side effects for the adapter to carry out after `update`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// Empty the input box.
    ClearInput,
    Dispatch(Ticket),
    /// Store a freshly minted session id.
    PersistSession(String),
    /// Write an export file into the export directory.
    SaveExport { file_name: String, contents: String },
    Batch(Vec<Effect>),
}

impl Effect {
    /// Flatten nested batches into a list, dropping `None`.
    pub fn into_vec(self) -> Vec<Effect> {
        match self {
            Effect::None => Vec::new(),
            Effect::Batch(effects) => effects.into_iter().flat_map(Effect::into_vec).collect(),
            other => vec![other],
        }
    }
}

pub fn update(state: &mut App, action: Action) -> Effect {
    match action {
        Action::Started => {
            info!("Starting session {}", state.session_id);
            let config = state.issue(Request::LoadConfig);
            let files = state.issue(Request::ListFiles);
            Effect::Batch(vec![Effect::Dispatch(config), Effect::Dispatch(files)])
        }
        Action::Send(text) => send(state, &text),
        Action::SendSuggestion(index) => match SUGGESTIONS.get(index) {
            Some((_, prompt)) => send(state, prompt),
            None => Effect::None,
        },
        Action::InputEdited { empty } => {
            match (state.phase, empty) {
                (SendPhase::Idle, false) => state.transition(SendPhase::Composing),
                (SendPhase::Composing, true) => state.transition(SendPhase::Idle),
                _ => {}
            }
            Effect::None
        }
        Action::ToggleSource(kind) => {
            state.sources.toggle(kind);
            debug!("Sources now {:?}", state.sources.selected());
            Effect::None
        }
        Action::FilesSelected { target, files } => {
            info!("{} selection: {} files", target.label(), files.len());
            state.status_message = format!("{}: {} files selected", target.label(), files.len());
            state.buffer_mut(target).replace(files);
            Effect::None
        }
        Action::RemoveTempFile(index) => {
            if let Some(removed) = state.temp_files.remove(index) {
                debug!("Removed attachment {}", removed.name);
            }
            Effect::None
        }
        Action::RefreshKnowledgeBase => Effect::Dispatch(state.issue(Request::ListFiles)),
        Action::AddToKnowledgeBase => {
            if state.kb_files.is_empty() {
                state.notice = Some(Notice::warning("Please select files to add first"));
                return Effect::None;
            }
            let files = state.kb_files.files().to_vec();
            Effect::Dispatch(state.issue(Request::AddFiles(files)))
        }
        Action::ClearKnowledgeBase => {
            state.pending_confirm = Some(Confirm::ClearKnowledgeBase);
            Effect::None
        }
        Action::DeleteIndexedFile(index) => {
            if let Some(file) = state.indexed_files.get(index) {
                state.pending_confirm = Some(Confirm::DeleteFile {
                    id: file.id.clone(),
                    name: file.name.clone(),
                });
            }
            Effect::None
        }
        Action::NewChat => {
            if !state.conversation.is_empty() {
                state.pending_confirm = Some(Confirm::NewChat);
            }
            Effect::None
        }
        Action::ExportChat => {
            if state.conversation.is_empty() {
                state.notice = Some(Notice::warning("No conversation to export"));
                return Effect::None;
            }
            let messages = state.conversation.messages().to_vec();
            Effect::Dispatch(state.issue(Request::Export(messages)))
        }
        Action::ExportSaved(result) => {
            match result {
                Ok(path) => {
                    info!("Conversation exported to {}", path.display());
                    state.status_message = format!("Exported to {}", path.display());
                }
                Err(e) => {
                    warn!("Writing export failed: {}", e);
                    state.notice = Some(Notice::error("Export failed"));
                }
            }
            Effect::None
        }
        Action::Confirm => match state.pending_confirm.take() {
            Some(confirm) => confirmed(state, confirm),
            None => Effect::None,
        },
        Action::Cancel => {
            if let Some(confirm) = state.pending_confirm.take() {
                debug!("Cancelled {:?}", confirm);
            }
            Effect::None
        }
        Action::DismissNotice => {
            state.notice = None;
            Effect::None
        }
        Action::ShowTab(tab) => {
            state.sidebar_tab = tab;
            state.sidebar_collapsed = false;
            Effect::None
        }
        Action::ToggleSidebar => {
            state.sidebar_collapsed = !state.sidebar_collapsed;
            Effect::None
        }
        Action::ShowHelp => {
            state.help_visible = true;
            Effect::None
        }
        Action::CloseHelp => {
            state.help_visible = false;
            Effect::None
        }
        Action::AdjustSearchK(delta) => {
            if let Some(config) = state.remote_config.as_mut() {
                let k = (i64::from(config.search_k) + i64::from(delta)).max(1);
                config.search_k = u32::try_from(k).unwrap_or(u32::MAX);
            }
            Effect::None
        }
        Action::CycleProvider => {
            if let Some(config) = state.remote_config.as_mut() {
                let next = KNOWN_PROVIDERS
                    .iter()
                    .position(|p| *p == config.llm_provider)
                    .map(|i| (i + 1) % KNOWN_PROVIDERS.len())
                    .unwrap_or(0);
                config.llm_provider = KNOWN_PROVIDERS[next].to_string();
            }
            Effect::None
        }
        Action::Response { id, response } => receive(state, id, response),
        Action::Quit => Effect::Quit,
    }
}

/// Composing → Sending. Appends the user message before anything is dispatched.
fn send(state: &mut App, text: &str) -> Effect {
    let query = text.trim();
    if query.is_empty() {
        debug!("Ignoring empty send");
        return Effect::None;
    }

    // History goes out as it stood before this message.
    let context_messages = state.conversation.recent(state.context_window);
    state.conversation.push(Message::user(query));
    state.show_welcome = false;

    let sources = state.sources.selected();
    let request = if state.temp_files.is_empty() {
        Request::Chat(ChatRequest {
            query: query.to_string(),
            sources,
            session_id: state.session_id.clone(),
            context_messages,
        })
    } else {
        Request::ChatUpload(UploadRequest {
            query: query.to_string(),
            sources,
            session_id: state.session_id.clone(),
            files: state.temp_files.files().to_vec(),
        })
    };

    state.transition(SendPhase::Sending);
    state.status_message = String::from("Thinking...");
    let ticket = state.issue(request);
    info!("Send dispatched as {:?} ({})", ticket.id, ticket.request.describe());
    Effect::Batch(vec![Effect::ClearInput, Effect::Dispatch(ticket)])
}

fn confirmed(state: &mut App, confirm: Confirm) -> Effect {
    info!("Confirmed {:?}", confirm);
    match confirm {
        Confirm::NewChat => {
            state.conversation.clear();
            state.show_welcome = true;
            state.session_id = generate_session_id();
            state.status_message = String::from("New conversation");
            info!("New session {}", state.session_id);
            Effect::PersistSession(state.session_id.clone())
        }
        Confirm::ClearKnowledgeBase => Effect::Dispatch(state.issue(Request::ClearKnowledgeBase)),
        Confirm::DeleteFile { id, .. } => {
            Effect::Dispatch(state.issue(Request::DeleteFile { id }))
        }
    }
}

fn receive(state: &mut App, id: RequestId, response: Response) -> Effect {
    if state.loading.remove(&id) {
        debug!("{:?} released the loading indicator", id);
    }

    match response {
        Response::Chat(result) => {
            state.chats_in_flight = state.chats_in_flight.saturating_sub(1);
            match result {
                Ok(answer) => {
                    state.transition(SendPhase::Rendering);
                    info!(
                        "Answer for {:?}: {} chars, sources={:?}",
                        id,
                        answer.answer.len(),
                        answer.sources
                    );
                    state.conversation.push(Message::assistant(
                        answer.answer,
                        answer.sources.unwrap_or_default(),
                    ));
                    state.temp_files.clear();
                    state.status_message = String::from("Ready");
                }
                Err(e) => {
                    warn!("Send {:?} failed: {}", id, e);
                    state.transition(SendPhase::ErrorRendering);
                    state
                        .conversation
                        .push(Message::assistant(SEND_FAILED_TEXT, Vec::new()));
                    state.status_message = format!("Error: {e}");
                }
            }
            state.settle();
            Effect::None
        }
        Response::Export(Ok(value)) => match serde_json::to_string_pretty(&value) {
            Ok(contents) => Effect::SaveExport {
                file_name: export_file_name(Utc::now()),
                contents,
            },
            Err(e) => {
                warn!("Could not format export: {}", e);
                state.notice = Some(Notice::error("Export failed"));
                Effect::None
            }
        },
        Response::Export(Err(e)) => {
            warn!("Export request failed: {}", e);
            state.notice = Some(Notice::error("Export failed"));
            Effect::None
        }
        Response::Files(Ok(listing)) => {
            debug!("Knowledge base lists {} files", listing.files.len());
            state.indexed_files = listing.files;
            Effect::None
        }
        Response::Files(Err(e)) => {
            warn!("Listing knowledge base failed: {}", e);
            Effect::None
        }
        Response::Added(result) => match result {
            Ok(outcome) if outcome.success => {
                state.notice = Some(Notice::info(
                    outcome.message.unwrap_or_else(|| "Files added".to_string()),
                ));
                state.kb_files.clear();
                Effect::Dispatch(state.issue(Request::ListFiles))
            }
            Ok(outcome) => {
                let text = outcome
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Failed to add files".to_string());
                state.notice = Some(Notice::error(text));
                Effect::None
            }
            Err(e) => {
                warn!("Adding files failed: {}", e);
                state.notice = Some(Notice::error("Failed to add files"));
                Effect::None
            }
        },
        Response::Cleared(result) => mutation_outcome(
            state,
            result,
            "Knowledge base cleared",
            "Failed to clear knowledge base",
        ),
        Response::Deleted(result) => {
            mutation_outcome(state, result, "File deleted", "Failed to delete file")
        }
        Response::Config(Ok(config)) => {
            info!(
                "Server config: provider={}, search_k={}",
                config.llm_provider, config.search_k
            );
            state.remote_config = Some(config);
            Effect::None
        }
        Response::Config(Err(e)) => {
            warn!("Loading server config failed: {}", e);
            Effect::None
        }
    }
}

/// Clear and delete share their handling: notice either way, refresh on success.
fn mutation_outcome(
    state: &mut App,
    result: Result<OperationResult, ApiError>,
    success_text: &str,
    failure_text: &str,
) -> Effect {
    match result {
        Ok(outcome) if outcome.success => {
            state.notice = Some(Notice::info(
                outcome.message.unwrap_or_else(|| success_text.to_string()),
            ));
            Effect::Dispatch(state.issue(Request::ListFiles))
        }
        Ok(outcome) => {
            warn!("{}: {:?}", failure_text, outcome.message);
            state.notice = Some(Notice::error(failure_text));
            Effect::None
        }
        Err(e) => {
            warn!("{}: {}", failure_text, e);
            state.notice = Some(Notice::error(failure_text));
            Effect::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::IndexedFile;
    use crate::core::conversation::Role;
    use crate::core::state::{NoticeLevel, SourceToggles};
    use crate::test_support::{pending_file, test_app};

    fn tickets(effect: Effect) -> Vec<Ticket> {
        effect
            .into_vec()
            .into_iter()
            .filter_map(|e| match e {
                Effect::Dispatch(ticket) => Some(ticket),
                _ => None,
            })
            .collect()
    }

    fn single_ticket(effect: Effect) -> Ticket {
        let mut all = tickets(effect);
        assert_eq!(all.len(), 1, "expected exactly one dispatch");
        all.remove(0)
    }

    fn answer(text: &str, sources: Option<Vec<&str>>) -> Response {
        Response::Chat(Ok(ChatResponse {
            answer: text.to_string(),
            sources: sources.map(|s| s.into_iter().map(String::from).collect()),
        }))
    }

    fn indexed(id: &str, name: &str) -> IndexedFile {
        IndexedFile {
            id: id.to_string(),
            name: name.to_string(),
            date: "2024-01-01".to_string(),
            size: 1_048_576,
        }
    }

    // ------------------------------------------------------------------------
    // Send flow
    // ------------------------------------------------------------------------

    #[test]
    fn test_send_appends_user_message_before_dispatch() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Send("  What is RAG?  ".to_string()));

        assert_eq!(app.conversation.len(), 1);
        let first = &app.conversation.messages()[0];
        assert_eq!(first.role, Role::User);
        assert_eq!(first.content, "What is RAG?");
        assert!(!app.show_welcome);
        assert_eq!(app.phase, SendPhase::Sending);

        let effects = effect.into_vec();
        assert_eq!(effects[0], Effect::ClearInput);
        assert!(matches!(effects[1], Effect::Dispatch(_)));
    }

    #[test]
    fn test_blank_send_is_noop() {
        for input in ["", "   ", "\n\t "] {
            let mut app = test_app();
            let effect = update(&mut app, Action::Send(input.to_string()));
            assert_eq!(effect, Effect::None);
            assert!(app.conversation.is_empty());
            assert!(!app.is_loading());
            assert_eq!(app.phase, SendPhase::Idle);
            assert!(app.show_welcome);
        }
    }

    #[test]
    fn test_hello_scenario_builds_json_request() {
        let mut app = test_app();
        app.sources = SourceToggles::default();
        let ticket = single_ticket(update(&mut app, Action::Send("Hello".to_string())));

        assert_eq!(
            ticket.request,
            Request::Chat(ChatRequest {
                query: "Hello".to_string(),
                sources: vec![],
                session_id: app.session_id.clone(),
                context_messages: vec![],
            })
        );

        update(
            &mut app,
            Action::Response {
                id: ticket.id,
                response: answer("Hi there", Some(vec![])),
            },
        );
        let messages = app.conversation.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "Hello");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "Hi there");
        assert!(messages[1].sources.is_empty());
        assert_eq!(app.phase, SendPhase::Idle);
    }

    #[test]
    fn test_temp_files_select_upload_endpoint() {
        let mut app = test_app();
        update(
            &mut app,
            Action::FilesSelected {
                target: IntakeTarget::Temporary,
                files: vec![pending_file("report.pdf")],
            },
        );
        let ticket = single_ticket(update(&mut app, Action::Send("Summarize".to_string())));
        match ticket.request {
            Request::ChatUpload(upload) => {
                assert_eq!(upload.query, "Summarize");
                assert_eq!(upload.files.len(), 1);
                assert_eq!(upload.sources, vec!["docs"]);
            }
            other => panic!("expected upload, got {:?}", other),
        }

        app.temp_files.clear();
        let ticket = single_ticket(update(&mut app, Action::Send("Again".to_string())));
        assert!(matches!(ticket.request, Request::Chat(_)));
    }

    #[test]
    fn test_context_is_capped_and_ordered() {
        let mut app = test_app();
        for i in 0..14 {
            let ticket = single_ticket(update(&mut app, Action::Send(format!("q{i}"))));
            update(
                &mut app,
                Action::Response {
                    id: ticket.id,
                    response: answer(&format!("a{i}"), None),
                },
            );
        }
        let ticket = single_ticket(update(&mut app, Action::Send("last".to_string())));
        let Request::Chat(chat) = ticket.request else {
            panic!("expected JSON chat");
        };
        assert_eq!(chat.context_messages.len(), 10);
        let contents: Vec<&str> = chat
            .context_messages
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents.first(), Some(&"q9"));
        assert_eq!(contents.last(), Some(&"a13"));
        assert!(!contents.contains(&"last"));
    }

    #[test]
    fn test_loading_indicator_spans_request() {
        let mut app = test_app();
        assert!(!app.is_loading());
        let ticket = single_ticket(update(&mut app, Action::Send("Hi".to_string())));
        assert!(app.is_loading());

        update(
            &mut app,
            Action::Response {
                id: ticket.id,
                response: ticket.request.failure(ApiError::Aborted),
            },
        );
        assert!(!app.is_loading());
    }

    #[test]
    fn test_overlapping_sends_keep_indicator_until_last() {
        let mut app = test_app();
        let first = single_ticket(update(&mut app, Action::Send("one".to_string())));
        let second = single_ticket(update(&mut app, Action::Send("two".to_string())));

        update(
            &mut app,
            Action::Response {
                id: first.id,
                response: answer("first answer", None),
            },
        );
        assert!(app.is_loading());
        assert_eq!(app.phase, SendPhase::Sending);

        update(
            &mut app,
            Action::Response {
                id: second.id,
                response: answer("second answer", None),
            },
        );
        assert!(!app.is_loading());
        assert_eq!(app.phase, SendPhase::Idle);
    }

    #[test]
    fn test_success_clears_temp_files() {
        let mut app = test_app();
        app.temp_files.replace(vec![pending_file("a.txt"), pending_file("b.txt")]);
        let ticket = single_ticket(update(&mut app, Action::Send("Read these".to_string())));
        update(
            &mut app,
            Action::Response {
                id: ticket.id,
                response: answer("Done", Some(vec!["docs"])),
            },
        );
        assert!(app.temp_files.is_empty());
        assert_eq!(
            app.conversation.last().map(|m| m.sources.clone()),
            Some(vec!["docs".to_string()])
        );
    }

    #[test]
    fn test_failure_appends_fixed_message_and_keeps_files() {
        let mut app = test_app();
        app.temp_files.replace(vec![pending_file("a.txt")]);
        let ticket = single_ticket(update(&mut app, Action::Send("Read".to_string())));
        update(
            &mut app,
            Action::Response {
                id: ticket.id,
                response: Response::Chat(Err(ApiError::Api {
                    status: 500,
                    message: "boom".to_string(),
                })),
            },
        );
        let last = app.conversation.last().map(|m| m.content.as_str());
        assert_eq!(last, Some(SEND_FAILED_TEXT));
        assert_eq!(app.temp_files.len(), 1);
        assert_eq!(app.phase, SendPhase::Idle);
        assert!(!app.is_loading());
    }

    #[test]
    fn test_suggestion_sends_prompt() {
        let mut app = test_app();
        let ticket = single_ticket(update(&mut app, Action::SendSuggestion(0)));
        let Request::Chat(chat) = ticket.request else {
            panic!("expected JSON chat");
        };
        assert_eq!(chat.query, SUGGESTIONS[0].1);
        assert_eq!(update(&mut app, Action::SendSuggestion(9)), Effect::None);
    }

    #[test]
    fn test_input_edits_move_between_idle_and_composing() {
        let mut app = test_app();
        update(&mut app, Action::InputEdited { empty: false });
        assert_eq!(app.phase, SendPhase::Composing);
        update(&mut app, Action::InputEdited { empty: true });
        assert_eq!(app.phase, SendPhase::Idle);
    }

    // ------------------------------------------------------------------------
    // Knowledge base
    // ------------------------------------------------------------------------

    #[test]
    fn test_clear_requires_confirmation() {
        let mut app = test_app();
        let effect = update(&mut app, Action::ClearKnowledgeBase);
        assert_eq!(effect, Effect::None);
        assert_eq!(app.pending_confirm, Some(Confirm::ClearKnowledgeBase));

        assert_eq!(update(&mut app, Action::Cancel), Effect::None);
        assert!(app.pending_confirm.is_none());
        assert!(!app.is_loading());

        update(&mut app, Action::ClearKnowledgeBase);
        let ticket = single_ticket(update(&mut app, Action::Confirm));
        assert_eq!(ticket.request, Request::ClearKnowledgeBase);
        assert!(app.is_loading());
    }

    #[test]
    fn test_clear_success_refreshes_listing() {
        let mut app = test_app();
        update(&mut app, Action::ClearKnowledgeBase);
        let ticket = single_ticket(update(&mut app, Action::Confirm));
        let refresh = single_ticket(update(
            &mut app,
            Action::Response {
                id: ticket.id,
                response: Response::Cleared(Ok(OperationResult {
                    success: true,
                    message: Some("Knowledge base cleared".to_string()),
                })),
            },
        ));
        assert_eq!(refresh.request, Request::ListFiles);
        assert_eq!(app.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Info));
        assert!(!app.is_loading());
    }

    #[test]
    fn test_add_with_empty_buffer_warns() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::AddToKnowledgeBase), Effect::None);
        assert_eq!(app.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Warning));
    }

    #[test]
    fn test_add_success_clears_buffer_and_refreshes() {
        let mut app = test_app();
        app.kb_files.replace(vec![pending_file("manual.pdf")]);
        let ticket = single_ticket(update(&mut app, Action::AddToKnowledgeBase));
        assert!(matches!(ticket.request, Request::AddFiles(ref files) if files.len() == 1));

        let refresh = single_ticket(update(
            &mut app,
            Action::Response {
                id: ticket.id,
                response: Response::Added(Ok(OperationResult {
                    success: true,
                    message: Some("Added 1 file".to_string()),
                })),
            },
        ));
        assert_eq!(refresh.request, Request::ListFiles);
        assert!(app.kb_files.is_empty());
        assert_eq!(app.notice.map(|n| n.text), Some("Added 1 file".to_string()));
    }

    #[test]
    fn test_add_failure_uses_server_message_or_fallback() {
        let mut app = test_app();
        app.kb_files.replace(vec![pending_file("manual.pdf")]);
        let ticket = single_ticket(update(&mut app, Action::AddToKnowledgeBase));
        update(
            &mut app,
            Action::Response {
                id: ticket.id,
                response: Response::Added(Ok(OperationResult {
                    success: false,
                    message: None,
                })),
            },
        );
        assert_eq!(
            app.notice.as_ref().map(|n| n.text.as_str()),
            Some("Failed to add files")
        );
        assert_eq!(app.kb_files.len(), 1);
    }

    #[test]
    fn test_delete_file_confirms_with_id() {
        let mut app = test_app();
        app.indexed_files = vec![indexed("file_0", "a.pdf"), indexed("file_1", "b.pdf")];
        update(&mut app, Action::DeleteIndexedFile(1));
        assert_eq!(
            app.pending_confirm,
            Some(Confirm::DeleteFile {
                id: "file_1".to_string(),
                name: "b.pdf".to_string()
            })
        );
        let ticket = single_ticket(update(&mut app, Action::Confirm));
        assert_eq!(
            ticket.request,
            Request::DeleteFile {
                id: "file_1".to_string()
            }
        );
    }

    #[test]
    fn test_listing_replaces_indexed_files() {
        let mut app = test_app();
        let ticket = single_ticket(update(&mut app, Action::RefreshKnowledgeBase));
        assert!(!app.is_loading());
        update(
            &mut app,
            Action::Response {
                id: ticket.id,
                response: Response::Files(Ok(FileListing {
                    files: vec![indexed("file_0", "a.pdf")],
                })),
            },
        );
        assert_eq!(app.indexed_files.len(), 1);
    }

    // ------------------------------------------------------------------------
    // New chat / export
    // ------------------------------------------------------------------------

    #[test]
    fn test_new_chat_with_empty_conversation_is_noop() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::NewChat), Effect::None);
        assert!(app.pending_confirm.is_none());
    }

    #[test]
    fn test_new_chat_resets_and_persists_fresh_session() {
        let mut app = test_app();
        update(&mut app, Action::Send("Hi".to_string()));
        let old_session = app.session_id.clone();

        update(&mut app, Action::NewChat);
        assert_eq!(app.pending_confirm, Some(Confirm::NewChat));
        let effect = update(&mut app, Action::Confirm);

        assert!(app.conversation.is_empty());
        assert!(app.show_welcome);
        assert_ne!(app.session_id, old_session);
        assert_eq!(effect, Effect::PersistSession(app.session_id.clone()));
    }

    #[test]
    fn test_export_empty_conversation_warns() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::ExportChat), Effect::None);
        assert_eq!(
            app.notice.as_ref().map(|n| n.text.as_str()),
            Some("No conversation to export")
        );
    }

    #[test]
    fn test_export_produces_timestamped_file() {
        let mut app = test_app();
        app.conversation.push(Message::user("Hi"));
        let ticket = single_ticket(update(&mut app, Action::ExportChat));
        assert!(matches!(ticket.request, Request::Export(ref m) if m.len() == 1));

        let effect = update(
            &mut app,
            Action::Response {
                id: ticket.id,
                response: Response::Export(Ok(serde_json::json!({"messages": [{"role": "user"}]}))),
            },
        );
        let Effect::SaveExport { file_name, contents } = effect else {
            panic!("expected SaveExport");
        };
        assert!(file_name.starts_with("chat_"));
        assert!(file_name.ends_with(".json"));
        assert!(!file_name.contains(':'));
        assert!(contents.contains("\n  \"messages\""));
    }

    #[test]
    fn test_export_failure_shows_notice() {
        let mut app = test_app();
        app.conversation.push(Message::user("Hi"));
        let ticket = single_ticket(update(&mut app, Action::ExportChat));
        update(
            &mut app,
            Action::Response {
                id: ticket.id,
                response: ticket.request.failure(ApiError::Network("refused".to_string())),
            },
        );
        assert_eq!(app.notice.map(|n| n.text), Some("Export failed".to_string()));
    }

    // ------------------------------------------------------------------------
    // UI flags and settings
    // ------------------------------------------------------------------------

    #[test]
    fn test_show_tab_is_explicit() {
        let mut app = test_app();
        app.sidebar_collapsed = true;
        update(&mut app, Action::ShowTab(SidebarTab::Settings));
        assert_eq!(app.sidebar_tab, SidebarTab::Settings);
        assert!(!app.sidebar_collapsed);
    }

    #[test]
    fn test_remove_temp_file_by_index() {
        let mut app = test_app();
        app.temp_files
            .replace(vec![pending_file("a"), pending_file("b"), pending_file("c")]);
        update(&mut app, Action::RemoveTempFile(0));
        let names: Vec<&str> = app.temp_files.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_settings_edits_are_local() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::AdjustSearchK(1)), Effect::None);

        app.remote_config = Some(RemoteConfig {
            llm_provider: "ollama".to_string(),
            search_k: 1,
        });
        update(&mut app, Action::AdjustSearchK(-1));
        update(&mut app, Action::CycleProvider);
        let config = app.remote_config.clone().unwrap_or_default();
        assert_eq!(config.search_k, 1);
        assert_eq!(config.llm_provider, "openai");
    }

    #[test]
    fn test_started_loads_config_and_listing() {
        let mut app = test_app();
        let requests: Vec<Request> = tickets(update(&mut app, Action::Started))
            .into_iter()
            .map(|t| t.request)
            .collect();
        assert_eq!(requests, vec![Request::LoadConfig, Request::ListFiles]);
        assert!(!app.is_loading());
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
