//! Runs `Ticket`s against a `RagBackend` on tokio tasks and reports the
//! outcome to the event loop as `Action::Response`.
//!
//! Every spawned task owns a `CompletionGuard`. If the task finishes
//! normally the guard forwards the real response; if it is aborted or
//! panics, dropping the guard forwards a failure instead, so the loading
//! indicator the request holds is always released.

use std::sync::{Arc, mpsc};
use std::time::Instant;

use log::{debug, info, warn};
use tokio::task::JoinHandle;

use super::backend::{ApiError, RagBackend};
use crate::core::action::{Action, Request, RequestId, Response, Ticket};

/// Perform one request against `backend`.
pub async fn execute(backend: &dyn RagBackend, request: &Request) -> Response {
    match request {
        Request::Chat(chat) => Response::Chat(backend.chat(chat).await),
        Request::ChatUpload(upload) => Response::Chat(backend.chat_with_files(upload).await),
        Request::Export(messages) => Response::Export(backend.export_chat(messages).await),
        Request::ListFiles => Response::Files(backend.list_files().await),
        Request::AddFiles(files) => Response::Added(backend.add_files(files).await),
        Request::ClearKnowledgeBase => Response::Cleared(backend.clear_knowledge_base().await),
        Request::DeleteFile { id } => Response::Deleted(backend.delete_file(id).await),
        Request::LoadConfig => Response::Config(backend.config().await),
    }
}

/// Reports exactly one response for a request id.
struct CompletionGuard {
    id: RequestId,
    tx: mpsc::Sender<Action>,
    /// Sent on drop unless `complete` ran first.
    fallback: Option<Response>,
}

impl CompletionGuard {
    fn new(id: RequestId, request: &Request, tx: mpsc::Sender<Action>) -> Self {
        Self {
            id,
            tx,
            fallback: Some(request.failure(ApiError::Aborted)),
        }
    }

    fn complete(mut self, response: Response) {
        self.fallback = None;
        self.deliver(response);
    }

    fn deliver(&self, response: Response) {
        if self
            .tx
            .send(Action::Response {
                id: self.id,
                response,
            })
            .is_err()
        {
            warn!("Dropping response for {:?}: receiver gone", self.id);
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if let Some(fallback) = self.fallback.take() {
            warn!("{:?} ended without a response, reporting failure", self.id);
            self.deliver(fallback);
        }
    }
}

/// Spawn `ticket` on the tokio runtime. The response arrives on `tx`.
pub fn spawn_request(
    backend: Arc<dyn RagBackend>,
    ticket: Ticket,
    tx: mpsc::Sender<Action>,
) -> JoinHandle<()> {
    info!(
        "Spawning {:?}: {} via {}",
        ticket.id,
        ticket.request.describe(),
        backend.endpoint()
    );
    tokio::spawn(async move {
        let guard = CompletionGuard::new(ticket.id, &ticket.request, tx);
        let started = Instant::now();
        let response = execute(backend.as_ref(), &ticket.request).await;
        debug!(
            "{:?} finished in {}ms",
            ticket.id,
            started.elapsed().as_millis()
        );
        guard.complete(response);
    })
}
