//! Request and response bodies of the RAG server's REST surface.

use serde::{Deserialize, Serialize};

use crate::core::conversation::Message;
use crate::core::files::PendingFile;

/// Body of `POST /api/chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub query: String,
    pub sources: Vec<String>,
    pub session_id: String,
    /// Recent history, oldest first.
    pub context_messages: Vec<Message>,
}

/// Fields of the multipart `POST /api/chat/upload`.
///
/// History is not sent on this path; the attached files are the context.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub query: String,
    pub sources: Vec<String>,
    pub session_id: String,
    pub files: Vec<PendingFile>,
}

/// Answer from either chat endpoint.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub answer: String,
    /// May be absent or `null`; both mean no attribution.
    #[serde(default)]
    pub sources: Option<Vec<String>>,
}

/// One row of `GET /api/knowledge-base/files`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IndexedFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub date: String,
    /// Bytes.
    #[serde(default)]
    pub size: u64,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FileListing {
    #[serde(default)]
    pub files: Vec<IndexedFile>,
}

/// `{success, message}` reply of the knowledge-base mutations.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct OperationResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Snapshot of `GET /api/config`. Extra server fields are ignored.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RemoteConfig {
    #[serde(default)]
    pub llm_provider: String,
    #[serde(default)]
    pub search_k: u32,
}
