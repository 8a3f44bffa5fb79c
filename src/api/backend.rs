use std::fmt;

use async_trait::async_trait;

use super::types::{
    ChatRequest, ChatResponse, FileListing, OperationResult, RemoteConfig, UploadRequest,
};
use crate::core::conversation::Message;
use crate::core::files::PendingFile;

/// Errors that can occur while talking to the RAG server.
/// None of them are retried; the caller turns them into a transcript
/// message or a notice.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Network-level failure (DNS, connection refused, reset).
    Network(String),
    /// Server answered with a non-success status.
    Api { status: u16, message: String },
    /// Response body was not the JSON we expected.
    Parse(String),
    /// A local file to upload could not be read.
    Io(String),
    /// The request task ended without producing a response.
    Aborted,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
            ApiError::Io(msg) => write!(f, "file error: {msg}"),
            ApiError::Aborted => write!(f, "request aborted"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The server-side collaborator: chat answering plus knowledge-base indexing.
#[async_trait]
pub trait RagBackend: Send + Sync {
    /// Human-readable location of the backend, for logs and the title bar.
    fn endpoint(&self) -> &str;

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError>;

    async fn chat_with_files(&self, request: &UploadRequest) -> Result<ChatResponse, ApiError>;

    /// Returns whatever JSON the server produced for the export.
    async fn export_chat(&self, messages: &[Message]) -> Result<serde_json::Value, ApiError>;

    async fn list_files(&self) -> Result<FileListing, ApiError>;

    async fn add_files(&self, files: &[PendingFile]) -> Result<OperationResult, ApiError>;

    async fn clear_knowledge_base(&self) -> Result<OperationResult, ApiError>;

    async fn delete_file(&self, id: &str) -> Result<OperationResult, ApiError>;

    async fn config(&self) -> Result<RemoteConfig, ApiError>;
}
