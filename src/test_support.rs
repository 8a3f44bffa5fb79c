//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::backend::{ApiError, RagBackend};
use crate::api::types::{
    ChatRequest, ChatResponse, FileListing, OperationResult, RemoteConfig, UploadRequest,
};
use crate::core::conversation::Message;
use crate::core::files::PendingFile;
use crate::core::state::App;

/// A backend that answers every call from canned values and records
/// which endpoints were hit.
pub struct MockBackend {
    pub answer: Result<ChatResponse, ApiError>,
    pub calls: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn answering(text: &str) -> Self {
        Self {
            answer: Ok(ChatResponse {
                answer: text.to_string(),
                sources: Some(vec!["docs".to_string()]),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ApiError) -> Self {
        Self {
            answer: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.to_string());
        }
    }
}

#[async_trait]
impl RagBackend for MockBackend {
    fn endpoint(&self) -> &str {
        "mock"
    }

    async fn chat(&self, _request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        self.record("chat");
        self.answer.clone()
    }

    async fn chat_with_files(&self, _request: &UploadRequest) -> Result<ChatResponse, ApiError> {
        self.record("chat_upload");
        self.answer.clone()
    }

    async fn export_chat(&self, messages: &[Message]) -> Result<serde_json::Value, ApiError> {
        self.record("export");
        Ok(serde_json::json!({ "messages": messages }))
    }

    async fn list_files(&self) -> Result<FileListing, ApiError> {
        self.record("list");
        Ok(FileListing::default())
    }

    async fn add_files(&self, files: &[PendingFile]) -> Result<OperationResult, ApiError> {
        self.record("add");
        Ok(OperationResult {
            success: true,
            message: Some(format!("Added {} files", files.len())),
        })
    }

    async fn clear_knowledge_base(&self) -> Result<OperationResult, ApiError> {
        self.record("clear");
        Ok(OperationResult {
            success: true,
            message: None,
        })
    }

    async fn delete_file(&self, id: &str) -> Result<OperationResult, ApiError> {
        self.record(&format!("delete:{id}"));
        Ok(OperationResult {
            success: true,
            message: None,
        })
    }

    async fn config(&self) -> Result<RemoteConfig, ApiError> {
        self.record("config");
        Ok(RemoteConfig {
            llm_provider: "openai".to_string(),
            search_k: 5,
        })
    }
}

/// Creates a test App with a fixed session id.
pub fn test_app() -> App {
    App::new("test-session".to_string())
}

/// A pending file that does not need to exist on disk.
pub fn pending_file(name: &str) -> PendingFile {
    PendingFile {
        path: PathBuf::from(format!("/tmp/{name}")),
        name: name.to_string(),
        size: Some(1024),
    }
}
