//! HTTP implementation of [`RagBackend`] using reqwest.
//!
//! JSON endpoints go through `.json()`; the two upload endpoints build a
//! multipart form with one `files` part per pending file, read from disk
//! at send time.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use super::backend::{ApiError, RagBackend};
use super::types::{
    ChatRequest, ChatResponse, FileListing, OperationResult, RemoteConfig, UploadRequest,
};
use crate::core::conversation::Message;
use crate::core::files::PendingFile;

/// Talks to a RAG server at `base_url` (e.g. `http://localhost:8000`).
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a response to `T`, turning non-success statuses into `ApiError::Api`.
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        debug!("Response status: {} ({})", status, response.url());

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("RAG server error: {} - {}", status, message);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Read one pending file into a multipart part named after the file.
async fn file_part(file: &PendingFile) -> Result<Part, ApiError> {
    let bytes = tokio::fs::read(&file.path)
        .await
        .map_err(|e| ApiError::Io(format!("{}: {e}", file.path.display())))?;
    debug!("Attaching {} ({} bytes)", file.name, bytes.len());
    Ok(Part::bytes(bytes).file_name(file.name.clone()))
}

/// Append every file to `form` under the repeated `files` field.
async fn attach_files(form: Form, files: &[PendingFile]) -> Result<Form, ApiError> {
    let parts = futures::future::try_join_all(files.iter().map(file_part)).await?;
    Ok(parts
        .into_iter()
        .fold(form, |form, part| form.part("files", part)))
}

#[async_trait]
impl RagBackend for HttpBackend {
    fn endpoint(&self) -> &str {
        &self.base_url
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        info!(
            "POST /api/chat: sources={:?}, context_messages={}",
            request.sources,
            request.context_messages.len()
        );
        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn chat_with_files(&self, request: &UploadRequest) -> Result<ChatResponse, ApiError> {
        info!(
            "POST /api/chat/upload: sources={:?}, files={}",
            request.sources,
            request.files.len()
        );
        let sources =
            serde_json::to_string(&request.sources).map_err(|e| ApiError::Parse(e.to_string()))?;
        let form = Form::new()
            .text("query", request.query.clone())
            .text("sources", sources)
            .text("session_id", request.session_id.clone());
        let form = attach_files(form, &request.files).await?;

        let response = self
            .client
            .post(self.url("/api/chat/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn export_chat(&self, messages: &[Message]) -> Result<serde_json::Value, ApiError> {
        info!("POST /api/export-chat: {} messages", messages.len());
        let response = self
            .client
            .post(self.url("/api/export-chat"))
            .json(messages)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn list_files(&self) -> Result<FileListing, ApiError> {
        debug!("GET /api/knowledge-base/files");
        let response = self
            .client
            .get(self.url("/api/knowledge-base/files"))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn add_files(&self, files: &[PendingFile]) -> Result<OperationResult, ApiError> {
        info!("POST /api/knowledge-base/add: {} files", files.len());
        let form = attach_files(Form::new(), files).await?;
        let response = self
            .client
            .post(self.url("/api/knowledge-base/add"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn clear_knowledge_base(&self) -> Result<OperationResult, ApiError> {
        info!("DELETE /api/knowledge-base/clear");
        let response = self
            .client
            .delete(self.url("/api/knowledge-base/clear"))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn delete_file(&self, id: &str) -> Result<OperationResult, ApiError> {
        info!("DELETE /api/knowledge-base/files/{}", id);
        let mut url = reqwest::Url::parse(&self.url("/api/knowledge-base/files"))
            .map_err(|e| ApiError::Network(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Network(format!("cannot build URL for file {id}")))?
            .push(id);
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn config(&self) -> Result<RemoteConfig, ApiError> {
        debug!("GET /api/config");
        let response = self
            .client
            .get(self.url("/api/config"))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::read_json(response).await
    }
}
