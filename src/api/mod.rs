pub mod http;

#[cfg(test)]
pub(crate) mod scripted;

use crate::store::models::{DocId, Document};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use http::HttpBackend;

/// MIME type sent with uploads.
pub const UPLOAD_MIME: &str = "application/pdf";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DocumentList {
    pub documents: Vec<Document>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UploadResponse {
    pub doc_id: DocId,
    pub filename: String,
    #[serde(default)]
    pub chunks_count: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub citations: Option<Vec<String>>,
    #[serde(default)]
    pub chunks: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Body of a non-2xx response.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: String,
}

/// A file held in memory, ready to go out as the multipart `file` field.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, ApiError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self { filename, bytes })
    }
}

/// The question-answering service as seen from the client.
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    async fn list_documents(&self) -> Result<Vec<Document>, ApiError>;

    async fn upload_document(&self, file: FileUpload) -> Result<UploadResponse, ApiError>;

    async fn chat(&self, doc_id: DocId, message: &str) -> Result<ChatResponse, ApiError>;

    async fn health(&self) -> Result<HealthStatus, ApiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {}", .detail.as_deref().unwrap_or("<no detail>"))]
    Api { status: u16, detail: Option<String> },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// The server-supplied `detail`, if the server sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}
