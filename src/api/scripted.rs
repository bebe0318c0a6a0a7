//! In-memory backend for tests. Replies are queued per endpoint; a gated
//! reply parks the call until the test releases it.

use super::{ApiError, Backend, ChatResponse, FileUpload, HealthStatus, UploadResponse};
use crate::store::models::{DocId, Document};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::oneshot;

type Gate<T> = oneshot::Sender<Result<T, ApiError>>;

enum Reply<T> {
    Ready(Result<T, ApiError>),
    Gated(oneshot::Receiver<Result<T, ApiError>>),
}

impl<T> Reply<T> {
    async fn resolve(self) -> Result<T, ApiError> {
        match self {
            Reply::Ready(result) => result,
            Reply::Gated(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Parse("gate dropped".into()))),
        }
    }
}

#[derive(Default)]
pub(crate) struct ScriptedBackend {
    catalog: Mutex<Vec<Document>>,
    list_failures: Mutex<VecDeque<ApiError>>,
    uploads: Mutex<VecDeque<Reply<UploadResponse>>>,
    chats: Mutex<VecDeque<Reply<ChatResponse>>>,
    chat_calls: Mutex<Vec<(DocId, String)>>,
    upload_calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// What `GET /documents` returns from now on.
    pub fn set_catalog(&self, documents: Vec<Document>) {
        *self.catalog.lock().unwrap() = documents;
    }

    pub fn fail_next_list(&self, err: ApiError) {
        self.list_failures.lock().unwrap().push_back(err);
    }

    pub fn push_upload(&self, result: Result<UploadResponse, ApiError>) {
        self.uploads.lock().unwrap().push_back(Reply::Ready(result));
    }

    pub fn push_chat(&self, result: Result<ChatResponse, ApiError>) {
        self.chats.lock().unwrap().push_back(Reply::Ready(result));
    }

    /// Queues a chat reply that resolves only when the returned sender fires.
    pub fn gate_chat(&self) -> Gate<ChatResponse> {
        let (tx, rx) = oneshot::channel();
        self.chats.lock().unwrap().push_back(Reply::Gated(rx));
        tx
    }

    pub fn gate_upload(&self) -> Gate<UploadResponse> {
        let (tx, rx) = oneshot::channel();
        self.uploads.lock().unwrap().push_back(Reply::Gated(rx));
        tx
    }

    pub fn chat_calls(&self) -> Vec<(DocId, String)> {
        self.chat_calls.lock().unwrap().clone()
    }

    pub fn upload_calls(&self) -> Vec<String> {
        self.upload_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        if let Some(err) = self.list_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        Ok(self.catalog.lock().unwrap().clone())
    }

    async fn upload_document(&self, file: FileUpload) -> Result<UploadResponse, ApiError> {
        self.upload_calls.lock().unwrap().push(file.filename);
        let reply = self.uploads.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply.resolve().await,
            None => Err(ApiError::Parse("no scripted upload reply".into())),
        }
    }

    async fn chat(&self, doc_id: DocId, message: &str) -> Result<ChatResponse, ApiError> {
        self.chat_calls
            .lock()
            .unwrap()
            .push((doc_id, message.to_string()));
        let reply = self.chats.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply.resolve().await,
            None => Err(ApiError::Parse("no scripted chat reply".into())),
        }
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        Ok(HealthStatus {
            status: "healthy".into(),
            message: "API is running".into(),
        })
    }
}

/// Builds a 4xx-style application failure.
pub(crate) fn api_error(detail: &str) -> ApiError {
    ApiError::Api {
        status: 400,
        detail: Some(detail.to_string()),
    }
}

pub(crate) fn doc(id: DocId, filename: &str, chunk_count: u32) -> Document {
    Document {
        id,
        filename: filename.to_string(),
        chunk_count,
    }
}

pub(crate) fn answer(text: &str) -> ChatResponse {
    ChatResponse {
        answer: text.to_string(),
        citations: None,
        chunks: None,
    }
}
