use super::{
    ApiError, Backend, ChatResponse, DocumentList, ErrorBody, FileUpload, HealthStatus,
    UploadResponse, UPLOAD_MIME,
};
use crate::config::ClientConfig;
use crate::store::models::{DocId, Document};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// reqwest transport for the question-answering service.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Decodes a 2xx body as `T`. Any other status becomes `ApiError::Api`.
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        let detail = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .map(|body| body.detail);
        return Err(ApiError::Api {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        let resp = self.client.get(self.url("documents")).send().await?;
        let list: DocumentList = decode(resp).await?;
        Ok(list.documents)
    }

    async fn upload_document(&self, file: FileUpload) -> Result<UploadResponse, ApiError> {
        let part = Part::bytes(file.bytes)
            .file_name(file.filename)
            .mime_str(UPLOAD_MIME)?;
        let form = Form::new().part("file", part);

        let resp = self
            .client
            .post(self.url("upload-document"))
            .multipart(form)
            .send()
            .await?;
        decode(resp).await
    }

    async fn chat(&self, doc_id: DocId, message: &str) -> Result<ChatResponse, ApiError> {
        let form = Form::new()
            .text("doc_id", doc_id.to_string())
            .text("message", message.to_string());

        let resp = self
            .client
            .post(self.url("chat"))
            .multipart(form)
            .send()
            .await?;
        decode(resp).await
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let resp = self.client.get(self.url("health")).send().await?;
        decode(resp).await
    }
}
