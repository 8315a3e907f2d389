use reqwest::{Client, Response};
use serde::Deserialize;

use crate::{
    llm::{chat::ChatModel, documents::DocumentProvider},
    types::{ContentChunk, DocumentHandle, OcrDocument, SignedUrl},
};

/// Client for the Mistral REST API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct MistralClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MistralError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("No content in response")]
    EmptyResponse,
}

impl MistralClient {
    /// Signed URLs stay valid for this many hours
    const SIGNED_URL_EXPIRY_HOURS: u32 = 24;

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.mistral.ai/v1".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    async fn ensure_success(resp: Response) -> Result<Response, MistralError> {
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            tracing::error!(status, %message, "Mistral API returned an error");
            return Err(MistralError::Api { status, message });
        }

        Ok(resp)
    }

    pub async fn send_completion_request(
        &self,
        model_name: &str,
        content: Vec<ContentChunk>,
    ) -> Result<CompletionResponse, MistralError> {
        let body = completion_body(model_name, content);

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        let resp = Self::ensure_success(resp).await?;
        Ok(resp.json::<CompletionResponse>().await?)
    }

    pub async fn upload_file(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedFile, MistralError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;

        let form = reqwest::multipart::Form::new()
            .text("purpose", "ocr")
            .part("file", part);

        let resp = self
            .client
            .post(format!("{}/files", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        let resp = Self::ensure_success(resp).await?;
        Ok(resp.json::<UploadedFile>().await?)
    }

    pub async fn get_signed_url(&self, file_id: &str) -> Result<SignedUrlResponse, MistralError> {
        let resp = self
            .client
            .get(format!("{}/files/{file_id}/url", self.base_url))
            .query(&[("expiry", Self::SIGNED_URL_EXPIRY_HOURS)])
            .bearer_auth(&self.api_key)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        let resp = Self::ensure_success(resp).await?;
        Ok(resp.json::<SignedUrlResponse>().await?)
    }

    pub async fn process_ocr(
        &self,
        model_name: &str,
        document_url: &str,
    ) -> Result<OcrDocument, MistralError> {
        let body = serde_json::json!({
            "model": model_name,
            "document": {
                "type": "document_url",
                "document_url": document_url
            },
            "include_image_base64": false
        });

        let resp = self
            .client
            .post(format!("{}/ocr", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        let resp = Self::ensure_success(resp).await?;
        Ok(resp.json::<OcrDocument>().await?)
    }
}

fn completion_body(model_name: &str, content: Vec<ContentChunk>) -> serde_json::Value {
    serde_json::json!({
        "model": model_name,
        "messages": [
            {
                "role": "user",
                "content": content
            }
        ]
    })
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub index: u32,
    pub message: CompletionMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    pub filename: Option<String>,
    pub purpose: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignedUrlResponse {
    pub url: String,
}

impl ChatModel for MistralClient {
    const RANKING_MODEL: &'static str = "mistral-large-latest";
    const STRUCTURING_MODEL: &'static str = "codestral-latest";
    type Error = MistralError;

    #[tracing::instrument(skip(self, content), fields(chunks = content.len()))]
    async fn complete(
        &self,
        model: &str,
        content: Vec<ContentChunk>,
    ) -> Result<String, Self::Error> {
        let response = self
            .send_completion_request(model, content)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to complete chat"))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(MistralError::EmptyResponse)
    }
}

impl DocumentProvider for MistralClient {
    const OCR_MODEL: &'static str = "mistral-ocr-latest";
    type Error = MistralError;

    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<DocumentHandle, Self::Error> {
        let uploaded = self
            .upload_file(file_name, bytes)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to upload document"))?;

        Ok(DocumentHandle(uploaded.id))
    }

    #[tracing::instrument(skip(self))]
    async fn signed_url(&self, handle: &DocumentHandle) -> Result<SignedUrl, Self::Error> {
        let signed = self
            .get_signed_url(&handle.0)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to get signed url"))?;

        Ok(SignedUrl(signed.url))
    }

    #[tracing::instrument(skip_all)]
    async fn ocr(&self, url: &SignedUrl) -> Result<OcrDocument, Self::Error> {
        self.process_ocr(Self::OCR_MODEL, &url.0)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to run OCR"))
    }
}
