pub mod builder;

use doc_datastore::{CachedDocument, DocumentCache};

use crate::{
    error::{Error, Result},
    highlights::HighlightExtractor,
    llm::{chat::ChatModel, documents::DocumentProvider},
    types::{DocumentHandle, PageHighlight, Submission, VideoHighlight, VideoId},
    yt::TranscriptFetcher,
};

/// Orchestrates transcript retrieval, document caching and the model calls
/// behind every endpoint. Holds no per-request state.
#[derive(Debug)]
pub struct HighlightService<F, M, P, C>
where
    F: TranscriptFetcher + Send + Sync + 'static,
    M: ChatModel + Send + Sync + 'static,
    P: DocumentProvider + Send + Sync + 'static,
    C: DocumentCache + Send + Sync + 'static,
{
    transcript_fetcher: F,
    chat_model: M,
    document_provider: P,
    document_cache: C,
}

impl<F, M, P, C> HighlightService<F, M, P, C>
where
    F: TranscriptFetcher + Send + Sync + 'static,
    M: ChatModel + Send + Sync + 'static,
    P: DocumentProvider + Send + Sync + 'static,
    C: DocumentCache + Send + Sync + 'static,
{
    /// Transcript fetch followed by the two model stages
    #[tracing::instrument(skip_all, fields(title = %submission.title, url = %submission.url))]
    pub async fn video_highlights(&self, submission: &Submission) -> Result<Vec<VideoHighlight>> {
        let video_id = VideoId::from_url(&submission.url)
            .inspect_err(|e| tracing::warn!(error = %e, "Rejected video submission"))?;

        let transcript = self
            .transcript_fetcher
            .fetch_transcript(&video_id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch transcript"))?;

        HighlightExtractor::new(&self.chat_model)
            .video_highlights(&transcript)
            .await
    }

    /// Cache, upload, OCR, then the two model stages
    #[tracing::instrument(skip_all, fields(title = %submission.title, url = %submission.url))]
    pub async fn document_highlights(
        &self,
        submission: &Submission,
    ) -> Result<Vec<PageHighlight>> {
        if submission.title.trim().is_empty() {
            return Err(Error::InvalidSubmission("title must not be empty"));
        }

        let handle = self
            .fetch_document(&submission.title, &submission.url)
            .await?;

        let signed_url = self
            .document_provider
            .signed_url(&handle)
            .await
            .map_err(|e| Error::upstream("Signing document url", e))?;

        let ocr = self
            .document_provider
            .ocr(&signed_url)
            .await
            .map_err(|e| Error::upstream("OCR", e))?;
        tracing::info!(pages = ocr.pages.len(), "Document processed");

        HighlightExtractor::new(&self.chat_model)
            .document_highlights(&ocr, &signed_url)
            .await
    }

    /// Makes sure the document is cached locally and uploads it to the
    /// provider. Every call uploads again, handles are never reused.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_document(&self, title: &str, url: &str) -> Result<DocumentHandle> {
        let doc = self
            .document_cache
            .fetch(title, url)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to cache document"))
            .map_err(Error::Cache)?;

        let bytes = tokio::fs::read(&doc.path).await?;

        tracing::info!(file_name = %doc.file_name, "Uploading document");
        self.document_provider
            .upload(&doc.display_name(), bytes)
            .await
            .map_err(|e| Error::upstream("Uploading document", e))
    }

    /// Previously cached document named `file_name` (without extension)
    #[tracing::instrument(skip(self))]
    pub async fn cached_document(&self, file_name: &str) -> Result<CachedDocument> {
        self.document_cache
            .lookup(file_name)
            .await
            .map_err(Error::Cache)?
            .ok_or_else(|| Error::NotFound(file_name.to_string()))
    }
}
