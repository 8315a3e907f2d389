use std::{fmt::Display, future::Future};

use crate::types::{DocumentHandle, OcrDocument, SignedUrl};

/// Document ingestion side of the model provider
pub trait DocumentProvider {
    const OCR_MODEL: &str;

    type Error: Display + Send;

    fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<DocumentHandle, Self::Error>> + Send;

    fn signed_url(
        &self,
        handle: &DocumentHandle,
    ) -> impl Future<Output = Result<SignedUrl, Self::Error>> + Send;

    fn ocr(&self, url: &SignedUrl) -> impl Future<Output = Result<OcrDocument, Self::Error>> + Send;
}
