use std::sync::{Arc, Mutex};

use highlight_server::{
    types::{DocumentHandle, OcrDocument, OcrPage, SignedUrl},
    DocumentProvider,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct MockDocumentProvider {
    pub pages: Vec<String>,
    pub uploads: Arc<Mutex<Vec<Upload>>>,
    pub fail_with: Option<String>,
}

impl MockDocumentProvider {
    pub fn new(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|p| p.to_string()).collect(),
            uploads: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new(&[])
        }
    }

    pub fn signed_url_for(handle: &str) -> String {
        format!("https://files.mock/{handle}?signature=abc")
    }
}

impl DocumentProvider for MockDocumentProvider {
    const OCR_MODEL: &'static str = "mock-ocr";
    type Error = anyhow::Error;

    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> anyhow::Result<DocumentHandle> {
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(Upload {
            file_name: file_name.to_string(),
            bytes,
        });
        Ok(DocumentHandle(format!("file-{}", uploads.len())))
    }

    async fn signed_url(&self, handle: &DocumentHandle) -> anyhow::Result<SignedUrl> {
        Ok(SignedUrl(Self::signed_url_for(&handle.0)))
    }

    async fn ocr(&self, _url: &SignedUrl) -> anyhow::Result<OcrDocument> {
        Ok(OcrDocument {
            pages: self
                .pages
                .iter()
                .enumerate()
                .map(|(index, markdown)| OcrPage {
                    index: index as u32,
                    markdown: markdown.clone(),
                })
                .collect(),
        })
    }
}
