use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use anyhow::Context;
use tokio::fs;

use crate::{cache_key, datastore::DocumentCache, CachedDocument, DOCUMENT_EXTENSION};

static PARTIAL_DOWNLOAD_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct FsDocumentCache {
    root: PathBuf,
    http_client: reqwest::Client,
}

impl FsDocumentCache {
    /// Creates the cache directory if it does not exist yet
    pub async fn init(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();

        fs::create_dir_all(&root)
            .await
            .inspect_err(|e| {
                tracing::error!(error = ?e, path = ?root, "Failed to create cache directory")
            })
            .with_context(|| format!("Failed to create cache directory {}", root.display()))?;

        Ok(FsDocumentCache {
            root,
            http_client: reqwest::Client::new(),
        })
    }

    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = http_client;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Downloads `url` into `doc.path`.
    ///
    /// The body lands in a uniquely named `.part` file first and is renamed
    /// into place, so a failed download never shows up as a cached document.
    #[tracing::instrument(skip(self, doc), fields(path = %doc.path.display()))]
    async fn download(&self, url: &str, doc: &CachedDocument) -> anyhow::Result<()> {
        let bytes = self
            .http_client
            .get(url)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))
            .context("Failed to download document")?
            .error_for_status()
            .inspect_err(|e| tracing::error!(error = %e, "Document server returned an error"))
            .context("Failed to download document")?
            .bytes()
            .await
            .context("Failed to read document body")?;

        let seq = PARTIAL_DOWNLOAD_SEQ.fetch_add(1, Ordering::Relaxed);
        let partial_path = doc.path.with_extension(format!(
            "{DOCUMENT_EXTENSION}.{}-{seq}.part",
            std::process::id()
        ));

        fs::write(&partial_path, &bytes)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to write document"))
            .with_context(|| format!("Failed to write {}", partial_path.display()))?;

        if let Err(e) = fs::rename(&partial_path, &doc.path).await {
            let _ = fs::remove_file(&partial_path).await;
            return Err(e).with_context(|| {
                format!("Failed to move document into {}", doc.path.display())
            });
        }

        tracing::info!(size = bytes.len(), "Document downloaded");
        Ok(())
    }
}

impl DocumentCache for FsDocumentCache {
    async fn fetch(&self, title: &str, url: &str) -> anyhow::Result<CachedDocument> {
        let file_name = cache_key(title);
        anyhow::ensure!(
            is_plain_file_name(&file_name),
            "Title {title:?} does not map to a valid cache file name"
        );

        let doc = CachedDocument::new(&self.root, file_name);

        let exists = fs::try_exists(&doc.path)
            .await
            .with_context(|| format!("Failed to check {}", doc.path.display()))?;

        if !exists {
            tracing::info!(file_name = %doc.file_name, "Document not cached, downloading");
            self.download(url, &doc).await?;
        } else {
            tracing::debug!("Document already exists at {}", doc.path.display());
        }

        Ok(doc)
    }

    async fn lookup(&self, file_name: &str) -> anyhow::Result<Option<CachedDocument>> {
        if !is_plain_file_name(file_name) {
            tracing::warn!(file_name, "Rejected cache lookup for non plain file name");
            return Ok(None);
        }

        let doc = CachedDocument::new(&self.root, file_name);
        let exists = fs::try_exists(&doc.path)
            .await
            .with_context(|| format!("Failed to check {}", doc.path.display()))?;

        Ok(exists.then_some(doc))
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\'])
}
