use std::future::Future;

use crate::CachedDocument;

pub mod fs;

pub trait DocumentCache {
    /// Returns the cached document for `title`, downloading `url` first when
    /// nothing is cached under that title yet
    fn fetch(
        &self,
        title: &str,
        url: &str,
    ) -> impl Future<Output = anyhow::Result<CachedDocument>> + Send;

    /// Looks up a previously cached document by its file name (no extension)
    fn lookup(
        &self,
        file_name: &str,
    ) -> impl Future<Output = anyhow::Result<Option<CachedDocument>>> + Send;
}

impl<T: DocumentCache + Send + Sync> DocumentCache for &T {
    async fn fetch(&self, title: &str, url: &str) -> anyhow::Result<CachedDocument> {
        (**self).fetch(title, url).await
    }

    async fn lookup(&self, file_name: &str) -> anyhow::Result<Option<CachedDocument>> {
        (**self).lookup(file_name).await
    }
}
