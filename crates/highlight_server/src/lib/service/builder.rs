use doc_datastore::DocumentCache;

use crate::{
    llm::{chat::ChatModel, documents::DocumentProvider},
    yt::TranscriptFetcher,
    HighlightService,
};

pub struct HighlightServiceBuilder<F = (), M = (), P = (), C = ()> {
    transcript_fetcher: F,
    chat_model: M,
    document_provider: P,
    document_cache: C,
}

impl HighlightServiceBuilder {
    pub fn new() -> Self {
        Self {
            transcript_fetcher: (),
            chat_model: (),
            document_provider: (),
            document_cache: (),
        }
    }
}

impl Default for HighlightServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<F, M, P, C> HighlightServiceBuilder<F, M, P, C> {
    pub fn transcript_fetcher<F2: TranscriptFetcher + Send + Sync + 'static>(
        self,
        transcript_fetcher: F2,
    ) -> HighlightServiceBuilder<F2, M, P, C> {
        HighlightServiceBuilder {
            transcript_fetcher,
            chat_model: self.chat_model,
            document_provider: self.document_provider,
            document_cache: self.document_cache,
        }
    }

    pub fn chat_model<M2: ChatModel + Send + Sync + 'static>(
        self,
        chat_model: M2,
    ) -> HighlightServiceBuilder<F, M2, P, C> {
        HighlightServiceBuilder {
            transcript_fetcher: self.transcript_fetcher,
            chat_model,
            document_provider: self.document_provider,
            document_cache: self.document_cache,
        }
    }

    pub fn document_provider<P2: DocumentProvider + Send + Sync + 'static>(
        self,
        document_provider: P2,
    ) -> HighlightServiceBuilder<F, M, P2, C> {
        HighlightServiceBuilder {
            transcript_fetcher: self.transcript_fetcher,
            chat_model: self.chat_model,
            document_provider,
            document_cache: self.document_cache,
        }
    }

    pub fn document_cache<C2: DocumentCache + Send + Sync + 'static>(
        self,
        document_cache: C2,
    ) -> HighlightServiceBuilder<F, M, P, C2> {
        HighlightServiceBuilder {
            transcript_fetcher: self.transcript_fetcher,
            chat_model: self.chat_model,
            document_provider: self.document_provider,
            document_cache,
        }
    }
}

impl<F, M, P, C> HighlightServiceBuilder<F, M, P, C>
where
    F: TranscriptFetcher + Send + Sync + 'static,
    M: ChatModel + Send + Sync + 'static,
    P: DocumentProvider + Send + Sync + 'static,
    C: DocumentCache + Send + Sync + 'static,
{
    pub fn build(self) -> HighlightService<F, M, P, C> {
        HighlightService {
            transcript_fetcher: self.transcript_fetcher,
            chat_model: self.chat_model,
            document_provider: self.document_provider,
            document_cache: self.document_cache,
        }
    }
}
