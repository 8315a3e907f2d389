pub mod chat_model;
pub mod document_provider;
pub mod mistral_server;
pub mod pdf_server;
pub mod transcript_fetcher;
