mod error;
pub mod highlights;
mod llm;
pub mod parser;
mod routes;
mod service;
pub mod tracing;
pub mod types;
pub mod yt;

pub use error::{Error, Result};
pub use llm::mistral;
pub use llm::{chat::ChatModel, documents::DocumentProvider};
pub use routes::{router, Highlights};
pub use service::{builder::HighlightServiceBuilder, HighlightService};
