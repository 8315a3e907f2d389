#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid video url: {0}")]
    InvalidVideoUrl(String),

    #[error("Invalid submission: {0}")]
    InvalidSubmission(&'static str),

    #[error("Parse error: {0}")]
    ParseError(&'static str),

    #[error("No transcript available for video {0}")]
    TranscriptUnavailable(String),

    #[error("Document cache error: {0:#}")]
    Cache(anyhow::Error),

    #[error("{stage} failed: {message}")]
    Upstream {
        stage: &'static str,
        message: String,
    },

    #[error("Unparseable model output: {0}")]
    UnparseableOutput(String),

    #[error("Invalid model output: {0}")]
    InvalidModelOutput(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn upstream(stage: &'static str, err: impl std::fmt::Display) -> Self {
        Error::Upstream {
            stage,
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
