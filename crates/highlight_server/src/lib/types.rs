use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Request body of both submission endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(pub String);

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    /// Offset from the start of the video, in seconds
    pub start: f64,
    /// Seconds
    pub duration: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        Transcript { segments }
    }

    /// All segment texts joined by a single space, timing dropped
    pub fn flatten(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// One part of a chat message sent to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentChunk {
    Text { text: String },
    DocumentUrl { document_url: String },
}

impl ContentChunk {
    pub fn text(text: impl Into<String>) -> Self {
        ContentChunk::Text { text: text.into() }
    }

    pub fn document_url(url: &SignedUrl) -> Self {
        ContentChunk::DocumentUrl {
            document_url: url.0.clone(),
        }
    }
}

/// Provider-assigned identifier of an uploaded document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle(pub String);

/// Time-limited URL granting read access to an uploaded document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl(pub String);

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OcrPage {
    /// Zero-based page index
    pub index: u32,
    pub markdown: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OcrDocument {
    pub pages: Vec<OcrPage>,
}

impl OcrDocument {
    /// JSON array of `{ page, markdown }` with one-based page numbers
    pub fn to_pages_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct Page<'a> {
            page: u32,
            markdown: &'a str,
        }

        let pages = self
            .pages
            .iter()
            .map(|p| Page {
                page: p.index + 1,
                markdown: &p.markdown,
            })
            .collect::<Vec<_>>();

        serde_json::to_string(&pages)
    }
}

/// Element of the ranked list returned by the first model stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RankedPoint {
    Plain(String),
    Annotated(serde_json::Map<String, serde_json::Value>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoHighlight {
    pub text: String,
    /// Start of the point in the video, in seconds
    pub timestamp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageHighlight {
    pub text: String,
    pub page: u32,
}
