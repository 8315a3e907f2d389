//! # Yt Parser
//!
//! This module provides functionality to pull caption metadata out of a YouTube
//! watch page and to convert a `json3` timedtext caption track into a
//! [`Transcript`].

use std::{ops::Deref, sync::LazyLock};

use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::{
    error::Error,
    types::{Transcript, TranscriptSegment},
};

static YT_PLAYER_RESPONSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"(?s)var\s+ytInitialPlayerResponse\s*=\s*(\{.*?\});\s*(?:var\s|</script>)",
    )
    .unwrap()
});

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    /// `asr` for automatically generated tracks
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }

    /// URL of this track in the `json3` timedtext format
    pub fn json3_url(&self) -> String {
        format!("{}&fmt=json3", self.base_url)
    }
}

/// Parses the caption tracks out of the `ytInitialPlayerResponse` JSON.
///
/// # Returns
/// * `Ok(Vec<CaptionTrack>)`, empty when the video has no captions.
/// * `Err(Error::ParseError)` if the tracks are present but malformed.
#[tracing::instrument(skip(json))]
pub fn parse_caption_tracks(json: &Value) -> Result<Vec<CaptionTrack>, Error> {
    let tracks = &json["captions"]["playerCaptionsTracklistRenderer"]["captionTracks"];

    if tracks.is_null() {
        return Ok(Vec::new());
    }

    serde_json::from_value(tracks.clone()).map_err(|_| {
        Error::ParseError(
            "Failed to parse ['captions']['playerCaptionsTracklistRenderer']['captionTracks']",
        )
    })
}

/// Picks the track to transcribe: a manually created track in `language`,
/// then a generated one in `language`, then whatever comes first.
pub fn select_caption_track<'a>(
    tracks: &'a [CaptionTrack],
    language: &str,
) -> Option<&'a CaptionTrack> {
    let in_language = |t: &&CaptionTrack| t.language_code == language;

    tracks
        .iter()
        .filter(in_language)
        .find(|t| !t.is_generated())
        .or_else(|| tracks.iter().find(in_language))
        .or_else(|| tracks.first())
}

#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimedTextEvent {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Vec<TimedTextSeg>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSeg {
    #[serde(default)]
    utf8: String,
}

/// Converts a `json3` timedtext document into a transcript.
///
/// Events without any visible text (window setup, line breaks) are skipped.
pub fn parse_timedtext_json3(body: &str) -> Result<Transcript, Error> {
    let timed_text = serde_json::from_str::<TimedText>(body)
        .map_err(|_| Error::ParseError("Failed to parse json3 timedtext document"))?;

    let segments = timed_text
        .events
        .into_iter()
        .filter_map(|event| {
            let text = event
                .segs
                .iter()
                .map(|s| s.utf8.as_str())
                .collect::<String>()
                .replace('\n', " ");
            let text = text.trim();

            (!text.is_empty()).then(|| TranscriptSegment {
                text: text.to_string(),
                start: event.t_start_ms as f64 / 1000.0,
                duration: event.d_duration_ms as f64 / 1000.0,
            })
        })
        .collect();

    Ok(Transcript::new(segments))
}

pub struct YtHtmlDocument(String);

impl Deref for YtHtmlDocument {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl YtHtmlDocument {
    pub fn new(doc: String) -> Self {
        YtHtmlDocument(doc)
    }

    /// Extracts the `ytInitialPlayerResponse` object embedded in the page
    pub fn player_response<T>(&self) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        YT_PLAYER_RESPONSE_RE
            .captures(self)
            .and_then(|cap| cap.get(1))
            .and_then(|m| serde_json::from_str(m.as_str()).ok())
            .ok_or(Error::ParseError(
                "Failed to extract ytInitialPlayerResponse from the page's script tag",
            ))
    }
}

impl From<String> for YtHtmlDocument {
    fn from(value: String) -> Self {
        YtHtmlDocument(value)
    }
}
