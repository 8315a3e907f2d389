use serde_json::Value;

use crate::{
    error::Error,
    parser::{parse_caption_tracks, parse_timedtext_json3, select_caption_track, YtHtmlDocument},
    types::{Transcript, VideoId},
    yt::TranscriptFetcher,
};

/// Reads transcripts from the caption tracks YouTube publishes for a video
#[derive(Debug, Clone)]
pub struct YtTranscriptFetcher {
    client: reqwest::Client,
    language: String,
}

impl Default for YtTranscriptFetcher {
    fn default() -> Self {
        Self::new(reqwest::Client::new(), "en")
    }
}

impl YtTranscriptFetcher {
    pub fn new(client: reqwest::Client, language: impl Into<String>) -> Self {
        YtTranscriptFetcher {
            client,
            language: language.into(),
        }
    }

    /// Loads the watch page of `video_id`
    #[tracing::instrument(skip(self))]
    async fn fetch_watch_page(&self, video_id: &VideoId) -> Result<YtHtmlDocument, Error> {
        let html = self
            .client
            .get(Self::WATCH_URL)
            .query(&[("v", video_id.0.as_str())])
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?
            .error_for_status()?
            .text()
            .await?;

        Ok(html.into())
    }
}

impl TranscriptFetcher for YtTranscriptFetcher {
    const WATCH_URL: &str = "https://www.youtube.com/watch";

    #[tracing::instrument(skip(self))]
    async fn fetch_transcript(&self, video_id: &VideoId) -> Result<Transcript, Error> {
        let page = self.fetch_watch_page(video_id).await?;
        let player_response = page.player_response::<Value>()?;
        let tracks = parse_caption_tracks(&player_response)?;

        let track = select_caption_track(&tracks, &self.language)
            .ok_or_else(|| Error::TranscriptUnavailable(video_id.to_string()))?;
        tracing::debug!(
            language = %track.language_code,
            generated = track.is_generated(),
            "Selected caption track"
        );

        let body = self
            .client
            .get(track.json3_url())
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch caption track"))?
            .error_for_status()?
            .text()
            .await?;

        let transcript = parse_timedtext_json3(&body)?;
        if transcript.is_empty() {
            return Err(Error::TranscriptUnavailable(video_id.to_string()));
        }

        tracing::info!(segments = transcript.segments.len(), "Fetched transcript");
        Ok(transcript)
    }
}
