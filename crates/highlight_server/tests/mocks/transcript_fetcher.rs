use std::sync::{Arc, Mutex};

use highlight_server::{
    types::{Transcript, TranscriptSegment, VideoId},
    yt::TranscriptFetcher,
    Error,
};

#[derive(Clone)]
pub struct MockTranscriptFetcher {
    pub transcript: Transcript,
    pub calls: Arc<Mutex<Vec<VideoId>>>,
    pub unavailable: bool,
}

impl MockTranscriptFetcher {
    pub fn new(transcript: Transcript) -> Self {
        Self {
            transcript,
            calls: Arc::new(Mutex::new(Vec::new())),
            unavailable: false,
        }
    }

    /// Three short segments of a talk
    pub fn from_fixture() -> Self {
        Self::new(Transcript::new(vec![
            TranscriptSegment {
                text: "welcome to the talk".into(),
                start: 0.0,
                duration: 2.4,
            },
            TranscriptSegment {
                text: "ownership is the key idea".into(),
                start: 2.4,
                duration: 3.1,
            },
            TranscriptSegment {
                text: "thanks for listening".into(),
                start: 61.5,
                duration: 1.8,
            },
        ]))
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new(Transcript::default())
        }
    }
}

impl TranscriptFetcher for MockTranscriptFetcher {
    const WATCH_URL: &'static str = "https://youtube.com/mock";

    async fn fetch_transcript(&self, video_id: &VideoId) -> Result<Transcript, Error> {
        self.calls.lock().unwrap().push(video_id.clone());
        if self.unavailable {
            return Err(Error::TranscriptUnavailable(video_id.to_string()));
        }
        Ok(self.transcript.clone())
    }
}
