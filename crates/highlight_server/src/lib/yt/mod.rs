pub mod transcript;

use std::future::Future;

use url::Url;

use crate::{
    error::Error,
    types::{Transcript, VideoId},
};

pub trait TranscriptFetcher {
    const WATCH_URL: &str;

    fn fetch_transcript(
        &self,
        video_id: &VideoId,
    ) -> impl Future<Output = Result<Transcript, Error>> + Send;
}

impl VideoId {
    /// Extracts the video id from the `v` query parameter of a watch URL
    pub fn from_url(url: &str) -> Result<Self, Error> {
        let parsed = Url::parse(url).map_err(|e| Error::InvalidVideoUrl(format!("{url}: {e}")))?;

        parsed
            .query_pairs()
            .find(|(k, v)| k == "v" && !v.trim().is_empty())
            .map(|(_, v)| VideoId(v.trim().to_string()))
            .ok_or_else(|| Error::InvalidVideoUrl(format!("{url}: missing 'v' query parameter")))
    }
}
