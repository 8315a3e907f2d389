//! # Highlights
//!
//! Two-stage highlight extraction. The ranking stage asks the model for the
//! most important points of a source as a JSON array; the locating stage hands
//! those points back together with the full source and asks for a YAML list
//! that pins every point to a timestamp or a page.
//!
//! Both replies are validated. A reply that is not a single structured block
//! is rejected as unparseable, a block that does not match the expected shape
//! is rejected as invalid.

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::{Error, Result},
    llm::chat::ChatModel,
    types::{
        ContentChunk, OcrDocument, PageHighlight, RankedPoint, SignedUrl, Transcript,
        VideoHighlight,
    },
};

const CODE_FENCE: &str = "```";

pub struct HighlightExtractor<'a, M> {
    model: &'a M,
}

impl<'a, M> HighlightExtractor<'a, M>
where
    M: ChatModel + Sync,
{
    const RANK_VIDEO_PROMPT: &'static str = include_str!("./llm/prompts/rank_video.txt");
    const RANK_DOCUMENT_PROMPT: &'static str = include_str!("./llm/prompts/rank_document.txt");
    const LOCATE_VIDEO_PROMPT: &'static str = include_str!("./llm/prompts/locate_video.txt");
    const LOCATE_DOCUMENT_PROMPT: &'static str =
        include_str!("./llm/prompts/locate_document.txt");

    pub fn new(model: &'a M) -> Self {
        HighlightExtractor { model }
    }

    #[tracing::instrument(skip_all, fields(segments = transcript.segments.len()))]
    pub async fn video_highlights(&self, transcript: &Transcript) -> Result<Vec<VideoHighlight>> {
        let points = self
            .rank(vec![
                ContentChunk::text(Self::RANK_VIDEO_PROMPT),
                ContentChunk::text(transcript.flatten()),
            ])
            .await?;

        let reply = self
            .locate(vec![
                ContentChunk::text(locate_prompt(Self::LOCATE_VIDEO_PROMPT, &points)?),
                ContentChunk::text(serde_json::to_string(transcript)?),
            ])
            .await?;

        parse_highlights(&reply)
    }

    #[tracing::instrument(skip_all, fields(pages = ocr.pages.len()))]
    pub async fn document_highlights(
        &self,
        ocr: &OcrDocument,
        document_url: &SignedUrl,
    ) -> Result<Vec<PageHighlight>> {
        let points = self
            .rank(vec![
                ContentChunk::text(Self::RANK_DOCUMENT_PROMPT),
                ContentChunk::text(ocr.to_pages_json()?),
            ])
            .await?;

        let reply = self
            .locate(vec![
                ContentChunk::text(locate_prompt(Self::LOCATE_DOCUMENT_PROMPT, &points)?),
                ContentChunk::document_url(document_url),
            ])
            .await?;

        parse_highlights(&reply)
    }

    async fn rank(&self, content: Vec<ContentChunk>) -> Result<Vec<RankedPoint>> {
        let reply = self
            .model
            .complete(M::RANKING_MODEL, content)
            .await
            .map_err(|e| Error::upstream("Ranking", e))?;

        let points = parse_ranked_points(&reply)
            .inspect_err(|e| tracing::error!(error = %e, "Rejected ranking reply"))?;
        tracing::info!(count = points.len(), "Ranked points");

        Ok(points)
    }

    async fn locate(&self, content: Vec<ContentChunk>) -> Result<String> {
        self.model
            .complete(M::STRUCTURING_MODEL, content)
            .await
            .map_err(|e| Error::upstream("Locating", e))
    }
}

fn locate_prompt(template: &str, points: &[RankedPoint]) -> Result<String> {
    Ok(template.replace("{points}", &serde_json::to_string_pretty(points)?))
}

/// Reads the JSON array of ranked points out of a ranking reply.
///
/// The array may be surrounded by prose or a code fence; it spans from the
/// first `[` to the last `]` of the reply.
pub fn parse_ranked_points(reply: &str) -> Result<Vec<RankedPoint>> {
    let (Some(start), Some(end)) = (reply.find('['), reply.rfind(']')) else {
        return Err(Error::InvalidModelOutput(
            "ranking reply contains no JSON array".into(),
        ));
    };
    if end < start {
        return Err(Error::InvalidModelOutput(
            "ranking reply contains no JSON array".into(),
        ));
    }

    let points = serde_json::from_str::<Vec<RankedPoint>>(&reply[start..=end]).map_err(|e| {
        Error::InvalidModelOutput(format!("ranking reply is not a list of points: {e}"))
    })?;

    if points.is_empty() {
        return Err(Error::InvalidModelOutput(
            "ranking reply contains no points".into(),
        ));
    }

    Ok(points)
}

/// Returns the structured block of a reply.
///
/// A reply whose first line opens a code fence and whose last line closes it
/// yields the lines in between, unchanged. A reply without any fence is taken
/// as the block itself. Anything else (prose around a fence, several fences,
/// an unterminated fence, nothing at all) is unparseable.
pub fn strip_code_fence(reply: &str) -> Result<String> {
    // leading blank lines go, indentation of the first real line stays
    let lines = reply
        .trim_end()
        .lines()
        .skip_while(|l| l.trim().is_empty())
        .collect::<Vec<_>>();
    if lines.is_empty() {
        return Err(Error::UnparseableOutput("empty reply".into()));
    }

    if !lines[0].trim_start().starts_with(CODE_FENCE) {
        if lines.iter().any(|l| l.contains(CODE_FENCE)) {
            return Err(Error::UnparseableOutput(
                "reply mixes prose with a code block".into(),
            ));
        }
        return Ok(lines.join("\n"));
    }

    let last = lines[lines.len() - 1];
    if lines.len() < 3 || last.trim() != CODE_FENCE {
        return Err(Error::UnparseableOutput(
            "reply is not a single closed code block".into(),
        ));
    }

    let body = &lines[1..lines.len() - 1];
    if body.iter().all(|l| l.trim().is_empty()) {
        return Err(Error::UnparseableOutput("code block is empty".into()));
    }
    if body.iter().any(|l| l.trim_start().starts_with(CODE_FENCE)) {
        return Err(Error::UnparseableOutput(
            "reply contains more than one code block".into(),
        ));
    }

    Ok(body.join("\n"))
}

/// Validates a locating reply against the highlight schema `T`
pub fn parse_highlights<T: DeserializeOwned>(reply: &str) -> Result<Vec<T>> {
    let block = strip_code_fence(reply)?;

    let value = serde_yaml::from_str::<serde_yaml::Value>(&block)
        .map_err(|e| Error::UnparseableOutput(format!("reply is not valid yaml: {e}")))?;

    let highlights = serde_yaml::from_value::<Vec<T>>(value)
        .map_err(|e| Error::InvalidModelOutput(format!("highlights do not match schema: {e}")))?;

    if highlights.is_empty() {
        return Err(Error::InvalidModelOutput("reply contains no highlights".into()));
    }

    Ok(highlights)
}

/// Renders highlights as the YAML block returned to clients
pub fn render_highlights<T: Serialize>(highlights: &[T]) -> Result<String> {
    Ok(serde_yaml::to_string(highlights)?)
}
