use std::{fmt::Display, future::Future};

use crate::types::ContentChunk;

pub trait ChatModel {
    /// Model used to rank the most important points of a source
    const RANKING_MODEL: &str;
    /// Model used to turn ranked points into structured output
    const STRUCTURING_MODEL: &str;

    type Error: Display + Send;

    /// Sends a single user turn made of `content` and returns the reply text
    fn complete(
        &self,
        model: &str,
        content: Vec<ContentChunk>,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
