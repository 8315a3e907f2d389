use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use highlight_server::{types::ContentChunk, ChatModel};

#[derive(Debug, Clone, PartialEq)]
pub struct ChatCall {
    pub model: String,
    pub content: Vec<ContentChunk>,
}

/// Answers every completion with the next scripted reply
#[derive(Clone)]
pub struct MockChatModel {
    pub replies: Arc<Mutex<VecDeque<String>>>,
    pub calls: Arc<Mutex<Vec<ChatCall>>>,
    pub fail_with: Option<String>,
}

impl MockChatModel {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Arc::new(Mutex::new(
                replies.iter().map(|r| r.to_string()).collect(),
            )),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new(&[])
        }
    }
}

impl ChatModel for MockChatModel {
    const RANKING_MODEL: &'static str = "mock-large";
    const STRUCTURING_MODEL: &'static str = "mock-code";
    type Error = anyhow::Error;

    async fn complete(&self, model: &str, content: Vec<ContentChunk>) -> anyhow::Result<String> {
        self.calls.lock().unwrap().push(ChatCall {
            model: model.to_string(),
            content,
        });
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No scripted reply left"))
    }
}
