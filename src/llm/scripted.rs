//! In-process [`LlmClient`] that replays canned replies and records every call.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChatMessage, ChatResponse, LlmClient, LlmError, TokenUsage};

pub(crate) struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedClient {
    pub(crate) fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(err: LlmError) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err(err)])),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every conversation sent so far, in call order.
    pub(crate) fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn chat_completion(&self, messages: &[ChatMessage]) -> Result<ChatResponse, LlmError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(messages.to_vec());
            calls.len()
        };
        // Out of script: answer with a numbered filler so call order stays visible.
        let next = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(format!("reply {}", n)));
        // Token counts: messages sent in, characters returned.
        next.map(|content| ChatResponse {
            usage: Some(TokenUsage {
                prompt_tokens: messages.len() as u32,
                completion_tokens: content.chars().count() as u32,
            }),
            content,
            finish_reason: Some("stop".to_string()),
        })
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
