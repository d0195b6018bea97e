//! LLM client abstraction.
//!
//! The server talks to a single OpenAI-compatible inference endpoint
//! (LM Studio, llama.cpp server, vLLM, ...). Handlers never see the HTTP
//! details; they go through [`LlmClient`] so tests can swap in a scripted
//! backend.

mod openai;
#[cfg(test)]
pub(crate) mod scripted;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use openai::OpenAiCompatibleClient;

/// Failure talking to the inference endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Connection refused, DNS failure or a 5xx from the endpoint.
    #[error("LLM backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The endpoint did not answer within the configured timeout.
    #[error("LLM backend timed out after {0}s")]
    Timeout(u64),

    /// The endpoint answered, but not with a usable chat completion.
    #[error("Unexpected LLM response: {0}")]
    Protocol(String),
}

/// Message author role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Token accounting reported by the endpoint, when it reports any.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

/// A completed chat turn.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

/// Anything that can answer a chat completion.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the conversation and return the assistant's reply.
    async fn chat_completion(&self, messages: &[ChatMessage]) -> Result<ChatResponse, LlmError>;

    /// Model identifier used for logging.
    fn model(&self) -> &str;
}
