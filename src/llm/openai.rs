//! Client for OpenAI-compatible `/chat/completions` endpoints.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, ChatResponse, LlmClient, LlmError, TokenUsage};
use crate::config::LlmConfig;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Non-streaming chat client bound to one endpoint and model.
pub struct OpenAiCompatibleClient {
    http: reqwest::Client,
    config: LlmConfig,
    url: String,
}

impl OpenAiCompatibleClient {
    /// Build a client from the endpoint settings.
    ///
    /// The timeout applies to the whole request, body included.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LlmError::BackendUnavailable(format!("failed to build HTTP client: {}", e)))?;
        let url = config.completions_url();
        Ok(Self { http, config, url })
    }

    fn classify(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(self.config.timeout_secs)
        } else {
            LlmError::BackendUnavailable(err.to_string())
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatibleClient {
    async fn chat_completion(&self, messages: &[ChatMessage]) -> Result<ChatResponse, LlmError> {
        let body = CompletionRequest {
            model: &self.config.model,
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            stream: false,
        };

        tracing::debug!(url = %self.url, model = %self.config.model, messages = messages.len(), "Sending chat completion");

        let resp = self
            .http
            .post(&self.url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.classify(e))?;

        if status.is_server_error() {
            return Err(LlmError::BackendUnavailable(format!("{}: {}", status, truncate(&text, 200))));
        }
        // 4xx: bad model id, bad key, context overflow.
        if !status.is_success() {
            return Err(LlmError::Protocol(format!("{}: {}", status, truncate(&text, 200))));
        }

        let parsed: CompletionResponse = serde_json::from_str(&text)
            .map_err(|e| LlmError::Protocol(format!("invalid completion JSON: {}", e)))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Protocol("completion has no choices".to_string()))?;
        let content = choice
            .message
            .and_then(|m| m.content)
            .ok_or_else(|| LlmError::Protocol("completion choice has no message content".to_string()))?;

        Ok(ChatResponse {
            content,
            finish_reason: choice.finish_reason,
            usage: parsed.usage,
        })
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}... [truncated]", &s[..idx]),
        None => s.to_string(),
    }
}
