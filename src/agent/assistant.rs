//! Ephemeral single-exchange agents.

use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::llm::{ChatMessage, LlmClient, LlmError, Role, TokenUsage};

/// What the proxy side says when an exchange runs for more than one turn.
pub const DEFAULT_AUTO_REPLY: &str = "...";

/// Hard ceiling on turns for one exchange, whatever the caller asks for.
pub const MAX_TURNS_CAP: usize = 4;

/// Static description of an agent: who it is and how it is told to behave.
#[derive(Debug, Clone)]
pub struct AgentSpec {
    pub name: String,
    pub system_prompt: String,
    /// Maximum number of replies the agent gives in one exchange.
    pub max_consecutive_auto_reply: usize,
}

/// A finished conversation with one agent.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub id: Uuid,
    pub agent_name: String,
    pub system_prompt: String,
    pub user_message: String,
    /// User and assistant turns, starting with `user_message`.
    pub history: Vec<ChatMessage>,
    /// Summed over all turns; `None` when the backend reported none.
    pub usage: Option<TokenUsage>,
}

impl Exchange {
    /// The agent's first reply.
    pub fn reply(&self) -> &str {
        self.history
            .iter()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

/// Builds a fresh agent for every request. Holds only read-only state.
#[derive(Clone)]
pub struct AgentFactory {
    llm: Arc<dyn LlmClient>,
    verbose: bool,
}

impl AgentFactory {
    pub fn new(llm: Arc<dyn LlmClient>, verbose: bool) -> Self {
        Self { llm, verbose }
    }

    /// A new assistant with the given persona. Not shared with anything else.
    pub fn assistant(&self, name: impl Into<String>, system_prompt: impl Into<String>) -> AssistantAgent {
        AssistantAgent {
            spec: AgentSpec {
                name: name.into(),
                system_prompt: system_prompt.into(),
                max_consecutive_auto_reply: MAX_TURNS_CAP,
            },
            llm: self.llm.clone(),
            verbose: self.verbose,
        }
    }

    /// Build an agent, send one message, return its reply.
    pub async fn invoke(&self, name: &str, system_prompt: &str, message: &str) -> Result<String, LlmError> {
        let exchange = self.assistant(name, system_prompt).initiate_chat(message, 1).await?;
        Ok(exchange.reply().to_string())
    }
}

/// A conversational agent that lives for exactly one exchange.
pub struct AssistantAgent {
    spec: AgentSpec,
    llm: Arc<dyn LlmClient>,
    verbose: bool,
}

impl AssistantAgent {
    pub fn with_max_consecutive_auto_reply(mut self, limit: usize) -> Self {
        self.spec.max_consecutive_auto_reply = limit.max(1);
        self
    }

    /// Send `message` and collect replies.
    ///
    /// With `max_turns == 1` this is one request and one response. Larger
    /// values let the proxy answer each reply with [`DEFAULT_AUTO_REPLY`];
    /// the number of replies never exceeds the agent's auto-reply limit or
    /// [`MAX_TURNS_CAP`]. Consumes the agent.
    pub async fn initiate_chat(self, message: &str, max_turns: usize) -> Result<Exchange, LlmError> {
        let id = Uuid::new_v4();
        let turns = max_turns
            .clamp(1, MAX_TURNS_CAP)
            .min(self.spec.max_consecutive_auto_reply);

        let mut history = vec![ChatMessage::user(message)];
        let mut usage: Option<TokenUsage> = None;

        for turn in 0..turns {
            if turn > 0 {
                history.push(ChatMessage::user(DEFAULT_AUTO_REPLY));
            }

            let mut conversation = Vec::with_capacity(history.len() + 1);
            conversation.push(ChatMessage::system(self.spec.system_prompt.as_str()));
            conversation.extend(history.iter().cloned());

            let started = Instant::now();
            let response = match self.llm.chat_completion(&conversation).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(
                        exchange_id = %id,
                        agent = %self.spec.name,
                        model = %self.llm.model(),
                        turn = turn + 1,
                        error = %e,
                        "Agent exchange failed"
                    );
                    return Err(e);
                }
            };

            tracing::debug!(
                exchange_id = %id,
                agent = %self.spec.name,
                model = %self.llm.model(),
                turn = turn + 1,
                reply_chars = response.content.chars().count(),
                finish_reason = ?response.finish_reason,
                prompt_tokens = response.usage.as_ref().map(|u| u.prompt_tokens),
                completion_tokens = response.usage.as_ref().map(|u| u.completion_tokens),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Agent replied"
            );
            if self.verbose {
                tracing::debug!(exchange_id = %id, prompt = %message, reply = %response.content, "Agent transcript");
            }

            if let Some(turn_usage) = response.usage {
                let total = usage.get_or_insert_with(TokenUsage::default);
                total.prompt_tokens += turn_usage.prompt_tokens;
                total.completion_tokens += turn_usage.completion_tokens;
            }
            history.push(ChatMessage::assistant(response.content));
        }

        Ok(Exchange {
            id,
            agent_name: self.spec.name,
            system_prompt: self.spec.system_prompt,
            user_message: message.to_string(),
            history,
            usage,
        })
    }
}
