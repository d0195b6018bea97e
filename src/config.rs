//! Configuration management for the brainstorm server.
//!
//! Configuration can be set via environment variables:
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `5000`.
//! - `DEV_MODE` - Optional. Logs full prompts and replies. Defaults to `true` in debug builds.
//! - `LLM_BASE_URL` - Optional. OpenAI-compatible endpoint. Defaults to `http://localhost:1234/v1`.
//! - `LLM_API_KEY` - Optional. Bearer token for the endpoint. Defaults to `lm-studio`.
//! - `LLM_MODEL` - Optional. Model identifier. Defaults to `TheBloke/Mistral-7B-Instruct-v0.2-GGUF`.
//! - `LLM_MAX_TOKENS` - Optional. Completion token cap. Defaults to `1024`.
//! - `LLM_TEMPERATURE` - Optional. Sampling temperature in `[0, 2]`. Defaults to `1.0`.
//! - `LLM_TIMEOUT_SECS` - Optional. Per-request backend timeout. Defaults to `240`.

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:1234/v1";
pub const DEFAULT_API_KEY: &str = "lm-studio";
pub const DEFAULT_MODEL: &str = "TheBloke/Mistral-7B-Instruct-v0.2-GGUF";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Settings for the LLM inference endpoint. Fixed at process start.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible API (without `/chat/completions`)
    pub base_url: String,

    /// API key sent as a bearer token (local servers accept any placeholder)
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Maximum tokens per completion
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Timeout for a single completion request
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
            temperature: 1.0,
            timeout_secs: 240,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Development mode (verbose prompt/reply logging)
    pub dev_mode: bool,

    /// LLM endpoint configuration
    pub llm: LlmConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any variable is set but unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = parse_var(&lookup, "PORT", 5000u16)?;

        let dev_mode = lookup("DEV_MODE")
            .map(|v| parse_bool(&v).map_err(|e| ConfigError::InvalidValue("DEV_MODE".to_string(), e)))
            .transpose()?
            // In debug builds, default to dev_mode=true; in release, default to false.
            .unwrap_or(cfg!(debug_assertions));

        let base_url = lookup("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        url::Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidValue("LLM_BASE_URL".to_string(), format!("{}", e)))?;

        let temperature = parse_var(&lookup, "LLM_TEMPERATURE", 1.0f32)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidValue(
                "LLM_TEMPERATURE".to_string(),
                format!("{} is outside [0, 2]", temperature),
            ));
        }

        let timeout_secs = parse_var(&lookup, "LLM_TIMEOUT_SECS", 240u64)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "LLM_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let llm = LlmConfig {
            base_url,
            api_key: lookup("LLM_API_KEY").unwrap_or_else(|| DEFAULT_API_KEY.to_string()),
            model: lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: parse_var(&lookup, "LLM_MAX_TOKENS", 1024u32)?,
            temperature,
            timeout_secs,
        };

        Ok(Self {
            host,
            port,
            dev_mode,
            llm,
        })
    }

    /// Create a config with custom LLM settings (useful for testing).
    pub fn new(llm: LlmConfig) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            dev_mode: true,
            llm,
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), format!("{}", e))),
        None => Ok(default),
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        other => Err(format!("expected boolean-like value, got: {}", other)),
    }
}
