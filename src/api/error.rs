//! Mapping of handler failures onto HTTP responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::types::ErrorResponse;
use crate::agent::ExtractError;
use crate::llm::LlmError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A required request field was absent or null. Carries the route's message.
    #[error("{0}")]
    MissingField(&'static str),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// The model's reply did not contain a usable persona list.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Invalid agent_list: {0}")]
    InvalidAgentList(String),

    #[error("LLM backend error: {0}")]
    Llm(#[from] LlmError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_)
            | ApiError::InvalidBody(_)
            | ApiError::Extract(_)
            | ApiError::InvalidAgentList(_) => StatusCode::BAD_REQUEST,
            ApiError::Llm(LlmError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Llm(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Extract(ExtractError::InvalidListFormat { detail }) => {
                tracing::warn!(%detail, "Model reply held a malformed persona list");
            }
            ApiError::Extract(ExtractError::ListNotFound) => {
                tracing::warn!("Model reply held no persona list");
            }
            ApiError::Llm(e) => {
                tracing::warn!(error = %e, status = %status, "Request failed on LLM backend");
            }
            _ => {
                tracing::debug!(error = %self, status = %status, "Rejected request");
            }
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
