//! API request and response types.
//!
//! Request fields are all `Option` so that an absent or `null` field reaches
//! the handler and gets the route's own 400 message instead of a generic
//! deserialization error. Wrong types (a number where a string belongs) are
//! still rejected during deserialization.

use serde::{Deserialize, Serialize};

/// `POST /rephrase` and `POST /create_persona_list`
#[derive(Debug, Clone, Deserialize)]
pub struct ProblemRequest {
    pub problem_statement: Option<String>,
}

/// `POST /rephrase_with_feedback`
#[derive(Debug, Clone, Deserialize)]
pub struct RephraseWithFeedbackRequest {
    /// The previous rephrased question
    pub previous_ver: Option<String>,
    pub feedback: Option<String>,
}

/// `POST /get_agent_perspective`
#[derive(Debug, Clone, Deserialize)]
pub struct AgentPerspectiveRequest {
    pub agent_name: Option<String>,
    pub agent_perspective: Option<String>,
    pub problem_statement: Option<String>,
}

/// `POST /get_agent_feedback`
#[derive(Debug, Clone, Deserialize)]
pub struct AgentFeedbackRequest {
    pub agent_name: Option<String>,
    pub agent_perspective: Option<String>,
    pub problem_statement: Option<String>,
    pub solution: Option<String>,
}

/// `POST /get_agent_perspectives` and `POST /get_agent_feedbacks`
#[derive(Debug, Clone, Deserialize)]
pub struct AgentListRequest {
    /// Literal string (`"[['A', 'view'], ...]"`, as the web front-end
    /// stores it) or a JSON array of pairs
    pub agent_list: Option<serde_json::Value>,
    pub problem_statement: Option<String>,
    /// Only read by `/get_agent_feedbacks`
    pub solution: Option<String>,
}

/// `POST /generate_solution`
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateSolutionRequest {
    /// Concatenated persona perspectives
    pub pov_para: Option<String>,
    pub problem_statement: Option<String>,
}

/// `POST /generate_solution_with_feedback`
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateSolutionWithFeedbackRequest {
    pub feedback: Option<String>,
    pub prev_solution: Option<String>,
    pub problem_statement: Option<String>,
}

/// Success envelope: `{"response": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub response: T,
}

impl<T> ApiResponse<T> {
    pub fn new(response: T) -> Self {
        Self { response }
    }
}

/// Error envelope: `{"error": "..."}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,

    /// Model the backend is asked for
    pub model: String,
}
