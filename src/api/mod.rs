//! HTTP API.
//!
//! ## Endpoints
//!
//! All brainstorming routes are `POST` with JSON bodies and answer
//! `{"response": ...}` or `{"error": "..."}`.
//!
//! - `POST /rephrase` - Turn a problem statement into a one-sentence question
//! - `POST /rephrase_with_feedback` - Re-ask the question given feedback
//! - `POST /create_persona_list` - Generate 5 contrasting personas
//! - `POST /get_agent_perspective` - One persona's 20-word solution
//! - `POST /get_agent_feedback` - One persona's 20-word critique
//! - `POST /get_agent_perspectives` - Every persona's solution, concatenated
//! - `POST /get_agent_feedbacks` - Every persona's critique, concatenated
//! - `POST /generate_solution` - Merge perspectives into a step-wise solution
//! - `POST /generate_solution_with_feedback` - Revise a solution given critique
//! - `GET /api/health` - Health check

mod brainstorm;
mod error;
mod routes;
pub mod types;

pub use error::ApiError;
pub use routes::{router, serve, AppState};
