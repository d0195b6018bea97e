//! Router assembly and server startup.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::brainstorm;
use super::types::HealthResponse;
use crate::agent::AgentFactory;
use crate::config::Config;
use crate::llm::{LlmClient, OpenAiCompatibleClient};

/// Shared, read-only state handed to every handler.
pub struct AppState {
    pub config: Config,
    pub agents: AgentFactory,
}

impl AppState {
    pub fn new(config: Config, llm: Arc<dyn LlmClient>) -> Self {
        let agents = AgentFactory::new(llm, config.dev_mode);
        Self { config, agents }
    }
}

/// Build the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    // The web front-end is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/rephrase", post(brainstorm::rephrase))
        .route("/rephrase_with_feedback", post(brainstorm::rephrase_with_feedback))
        .route("/create_persona_list", post(brainstorm::create_persona_list))
        .route("/get_agent_perspective", post(brainstorm::get_agent_perspective))
        .route("/get_agent_feedback", post(brainstorm::get_agent_feedback))
        .route("/get_agent_perspectives", post(brainstorm::get_agent_perspectives))
        .route("/get_agent_feedbacks", post(brainstorm::get_agent_feedbacks))
        .route("/generate_solution", post(brainstorm::generate_solution))
        .route(
            "/generate_solution_with_feedback",
            post(brainstorm::generate_solution_with_feedback),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until the process is stopped.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let llm = Arc::new(OpenAiCompatibleClient::new(config.llm.clone())?);
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config, llm));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.config.llm.model.clone(),
    })
}
