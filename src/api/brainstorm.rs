//! Brainstorming step handlers.
//!
//! Each handler validates its fields, renders one message, runs it through a
//! fresh agent and shapes the reply. Nothing is kept between requests; the
//! client passes the problem statement, personas and solutions back in.

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use super::error::ApiError;
use super::routes::AppState;
use super::types::{
    AgentFeedbackRequest, AgentListRequest, AgentPerspectiveRequest, ApiResponse,
    GenerateSolutionRequest, GenerateSolutionWithFeedbackRequest, ProblemRequest,
    RephraseWithFeedbackRequest,
};
use crate::agent::{
    build_message, extract_persona_list, parse_persona_list, passthrough, AgentFactory,
    ExtractError, MessageKind, Persona,
};
use crate::agent::prompt::{
    persona_creator_system_prompt, persona_system_prompt, IDEATION_SYSTEM_PROMPT,
    REPHRASING_SYSTEM_PROMPT,
};

const ASSISTANT: &str = "Assistant";
const PERSONA_CREATOR: &str = "Persona Creator Assistant";

/// Persona agents answer once and stop.
const PERSONA_AUTO_REPLY_LIMIT: usize = 1;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(ApiError::from)
}

fn reply<T>(response: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::new(response)))
}

/// POST /rephrase
pub async fn rephrase(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProblemRequest>, JsonRejection>,
) -> ApiResult<String> {
    let req = body(payload)?;
    let Some(statement) = req.problem_statement.as_deref() else {
        return Err(ApiError::MissingField("problem_statement must be provided"));
    };

    let message = build_message(&MessageKind::Rephrase { statement });
    let answer = state
        .agents
        .invoke(ASSISTANT, REPHRASING_SYSTEM_PROMPT, &message)
        .await?;
    reply(passthrough(answer))
}

/// POST /rephrase_with_feedback
pub async fn rephrase_with_feedback(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RephraseWithFeedbackRequest>, JsonRejection>,
) -> ApiResult<String> {
    let req = body(payload)?;
    let (Some(previous_version), Some(feedback)) =
        (req.previous_ver.as_deref(), req.feedback.as_deref())
    else {
        return Err(ApiError::MissingField(
            "Both previous_ver and feedback must be provided",
        ));
    };

    let message = build_message(&MessageKind::RephraseWithFeedback {
        previous_version,
        feedback,
    });
    let answer = state
        .agents
        .invoke(ASSISTANT, REPHRASING_SYSTEM_PROMPT, &message)
        .await?;
    reply(passthrough(answer))
}

/// POST /create_persona_list
pub async fn create_persona_list(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProblemRequest>, JsonRejection>,
) -> ApiResult<Vec<Persona>> {
    let req = body(payload)?;
    let Some(problem_statement) = req.problem_statement.as_deref() else {
        return Err(ApiError::MissingField("Problem statement must be provided"));
    };

    let message = build_message(&MessageKind::PersonaList { problem_statement });
    let raw = state
        .agents
        .invoke(PERSONA_CREATOR, &persona_creator_system_prompt(), &message)
        .await?;

    let personas = extract_persona_list(&raw)?;
    tracing::debug!(count = personas.len(), "Extracted persona list");
    reply(personas)
}

/// POST /get_agent_perspective
pub async fn get_agent_perspective(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AgentPerspectiveRequest>, JsonRejection>,
) -> ApiResult<String> {
    let req = body(payload)?;
    let (Some(name), Some(perspective), Some(problem_statement)) = (
        req.agent_name.as_deref(),
        req.agent_perspective.as_deref(),
        req.problem_statement.as_deref(),
    ) else {
        return Err(ApiError::MissingField(
            "agent_name, agent_perspective and problem_statement must be provided",
        ));
    };

    let persona = Persona::new(name, perspective);
    let message = build_message(&MessageKind::AgentPerspective { problem_statement });
    let answer = ask_persona(&state.agents, &persona, &message).await?;
    reply(passthrough(answer))
}

/// POST /get_agent_feedback
pub async fn get_agent_feedback(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AgentFeedbackRequest>, JsonRejection>,
) -> ApiResult<String> {
    let req = body(payload)?;
    let (Some(name), Some(perspective), Some(problem_statement), Some(solution)) = (
        req.agent_name.as_deref(),
        req.agent_perspective.as_deref(),
        req.problem_statement.as_deref(),
        req.solution.as_deref(),
    ) else {
        return Err(ApiError::MissingField(
            "agent_name, agent_perspective, problem_statement and solution must be provided",
        ));
    };

    let persona = Persona::new(name, perspective);
    let message = build_message(&MessageKind::AgentFeedback {
        problem_statement,
        solution,
    });
    let answer = ask_persona(&state.agents, &persona, &message).await?;
    reply(passthrough(answer))
}

/// POST /get_agent_perspectives
pub async fn get_agent_perspectives(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AgentListRequest>, JsonRejection>,
) -> ApiResult<String> {
    let req = body(payload)?;
    let (Some(agent_list), Some(problem_statement)) =
        (req.agent_list, req.problem_statement.as_deref())
    else {
        return Err(ApiError::MissingField(
            "agent_list and problem_statement must be provided",
        ));
    };

    let personas = resolve_agent_list(agent_list)?;
    let message = build_message(&MessageKind::AgentPerspective { problem_statement });
    reply(ask_each(&state.agents, &personas, &message).await?)
}

/// POST /get_agent_feedbacks
pub async fn get_agent_feedbacks(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AgentListRequest>, JsonRejection>,
) -> ApiResult<String> {
    let req = body(payload)?;
    let (Some(agent_list), Some(problem_statement), Some(solution)) = (
        req.agent_list,
        req.problem_statement.as_deref(),
        req.solution.as_deref(),
    ) else {
        return Err(ApiError::MissingField(
            "agent_list, problem_statement and solution must be provided",
        ));
    };

    let personas = resolve_agent_list(agent_list)?;
    let message = build_message(&MessageKind::AgentFeedback {
        problem_statement,
        solution,
    });
    reply(ask_each(&state.agents, &personas, &message).await?)
}

/// POST /generate_solution
pub async fn generate_solution(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateSolutionRequest>, JsonRejection>,
) -> ApiResult<String> {
    let req = body(payload)?;
    let (Some(pov_paragraph), Some(problem_statement)) =
        (req.pov_para.as_deref(), req.problem_statement.as_deref())
    else {
        return Err(ApiError::MissingField("Both povs & ps must be provided"));
    };

    let message = build_message(&MessageKind::GenerateSolution {
        pov_paragraph,
        problem_statement,
    });
    let answer = state
        .agents
        .invoke(ASSISTANT, IDEATION_SYSTEM_PROMPT, &message)
        .await?;
    reply(passthrough(answer))
}

/// POST /generate_solution_with_feedback
pub async fn generate_solution_with_feedback(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateSolutionWithFeedbackRequest>, JsonRejection>,
) -> ApiResult<String> {
    let req = body(payload)?;
    let (Some(feedback), Some(problem_statement)) =
        (req.feedback.as_deref(), req.problem_statement.as_deref())
    else {
        return Err(ApiError::MissingField("Both povs & ps must be provided"));
    };

    let message = build_message(&MessageKind::GenerateSolutionWithFeedback {
        feedback,
        previous_solution: req.prev_solution.as_deref(),
        problem_statement,
    });
    let answer = state
        .agents
        .invoke(ASSISTANT, IDEATION_SYSTEM_PROMPT, &message)
        .await?;
    reply(passthrough(answer))
}

/// Accept the list as the literal string the front-end stores, or as a JSON
/// array of `[name, perspective]` pairs. Both fail with the same error.
fn resolve_agent_list(agent_list: Value) -> Result<Vec<Persona>, ApiError> {
    match agent_list {
        Value::String(literal) => parse_persona_list(&literal).map_err(|e| {
            let detail = match e {
                ExtractError::InvalidListFormat { detail } => detail,
                other => other.to_string(),
            };
            ApiError::InvalidAgentList(detail)
        }),
        pairs @ Value::Array(_) => serde_json::from_value(pairs)
            .map_err(|e| ApiError::InvalidAgentList(format!("expected [name, perspective] string pairs: {}", e))),
        other => Err(ApiError::InvalidAgentList(format!(
            "expected a list literal or an array of pairs, found {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

async fn ask_persona(agents: &AgentFactory, persona: &Persona, message: &str) -> Result<String, ApiError> {
    let exchange = agents
        .assistant(
            persona.name.as_str(),
            persona_system_prompt(&persona.name, &persona.perspective),
        )
        .with_max_consecutive_auto_reply(PERSONA_AUTO_REPLY_LIMIT)
        .initiate_chat(message, 1)
        .await?;
    Ok(exchange.reply().to_string())
}

/// Ask every persona in turn and join the replies with no separator.
///
/// Sequential: total latency is the sum of the per-persona calls.
async fn ask_each(agents: &AgentFactory, personas: &[Persona], message: &str) -> Result<String, ApiError> {
    let mut combined = String::new();
    for persona in personas {
        combined.push_str(&ask_persona(agents, persona, message).await?);
    }
    tracing::debug!(agents = personas.len(), chars = combined.len(), "Collected persona replies");
    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, LlmConfig};
    use crate::llm::scripted::ScriptedClient;
    use crate::llm::{ChatMessage, LlmError, Role};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::json;
    use tower::ServiceExt;

    fn app(client: Arc<ScriptedClient>) -> Router {
        let state = AppState::new(Config::new(LlmConfig::default()), client);
        crate::api::router(Arc::new(state))
    }

    async fn post_raw(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        post_raw(app, uri, body.to_string()).await
    }

    fn last_user_message(calls: &[Vec<ChatMessage>]) -> &str {
        let conversation = calls.last().expect("at least one call");
        conversation
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .expect("user message")
    }

    #[tokio::test]
    async fn rephrase_returns_single_reply_from_one_call() {
        let client = Arc::new(ScriptedClient::new(["How can we manage population growth?"]));
        let (status, body) = post(
            app(client.clone()),
            "/rephrase",
            json!({"problem_statement": "too many people"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "How can we manage population growth?");
        assert_eq!(client.call_count(), 1);
        let calls = client.calls();
        assert_eq!(calls[0][0], ChatMessage::system(REPHRASING_SYSTEM_PROMPT));
        assert!(last_user_message(&calls).contains("'too many people'"));
    }

    #[tokio::test]
    async fn rephrase_without_statement_is_rejected() {
        let client = Arc::new(ScriptedClient::new(["unused"]));
        let (status, body) = post(app(client.clone()), "/rephrase", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "problem_statement must be provided");
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn rephrase_with_feedback_requires_both_fields() {
        let cases = [
            json!({"previous_ver": null, "feedback": "x"}),
            json!({"previous_ver": "Why?", "feedback": null}),
            json!({"feedback": "x"}),
            json!({"previous_ver": "Why?"}),
            json!({}),
        ];
        for case in cases {
            let client = Arc::new(ScriptedClient::new(["unused"]));
            let (status, body) = post(app(client.clone()), "/rephrase_with_feedback", case.clone()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "case {}", case);
            assert_eq!(body, json!({"error": "Both previous_ver and feedback must be provided"}));
            assert_eq!(client.call_count(), 0);
        }

        let client = Arc::new(ScriptedClient::new(["Why do cities grow so fast?"]));
        let (status, body) = post(
            app(client.clone()),
            "/rephrase_with_feedback",
            json!({"previous_ver": "Why are there so many people?", "feedback": "focus on cities"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "Why do cities grow so fast?");
        assert!(last_user_message(&client.calls()).contains("based on the feedback: 'focus on cities'"));
    }

    #[tokio::test]
    async fn create_persona_list_extracts_pairs_in_order() {
        let client = Arc::new(ScriptedClient::new(["Here: [['A','desc1'],['B','desc2']]"]));
        let (status, body) = post(
            app(client.clone()),
            "/create_persona_list",
            json!({"problem_statement": "overpopulation"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"response": [["A", "desc1"], ["B", "desc2"]]}));
        let calls = client.calls();
        assert_eq!(calls[0][0].content, persona_creator_system_prompt());
        assert_eq!(last_user_message(&calls), "overpopulation");
    }

    #[tokio::test]
    async fn create_persona_list_reports_missing_and_malformed_lists() {
        let client = Arc::new(ScriptedClient::new(["Sorry, I cannot do that."]));
        let (status, body) = post(
            app(client),
            "/create_persona_list",
            json!({"problem_statement": "overpopulation"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "List not found in response");

        let client = Arc::new(ScriptedClient::new(["[['A', 'desc1'] ['B' 'desc2']]"]));
        let (status, body) = post(
            app(client),
            "/create_persona_list",
            json!({"problem_statement": "overpopulation"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid list format");

        let client = Arc::new(ScriptedClient::new(["unused"]));
        let (status, body) = post(app(client), "/create_persona_list", json!({"problem_statement": null})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Problem statement must be provided");
    }

    #[tokio::test]
    async fn single_agent_perspective_uses_persona_prompt() {
        let client = Arc::new(ScriptedClient::new(["Tax large families."]));
        let (status, body) = post(
            app(client.clone()),
            "/get_agent_perspective",
            json!({
                "agent_name": "Population Control Paul",
                "agent_perspective": "incentives for smaller families",
                "problem_statement": "overpopulation"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "Tax large families.");
        let calls = client.calls();
        assert_eq!(
            calls[0][0].content,
            "You are Population Control Paul, your perspective is : incentives for smaller families"
        );
        assert!(last_user_message(&calls).contains("find a solution to overpopulation in 20 words"));
    }

    #[tokio::test]
    async fn single_agent_feedback_requires_solution() {
        let client = Arc::new(ScriptedClient::new(["unused"]));
        let (status, _) = post(
            app(client.clone()),
            "/get_agent_feedback",
            json!({"agent_name": "Eva", "agent_perspective": "education", "problem_statement": "p"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(client.call_count(), 0);

        let client = Arc::new(ScriptedClient::new(["Needs schools."]));
        let (status, body) = post(
            app(client.clone()),
            "/get_agent_feedback",
            json!({"agent_name": "Eva", "agent_perspective": "education", "problem_statement": "p", "solution": "s"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "Needs schools.");
        assert!(last_user_message(&client.calls()).starts_with("The solution : s is being proposed for the problem p"));
    }

    #[tokio::test]
    async fn perspectives_call_each_agent_once_and_concatenate_in_order() {
        let client = Arc::new(ScriptedClient::new(["one.", "two.", "three."]));
        let (status, body) = post(
            app(client.clone()),
            "/get_agent_perspectives",
            json!({
                "agent_list": "[['A', 'a view'], ['B', 'b view'], ['C', 'c view']]",
                "problem_statement": "overpopulation"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "one.two.three.");
        let calls = client.calls();
        assert_eq!(calls.len(), 3);
        let systems: Vec<_> = calls.iter().map(|c| c[0].content.as_str()).collect();
        assert_eq!(
            systems,
            [
                "You are A, your perspective is : a view",
                "You are B, your perspective is : b view",
                "You are C, your perspective is : c view",
            ]
        );
    }

    #[tokio::test]
    async fn feedbacks_accept_json_array_agent_list() {
        let client = Arc::new(ScriptedClient::new(["too slow. ", "too costly."]));
        let (status, body) = post(
            app(client.clone()),
            "/get_agent_feedbacks",
            json!({
                "agent_list": [["A", "a view"], ["B", "b view"]],
                "problem_statement": "traffic",
                "solution": "build roads"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "too slow. too costly.");
        assert_eq!(client.call_count(), 2);
        assert!(last_user_message(&client.calls()).contains("The solution : build roads"));
    }

    #[tokio::test]
    async fn empty_agent_list_makes_no_calls() {
        let client = Arc::new(ScriptedClient::new(["unused"]));
        let (status, body) = post(
            app(client.clone()),
            "/get_agent_perspectives",
            json!({"agent_list": "[]", "problem_statement": "p"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "");
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn malformed_agent_list_is_rejected_before_any_call() {
        let client = Arc::new(ScriptedClient::new(["unused"]));
        let (status, body) = post(
            app(client.clone()),
            "/get_agent_perspectives",
            json!({"agent_list": "[['A', 'a view'", "problem_statement": "p"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid agent_list:"));
        assert_eq!(client.call_count(), 0);

        for agent_list in [json!([["A"]]), json!([["A", 1]]), json!({"A": "a"}), json!(7)] {
            let (status, body) = post(
                app(client.clone()),
                "/get_agent_feedbacks",
                json!({"agent_list": agent_list, "problem_statement": "p", "solution": "s"}),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "agent_list {}", agent_list);
            assert!(body["error"].as_str().unwrap().starts_with("Invalid agent_list:"), "got {}", body);
        }
        assert_eq!(client.call_count(), 0);

        let (status, body) = post(
            app(client.clone()),
            "/get_agent_feedbacks",
            json!({"problem_statement": "p", "solution": "s"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "agent_list, problem_statement and solution must be provided");
    }

    #[tokio::test]
    async fn generate_solution_requires_both_fields() {
        for case in [json!({"pov_para": "x"}), json!({"problem_statement": "p"}), json!({})] {
            let client = Arc::new(ScriptedClient::new(["unused"]));
            let (status, body) = post(app(client), "/generate_solution", case).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Both povs & ps must be provided");
        }

        let client = Arc::new(ScriptedClient::new(["1. Educate. 2. Incentivize."]));
        let (status, body) = post(
            app(client.clone()),
            "/generate_solution",
            json!({"pov_para": "Paul: tax. Eva: school.", "problem_statement": "overpopulation"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "1. Educate. 2. Incentivize.");
        assert_eq!(client.calls()[0][0], ChatMessage::system(IDEATION_SYSTEM_PROMPT));
    }

    #[tokio::test]
    async fn solution_with_feedback_validates_required_subsets_only() {
        let missing = [
            json!({"feedback": null, "problem_statement": "p", "prev_solution": "s"}),
            json!({"feedback": "f", "prev_solution": "s"}),
            json!({"prev_solution": "s"}),
            json!({}),
        ];
        for case in missing {
            let client = Arc::new(ScriptedClient::new(["unused"]));
            let (status, body) = post(app(client.clone()), "/generate_solution_with_feedback", case.clone()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "case {}", case);
            assert_eq!(body["error"], "Both povs & ps must be provided");
            assert_eq!(client.call_count(), 0);
        }

        let client = Arc::new(ScriptedClient::new(["Revised plan."]));
        let (status, body) = post(
            app(client.clone()),
            "/generate_solution_with_feedback",
            json!({"feedback": "too costly", "problem_statement": "traffic"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "Revised plan.");
        assert!(last_user_message(&client.calls()).contains("improvise a solution for solving"));
    }

    #[tokio::test]
    async fn backend_failures_map_to_gateway_errors() {
        let client = Arc::new(ScriptedClient::failing(LlmError::BackendUnavailable(
            "connection refused".to_string(),
        )));
        let (status, body) = post(app(client), "/rephrase", json!({"problem_statement": "x"})).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().starts_with("LLM backend error:"));

        let client = Arc::new(ScriptedClient::failing(LlmError::Timeout(240)));
        let (status, _) = post(
            app(client),
            "/get_agent_perspectives",
            json!({"agent_list": "[['A', 'a']]", "problem_statement": "x"}),
        )
        .await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request_with_error_envelope() {
        let client = Arc::new(ScriptedClient::new(["unused"]));
        let (status, body) = post_raw(app(client.clone()), "/rephrase", "{not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body:"));

        let (status, _) = post(app(client.clone()), "/rephrase", json!({"problem_statement": 42})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let client = Arc::new(ScriptedClient::new(["ok"]));
        let response = app(client)
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/rephrase")
                    .header("origin", "http://localhost:3000")
                    .header("access-control-request-method", "POST")
                    .header("access-control-request-headers", "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn health_reports_model() {
        let client = Arc::new(ScriptedClient::new(Vec::<String>::new()));
        let response = app(client)
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], crate::config::DEFAULT_MODEL);
    }
}
