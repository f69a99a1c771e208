//! HTTP Handlers

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use agent_core::{
    AgentError, Message, Session, SessionId, SessionStore,
    provider::{GenerationOptions, ModelInfo},
    reasoning::{Agent, AgentConfig},
};
use job_scout::{JOB_AGENT_PROMPT, PreferenceRecord, UserId, WEATHER_AGENT_PROMPT};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub llm_connected: bool,
    pub weather_enabled: bool,
}

/// Which agent answers a conversation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    #[default]
    Jobs,
    Weather,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub agent: AgentKind,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub conversation_id: String,
    pub model: String,
}

#[derive(Debug, Deserialize)]
pub struct PreferencesQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub user_id: String,
    pub preferences: Vec<PreferenceRecord>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, code: &str, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let llm_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        llm_connected,
        weather_enabled: state.weather_tools.get("get_weather").is_some(),
    })
}

pub async fn list_models(State(state): State<AppState>) -> Result<Json<Vec<ModelInfo>>, ApiError> {
    state.provider.list_models().await.map(Json).map_err(|e| {
        tracing::warn!("Model listing failed: {}", e);
        api_error(StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_UNAVAILABLE", e.user_message())
    })
}

/// Chat endpoint.
///
/// Reusing a `conversation_id` continues that conversation, including its
/// job search, so "show me more" pages through the right results.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "EMPTY_MESSAGE", "Message must not be empty"));
    }

    let conversation_id = payload
        .conversation_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let session_id = SessionId::from_string(conversation_id.as_str());

    let mut session = state
        .sessions
        .load(&session_id)
        .map_err(internal)?
        .unwrap_or_else(|| {
            let user = payload
                .user_id
                .clone()
                .unwrap_or_else(|| state.default_user.to_string());
            Session::with_id(session_id.clone()).for_user(user)
        });
    session.conversation.push(Message::user(payload.message.as_str()));

    let model = payload
        .model
        .clone()
        .unwrap_or_else(|| state.provider.default_model().to_string());

    let (system_prompt, tools) = match payload.agent {
        AgentKind::Jobs => (JOB_AGENT_PROMPT, state.job_tools.clone()),
        AgentKind::Weather => (WEATHER_AGENT_PROMPT, state.weather_tools.clone()),
    };
    let config = AgentConfig {
        system_prompt: system_prompt.into(),
        generation: GenerationOptions::for_model(model.as_str()),
        ..Default::default()
    };
    let agent = Agent::new(state.provider.clone(), tools, config);

    tracing::debug!(conversation = %session_id, agent = ?payload.agent, "Chat turn");

    let outcome = agent.run(&mut session).await;
    // Keep the transcript even when the turn failed
    state.sessions.save(&session).map_err(internal)?;

    let message = outcome.map_err(|e| {
        tracing::error!("Agent error: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "AGENT_ERROR", e.user_message())
    })?;

    Ok(Json(ChatResponse {
        message,
        conversation_id,
        model,
    }))
}

/// Remembered role/location for a user
pub async fn preferences_handler(
    State(state): State<AppState>,
    Query(query): Query<PreferencesQuery>,
) -> Result<Json<PreferencesResponse>, ApiError> {
    let user = query
        .user_id
        .map_or_else(|| state.default_user.clone(), UserId::new);

    let preferences = state.memory.get_preferences(&user).await.map_err(|e| {
        tracing::warn!(%user, "Preference lookup failed: {}", e);
        api_error(StatusCode::BAD_GATEWAY, "MEMORY_UNAVAILABLE", e.user_message())
    })?;

    Ok(Json(PreferencesResponse {
        user_id: user.to_string(),
        preferences,
    }))
}

fn internal(e: AgentError) -> ApiError {
    tracing::error!("Session store error: {}", e);
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "SESSION_ERROR", e.user_message())
}
