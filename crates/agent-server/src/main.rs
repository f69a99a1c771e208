//! job-scout HTTP Server
//!
//! Axum server exposing the job search and weather agents over REST.
//! Each `conversation_id` is its own agent session, with its own paging
//! state for "show me more jobs".

mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::MemorySessionStore;
use job_scout::JobScout;

use crate::handlers::{chat_handler, health_check, list_models, preferences_handler};
use crate::state::AppState;

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/models", get(list_models))
        // Agent API
        .route("/api/chat", post(chat_handler))
        .route("/api/preferences", get(preferences_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let provider = agent_runtime::provider_from_env()?;

    match provider.health_check().await {
        Ok(true) => {
            tracing::info!("✓ Connected to LLM provider");
            if let Ok(models) = provider.list_models().await {
                for model in models {
                    tracing::info!("  Model: {}", model.id);
                }
            }
        }
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ LLM provider not available - chat will fail");
            tracing::warn!("  Check LLM_PROVIDER and its settings in .env");
        }
    }

    let scout = JobScout::from_env()?;
    let job_tools = scout.job_tools();
    let weather_tools = scout.weather_tools();

    for (agent, tools) in [("jobs", &job_tools), ("weather", &weather_tools)] {
        tracing::info!("{} agent tools: {}", agent, tools.names().join(", "));
    }

    let state = AppState {
        provider,
        job_tools: Arc::new(job_tools),
        weather_tools: Arc::new(weather_tools),
        sessions: Arc::new(MemorySessionStore::new()),
        memory: scout.memory().clone(),
        default_user: scout.default_user().clone(),
    };

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🚀 job-scout server running on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health           - Health check");
    tracing::info!("  GET  /api/models       - List available models");
    tracing::info!("  POST /api/chat         - Send message");
    tracing::info!("  GET  /api/preferences  - Remembered job preferences");

    axum::serve(listener, router(state)).await?;

    Ok(())
}
