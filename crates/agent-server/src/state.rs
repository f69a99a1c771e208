//! Application State

use std::sync::Arc;

use agent_core::{LlmProvider, MemorySessionStore, ToolRegistry};
use job_scout::{MemoryClient, UserId};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// LLM provider (Ollama, OpenAI)
    pub provider: Arc<dyn LlmProvider>,

    /// `job_role`, `more_jobs`, `search_jobs`
    pub job_tools: Arc<ToolRegistry>,

    /// `get_weather` (when configured) and `search`
    pub weather_tools: Arc<ToolRegistry>,

    /// Conversations by `conversation_id`
    pub sessions: Arc<MemorySessionStore>,

    /// Preference lookups for `/api/preferences`
    pub memory: MemoryClient,

    /// Used when a request names no user
    pub default_user: UserId,
}
