//! # job-scout
//!
//! Job search and weather tools for `agent-core` agents, with long-term
//! preference memory.
//!
//! ```text
//!             ┌──────────── ToolContext { session_id, user_id } ───────────┐
//!             ▼                                                            │
//!  job_role ──► PaginationRegistry ──► JobProvider (searchapi.io)     Agent loop
//!      │              ▲                                                    │
//!      │         more_jobs                                                 │
//!      └──► MemoryClient ──► MemoryStore (Mem0)                            │
//!  get_weather ──► WeatherProvider (weatherstack) ◄────────────────────────┘
//! ```
//!
//! Each conversation pages through its own search; preferences and shown
//! listings are appended to the memory store per user. Store outages are
//! logged and otherwise ignored.

pub mod config;
pub mod error;
pub mod jobs;
pub mod memory;
pub mod model;
pub mod normalize;
pub mod pagination;
pub mod retry;
pub mod svckit;
pub mod weather;

use std::sync::Arc;

use agent_core::ToolRegistry;

pub use config::JobScoutConfig;
pub use error::{JobScoutError, Result, Service};
pub use memory::{MemoryClient, MemoryStore};
pub use model::{JobPage, JobQuery, JobRecord, PaginationState, PreferenceRecord, StoredFact, UserId};
pub use pagination::{PaginationRegistry, SearchOutcome};
pub use retry::RetryPolicy;

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{JobRoleTool, MoreJobsTool, SearchJobsTool, SearchTool, WeatherTool};
}

use jobs::{JobProvider, SearchApiClient};
use memory::Mem0Store;
use weather::{WeatherProvider, WeatherstackClient};

/// Backends shared by every tool, wired once at start-up
pub struct JobScout {
    jobs: Arc<dyn JobProvider>,
    pages: Arc<PaginationRegistry>,
    memory: MemoryClient,
    weather: Option<Arc<dyn WeatherProvider>>,
    default_user: UserId,
    retry: RetryPolicy,
}

impl JobScout {
    pub fn new(jobs: Arc<dyn JobProvider>, store: Arc<dyn MemoryStore>, default_user: UserId) -> Self {
        Self {
            pages: Arc::new(PaginationRegistry::new(jobs.clone())),
            jobs,
            memory: MemoryClient::new(store),
            weather: None,
            default_user,
            retry: RetryPolicy::default(),
        }
    }

    /// searchapi.io, Mem0 and (when keyed) weatherstack
    pub fn from_config(config: &JobScoutConfig) -> Result<Self> {
        let jobs = Arc::new(SearchApiClient::new(config.searchapi.clone())?);
        let store = Arc::new(Mem0Store::new(config.mem0.clone())?);
        let mut scout = Self::new(jobs, store, config.user_id.clone()).with_retry(config.retry);

        if let Some(weatherstack) = &config.weatherstack {
            scout = scout.with_weather(Arc::new(WeatherstackClient::new(weatherstack.clone())?));
        }
        Ok(scout)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_config(&JobScoutConfig::from_env()?)
    }

    pub fn with_weather(mut self, weather: Arc<dyn WeatherProvider>) -> Self {
        self.weather = Some(weather);
        self
    }

    /// Applies to job, memory and weather calls. Resets pagination state.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.pages = Arc::new(PaginationRegistry::new(self.jobs.clone()).with_retry(retry));
        self.memory = self.memory.with_retry(retry);
        self.retry = retry;
        self
    }

    pub fn memory(&self) -> &MemoryClient {
        &self.memory
    }

    pub fn default_user(&self) -> &UserId {
        &self.default_user
    }

    pub fn has_weather(&self) -> bool {
        self.weather.is_some()
    }

    /// `search_jobs`, `job_role` and `more_jobs`
    pub fn register_job_tools(&self, registry: &mut ToolRegistry) {
        registry.register(tools::SearchJobsTool);
        registry.register(tools::JobRoleTool::new(
            self.pages.clone(),
            self.memory.clone(),
            self.default_user.clone(),
        ));
        registry.register(tools::MoreJobsTool::new(self.pages.clone()));
    }

    /// `search`, plus `get_weather` when a weather provider is configured
    pub fn register_weather_tools(&self, registry: &mut ToolRegistry) {
        registry.register(tools::SearchTool);
        match &self.weather {
            Some(weather) => {
                registry.register(tools::WeatherTool::new(weather.clone()).with_retry(self.retry));
            }
            None => tracing::warn!("No weather access key configured, get_weather disabled"),
        }
    }

    pub fn job_tools(&self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        self.register_job_tools(&mut registry);
        registry
    }

    pub fn weather_tools(&self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        self.register_weather_tools(&mut registry);
        registry
    }
}

/// System prompt for the job search agent
pub const JOB_AGENT_PROMPT: &str = r#"You are a job search agent.

You must follow this reasoning process for EVERY user request:

PLAN:
- Identify the user's intent (new search, more jobs, or stop)

ACT:
- Decide which tool to call (job_role or more_jobs)
- If no tool is needed, say so

OBSERVATION:
- Summarize what the tool returned (internally)

FINAL:
- Present job results clearly to the user

## Rules

- Always think using PLAN -> ACT -> OBSERVATION -> FINAL
- NEVER expose raw internal reasoning
- Only expose FINAL to the user
- Use `job_role` for the first search
- Use `more_jobs` only when the user asks for more
- If no more jobs exist, say "No more jobs available""#;

/// System prompt for the weather agent
pub const WEATHER_AGENT_PROMPT: &str = r#"You are a helpful assistant that can search for information and provide weather updates.

Use the provided tools to answer user queries effectively. Use `get_weather` for any question about current weather.

If someone asks for anything other than weather information, simply say sorry."#;
