//! # agent-runtime
//!
//! Runtime providers for the job-scout agents.
//!
//! ## Providers
//!
//! - **Ollama** (default): Local LLM inference via Ollama
//! - **OpenAI** (`openai` feature): any Chat Completions endpoint
//!
//! ## Usage
//!
//! ```rust,ignore
//! let provider = agent_runtime::provider_from_env()?;
//! let agent = AgentBuilder::new()
//!     .provider(provider)
//!     .build()?;
//! ```

use std::sync::Arc;

#[cfg(feature = "ollama")]
pub mod ollama;
#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};
#[cfg(feature = "openai")]
pub use openai::{OpenAiConfig, OpenAiProvider};

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentError, LlmProvider, Message, Result, Role, Session, Tool, ToolRegistry,
};

/// Backend named by `LLM_PROVIDER` (`ollama` unless set)
pub fn provider_from_env() -> Result<Arc<dyn LlmProvider>> {
    let name = std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "ollama".into());
    provider_named(&name)
}

pub fn provider_named(name: &str) -> Result<Arc<dyn LlmProvider>> {
    match name.trim().to_ascii_lowercase().as_str() {
        #[cfg(feature = "ollama")]
        "ollama" => Ok(Arc::new(OllamaProvider::from_env())),
        #[cfg(feature = "openai")]
        "openai" => Ok(Arc::new(OpenAiProvider::from_env()?)),
        other => Err(AgentError::Config(format!(
            "Unknown or disabled LLM provider: {other}"
        ))),
    }
}
