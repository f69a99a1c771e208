//! # agent-core
//!
//! Provider-agnostic agent framework: conversation types, the `LlmProvider`
//! strategy trait, the tool system and a ReAct reasoning loop.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Agent                              │
//! │  ┌─────────────┐  ┌──────────────┐  ┌───────────────────┐   │
//! │  │  Reasoning  │  │    Tools     │  │   LlmProvider     │   │
//! │  │    Loop     │──│   Registry   │──│   (Strategy)      │   │
//! │  └─────────────┘  └──────────────┘  └───────────────────┘   │
//! │          │ ToolContext { session_id, user_id }              │
//! └──────────┴──────────────────────────────────────────────────┘
//! ```
//!
//! Tools never see globals: every call carries the session and user it runs
//! for, which is what lets domain tools keep per-conversation state.

pub mod error;
pub mod message;
pub mod provider;
pub mod reasoning;
pub mod session;
pub mod tool;

pub use error::{AgentError, Result};
pub use message::{Conversation, Message, Role};
pub use provider::LlmProvider;
pub use reasoning::{Agent, AgentBuilder, AgentConfig};
pub use session::{MemorySessionStore, Session, SessionId, SessionStore};
pub use tool::{Tool, ToolCall, ToolContext, ToolRegistry, ToolResult, ToolSchema};
