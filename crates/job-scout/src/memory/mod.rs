//! Long-term Memory
//!
//! Append-only facts (job preferences, discovered jobs) kept in an external
//! semantic memory service, one namespace per [`UserId`].
//!
//! ```text
//!  job_role tool ──save_preference──┐
//!                ──save_jobs───────┤   MemoryClient ──add/search──▶ MemoryStore
//!  job-chat      ──get_preferences──┘       (retry)                (Mem0 / in-process)
//! ```

mod in_memory;
mod mem0;
mod preferences;

pub use in_memory::InMemoryStore;
pub use mem0::{Mem0Api, Mem0Config, Mem0Store};
pub use preferences::{extract_from_text, extract_structured, resolve_preference};

use std::sync::Arc;

use agent_core::Role;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::model::{JobRecord, PreferenceRecord, StoredFact, UserId};
use crate::retry::RetryPolicy;

/// Query used to find the user's remembered search
pub const PREFERENCE_QUERY: &str = "preferred job role location";

/// One message handed to the store's `add` call
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryMessage {
    pub role: Role,
    /// JSON-encoded [`StoredFact`]
    pub content: String,
}

/// One search hit as returned by the store
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemorySnippet {
    #[serde(default)]
    pub id: Option<String>,

    /// Free text the service derived from what was stored
    #[serde(default)]
    pub memory: String,

    /// Whatever metadata was attached on `add`
    #[serde(default)]
    pub metadata: Option<Value>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub score: Option<f64>,
}

impl MemorySnippet {
    pub fn text(memory: impl Into<String>) -> Self {
        Self {
            memory: memory.into(),
            ..Self::default()
        }
    }
}

/// Semantic memory backend
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Append messages for `user`; returns the service's acknowledgment
    async fn add(
        &self,
        user: &UserId,
        messages: Vec<MemoryMessage>,
        metadata: Option<Value>,
    ) -> Result<Value>;

    /// Snippets relevant to `query`, in the service's ranking order
    async fn search(&self, user: &UserId, query: &str) -> Result<Vec<MemorySnippet>>;

    fn name(&self) -> &str;
}

/// Reads and writes job facts through a [`MemoryStore`]
#[derive(Clone)]
pub struct MemoryClient {
    store: Arc<dyn MemoryStore>,
    retry: RetryPolicy,
}

impl MemoryClient {
    pub fn new(store: Arc<dyn MemoryStore>) -> Self {
        Self {
            store,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Append a `job_preference` fact. Role and location are free text.
    pub async fn save_preference(&self, user: &UserId, role: &str, location: &str) -> Result<Value> {
        let ack = self
            .append(user, Role::User, &StoredFact::preference(role, location))
            .await?;
        tracing::debug!(%user, role, location, "Saved job preference");
        Ok(ack)
    }

    /// Append one `job` fact per listing, in order.
    ///
    /// Stops at the first failed write, so a prefix of `jobs` may already be
    /// stored when this returns an error.
    pub async fn save_jobs(
        &self,
        user: &UserId,
        role: &str,
        location: &str,
        jobs: &[JobRecord],
    ) -> Result<usize> {
        for (written, job) in jobs.iter().enumerate() {
            if let Err(e) = self
                .append(user, Role::System, &StoredFact::job(role, location, job))
                .await
            {
                tracing::warn!(%user, written, total = jobs.len(), "Job batch interrupted");
                return Err(e);
            }
        }
        tracing::debug!(%user, count = jobs.len(), "Saved jobs");
        Ok(jobs.len())
    }

    /// The user's current preference as a zero- or one-element list.
    ///
    /// See [`resolve_preference`] for how snippets are interpreted.
    pub async fn get_preferences(&self, user: &UserId) -> Result<Vec<PreferenceRecord>> {
        let store = &self.store;
        let snippets = self
            .retry
            .run("memory search", move || store.search(user, PREFERENCE_QUERY))
            .await?;

        Ok(resolve_preference(&snippets).into_iter().collect())
    }

    /// Like [`Self::get_preferences`], but a store failure yields no preferences
    pub async fn recall_preferences(&self, user: &UserId) -> Vec<PreferenceRecord> {
        match self.get_preferences(user).await {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!(%user, error = %e, "Preference recall failed, continuing without");
                Vec::new()
            }
        }
    }

    async fn append(&self, user: &UserId, role: Role, fact: &StoredFact) -> Result<Value> {
        let messages = vec![MemoryMessage {
            role,
            content: serde_json::to_string(fact)?,
        }];
        let metadata = serde_json::to_value(fact)?;
        let store = &self.store;

        self.retry
            .run("memory add", move || {
                store.add(user, messages.clone(), Some(metadata.clone()))
            })
            .await
    }
}
