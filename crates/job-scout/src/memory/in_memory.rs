//! In-process memory store
//!
//! For offline runs and tests. Search ignores the query and returns the
//! user's snippets in insertion order; each `add` message becomes a snippet
//! whose text is the raw message content.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use super::{MemoryMessage, MemorySnippet, MemoryStore};
use crate::error::{JobScoutError, Result};
use crate::model::UserId;

#[derive(Default)]
struct State {
    snippets: HashMap<UserId, Vec<MemorySnippet>>,
    writes: Vec<MemoryMessage>,
    available: bool,
    /// Reject writes once this many have succeeded
    fail_after: Option<usize>,
}

pub struct InMemoryStore {
    state: Mutex<State>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                available: true,
                ..State::default()
            }),
        }
    }

    /// Insert snippets as if the service had produced them
    pub async fn seed(&self, user: &UserId, snippets: Vec<MemorySnippet>) {
        let mut state = self.state.lock().await;
        state.snippets.entry(user.clone()).or_default().extend(snippets);
    }

    /// Every message accepted so far, across users
    pub async fn writes(&self) -> Vec<MemoryMessage> {
        self.state.lock().await.writes.clone()
    }

    /// Simulate the service going down (or coming back)
    pub async fn set_available(&self, available: bool) {
        self.state.lock().await.available = available;
    }

    /// Accept `n` more writes, then reject the rest
    pub async fn fail_after(&self, n: usize) {
        let mut state = self.state.lock().await;
        state.fail_after = Some(state.writes.len() + n);
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn add(
        &self,
        user: &UserId,
        messages: Vec<MemoryMessage>,
        metadata: Option<Value>,
    ) -> Result<Value> {
        let mut state = self.state.lock().await;

        if !state.available {
            return Err(JobScoutError::Store("in-memory store unavailable".into()));
        }
        if state.fail_after.is_some_and(|limit| state.writes.len() >= limit) {
            return Err(JobScoutError::Store("write rejected".into()));
        }

        let now = Utc::now().to_rfc3339();
        let mut ids = Vec::with_capacity(messages.len());
        for message in messages {
            let id = format!("mem-{}", state.writes.len() + 1);
            let snippet = MemorySnippet {
                id: Some(id.clone()),
                memory: message.content.clone(),
                metadata: metadata.clone(),
                created_at: Some(now.clone()),
                ..MemorySnippet::default()
            };
            state.snippets.entry(user.clone()).or_default().push(snippet);
            state.writes.push(message);
            ids.push(json!({"id": id, "event": "ADD"}));
        }

        Ok(json!({ "results": ids }))
    }

    async fn search(&self, user: &UserId, _query: &str) -> Result<Vec<MemorySnippet>> {
        let state = self.state.lock().await;

        if !state.available {
            return Err(JobScoutError::Store("in-memory store unavailable".into()));
        }

        Ok(state.snippets.get(user).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
