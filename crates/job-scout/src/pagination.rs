//! Pagination Sessions
//!
//! Remembers, per conversation, which role/location was searched last and
//! the provider's continuation token, so "show me more" needs no arguments.
//!
//! A session holds at most one search. `start_search` always replaces it;
//! `continue_search` only reaches the provider while a token is present.
//! The lock is not held across provider calls.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use agent_core::SessionId;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::jobs::JobProvider;
use crate::model::{JobPage, JobQuery, PaginationState};
use crate::retry::RetryPolicy;

/// Listings shown (and remembered) per page
pub const PAGE_SIZE: usize = 5;

pub const NO_JOBS_FOUND: &str = "No jobs found.";
pub const NO_MORE_JOBS: &str = "No more jobs available.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// At most [`PAGE_SIZE`] listings, plus whether another page exists
    Jobs(JobPage),
    /// First page came back empty
    NoJobs,
    /// No token left, or the next page came back empty
    NoMoreJobs,
}

impl SearchOutcome {
    fn from_page(mut page: JobPage, empty: SearchOutcome) -> Self {
        if page.jobs.is_empty() {
            return empty;
        }
        page.jobs.truncate(PAGE_SIZE);
        SearchOutcome::Jobs(page)
    }
}

/// A session's search, tagged with the `start_search` that created it
struct SearchSlot {
    generation: u64,
    state: PaginationState,
}

pub struct PaginationRegistry {
    provider: Arc<dyn JobProvider>,
    retry: RetryPolicy,
    sessions: RwLock<HashMap<SessionId, SearchSlot>>,
    generations: AtomicU64,
}

impl PaginationRegistry {
    pub fn new(provider: Arc<dyn JobProvider>) -> Self {
        Self {
            provider,
            retry: RetryPolicy::default(),
            sessions: RwLock::new(HashMap::new()),
            generations: AtomicU64::new(0),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Begin a new search for `session`, discarding any previous token.
    ///
    /// Role and location are recorded even if the provider call fails.
    pub async fn start_search(&self, session: &SessionId, role: &str, location: &str) -> Result<SearchOutcome> {
        let generation = self.generations.fetch_add(1, Ordering::Relaxed);
        let slot = SearchSlot {
            generation,
            state: PaginationState::new(role, location),
        };
        self.sessions.write().await.insert(session.clone(), slot);

        let page = self.fetch(JobQuery::first_page(role, location)).await?;
        self.record_token(session, generation, page.next_page_token.clone()).await;

        tracing::debug!(
            %session,
            role,
            location,
            found = page.jobs.len(),
            more = page.next_page_token.is_some(),
            "Started job search"
        );
        Ok(SearchOutcome::from_page(page, SearchOutcome::NoJobs))
    }

    /// Fetch the next page of the session's current search.
    ///
    /// Without a stored token this returns [`SearchOutcome::NoMoreJobs`]
    /// and makes no provider call. On provider failure the token is kept.
    pub async fn continue_search(&self, session: &SessionId) -> Result<SearchOutcome> {
        let pending = self
            .sessions
            .read()
            .await
            .get(session)
            .and_then(|slot| Some((slot.generation, slot.state.next_query()?)));
        let Some((generation, query)) = pending else {
            return Ok(SearchOutcome::NoMoreJobs);
        };

        let page = self.fetch(query).await?;
        let next = if page.jobs.is_empty() {
            None
        } else {
            page.next_page_token.clone()
        };
        self.record_token(session, generation, next).await;

        tracing::debug!(%session, found = page.jobs.len(), "Continued job search");
        Ok(SearchOutcome::from_page(page, SearchOutcome::NoMoreJobs))
    }

    /// Snapshot of a session's search, if one was started
    pub async fn state(&self, session: &SessionId) -> Option<PaginationState> {
        self.sessions.read().await.get(session).map(|slot| slot.state.clone())
    }

    pub async fn clear(&self, session: &SessionId) {
        self.sessions.write().await.remove(session);
    }

    async fn fetch(&self, query: JobQuery) -> Result<JobPage> {
        let provider = &self.provider;
        let query = &query;
        self.retry
            .run("job search", move || provider.search(query))
            .await
    }

    /// Store `token` unless a later `start_search` replaced the search
    async fn record_token(&self, session: &SessionId, generation: u64, token: Option<String>) {
        let mut sessions = self.sessions.write().await;
        if let Some(slot) = sessions.get_mut(session) {
            if slot.generation == generation {
                slot.state.next_page_token = token;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use tokio::sync::{Mutex, Notify};

    use super::*;
    use crate::error::{JobScoutError, Service};
    use crate::jobs::ScriptedJobProvider;
    use crate::model::JobRecord;

    fn registry(provider: &Arc<ScriptedJobProvider>) -> PaginationRegistry {
        PaginationRegistry::new(provider.clone()).with_retry(RetryPolicy::none())
    }

    fn jobs(outcome: &SearchOutcome) -> &JobPage {
        match outcome {
            SearchOutcome::Jobs(page) => page,
            other => panic!("expected jobs, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_first_page_reports_no_jobs() {
        let provider = Arc::new(ScriptedJobProvider::new());
        provider.push_listings(0, None).await;
        let pages = registry(&provider);
        let session = SessionId::from_string("s");

        let outcome = pages.start_search(&session, "Astronaut", "Berlin").await.unwrap();
        assert_eq!(outcome, SearchOutcome::NoJobs);

        let state = pages.state(&session).await.unwrap();
        assert_eq!(state.current_role, "Astronaut");
        assert!(state.next_page_token.is_none());
    }

    #[tokio::test]
    async fn continue_without_session_makes_no_call() {
        let provider = Arc::new(ScriptedJobProvider::new());
        let pages = registry(&provider);

        let outcome = pages.continue_search(&SessionId::from_string("nobody")).await.unwrap();
        assert_eq!(outcome, SearchOutcome::NoMoreJobs);
        assert_eq!(provider.call_count().await, 0);
    }

    #[tokio::test]
    async fn full_paging_scenario() {
        let provider = Arc::new(ScriptedJobProvider::new());
        provider.push_listings(7, Some("T1")).await;
        provider.push_listings(3, None).await;
        let pages = registry(&provider);
        let session = SessionId::from_string("s");

        let first = pages.start_search(&session, "Backend Developer", "Berlin").await.unwrap();
        assert_eq!(jobs(&first).jobs.len(), 5);
        assert_eq!(jobs(&first).jobs[4].title, "Job 5");
        assert_eq!(
            pages.state(&session).await.unwrap().next_page_token.as_deref(),
            Some("T1")
        );

        let second = pages.continue_search(&session).await.unwrap();
        assert_eq!(jobs(&second).jobs.len(), 3);
        assert!(pages.state(&session).await.unwrap().next_page_token.is_none());

        let third = pages.continue_search(&session).await.unwrap();
        assert_eq!(third, SearchOutcome::NoMoreJobs);
        assert_eq!(provider.call_count().await, 2);

        let queries = provider.queries().await;
        assert_eq!(queries[1].page_token.as_deref(), Some("T1"));
        assert_eq!(queries[1].role, "Backend Developer");
        assert_eq!(queries[1].location, "Berlin");
    }

    #[tokio::test]
    async fn continued_pages_are_truncated() {
        let provider = Arc::new(ScriptedJobProvider::new());
        provider.push_listings(2, Some("T1")).await;
        provider.push_listings(9, Some("T2")).await;
        let pages = registry(&provider);
        let session = SessionId::from_string("s");

        pages.start_search(&session, "SRE", "Oslo").await.unwrap();
        let next = pages.continue_search(&session).await.unwrap();
        assert_eq!(jobs(&next).jobs.len(), 5);
        assert_eq!(jobs(&next).next_page_token.as_deref(), Some("T2"));
    }

    #[tokio::test]
    async fn empty_continuation_exhausts_token() {
        let provider = Arc::new(ScriptedJobProvider::new());
        provider.push_listings(5, Some("T1")).await;
        provider.push_listings(0, Some("T2")).await;
        let pages = registry(&provider);
        let session = SessionId::from_string("s");

        pages.start_search(&session, "SRE", "Oslo").await.unwrap();
        assert_eq!(pages.continue_search(&session).await.unwrap(), SearchOutcome::NoMoreJobs);
        assert!(pages.state(&session).await.unwrap().next_page_token.is_none());

        assert_eq!(pages.continue_search(&session).await.unwrap(), SearchOutcome::NoMoreJobs);
        assert_eq!(provider.call_count().await, 2);
    }

    #[tokio::test]
    async fn new_search_discards_old_token() {
        let provider = Arc::new(ScriptedJobProvider::new());
        provider.push_listings(5, Some("T1")).await;
        provider.push_error(JobScoutError::Status { service: Service::Jobs, status: 401 }).await;
        let pages = registry(&provider);
        let session = SessionId::from_string("s");

        pages.start_search(&session, "SRE", "Oslo").await.unwrap();
        assert!(pages.start_search(&session, "Chef", "Paris").await.is_err());

        let state = pages.state(&session).await.unwrap();
        assert_eq!(state.current_role, "Chef");
        assert!(state.next_page_token.is_none());
        assert_eq!(pages.continue_search(&session).await.unwrap(), SearchOutcome::NoMoreJobs);
    }

    #[tokio::test]
    async fn failed_continuation_keeps_token() {
        let provider = Arc::new(ScriptedJobProvider::new());
        provider.push_listings(5, Some("T1")).await;
        provider.push_error(JobScoutError::Timeout(Service::Jobs)).await;
        provider.push_listings(1, None).await;
        let pages = registry(&provider);
        let session = SessionId::from_string("s");

        pages.start_search(&session, "SRE", "Oslo").await.unwrap();
        assert!(pages.continue_search(&session).await.unwrap_err().is_timeout());
        assert_eq!(
            pages.state(&session).await.unwrap().next_page_token.as_deref(),
            Some("T1")
        );

        let retry = pages.continue_search(&session).await.unwrap();
        assert_eq!(jobs(&retry).jobs.len(), 1);
    }

    /// Holds next-page requests until released
    struct GatedProvider {
        entered: Notify,
        release: Notify,
        first_page_tokens: Mutex<VecDeque<&'static str>>,
    }

    #[async_trait]
    impl JobProvider for GatedProvider {
        async fn search(&self, query: &JobQuery) -> Result<JobPage> {
            let token = if query.page_token.is_some() {
                self.entered.notify_one();
                self.release.notified().await;
                Some("STALE")
            } else {
                self.first_page_tokens.lock().await.pop_front()
            };
            Ok(JobPage {
                jobs: vec![JobRecord::new("SRE", "Acme", "Oslo", "https://acme.example/apply")],
                next_page_token: token.map(String::from),
            })
        }

        fn name(&self) -> &str {
            "gated"
        }
    }

    #[tokio::test]
    async fn late_continuation_keeps_restarted_search_token() {
        let provider = Arc::new(GatedProvider {
            entered: Notify::new(),
            release: Notify::new(),
            first_page_tokens: Mutex::new(VecDeque::from(["T1", "FRESH"])),
        });
        let pages = Arc::new(PaginationRegistry::new(provider.clone()).with_retry(RetryPolicy::none()));
        let session = SessionId::from_string("s");

        pages.start_search(&session, "SRE", "Oslo").await.unwrap();

        let pending = {
            let pages = pages.clone();
            let session = session.clone();
            tokio::spawn(async move { pages.continue_search(&session).await })
        };
        provider.entered.notified().await;

        // Same role and location, but a new search
        pages.start_search(&session, "SRE", "Oslo").await.unwrap();
        provider.release.notify_one();
        pending.await.unwrap().unwrap();

        assert_eq!(
            pages.state(&session).await.unwrap().next_page_token.as_deref(),
            Some("FRESH")
        );
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let provider = Arc::new(ScriptedJobProvider::new());
        provider.push_listings(5, Some("A1")).await;
        provider.push_listings(5, None).await;
        let pages = registry(&provider);
        let alice = SessionId::from_string("alice");
        let bob = SessionId::from_string("bob");

        pages.start_search(&alice, "SRE", "Oslo").await.unwrap();
        pages.start_search(&bob, "Chef", "Paris").await.unwrap();

        assert_eq!(pages.state(&alice).await.unwrap().next_page_token.as_deref(), Some("A1"));
        assert_eq!(pages.continue_search(&bob).await.unwrap(), SearchOutcome::NoMoreJobs);

        pages.clear(&alice).await;
        assert!(pages.state(&alice).await.is_none());
    }
}
