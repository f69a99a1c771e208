//! Scripted Job Provider
//!
//! Serves pre-built pages in order and records every query it receives.
//! Used for demos without an API key and for tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::JobProvider;
use crate::error::{JobScoutError, Result, Service};
use crate::model::{JobPage, JobQuery, JobRecord};

#[derive(Default)]
pub struct ScriptedJobProvider {
    pages: Mutex<VecDeque<Result<JobPage>>>,
    queries: Mutex<Vec<JobQuery>>,
}

impl ScriptedJobProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a page of `count` numbered listings
    pub async fn push_listings(&self, count: usize, next_page_token: Option<&str>) {
        let jobs = (1..=count)
            .map(|i| {
                JobRecord::new(
                    format!("Job {i}"),
                    format!("Company {i}"),
                    "Remote",
                    format!("https://jobs.example/{i}"),
                )
            })
            .collect();
        self.push_page(JobPage {
            jobs,
            next_page_token: next_page_token.map(String::from),
        })
        .await;
    }

    pub async fn push_page(&self, page: JobPage) {
        self.pages.lock().await.push_back(Ok(page));
    }

    pub async fn push_error(&self, err: JobScoutError) {
        self.pages.lock().await.push_back(Err(err));
    }

    /// Queries received so far, oldest first
    pub async fn queries(&self) -> Vec<JobQuery> {
        self.queries.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.queries.lock().await.len()
    }
}

#[async_trait]
impl JobProvider for ScriptedJobProvider {
    async fn search(&self, query: &JobQuery) -> Result<JobPage> {
        self.queries.lock().await.push(query.clone());
        self.pages.lock().await.pop_front().unwrap_or_else(|| {
            Err(JobScoutError::Provider {
                service: Service::Jobs,
                message: "no scripted page left".into(),
            })
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
