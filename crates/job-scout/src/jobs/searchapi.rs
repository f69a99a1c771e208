//! searchapi.io Google Jobs client

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::JobProvider;
use crate::error::{JobScoutError, Result, Service};
use crate::model::{JobPage, JobQuery};
use crate::normalize::normalize_jobs;

const ENGINE: &str = "google_jobs";

#[derive(Clone, Debug)]
pub struct SearchApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl SearchApiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://www.searchapi.io/api/v1/search";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(20),
        }
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    jobs: Vec<Value>,
    #[serde(default)]
    pagination: Option<Pagination>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct Pagination {
    #[serde(default)]
    next_page_token: Option<String>,
}

pub struct SearchApiClient {
    http: reqwest::Client,
    config: SearchApiConfig,
}

impl SearchApiClient {
    pub fn new(config: SearchApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    fn params(&self, query: &JobQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("api_key", self.config.api_key.clone()),
            ("engine", ENGINE.to_string()),
            ("q", query.search_text()),
        ];
        if let Some(token) = &query.page_token {
            params.push(("next_page_token", token.clone()));
        }
        params
    }
}

#[async_trait]
impl JobProvider for SearchApiClient {
    async fn search(&self, query: &JobQuery) -> Result<JobPage> {
        tracing::debug!(
            q = %query.search_text(),
            paged = query.page_token.is_some(),
            "searchapi request"
        );

        let transport = |e| JobScoutError::from_transport(Service::Jobs, e);
        let response = self
            .http
            .get(&self.config.base_url)
            .query(&self.params(query))
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;

        let body: SearchResponse = response.json().await.map_err(transport)?;

        if let Some(message) = body.error {
            return Err(JobScoutError::Provider {
                service: Service::Jobs,
                message,
            });
        }

        Ok(JobPage {
            jobs: normalize_jobs(&body.jobs),
            next_page_token: body
                .pagination
                .and_then(|p| p.next_page_token)
                .filter(|t| !t.is_empty()),
        })
    }

    fn name(&self) -> &str {
        "searchapi"
    }
}
