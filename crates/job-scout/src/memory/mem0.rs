//! Mem0 REST client
//!
//! Speaks either the self-hosted Mem0 server (`POST /memories`,
//! `POST /search`) or the hosted platform (`POST /v1/memories/`,
//! `POST /v1/memories/search/`, token auth).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{MemoryMessage, MemorySnippet, MemoryStore};
use crate::error::{JobScoutError, Result, Service};
use crate::model::UserId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mem0Api {
    #[default]
    SelfHosted,
    Platform,
}

impl Mem0Api {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "self-hosted" | "selfhosted" | "oss" => Some(Mem0Api::SelfHosted),
            "platform" | "hosted" | "cloud" => Some(Mem0Api::Platform),
            _ => None,
        }
    }

    fn add_path(self) -> &'static str {
        match self {
            Mem0Api::SelfHosted => "/memories",
            Mem0Api::Platform => "/v1/memories/",
        }
    }

    fn search_path(self) -> &'static str {
        match self {
            Mem0Api::SelfHosted => "/search",
            Mem0Api::Platform => "/v1/memories/search/",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Mem0Config {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api: Mem0Api,
    pub timeout: Duration,
}

impl Default for Mem0Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            api_key: None,
            api: Mem0Api::SelfHosted,
            timeout: Duration::from_secs(20),
        }
    }
}

#[derive(Serialize)]
struct AddRequest<'a> {
    messages: &'a [MemoryMessage],
    user_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a Value>,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    user_id: &'a str,
}

/// Platform v1 answers with a bare list; newer servers wrap it
#[derive(Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    Wrapped { results: Vec<MemorySnippet> },
    Bare(Vec<MemorySnippet>),
}

pub struct Mem0Store {
    http: reqwest::Client,
    config: Mem0Config,
}

impl Mem0Store {
    pub fn new(config: Mem0Config) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Value> {
        let mut request = self.http.post(self.url(path)).json(body);
        if let Some(key) = &self.config.api_key {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Token {key}"));
        }

        let transport = |e| JobScoutError::from_transport(Service::Memory, e);
        let response = request.send().await.map_err(transport)?;
        let response = response.error_for_status().map_err(transport)?;
        response.json::<Value>().await.map_err(transport)
    }
}

#[async_trait]
impl MemoryStore for Mem0Store {
    async fn add(
        &self,
        user: &UserId,
        messages: Vec<MemoryMessage>,
        metadata: Option<Value>,
    ) -> Result<Value> {
        tracing::debug!(%user, count = messages.len(), "mem0 add");
        let body = AddRequest {
            messages: &messages,
            user_id: user.as_str(),
            metadata: metadata.as_ref(),
        };
        self.post(self.config.api.add_path(), &body).await
    }

    async fn search(&self, user: &UserId, query: &str) -> Result<Vec<MemorySnippet>> {
        tracing::debug!(%user, query, "mem0 search");
        let body = SearchRequest {
            query,
            user_id: user.as_str(),
        };
        let raw = self.post(self.config.api.search_path(), &body).await?;

        match serde_json::from_value(raw) {
            Ok(SearchResponse::Wrapped { results } | SearchResponse::Bare(results)) => Ok(results),
            Err(e) => Err(JobScoutError::Malformed {
                service: Service::Memory,
                message: e.to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "mem0"
    }
}

#[cfg(test)]
mod tests {
    use agent_core::Role;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn store(server: &MockServer, api: Mem0Api, api_key: Option<&str>) -> Mem0Store {
        Mem0Store::new(Mem0Config {
            base_url: server.uri(),
            api_key: api_key.map(String::from),
            api,
            timeout: Duration::from_millis(500),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn add_posts_messages_and_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/memories"))
            .and(body_partial_json(json!({
                "user_id": "alice",
                "messages": [{"role": "user", "content": "{\"type\":\"job_preference\"}"}],
                "metadata": {"type": "job_preference"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [{"id": "m1"}]})))
            .expect(1)
            .mount(&server)
            .await;

        let ack = store(&server, Mem0Api::SelfHosted, None)
            .add(
                &UserId::new("alice"),
                vec![MemoryMessage {
                    role: Role::User,
                    content: r#"{"type":"job_preference"}"#.into(),
                }],
                Some(json!({"type": "job_preference"})),
            )
            .await
            .unwrap();
        assert_eq!(ack["results"][0]["id"], "m1");
    }

    #[tokio::test]
    async fn platform_search_with_token_and_bare_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/memories/search/"))
            .and(header("authorization", "Token secret"))
            .and(body_partial_json(json!({"query": "preferred job role location", "user_id": "alice"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "1", "memory": "Preferred job role is SRE", "score": 0.9},
                {"id": "2", "memory": "Preferred location is Oslo"}
            ])))
            .mount(&server)
            .await;

        let hits = store(&server, Mem0Api::Platform, Some("secret"))
            .search(&UserId::new("alice"), "preferred job role location")
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[1].memory, "Preferred location is Oslo");
    }

    #[tokio::test]
    async fn wrapped_results_with_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{
                    "memory": "Looking for SRE roles",
                    "metadata": {"type": "job_preference", "role": "SRE", "location": "Oslo"},
                    "created_at": "2026-01-02T03:04:05-07:00"
                }]
            })))
            .mount(&server)
            .await;

        let hits = store(&server, Mem0Api::SelfHosted, None)
            .search(&UserId::new("alice"), "q")
            .await
            .unwrap();
        assert_eq!(hits[0].metadata.as_ref().unwrap()["role"], "SRE");
    }

    #[tokio::test]
    async fn server_error_is_retryable_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = store(&server, Mem0Api::SelfHosted, None)
            .search(&UserId::new("alice"), "q")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            JobScoutError::Status {
                service: Service::Memory,
                status: 503
            }
        ));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn slow_store_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let err = store(&server, Mem0Api::SelfHosted, None)
            .search(&UserId::new("alice"), "q")
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn api_mode_parsing() {
        assert_eq!(Mem0Api::parse("Platform"), Some(Mem0Api::Platform));
        assert_eq!(Mem0Api::parse("self-hosted"), Some(Mem0Api::SelfHosted));
        assert_eq!(Mem0Api::parse("sqlite"), None);
    }
}
