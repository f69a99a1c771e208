//! weatherstack current-conditions client

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{WeatherProvider, WeatherReport};
use crate::error::{JobScoutError, Result, Service};

#[derive(Clone, Debug)]
pub struct WeatherstackConfig {
    pub base_url: String,
    pub access_key: String,
    pub timeout: Duration,
}

impl WeatherstackConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.weatherstack.com/current";

    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.into(),
            access_key: access_key.into(),
            timeout: Duration::from_secs(20),
        }
    }
}

#[derive(Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    current: Option<Current>,
}

#[derive(Deserialize)]
struct Current {
    temperature: f64,
    #[serde(default)]
    weather_descriptions: Vec<String>,
}

pub struct WeatherstackClient {
    http: reqwest::Client,
    config: WeatherstackConfig,
}

impl WeatherstackClient {
    pub fn new(config: WeatherstackConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }
}

/// Human-readable text out of weatherstack's `error` object
fn error_text(error: &Value) -> String {
    error
        .get("info")
        .or_else(|| error.get("type"))
        .and_then(Value::as_str)
        .map_or_else(|| error.to_string(), String::from)
}

#[async_trait]
impl WeatherProvider for WeatherstackClient {
    async fn current(&self, location: &str) -> Result<WeatherReport> {
        tracing::debug!(location, "weatherstack request");

        let transport = |e| JobScoutError::from_transport(Service::Weather, e);
        let body: CurrentResponse = self
            .http
            .get(&self.config.base_url)
            .query(&[
                ("access_key", self.config.access_key.as_str()),
                ("query", location),
                ("units", "m"),
            ])
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?
            .json()
            .await
            .map_err(transport)?;

        if let Some(error) = body.error.filter(|e| !e.is_null()) {
            return Err(JobScoutError::Provider {
                service: Service::Weather,
                message: error_text(&error),
            });
        }

        let current = body.current.ok_or_else(|| JobScoutError::Malformed {
            service: Service::Weather,
            message: "missing `current` block".into(),
        })?;
        let description = current.weather_descriptions.into_iter().next().ok_or_else(|| {
            JobScoutError::Malformed {
                service: Service::Weather,
                message: "no weather description".into(),
            }
        })?;

        Ok(WeatherReport {
            location: location.to_string(),
            temperature: current.temperature,
            description,
        })
    }

    fn name(&self) -> &str {
        "weatherstack"
    }
}
