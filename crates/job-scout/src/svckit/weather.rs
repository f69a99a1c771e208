//! Weather Tool

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema,
};

use crate::retry::RetryPolicy;
use crate::weather::WeatherProvider;

const NAME: &str = "get_weather";

/// Shown for failures other than timeouts, including provider-reported errors
pub const WEATHER_UNAVAILABLE: &str = "Could not retrieve weather data";

pub struct WeatherTool {
    provider: Arc<dyn WeatherProvider>,
    retry: RetryPolicy,
}

impl WeatherTool {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            provider,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Get current weather information for a location.".into(),
            parameters: vec![ParameterSchema::required_string(
                "location",
                "City or place name, e.g. 'Kathmandu'",
            )],
            category: Some("weather".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let location = call.require_str("location")?;
        let provider = &self.provider;

        let report = self
            .retry
            .run("weather lookup", move || provider.current(location))
            .await;

        Ok(match report {
            Ok(report) => ToolResult::success(NAME, report.sentence()),
            Err(e) if e.is_timeout() => {
                tracing::warn!(location, provider = provider.name(), "Weather lookup timed out");
                ToolResult::failure(NAME, e.user_message())
            }
            Err(e) => {
                tracing::warn!(location, provider = provider.name(), error = %e, "Weather lookup failed");
                ToolResult::failure(NAME, WEATHER_UNAVAILABLE)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::Mutex;

    use super::*;
    use crate::error::{JobScoutError, Result, Service};
    use crate::weather::WeatherReport;

    /// Answers from a fixed queue
    struct MockWeatherProvider {
        replies: Mutex<Vec<Result<WeatherReport>>>,
    }

    impl MockWeatherProvider {
        fn new(mut replies: Vec<Result<WeatherReport>>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
            }
        }
    }

    #[async_trait]
    impl WeatherProvider for MockWeatherProvider {
        async fn current(&self, _location: &str) -> Result<WeatherReport> {
            self.replies
                .lock()
                .await
                .pop()
                .unwrap_or(Err(JobScoutError::Timeout(Service::Weather)))
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn sunny(location: &str) -> Result<WeatherReport> {
        Ok(WeatherReport {
            location: location.into(),
            temperature: 13.0,
            description: "Sunny".into(),
        })
    }

    #[tokio::test]
    async fn formats_report() {
        let tool = WeatherTool::new(Arc::new(MockWeatherProvider::new(vec![sunny("London")])));
        let result = tool
            .execute(&ToolCall::new(NAME).arg("location", "London"))
            .await
            .unwrap();
        assert_eq!(result.output, "Weather in London: Sunny, 13°C");
    }

    #[tokio::test]
    async fn provider_error_gives_fixed_message() {
        let error = JobScoutError::Provider {
            service: Service::Weather,
            message: "request_failed".into(),
        };
        let tool = WeatherTool::new(Arc::new(MockWeatherProvider::new(vec![Err(error)])))
            .with_retry(RetryPolicy::none());
        let result = tool
            .execute(&ToolCall::new(NAME).arg("location", "Atlantis"))
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.output, WEATHER_UNAVAILABLE);
    }

    #[tokio::test]
    async fn timeout_asks_user_to_try_again() {
        let tool = WeatherTool::new(Arc::new(MockWeatherProvider::new(vec![])))
            .with_retry(RetryPolicy::none());
        let result = tool
            .execute(&ToolCall::new(NAME).arg("location", "Oslo"))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.output.contains("try again"), "{}", result.output);
        assert_ne!(result.output, WEATHER_UNAVAILABLE);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failure_is_retried() {
        let replies = vec![Err(JobScoutError::Timeout(Service::Weather)), sunny("Oslo")];
        let tool = WeatherTool::new(Arc::new(MockWeatherProvider::new(replies)));
        let result = tool
            .execute(&ToolCall::new(NAME).arg("location", "Oslo"))
            .await
            .unwrap();
        assert!(result.success);
    }
}
