//! Configuration from environment variables
//!
//! | Key | Default |
//! |---|---|
//! | `JOB_SCOUT_USER_ID` | `default-user` |
//! | `SEARCHAPI_API_KEY` (or `SERPAPI_API_KEY`) | required |
//! | `SEARCHAPI_BASE_URL` | searchapi.io |
//! | `WEATHERSTACK_ACCESS_KEY` (or `OPENWEATHER_API_KEY`) | weather disabled |
//! | `WEATHERSTACK_BASE_URL` | weatherstack.com |
//! | `MEM0_BASE_URL` | `http://localhost:8000` |
//! | `MEM0_API_KEY` | none |
//! | `MEM0_API_MODE` | `self-hosted` |
//! | `JOB_SCOUT_HTTP_TIMEOUT_SECS` | `20` |
//! | `JOB_SCOUT_RETRY_ATTEMPTS` | `3` |

use std::time::Duration;

use crate::error::{JobScoutError, Result};
use crate::jobs::SearchApiConfig;
use crate::memory::{Mem0Api, Mem0Config};
use crate::model::UserId;
use crate::retry::RetryPolicy;
use crate::weather::WeatherstackConfig;

pub const DEFAULT_USER_ID: &str = "default-user";

#[derive(Clone, Debug)]
pub struct JobScoutConfig {
    /// Used when a call carries no user of its own
    pub user_id: UserId,
    pub searchapi: SearchApiConfig,
    /// `None` leaves the weather tool unregistered
    pub weatherstack: Option<WeatherstackConfig>,
    pub mem0: Mem0Config,
    pub retry: RetryPolicy,
}

impl JobScoutConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let timeout = match get("JOB_SCOUT_HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number("JOB_SCOUT_HTTP_TIMEOUT_SECS", &raw)?),
            None => Duration::from_secs(20),
        };
        let retry = match get("JOB_SCOUT_RETRY_ATTEMPTS") {
            Some(raw) => {
                let attempts = parse_number("JOB_SCOUT_RETRY_ATTEMPTS", &raw)?;
                RetryPolicy::default().with_attempts(u32::try_from(attempts).unwrap_or(u32::MAX))
            }
            None => RetryPolicy::default(),
        };

        let api_key = get("SEARCHAPI_API_KEY")
            .or_else(|| get("SERPAPI_API_KEY"))
            .ok_or_else(|| JobScoutError::Config("SEARCHAPI_API_KEY is not set".into()))?;
        let searchapi = SearchApiConfig {
            base_url: get("SEARCHAPI_BASE_URL").unwrap_or_else(|| SearchApiConfig::DEFAULT_BASE_URL.into()),
            api_key,
            timeout,
        };

        let weatherstack = get("WEATHERSTACK_ACCESS_KEY")
            .or_else(|| get("OPENWEATHER_API_KEY"))
            .map(|access_key| WeatherstackConfig {
                base_url: get("WEATHERSTACK_BASE_URL")
                    .unwrap_or_else(|| WeatherstackConfig::DEFAULT_BASE_URL.into()),
                access_key,
                timeout,
            });

        let api = match get("MEM0_API_MODE") {
            Some(raw) => Mem0Api::parse(&raw)
                .ok_or_else(|| JobScoutError::Config(format!("Unknown MEM0_API_MODE: {raw}")))?,
            None => Mem0Api::default(),
        };
        let defaults = Mem0Config::default();
        let mem0 = Mem0Config {
            base_url: get("MEM0_BASE_URL").unwrap_or(defaults.base_url),
            api_key: get("MEM0_API_KEY"),
            api,
            timeout,
        };

        Ok(Self {
            user_id: UserId::new(get("JOB_SCOUT_USER_ID").unwrap_or_else(|| DEFAULT_USER_ID.into())),
            searchapi,
            weatherstack,
            mem0,
            retry,
        })
    }
}

fn parse_number(key: &str, raw: &str) -> Result<u64> {
    raw.parse()
        .map_err(|_| JobScoutError::Config(format!("{key} must be a whole number, got {raw:?}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Result<JobScoutConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        JobScoutConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_with_only_job_key() {
        let config = config(&[("SEARCHAPI_API_KEY", "k")]).unwrap();
        assert_eq!(config.user_id.as_str(), "default-user");
        assert_eq!(config.searchapi.base_url, SearchApiConfig::DEFAULT_BASE_URL);
        assert_eq!(config.searchapi.timeout, Duration::from_secs(20));
        assert!(config.weatherstack.is_none());
        assert_eq!(config.mem0.api, Mem0Api::SelfHosted);
        assert_eq!(config.mem0.base_url, "http://localhost:8000");
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn job_key_is_required() {
        assert!(matches!(config(&[]), Err(JobScoutError::Config(_))));
        assert!(matches!(config(&[("SEARCHAPI_API_KEY", "  ")]), Err(JobScoutError::Config(_))));
    }

    #[test]
    fn legacy_key_names_are_accepted() {
        let config = config(&[("SERPAPI_API_KEY", "serp"), ("OPENWEATHER_API_KEY", "ow")]).unwrap();
        assert_eq!(config.searchapi.api_key, "serp");
        assert_eq!(config.weatherstack.unwrap().access_key, "ow");
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("SEARCHAPI_API_KEY", "k"),
            ("JOB_SCOUT_USER_ID", "alice"),
            ("MEM0_API_MODE", "platform"),
            ("MEM0_API_KEY", "m0"),
            ("JOB_SCOUT_HTTP_TIMEOUT_SECS", "5"),
            ("JOB_SCOUT_RETRY_ATTEMPTS", "1"),
        ])
        .unwrap();
        assert_eq!(config.user_id.as_str(), "alice");
        assert_eq!(config.mem0.api, Mem0Api::Platform);
        assert_eq!(config.mem0.api_key.as_deref(), Some("m0"));
        assert_eq!(config.mem0.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_attempts, 1);
    }

    #[test]
    fn bad_values_are_config_errors() {
        let bad_mode = config(&[("SEARCHAPI_API_KEY", "k"), ("MEM0_API_MODE", "sqlite")]);
        assert!(matches!(bad_mode, Err(JobScoutError::Config(_))));

        let bad_timeout = config(&[("SEARCHAPI_API_KEY", "k"), ("JOB_SCOUT_HTTP_TIMEOUT_SECS", "soon")]);
        assert!(matches!(bad_timeout, Err(JobScoutError::Config(_))));
    }
}
