//! Error Types for Job Scout

use agent_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, JobScoutError>;

/// Which external system a failure came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Service {
    Jobs,
    Weather,
    Memory,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Service::Jobs => "job search",
            Service::Weather => "weather",
            Service::Memory => "memory store",
        })
    }
}

#[derive(Error, Debug)]
pub enum JobScoutError {
    #[error("{0} request timed out")]
    Timeout(Service),

    #[error("{service} returned HTTP {status}")]
    Status { service: Service, status: u16 },

    /// The API answered but reported an error in its body
    #[error("{service} error: {message}")]
    Provider { service: Service, message: String },

    #[error("Malformed {service} response: {message}")]
    Malformed { service: Service, message: String },

    /// Memory store rejected or failed a read/write
    #[error("Memory store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl JobScoutError {
    /// Classify a transport failure from `service`
    pub fn from_transport(service: Service, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            JobScoutError::Timeout(service)
        } else if let Some(status) = err.status() {
            JobScoutError::Status {
                service,
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            JobScoutError::Malformed {
                service,
                message: err.to_string(),
            }
        } else {
            JobScoutError::Network(err)
        }
    }

    /// Transient failures: timeouts, connection errors, 429 and 5xx
    pub fn is_retryable(&self) -> bool {
        match self {
            JobScoutError::Timeout(_) => true,
            JobScoutError::Status { status, .. } => *status == 429 || *status >= 500,
            JobScoutError::Network(e) => e.is_connect() || e.is_request(),
            _ => false,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, JobScoutError::Timeout(_))
    }

    /// Short apology suitable as tool output
    pub fn user_message(&self) -> String {
        match self {
            JobScoutError::Timeout(service) => {
                format!("Sorry, the {service} service took too long to respond. Please try again.")
            }
            JobScoutError::Status { service, .. }
            | JobScoutError::Provider { service, .. }
            | JobScoutError::Malformed { service, .. } => {
                format!("Sorry, the {service} service is unavailable right now.")
            }
            JobScoutError::Store(_) => "Sorry, I couldn't reach my memory right now.".into(),
            JobScoutError::Config(_) => "Sorry, this feature is not configured.".into(),
            JobScoutError::Network(_) | JobScoutError::Serialization(_) => {
                "Sorry, something went wrong. Please try again.".into()
            }
        }
    }
}

impl From<JobScoutError> for AgentError {
    fn from(err: JobScoutError) -> Self {
        match err {
            JobScoutError::Timeout(service) => AgentError::Timeout(service.to_string()),
            JobScoutError::Config(msg) => AgentError::Config(msg),
            other => AgentError::ToolExecution(other.to_string()),
        }
    }
}
