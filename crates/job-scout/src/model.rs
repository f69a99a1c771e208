//! Domain Models
//!
//! Canonical job listings, stored preference facts and per-session
//! pagination state.

use serde::{Deserialize, Serialize};

/// Placeholder for any job field the provider omitted
pub const NOT_AVAILABLE: &str = "N/A";

/// Owner of stored facts in the memory service
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A job listing in canonical form. Built once by the normalizer, never edited.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub apply_link: String,
}

impl JobRecord {
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        location: impl Into<String>,
        apply_link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            location: location.into(),
            apply_link: apply_link.into(),
        }
    }

    /// Multi-line block shown to the user
    pub fn display_block(&self) -> String {
        format!(
            "Title: {}\nCompany: {}\nLocation: {}\nApply Link: {}",
            self.title, self.company, self.location, self.apply_link
        )
    }
}

/// The user's remembered search: both halves or nothing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub role: String,
    pub location: String,
}

impl PreferenceRecord {
    pub fn new(role: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            location: location.into(),
        }
    }
}

/// One append-only fact in the memory store.
///
/// Serializes as `{"type": "job_preference", "role": .., "location": ..}` or
/// `{"type": "job", "role": .., "location": .., "title": .., "company": .., "apply_link": ..}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoredFact {
    JobPreference {
        role: String,
        location: String,
    },
    Job {
        role: String,
        location: String,
        title: String,
        company: String,
        apply_link: String,
    },
}

impl StoredFact {
    pub fn preference(role: &str, location: &str) -> Self {
        StoredFact::JobPreference {
            role: role.to_string(),
            location: location.to_string(),
        }
    }

    /// Job fact tagged with the search that found it
    pub fn job(role: &str, location: &str, job: &JobRecord) -> Self {
        StoredFact::Job {
            role: role.to_string(),
            location: location.to_string(),
            title: job.title.clone(),
            company: job.company.clone(),
            apply_link: job.apply_link.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StoredFact::JobPreference { .. } => "job_preference",
            StoredFact::Job { .. } => "job",
        }
    }
}

/// Query sent to a job provider
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobQuery {
    pub role: String,
    pub location: String,
    pub page_token: Option<String>,
}

impl JobQuery {
    pub fn first_page(role: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            location: location.into(),
            page_token: None,
        }
    }

    /// Provider search text, e.g. "Backend Developer in Berlin"
    pub fn search_text(&self) -> String {
        format!("{} in {}", self.role, self.location)
    }
}

/// One page of normalized results
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JobPage {
    pub jobs: Vec<JobRecord>,
    pub next_page_token: Option<String>,
}

/// Where a session's job search stands
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub current_role: String,
    pub current_location: String,
    /// `None` once the provider reports no further pages
    pub next_page_token: Option<String>,
}

impl PaginationState {
    pub fn new(role: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            current_role: role.into(),
            current_location: location.into(),
            next_page_token: None,
        }
    }

    /// Query for the page after the current one, if any
    pub fn next_query(&self) -> Option<JobQuery> {
        self.next_page_token.as_ref().map(|token| JobQuery {
            role: self.current_role.clone(),
            location: self.current_location.clone(),
            page_token: Some(token.clone()),
        })
    }
}
