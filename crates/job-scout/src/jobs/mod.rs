//! Job Provider Integration
//!
//! Paged job search APIs. Providers return normalized [`JobRecord`]s plus
//! the opaque token for the next page.
//!
//! [`JobRecord`]: crate::model::JobRecord

mod scripted;
mod searchapi;

pub use scripted::ScriptedJobProvider;
pub use searchapi::{SearchApiClient, SearchApiConfig};

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{JobPage, JobQuery};

/// Job search backend (Strategy pattern)
#[async_trait]
pub trait JobProvider: Send + Sync {
    /// Fetch one page. `query.page_token` is `None` for the first page.
    async fn search(&self, query: &JobQuery) -> Result<JobPage>;

    fn name(&self) -> &str;
}
