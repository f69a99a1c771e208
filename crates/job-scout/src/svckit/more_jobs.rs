//! More Jobs Tool
//!
//! Continues the calling session's last `job_role` search. Takes no
//! arguments.

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema};

use super::{JOB_SEPARATOR, render_jobs};
use crate::pagination::{NO_MORE_JOBS, PaginationRegistry, SearchOutcome};

const NAME: &str = "more_jobs";
const OFFER_MORE: &str = "Would you like to see more jobs?";

pub struct MoreJobsTool {
    pages: Arc<PaginationRegistry>,
}

impl MoreJobsTool {
    pub fn new(pages: Arc<PaginationRegistry>) -> Self {
        Self { pages }
    }
}

#[async_trait]
impl Tool for MoreJobsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Fetch more jobs for the previously searched role. Only use when the user asks for more.".into(),
            parameters: vec![],
            category: Some("jobs".into()),
            has_side_effects: true,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let session = &call.context.session_id;
        tracing::debug!(%session, "more_jobs");

        let page = match self.pages.continue_search(session).await {
            Ok(SearchOutcome::Jobs(page)) => page,
            Ok(SearchOutcome::NoJobs | SearchOutcome::NoMoreJobs) => {
                return Ok(ToolResult::success(NAME, NO_MORE_JOBS));
            }
            Err(e) => {
                tracing::warn!(%session, error = %e, "Job search continuation failed");
                return Ok(ToolResult::failure(NAME, e.user_message()));
            }
        };

        let closing = if page.next_page_token.is_some() {
            OFFER_MORE
        } else {
            NO_MORE_JOBS
        };
        let mut blocks = render_jobs(&page.jobs);
        blocks.push(format!("\n{closing}"));

        Ok(ToolResult::success(NAME, blocks.join(JOB_SEPARATOR)))
    }
}
