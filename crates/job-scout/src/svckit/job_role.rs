//! Job Role Tool
//!
//! Starts a new search for a role and location, remembers the preference and
//! the listings shown, and opens a pagination session for `more_jobs`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use agent_core::{
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema,
};

use super::{JOB_SEPARATOR, caller, render_jobs};
use crate::memory::MemoryClient;
use crate::model::UserId;
use crate::pagination::{NO_JOBS_FOUND, PaginationRegistry, SearchOutcome};

const NAME: &str = "job_role";

pub struct JobRoleTool {
    pages: Arc<PaginationRegistry>,
    memory: MemoryClient,
    default_user: UserId,
}

impl JobRoleTool {
    pub fn new(pages: Arc<PaginationRegistry>, memory: MemoryClient, default_user: UserId) -> Self {
        Self {
            pages,
            memory,
            default_user,
        }
    }
}

#[async_trait]
impl Tool for JobRoleTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Search for jobs by role and location. Use this for every new job search.".into(),
            parameters: vec![
                ParameterSchema::required_string("role", "Job title or role, e.g. 'Backend Developer'"),
                ParameterSchema::required_string("location", "City, country or 'Remote'"),
            ],
            category: Some("jobs".into()),
            has_side_effects: true,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let role = call.require_str("role")?;
        let location = call.require_str("location")?;
        let user = caller(call, &self.default_user);
        let session = &call.context.session_id;

        tracing::debug!(%session, %user, role, location, "job_role");

        if let Err(e) = self.memory.save_preference(&user, role, location).await {
            tracing::warn!(%user, error = %e, "Could not remember job preference");
        }

        let page = match self.pages.start_search(session, role, location).await {
            Ok(SearchOutcome::Jobs(page)) => page,
            Ok(SearchOutcome::NoJobs | SearchOutcome::NoMoreJobs) => {
                return Ok(ToolResult::success(NAME, NO_JOBS_FOUND));
            }
            Err(e) => {
                tracing::warn!(%session, error = %e, "Job search failed");
                return Ok(ToolResult::failure(NAME, e.user_message()));
            }
        };

        if let Err(e) = self.memory.save_jobs(&user, role, location, &page.jobs).await {
            tracing::warn!(%user, error = %e, "Could not remember job listings");
        }

        let has_more = page.next_page_token.is_some();
        Ok(
            ToolResult::success(NAME, render_jobs(&page.jobs).join(JOB_SEPARATOR))
                .with_data(json!({ "shown": page.jobs.len(), "has_more": has_more })),
        )
    }
}
