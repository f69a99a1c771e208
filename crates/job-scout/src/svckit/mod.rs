//! Service Kit - Agent Tools
//!
//! `agent_core::Tool` implementations for the job search and weather agents.
//! Session and user come from each call's `ToolContext`.

mod job_role;
mod more_jobs;
mod stubs;
mod weather;

pub use job_role::JobRoleTool;
pub use more_jobs::MoreJobsTool;
pub use stubs::{SearchJobsTool, SearchTool};
pub use weather::WeatherTool;

use agent_core::ToolCall;

use crate::model::{JobRecord, UserId};

const JOB_SEPARATOR: &str = "\n---\n";

/// User the call runs for, else `fallback`
fn caller(call: &ToolCall, fallback: &UserId) -> UserId {
    call.context
        .user_id
        .as_deref()
        .map_or_else(|| fallback.clone(), UserId::new)
}

fn render_jobs(jobs: &[JobRecord]) -> Vec<String> {
    jobs.iter().map(JobRecord::display_block).collect()
}
