//! Placeholder search tools. They echo the query without calling anything.

use async_trait::async_trait;

use agent_core::{
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema,
};

fn query_schema(name: &str, description: &str) -> ToolSchema {
    ToolSchema {
        name: name.into(),
        description: description.into(),
        parameters: vec![ParameterSchema::required_string("query", "What to look for")],
        category: Some("search".into()),
        has_side_effects: false,
    }
}

pub struct SearchTool;

#[async_trait]
impl Tool for SearchTool {
    fn schema(&self) -> ToolSchema {
        query_schema("search", "Search for information.")
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let query = call.require_str("query")?;
        Ok(ToolResult::success("search", format!("Search results for: {query}")))
    }
}

pub struct SearchJobsTool;

#[async_trait]
impl Tool for SearchJobsTool {
    fn schema(&self) -> ToolSchema {
        query_schema("search_jobs", "Search for job listings.")
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let query = call.require_str("query")?;
        Ok(ToolResult::success("search_jobs", format!("Job listings for: {query}")))
    }
}
