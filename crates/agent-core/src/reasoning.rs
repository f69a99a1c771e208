//! Reasoning Loop
//!
//! ReAct-style loop: ask the model, run the tool it asks for, feed the
//! result back, repeat until it answers in plain text.

use std::sync::Arc;

use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::provider::{GenerationOptions, LlmProvider};
use crate::session::Session;
use crate::tool::{Tool, ToolCall, ToolContext, ToolRegistry, ToolResult};

#[derive(Clone, Debug)]
pub struct AgentConfig {
    pub system_prompt: String,

    /// Model round-trips allowed per user turn
    pub max_iterations: usize,

    pub generation: GenerationOptions,

    /// Append the tool catalogue to the system prompt
    pub inject_tool_descriptions: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: 6,
            generation: GenerationOptions::default(),
            inject_tool_descriptions: true,
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = r"You are a helpful assistant.

When you need a tool, reply with only the tool block described below.
After a tool result arrives, answer the user from it.
If you can answer without tools, do so. Be concise.";

const TOOL_FENCE: &str = "```tool";

pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    pub fn new(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>, config: AgentConfig) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    fn build_system_prompt(&self) -> String {
        let mut prompt = self.config.system_prompt.clone();

        if self.config.inject_tool_descriptions && !self.tools.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&self.tools.generate_prompt_section());
        }

        prompt
    }

    /// Answer the latest user message in `session`.
    ///
    /// Tool calls run with the session's id and user as their context.
    pub async fn run(&self, session: &mut Session) -> Result<String> {
        if !session.conversation.has_system_prompt() {
            session.conversation.prepend_system(self.build_system_prompt());
        }

        let context = ToolContext {
            session_id: session.id.clone(),
            user_id: session.user_id.clone(),
        };

        for iteration in 1..=self.config.max_iterations {
            session.conversation.truncate_to_fit();

            let completion = self
                .provider
                .complete(session.conversation.messages(), &self.config.generation)
                .await?;
            let content = completion.content;

            session.conversation.push(Message::assistant(&content));
            session.touch();

            let Some(call) = parse_tool_call(&content) else {
                return Ok(content);
            };

            tracing::debug!(
                tool = %call.name,
                session = %context.session_id,
                iteration,
                "Executing tool"
            );

            let call = call.with_context(context.clone());
            let result = self.execute_tool(&call).await;
            session
                .conversation
                .push(Message::tool(format_tool_result(&result), call.id.clone()));
        }

        Err(AgentError::MaxIterations(self.config.max_iterations))
    }

    async fn execute_tool(&self, call: &ToolCall) -> ToolResult {
        let result = match self.tools.execute(call).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "Tool call failed");
                ToolResult::failure(&call.name, format!("Error: {e}"))
            }
        };
        ToolResult {
            id: call.id.clone(),
            ..result
        }
    }
}

fn format_tool_result(result: &ToolResult) -> String {
    let verb = if result.success { "returned" } else { "failed" };
    format!("[Tool '{}' {verb}]\n{}", result.name, result.output)
}

/// Find a tool call in a model reply: a fenced ```tool block first,
/// then any bare JSON object with a `"tool"` key.
pub fn parse_tool_call(content: &str) -> Option<ToolCall> {
    let call = parse_fenced(content).or_else(|| parse_inline(content))?;
    Some(ToolCall {
        id: call.id.or_else(|| Some(uuid::Uuid::new_v4().to_string())),
        ..call
    })
}

fn parse_fenced(content: &str) -> Option<ToolCall> {
    let start = content.find(TOOL_FENCE)? + TOOL_FENCE.len();
    let body = &content[start..];
    let end = body.find("```")?;
    serde_json::from_str(body[..end].trim()).ok()
}

fn parse_inline(content: &str) -> Option<ToolCall> {
    if !content.contains(r#""tool""#) {
        return None;
    }

    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end <= start {
        return None;
    }

    serde_json::from_str(&content[start..=end]).ok()
}

/// Builder for [`Agent`]
#[derive(Default)]
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::message::Role;
    use crate::provider::{Completion, ModelInfo, ProviderInfo};
    use crate::session::SessionId;
    use crate::tool::{ParameterSchema, ToolSchema};

    /// Replays canned replies and records what it was sent
    struct ScriptedProvider {
        replies: Mutex<VecDeque<String>>,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedProvider {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|s| (*s).to_string()).collect()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn info(&self) -> Result<ProviderInfo> {
            Ok(ProviderInfo {
                name: "scripted".into(),
                models: Vec::new(),
                supports_tools: false,
            })
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete(&self, messages: &[Message], options: &GenerationOptions) -> Result<Completion> {
            self.seen.lock().unwrap().push(messages.to_vec());
            let content = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| "```tool\n{\"tool\": \"whoami\"}\n```".into());
            Ok(Completion {
                content,
                model: options.model.clone(),
                usage: None,
                finish_reason: None,
            })
        }


        async fn list_models(&self) -> Result<Vec<ModelInfo>> {
            Ok(Vec::new())
        }

        fn default_model(&self) -> &str {
            "scripted"
        }
    }

    /// Reports the context it was called with
    struct WhoAmI;

    #[async_trait]
    impl Tool for WhoAmI {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "whoami".into(),
                description: "Report the caller".into(),
                parameters: vec![],
                category: None,
                has_side_effects: false,
            }
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
            Ok(ToolResult::success(
                "whoami",
                format!(
                    "{}/{}",
                    call.context.session_id,
                    call.context.user_id.as_deref().unwrap_or("-")
                ),
            ))
        }
    }

    struct Shout;

    #[async_trait]
    impl Tool for Shout {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "shout".into(),
                description: "Uppercase text".into(),
                parameters: vec![ParameterSchema::required_string("text", "Text")],
                category: None,
                has_side_effects: false,
            }
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
            Ok(ToolResult::success("shout", call.require_str("text")?.to_uppercase()))
        }
    }

    #[test]
    fn parses_fenced_block() {
        let content = "Let me look.\n```tool\n{\"tool\": \"job_role\", \"arguments\": {\"role\": \"SRE\", \"location\": \"Oslo\"}}\n```";
        let call = parse_tool_call(content).unwrap();
        assert_eq!(call.name, "job_role");
        assert_eq!(call.str_arg("location"), Some("Oslo"));
        assert!(call.id.is_some());
    }

    #[test]
    fn parses_inline_json() {
        let call = parse_tool_call(r#"Sure: {"tool": "more_jobs", "arguments": {}}"#).unwrap();
        assert_eq!(call.name, "more_jobs");
    }

    #[test]
    fn plain_text_is_not_a_call() {
        assert!(parse_tool_call("Here are your jobs: {not json}").is_none());
        assert!(parse_tool_call("No more jobs available.").is_none());
    }

    #[tokio::test]
    async fn tool_runs_with_session_context() {
        let provider = Arc::new(ScriptedProvider::new(&[
            "```tool\n{\"tool\": \"whoami\"}\n```",
            "All done.",
        ]));
        let agent = AgentBuilder::new()
            .provider(provider.clone())
            .tool(WhoAmI)
            .build()
            .unwrap();

        let mut session = Session::with_id(SessionId::from_string("conv-7")).for_user("alice");
        session.conversation.push(Message::user("who am i?"));

        let answer = agent.run(&mut session).await.unwrap();
        assert_eq!(answer, "All done.");

        let tool_msg = session
            .conversation
            .messages()
            .iter()
            .find(|m| m.role == Role::Tool)
            .unwrap();
        assert!(tool_msg.content.contains("conv-7/alice"));
        assert!(tool_msg.tool_call_id.is_some());

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0][0].content.contains("### whoami"));
    }

    #[tokio::test]
    async fn tool_errors_are_fed_back_not_raised() {
        let provider = Arc::new(ScriptedProvider::new(&[
            "```tool\n{\"tool\": \"shout\"}\n```",
            "Sorry, I could not do that.",
        ]));
        let agent = AgentBuilder::new().provider(provider).tool(Shout).build().unwrap();

        let mut session = Session::new();
        session.conversation.push(Message::user("shout"));
        let answer = agent.run(&mut session).await.unwrap();
        assert_eq!(answer, "Sorry, I could not do that.");

        let tool_msg = &session.conversation.messages()[3];
        assert!(tool_msg.content.starts_with("[Tool 'shout' failed]"));
    }

    #[tokio::test]
    async fn gives_up_after_max_iterations() {
        let provider = Arc::new(ScriptedProvider::new(&[]));
        let agent = AgentBuilder::new()
            .provider(provider)
            .tool(WhoAmI)
            .max_iterations(3)
            .build()
            .unwrap();

        let mut session = Session::new();
        session.conversation.push(Message::user("loop forever"));
        let err = agent.run(&mut session).await.unwrap_err();
        assert!(matches!(err, AgentError::MaxIterations(3)));
    }

    #[test]
    fn builder_requires_provider() {
        assert!(matches!(AgentBuilder::new().build(), Err(AgentError::Config(_))));
    }
}
