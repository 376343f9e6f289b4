//! Conversational agent over a streaming chat completion.

use super::client::{ChatMessage, OpenAiClient, WireToolCall};
use crate::tools::function_schemas;
use async_trait::async_trait;
use parley_application::{
    AgentError, AgentPort, AgentRequest, NoTools, TokenSink, ToolExecutorPort,
};
use parley_domain::{AgentPromptTemplate, ToolCall, ToolCallResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default limit on model round trips that only request tools.
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 5;

/// [`AgentPort`] adapter that streams raw model output into the turn.
///
/// The model is prompted to reason first and then introduce its answer with
/// the request's marker. Output without the marker is reported as
/// [`AgentError::UnableToParseOutput`] carrying everything received.
///
/// When tools are configured the model may request calls instead of
/// answering. Each call runs through the [`ToolExecutorPort`], successful
/// results go to [`TokenSink::on_tool_result`], and the model is asked again
/// with the results appended, up to `max_tool_rounds` times.
pub struct OpenAiAgent {
    client: Arc<OpenAiClient>,
    model: String,
    tools: Arc<dyn ToolExecutorPort>,
    max_tool_rounds: usize,
}

impl OpenAiAgent {
    pub fn new(client: Arc<OpenAiClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            tools: Arc::new(NoTools),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    pub fn with_tools(mut self, tools: Arc<dyn ToolExecutorPort>, max_tool_rounds: usize) -> Self {
        self.tools = tools;
        self.max_tool_rounds = max_tool_rounds;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one requested call; the returned text is sent back to the model.
    async fn run_tool(&self, wire: &WireToolCall, sink: &mut dyn TokenSink) -> String {
        let outcome = match ToolCall::parse(&wire.id, &wire.function.name, &wire.function.arguments) {
            Ok(call) => self.tools.execute(&call).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(lines) => {
                debug!(tool = %wire.function.name, results = lines.len(), "Tool call succeeded");
                let content = lines.join("\n");
                sink.on_tool_result(ToolCallResult::new(&wire.function.name, lines));
                content
            }
            Err(e) => {
                warn!(tool = %wire.function.name, "Tool call failed: {}", e);
                format!("error: {e}")
            }
        }
    }
}

/// System prompt, remembered history, then the new query.
fn build_messages(request: &AgentRequest) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(request.memory.len() + 2);
    messages.push(ChatMessage::new(
        "system",
        AgentPromptTemplate::system(&request.answer_marker),
    ));
    messages.extend(
        request
            .memory
            .entries()
            .iter()
            .map(|entry| ChatMessage::new(entry.role.as_str(), entry.text.clone())),
    );
    messages.push(ChatMessage::new(
        "user",
        AgentPromptTemplate::query(&request.query),
    ));
    messages
}

/// Text following the first marker, trimmed.
fn extract_answer(output: &str, marker: &str) -> Result<String, AgentError> {
    match output.split_once(marker) {
        Some((_, answer)) => Ok(answer.trim().to_string()),
        None => Err(AgentError::UnableToParseOutput {
            partial: output.to_string(),
        }),
    }
}

#[async_trait]
impl AgentPort for OpenAiAgent {
    async fn run(
        &self,
        request: &AgentRequest,
        sink: &mut dyn TokenSink,
    ) -> Result<String, AgentError> {
        let mut messages = build_messages(request);
        let schemas = function_schemas(self.tools.definitions());
        debug!(
            session_id = %request.session_id,
            model = %self.model,
            history = request.memory.len(),
            tools = schemas.len(),
            "Calling agent"
        );

        let mut output = String::new();
        let mut rounds = 0;
        loop {
            let reply = self
                .client
                .chat_stream(&self.model, &messages, &schemas, |delta| sink.on_token(delta))
                .await
                .map_err(|e| {
                    warn!(session_id = %request.session_id, "Agent stream failed: {}", e);
                    AgentError::from(e)
                })?;
            output.push_str(&reply.content);

            if !reply.wants_tools() {
                return extract_answer(&output, &request.answer_marker);
            }
            if rounds == self.max_tool_rounds {
                return Err(AgentError::Other(format!(
                    "model still requesting tools after {rounds} rounds"
                )));
            }
            rounds += 1;

            messages.push(ChatMessage::assistant_tool_calls(
                &reply.content,
                reply.tool_calls.clone(),
            ));
            for call in &reply.tool_calls {
                let content = self.run_tool(call, sink).await;
                messages.push(ChatMessage::tool_result(&call.id, content));
            }
        }
    }
}
