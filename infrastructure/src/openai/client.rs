//! HTTP client for OpenAI-compatible chat completion endpoints.

use super::error::{OpenAiError, Result};
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, trace};

/// One chat message in the request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<WireToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn new(role: &'static str, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Assistant turn that requested tool calls, echoed back to the model.
    pub fn assistant_tool_calls(content: &str, tool_calls: Vec<WireToolCall>) -> Self {
        Self {
            role: "assistant",
            content: (!content.is_empty()).then(|| content.to_string()),
            tool_calls,
            tool_call_id: None,
        }
    }

    /// Result of one tool call.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool",
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// A tool call as it appears in requests and assembled stream replies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WireToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: WireFunction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WireFunction {
    pub name: String,
    /// JSON text, possibly assembled from several deltas.
    pub arguments: String,
}

/// Everything one streamed completion produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamedReply {
    pub content: String,
    pub tool_calls: Vec<WireToolCall>,
    pub finish_reason: Option<String>,
}

impl StreamedReply {
    pub fn wants_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Merge one stream delta. Tool call fragments are keyed by `index`.
    fn apply(&mut self, choice: StreamChoice) {
        if let Some(content) = choice.delta.content {
            self.content.push_str(&content);
        }
        for fragment in choice.delta.tool_calls {
            if self.tool_calls.len() <= fragment.index {
                self.tool_calls
                    .resize(fragment.index + 1, WireToolCall::default());
            }
            let call = &mut self.tool_calls[fragment.index];
            call.kind = "function";
            if let Some(id) = fragment.id.filter(|id| !id.is_empty()) {
                call.id = id;
            }
            if let Some(function) = fragment.function {
                if let Some(name) = function.name.filter(|n| !n.is_empty())
                    && call.function.name.is_empty()
                {
                    call.function.name = name;
                }
                if let Some(arguments) = function.arguments {
                    call.function.arguments.push_str(&arguments);
                }
            }
        }
        if choice.finish_reason.is_some() {
            self.finish_reason = choice.finish_reason;
        }
    }
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ToolCallDelta>,
}

#[derive(Debug, Deserialize)]
struct ToolCallDelta {
    #[serde(default)]
    index: usize,
    id: Option<String>,
    function: Option<FunctionDelta>,
}

#[derive(Debug, Deserialize)]
struct FunctionDelta {
    name: Option<String>,
    arguments: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct Completion {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// First choice of one stream frame, if any.
fn parse_chunk(data: &str) -> Result<Option<StreamChoice>> {
    let chunk: StreamChunk = serde_json::from_str(data)?;
    if let Some(error) = chunk.error {
        return Err(OpenAiError::Stream(error.message));
    }
    Ok(chunk.choices.into_iter().next())
}

/// Shared connection to one OpenAI-compatible base URL.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Build a client whose API key is read from `api_key_env`.
    pub fn from_env(base_url: impl Into<String>, api_key_env: &str) -> Result<Self> {
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| OpenAiError::MissingApiKey(api_key_env.to_string()))?;
        Self::new(base_url, api_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn post(&self, body: Value, timeout: Option<Duration>) -> Result<reqwest::Response> {
        let mut request = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("failed to read error body: {e}"));
            return Err(OpenAiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Stream a chat completion, calling `on_delta` for every content
    /// fragment. `tools` are function schemas offered to the model; tool
    /// call fragments are assembled into the returned reply.
    pub async fn chat_stream<F>(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: &[Value],
        mut on_delta: F,
    ) -> Result<StreamedReply>
    where
        F: FnMut(&str) + Send,
    {
        let mut body = json!({
            "model": model,
            "messages": messages,
            "stream": true,
        });
        if !tools.is_empty() {
            body["tools"] = Value::from(tools.to_vec());
        }
        debug!(model, messages = messages.len(), tools = tools.len(), "Starting streaming completion");

        let response = self.post(body, None).await?;
        let mut stream = response.bytes_stream().eventsource();
        let mut reply = StreamedReply::default();

        while let Some(event) = stream.next().await {
            let event = event.map_err(|e| OpenAiError::Stream(e.to_string()))?;
            let data = event.data.trim();
            if data == "[DONE]" {
                break;
            }
            if data.is_empty() {
                continue;
            }
            let Some(choice) = parse_chunk(data)? else {
                continue;
            };
            if let Some(delta) = choice.delta.content.as_deref().filter(|d| !d.is_empty()) {
                trace!(bytes = delta.len(), "Delta received");
                on_delta(delta);
            }
            reply.apply(choice);
        }

        debug!(
            model,
            bytes = reply.content.len(),
            tool_calls = reply.tool_calls.len(),
            finish_reason = reply.finish_reason.as_deref().unwrap_or("none"),
            "Streaming completion finished"
        );
        Ok(reply)
    }

    /// Non-streaming chat completion returning the first choice's text.
    pub async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        timeout: Option<Duration>,
    ) -> Result<String> {
        let body = json!({
            "model": model,
            "messages": messages,
        });
        let completion: Completion = self.post(body, timeout).await?.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or(OpenAiError::NoChoices)
    }
}

/// Streaming response of `frames` (JSON payloads) followed by `[DONE]`.
#[cfg(test)]
pub(crate) fn sse_response(frames: &[Value]) -> wiremock::ResponseTemplate {
    let mut body = String::new();
    for frame in frames {
        body.push_str(&format!("data: {frame}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    wiremock::ResponseTemplate::new(200)
        .insert_header("content-type", "text/event-stream")
        .set_body_string(body)
}

/// Content-only stream frames.
#[cfg(test)]
pub(crate) fn content_frames(deltas: &[&str]) -> Vec<Value> {
    std::iter::once(json!({ "choices": [{ "delta": { "role": "assistant" } }] }))
        .chain(
            deltas
                .iter()
                .map(|delta| json!({ "choices": [{ "delta": { "content": delta } }] })),
        )
        .collect()
}
