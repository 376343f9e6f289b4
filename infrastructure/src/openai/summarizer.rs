//! Summary model over a non-streaming chat completion.

use super::client::{ChatMessage, OpenAiClient};
use async_trait::async_trait;
use parley_application::{SummaryModel, SummaryModelError};
use parley_domain::{Role, SummaryPromptTemplate};
use std::sync::Arc;
use std::time::Duration;

/// Default per-request timeout for summary calls.
pub const DEFAULT_SUMMARY_TIMEOUT: Duration = Duration::from_secs(120);

pub struct OpenAiSummaryModel {
    client: Arc<OpenAiClient>,
    model: String,
    timeout: Duration,
}

impl OpenAiSummaryModel {
    pub fn new(client: Arc<OpenAiClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            timeout: DEFAULT_SUMMARY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl SummaryModel for OpenAiSummaryModel {
    async fn summarize(&self, role: Role, content: &str) -> Result<String, SummaryModelError> {
        let messages = [ChatMessage::new(
            "user",
            SummaryPromptTemplate::render(role, content),
        )];
        let text = self
            .client
            .chat(&self.model, &messages, Some(self.timeout))
            .await?;

        let text = text.trim();
        if text.is_empty() {
            return Err(SummaryModelError::EmptyOutput);
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        }))
    }

    fn model_for(server: &MockServer, model: &str) -> OpenAiSummaryModel {
        let client = Arc::new(OpenAiClient::new(format!("{}/v1", server.uri()), "k").unwrap());
        OpenAiSummaryModel::new(client, model)
    }

    #[tokio::test]
    async fn test_summarize_trims_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({ "model": "deepseek-v3" })))
            .respond_with(completion("  short version \n"))
            .expect(1)
            .mount(&server)
            .await;
        let model = model_for(&server, "deepseek-v3");

        let summary = model.summarize(Role::Assistant, "long text").await.unwrap();
        assert_eq!(summary, "short version");

        let requests = server.received_requests().await.unwrap();
        let body: Value = requests[0].body_json().unwrap();
        assert!(body.get("stream").is_none());
        assert!(body["messages"][0]["content"].as_str().unwrap().contains("long text"));
    }

    #[tokio::test]
    async fn test_summarize_empty_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion("   "))
            .mount(&server)
            .await;
        let model = model_for(&server, "m");

        let err = model.summarize(Role::User, "x").await.unwrap_err();
        assert_eq!(err, SummaryModelError::EmptyOutput);
    }

    #[tokio::test]
    async fn test_summarize_request_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;
        let model = model_for(&server, "m").with_timeout(Duration::from_secs(5));

        let err = model.summarize(Role::User, "x").await.unwrap_err();
        assert!(matches!(err, SummaryModelError::RequestFailed(msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn test_summarize_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion("late").set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;
        let model = model_for(&server, "m").with_timeout(Duration::from_millis(100));

        let err = model.summarize(Role::User, "x").await.unwrap_err();
        assert!(matches!(err, SummaryModelError::RequestFailed(_)));
    }
}
