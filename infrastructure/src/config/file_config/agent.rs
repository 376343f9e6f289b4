//! Agent configuration from TOML (`[agent]` section)

use crate::openai::DEFAULT_MAX_TOOL_ROUNDS;
use crate::tools::{BuiltinTools, builtin_names};
use parley_application::TurnParams;
use parley_domain::{
    ConfigIssue, ConfigIssueCode, DEFAULT_ANSWER_MARKER, DEFAULT_HISTORY_LIMIT,
    DEFAULT_LOOKAHEAD_CHARS, StreamDemultiplexer, ToolError,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI-compatible endpoint used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// model = "qwen-plus"
/// base_url = "https://dashscope.aliyuncs.com/compatible-mode/v1"
/// api_key_env = "DASHSCOPE_API_KEY"
/// timeout_seconds = 300
/// answer_marker = "AI:"
/// lookahead_chars = 10
/// history_limit = 200
/// tools = ["current_time", "read_file"]
/// max_tool_rounds = 5
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Chat model name
    pub model: String,
    /// OpenAI-compatible API root
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Upper bound on one agent call
    pub timeout_seconds: u64,
    /// Literal text introducing the final answer
    pub answer_marker: String,
    /// Characters held back while searching for the marker
    pub lookahead_chars: usize,
    /// Messages of history sent with each query
    pub history_limit: usize,
    /// Built-in tools offered to the model (none by default)
    pub tools: Vec<String>,
    /// Model round trips that may request tools before answering
    pub max_tool_rounds: usize,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            model: "qwen-plus".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: "DASHSCOPE_API_KEY".to_string(),
            timeout_seconds: 300,
            answer_marker: DEFAULT_ANSWER_MARKER.to_string(),
            lookahead_chars: DEFAULT_LOOKAHEAD_CHARS,
            history_limit: DEFAULT_HISTORY_LIMIT,
            tools: Vec::new(),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }
}

impl FileAgentConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyModel,
                "agent.model cannot be empty",
            ));
        }
        if self.timeout_seconds == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "agent.timeout_seconds cannot be 0",
            ));
        }
        if self.answer_marker.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyAnswerMarker,
                "agent.answer_marker cannot be empty",
            ));
        } else {
            let min = StreamDemultiplexer::min_lookahead(&self.answer_marker);
            if self.lookahead_chars < min {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::LookaheadBelowMarker,
                    format!(
                        "agent.lookahead_chars: {} is shorter than the marker needs, using {}",
                        self.lookahead_chars, min
                    ),
                ));
            }
        }
        if self.history_limit == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoHistory,
                "agent.history_limit is 0, the agent will not see earlier turns",
            ));
        }
        for name in &self.tools {
            if !builtin_names().contains(&name.as_str()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::UnknownTool,
                    format!(
                        "agent.tools: unknown tool '{}' (available: {})",
                        name,
                        builtin_names().join(", ")
                    ),
                ));
            }
        }

        issues
    }

    /// Convert to application-layer [`TurnParams`].
    pub fn to_turn_params(&self) -> TurnParams {
        TurnParams::default()
            .with_answer_marker(self.answer_marker.clone())
            .with_lookahead_chars(self.lookahead_chars)
            .with_history_limit(self.history_limit)
            .with_agent_timeout(Duration::from_secs(self.timeout_seconds))
    }

    /// Executor for the tools listed in `agent.tools`.
    pub fn to_tools(&self) -> Result<BuiltinTools, ToolError> {
        BuiltinTools::from_names(&self.tools)
    }
}
