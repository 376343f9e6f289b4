//! Tool executor port
//!
//! Tools the agent may call while answering. Implementations (adapters)
//! live in the infrastructure layer.

use async_trait::async_trait;
use parley_domain::{ToolCall, ToolDefinition, ToolError};

#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Every tool this executor can run.
    fn definitions(&self) -> &[ToolDefinition];

    fn has_tool(&self, name: &str) -> bool {
        self.definitions().iter().any(|d| d.name == name)
    }

    /// Run one call; each returned string is one result entry.
    async fn execute(&self, call: &ToolCall) -> Result<Vec<String>, ToolError>;
}

/// An executor without tools.
pub struct NoTools;

#[async_trait]
impl ToolExecutorPort for NoTools {
    fn definitions(&self) -> &[ToolDefinition] {
        &[]
    }

    async fn execute(&self, call: &ToolCall) -> Result<Vec<String>, ToolError> {
        Err(ToolError::UnknownTool(call.name.clone()))
    }
}
