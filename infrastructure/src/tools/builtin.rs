//! Built-in tools: current_time, read_file

use async_trait::async_trait;
use chrono::Utc;
use parley_application::ToolExecutorPort;
use parley_domain::{ToolCall, ToolDefinition, ToolError, ToolParameter};
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::debug;

pub const CURRENT_TIME: &str = "current_time";
pub const READ_FILE: &str = "read_file";

/// Upper bound on bytes returned by read_file.
const MAX_READ_BYTES: u64 = 64 * 1024;

/// Names accepted in `agent.tools`.
pub fn builtin_names() -> [&'static str; 2] {
    [CURRENT_TIME, READ_FILE]
}

fn definition(name: &str) -> Option<ToolDefinition> {
    match name {
        CURRENT_TIME => Some(ToolDefinition::new(
            CURRENT_TIME,
            "Current date and time in UTC (RFC 3339)",
        )),
        READ_FILE => Some(
            ToolDefinition::new(READ_FILE, "Read a UTF-8 text file from the local disk")
                .with_parameter(ToolParameter::new("path", "Path of the file to read", true))
                .with_parameter(
                    ToolParameter::new(
                        "max_bytes",
                        "Maximum number of bytes to return (at most 65536)",
                        false,
                    )
                    .with_type("integer"),
                ),
        ),
        _ => None,
    }
}

/// Executor over a chosen subset of the built-in tools.
#[derive(Debug, Clone, Default)]
pub struct BuiltinTools {
    definitions: Vec<ToolDefinition>,
}

impl BuiltinTools {
    /// Enable the named tools; an unknown name is an error.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ToolError> {
        let mut definitions: Vec<ToolDefinition> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if definitions.iter().any(|d| d.name == name) {
                continue;
            }
            definitions
                .push(definition(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?);
        }
        Ok(Self { definitions })
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

async fn read_file(call: &ToolCall) -> Result<Vec<String>, ToolError> {
    let path = Path::new(call.require_str("path")?);
    let limit = call
        .get_u64("max_bytes")
        .map_or(MAX_READ_BYTES, |n| n.min(MAX_READ_BYTES));

    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| ToolError::Failed(format!("{}: {e}", path.display())))?;
    let metadata = file
        .metadata()
        .await
        .map_err(|e| ToolError::Failed(format!("{}: {e}", path.display())))?;
    if !metadata.is_file() {
        return Err(ToolError::InvalidArguments(format!(
            "'{}' is not a file",
            path.display()
        )));
    }
    let size = metadata.len();

    let mut bytes = Vec::new();
    file.take(limit)
        .read_to_end(&mut bytes)
        .await
        .map_err(|e| ToolError::Failed(format!("{}: {e}", path.display())))?;

    let mut result = vec![String::from_utf8_lossy(&bytes).into_owned()];
    if size > limit {
        result.push(format!("[truncated: {limit} of {size} bytes]"));
    }
    Ok(result)
}

#[async_trait]
impl ToolExecutorPort for BuiltinTools {
    fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    async fn execute(&self, call: &ToolCall) -> Result<Vec<String>, ToolError> {
        if !self.has_tool(&call.name) {
            return Err(ToolError::UnknownTool(call.name.clone()));
        }
        debug!(tool = %call.name, id = %call.id, "Executing tool");
        match call.name.as_str() {
            CURRENT_TIME => Ok(vec![Utc::now().to_rfc3339()]),
            READ_FILE => read_file(call).await,
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn call(name: &str, arguments: &str) -> ToolCall {
        ToolCall::parse("call_1", name, arguments).unwrap()
    }

    #[test]
    fn test_from_names_rejects_unknown_tool() {
        assert_eq!(
            BuiltinTools::from_names(&["current_time", "shell"]).unwrap_err(),
            ToolError::UnknownTool("shell".to_string())
        );
    }

    #[test]
    fn test_from_names_skips_duplicates() {
        let tools = BuiltinTools::from_names(&["read_file", "read_file"]).unwrap();
        assert_eq!(tools.definitions().len(), 1);
        assert!(tools.has_tool(READ_FILE));
        assert!(!tools.has_tool(CURRENT_TIME));
        assert!(BuiltinTools::from_names::<&str>(&[]).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_tool_is_not_executed() {
        let tools = BuiltinTools::from_names(&["read_file"]).unwrap();
        let err = tools.execute(&call(CURRENT_TIME, "")).await.unwrap_err();
        assert_eq!(err, ToolError::UnknownTool("current_time".to_string()));
    }

    #[tokio::test]
    async fn test_current_time_is_rfc3339() {
        let tools = BuiltinTools::from_names(&["current_time"]).unwrap();
        let result = tools.execute(&call(CURRENT_TIME, "{}")).await.unwrap();
        assert_eq!(result.len(), 1);
        assert!(chrono::DateTime::parse_from_rfc3339(&result[0]).is_ok());
    }

    #[tokio::test]
    async fn test_read_file_returns_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "drink water").unwrap();
        let tools = BuiltinTools::from_names(&["read_file"]).unwrap();

        let args = serde_json::json!({ "path": file.path() }).to_string();
        let result = tools.execute(&call(READ_FILE, &args)).await.unwrap();
        assert_eq!(result, vec!["drink water".to_string()]);
    }

    #[tokio::test]
    async fn test_read_file_truncates_to_max_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "0123456789").unwrap();
        let tools = BuiltinTools::from_names(&["read_file"]).unwrap();

        let args = serde_json::json!({ "path": file.path(), "max_bytes": 4 }).to_string();
        let result = tools.execute(&call(READ_FILE, &args)).await.unwrap();
        assert_eq!(result[0], "0123");
        assert_eq!(result[1], "[truncated: 4 of 10 bytes]");
    }

    #[tokio::test]
    async fn test_read_file_errors() {
        let tools = BuiltinTools::from_names(&["read_file"]).unwrap();

        let missing_arg = tools.execute(&call(READ_FILE, "{}")).await.unwrap_err();
        assert!(matches!(missing_arg, ToolError::InvalidArguments(_)));

        let dir = tempfile::tempdir().unwrap();
        let absent = serde_json::json!({ "path": dir.path().join("absent.txt") }).to_string();
        let err = tools.execute(&call(READ_FILE, &absent)).await.unwrap_err();
        assert!(matches!(err, ToolError::Failed(m) if m.contains("absent.txt")));
    }
}
