//! OpenAI function-calling schema for tool definitions.

use parley_domain::ToolDefinition;
use serde_json::{Map, Value, json};

/// Map a parameter type to its JSON Schema type; unknown types are strings.
fn schema_type(param_type: &str) -> &'static str {
    match param_type {
        "number" => "number",
        "integer" => "integer",
        "boolean" => "boolean",
        _ => "string",
    }
}

/// `{"type":"function","function":{...}}` entry for the `tools` request field.
pub fn function_schema(tool: &ToolDefinition) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in &tool.parameters {
        properties.insert(
            param.name.clone(),
            json!({
                "type": schema_type(&param.param_type),
                "description": param.description,
            }),
        );
        if param.required {
            required.push(Value::from(param.name.clone()));
        }
    }

    json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        }
    })
}

/// Schemas sorted by tool name, so requests are stable.
pub fn function_schemas(tools: &[ToolDefinition]) -> Vec<Value> {
    let mut tools: Vec<&ToolDefinition> = tools.iter().collect();
    tools.sort_by(|a, b| a.name.cmp(&b.name));
    tools.into_iter().map(function_schema).collect()
}
