//! Built-in tools the agent may call
//!
//! Tools are opt-in: only the names listed under `agent.tools` are offered
//! to the model.

mod builtin;
mod schema;

pub use builtin::{BuiltinTools, CURRENT_TIME, READ_FILE, builtin_names};
pub use schema::{function_schema, function_schemas};
