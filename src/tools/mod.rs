//! MCP tools implementation
//!
//! Every tool body resolves to a plain string: a JSON success payload or
//! a message beginning `Error: `. Nothing below this layer leaks a raw
//! failure across the tool-call boundary.

pub mod articles;
pub mod feeds;
pub mod marks;
pub mod util;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;
use crate::mcp::{McpResponse, ToolResult};

/// Deserialize tool-call arguments; absent arguments mean "all defaults"
pub(crate) fn parse_args<A: DeserializeOwned>(args: Value) -> Result<A, AppError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args)
        .map_err(|e| AppError::InvalidInput(format!("Invalid arguments: {}", e)))
}

/// Wrap a tool's output text in a successful MCP response
pub(crate) fn text_response(id: Option<Value>, text: String) -> McpResponse {
    McpResponse::success(
        id,
        serde_json::to_value(ToolResult::text(text)).unwrap_or_default(),
    )
}
