//! Result helpers for MCP tool responses

use rmcp::model::{CallToolResult, Content, RawContent};

/// Create a successful plain text response
///
/// Tools whose failures are described in prose (rather than raised as
/// protocol errors) also answer through this.
pub fn text_success(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// The first text block of a tool result, if any
pub fn first_text(result: &CallToolResult) -> Option<&str> {
    result.content.iter().find_map(|content| match &content.raw {
        RawContent::Text(text) => Some(text.text.as_str()),
        _ => None,
    })
}
