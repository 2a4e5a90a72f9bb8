//! MCP Common - Shared utilities for MCP servers
//!
//! - **Initialization**: [`init_tracing`] routes diagnostics to stderr so
//!   stdout stays free for the protocol
//! - **Results**: helpers for building and reading text `CallToolResult`s
//! - **Embeddable**: [`EmbeddableMcp`] trait for in-process execution
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::text_success;
//!
//! fn my_tool(&self) -> Result<CallToolResult, McpError> {
//!     Ok(text_success("done"))
//! }
//! ```

pub mod embeddable;
pub mod init;
pub mod result;

// Re-export commonly used items at crate root
pub use embeddable::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use init::init_tracing;
pub use result::{first_text, text_success};

// Re-export rmcp types that are commonly needed
pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

// Re-export async_trait for implementing EmbeddableMcp
pub use async_trait::async_trait;
