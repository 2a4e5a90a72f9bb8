//! Shell Logger MCP Library
//!
//! Executes shell commands on behalf of an MCP client and keeps an
//! append-only JSON-lines audit log of every invocation. Commands run with
//! the full privileges of the hosting process; there is no sandbox.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//! use shell_logger_mcp::ShellLoggerServer;
//!
//! let server = ShellLoggerServer::new();
//! let result = server
//!     .call_tool("execute_command", serde_json::json!({ "command": "echo hi" }))
//!     .await?;
//! ```

pub mod audit;
pub mod format;
pub mod handlers;
pub mod params;
pub mod runner;
pub mod server;
pub mod types;

// Re-export main server type
pub use server::ShellLoggerServer;

pub use audit::AuditLog;
pub use types::{Config, LogRecord, ShellLoggerError};

// Re-export parameter types for direct API usage
pub use params::*;
