//! MCP Server implementation for logged shell command execution
//!
//! This module defines the main MCP server that exposes command execution
//! and audit log viewing as tools. Handler implementations are in the
//! handlers module.

use std::path::PathBuf;

use mcp_common::{
    async_trait, CallToolResult, EmbeddableError, EmbeddableMcp, EmbeddableResult, McpError,
    Tool,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde_json::Value;

use crate::audit::AuditLog;
use crate::handlers;
use crate::params::*;
use crate::types::Config;

/// The Shell Logger MCP Server
#[derive(Clone)]
pub struct ShellLoggerServer {
    config: Config,
    audit: AuditLog,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool Router - Each tool delegates to its handler
// ============================================================================

#[tool_router]
impl ShellLoggerServer {
    /// Create a new server, loading config from standard locations
    pub fn new() -> Self {
        Self::with_config(Self::discover_config())
    }

    /// Create a new server with explicit config
    pub fn with_config(config: Config) -> Self {
        let audit = AuditLog::new(config.log.resolved_path());

        Self {
            config,
            audit,
            tool_router: Self::tool_router(),
        }
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }

    /// Search the standard config locations, falling back to defaults
    ///
    /// Searched in order:
    /// 1. `./shell-logger-mcp.toml`
    /// 2. `$XDG_CONFIG_HOME/shell-logger-mcp/config.toml`
    /// 3. `~/.shell-logger-mcp.toml`
    pub fn discover_config() -> Config {
        let mut config_paths = vec![PathBuf::from("shell-logger-mcp.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("shell-logger-mcp").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            config_paths.push(home.join(".shell-logger-mcp.toml"));
        }

        for path in config_paths {
            if !path.exists() {
                continue;
            }
            match Config::from_file(&path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Skipping config {}: {}", path.display(), e);
                }
            }
        }

        tracing::info!("Using default configuration");
        Config::default()
    }

    #[tool(description = "Execute a shell command with optional output limiting and logging")]
    async fn execute_command(
        &self,
        Parameters(params): Parameters<ExecuteCommandParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::execute_command(&self.config, &self.audit, params).await
    }

    #[tool(description = "View recent command logs")]
    async fn view_logs(
        &self,
        Parameters(params): Parameters<ViewLogsParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::view_logs(&self.config, &self.audit, params).await
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for ShellLoggerServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Shell command execution MCP server with an append-only audit log. \
                 Commands run unsandboxed with the full privileges of this process. \
                 Use view_logs to review recent invocations."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

impl Default for ShellLoggerServer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for ShellLoggerServer {
    fn server_name(&self) -> &str {
        "shell-logger"
    }

    fn server_description(&self) -> Option<&str> {
        Some("Executes shell commands and keeps a JSON-lines audit log of them.")
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        match name {
            "execute_command" => {
                let params: ExecuteCommandParams = serde_json::from_value(params)?;
                self.execute_command(Parameters(params))
                    .await
                    .map_err(Into::into)
            }

            "view_logs" => {
                let params: ViewLogsParams = serde_json::from_value(params)?;
                self.view_logs(Parameters(params)).await.map_err(Into::into)
            }

            _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_common::first_text;
    use tempfile::{tempdir, TempDir};

    fn test_server() -> (TempDir, ShellLoggerServer) {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.log.path = dir.path().join("shell.log").to_string_lossy().into_owned();
        (dir, ShellLoggerServer::with_config(config))
    }

    #[test]
    fn test_embeddable_list_tools() {
        let (_dir, server) = test_server();
        let tools = server.list_tools();

        assert_eq!(tools.len(), 2);
        let tool_names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(tool_names.contains(&"execute_command"));
        assert!(tool_names.contains(&"view_logs"));
    }

    #[test]
    fn test_log_path_is_injected() {
        let (dir, server) = test_server();
        assert_eq!(server.audit_log().path(), dir.path().join("shell.log"));
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let (_dir, server) = test_server();
        let result = server.call_tool("rm_everything", serde_json::json!({})).await;
        assert!(matches!(result, Err(EmbeddableError::ToolNotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_command_is_rejected() {
        let (_dir, server) = test_server();
        let result = server
            .call_tool("execute_command", serde_json::json!({ "maxOutput": 5 }))
            .await;
        assert!(matches!(result, Err(EmbeddableError::SerdeError(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_camel_case_params_round_trip() {
        let (_dir, server) = test_server();

        let result = server
            .call_tool(
                "execute_command",
                serde_json::json!({
                    "command": "echo 0123456789abcdef",
                    "maxOutput": 4,
                    "enableLogging": true
                }),
            )
            .await
            .unwrap();
        let text = first_text(&result).unwrap();
        assert!(text.contains("Output:\n0123\n... (output truncated)"));

        let result = server
            .call_tool("view_logs", serde_json::json!({}))
            .await
            .unwrap();
        let text = first_text(&result).unwrap();
        assert!(text.contains("] echo 0123456789abcdef (SUCCESS, "));
    }
}
