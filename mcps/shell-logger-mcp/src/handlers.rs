//! Tool handlers
//!
//! Both tools always answer with a text body. Command failures and log read
//! errors are described in that body rather than raised as protocol errors.

use mcp_common::{text_success, CallToolResult, McpError};

use crate::audit::AuditLog;
use crate::format;
use crate::params::*;
use crate::runner;
use crate::types::Config;

pub async fn execute_command(
    config: &Config,
    audit: &AuditLog,
    params: ExecuteCommandParams,
) -> Result<CallToolResult, McpError> {
    let max_output = params.max_output.unwrap_or(config.defaults.max_output);
    let enable_logging = params
        .enable_logging
        .unwrap_or(config.defaults.enable_logging);

    let outcome = runner::run(
        config,
        &params.command,
        params.working_directory.as_deref(),
    )
    .await;

    // Logged before truncation so the record keeps the full streams
    if enable_logging {
        audit.record(&params.command, &outcome).await;
    }

    Ok(text_success(format::render(&outcome, max_output)))
}

pub async fn view_logs(
    config: &Config,
    audit: &AuditLog,
    params: ViewLogsParams,
) -> Result<CallToolResult, McpError> {
    let lines = params.lines.unwrap_or(config.defaults.view_lines);

    let text = match audit.tail(lines).await {
        Ok(entries) => format!("Recent command logs:\n\n{}", entries.join("\n")),
        Err(e) => format!("No logs found or error reading logs: {}", e),
    };

    Ok(text_success(text))
}
