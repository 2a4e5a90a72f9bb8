//! Shell Logger MCP - shell command execution with an audit log
//!
//! Serves `execute_command` and `view_logs` over stdio.

use std::path::PathBuf;

use clap::Parser;
use rmcp::{transport::io::stdio, ServiceExt};
use shell_logger_mcp::{Config, ShellLoggerServer};

#[derive(Parser, Debug)]
#[command(name = "shell-logger-mcp", version, about = "Shell command MCP server with audit logging")]
struct Cli {
    /// Config file (skips the standard search locations)
    #[arg(long, env = "SHELL_LOGGER_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Audit log file, overriding the configured path
    #[arg(long, env = "MCP_SHELL_LOG_FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    mcp_common::init_tracing("shell_logger_mcp")?;

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => ShellLoggerServer::discover_config(),
    };
    if let Some(path) = cli.log_file {
        config.log.path = path.to_string_lossy().into_owned();
    }

    let server = ShellLoggerServer::with_config(config);
    tracing::info!(
        log_file = %server.audit_log().path().display(),
        "Starting shell_logger_mcp MCP Server"
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Server error: {}", e);
    })?;

    tracing::info!("MCP Shell Logger Server is running...");

    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}
