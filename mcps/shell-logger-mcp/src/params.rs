//! Parameter types for Shell Logger MCP tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteCommandParams {
    #[schemars(description = "The shell command to execute")]
    pub command: String,

    #[schemars(description = "Working directory for command execution")]
    #[serde(default)]
    pub working_directory: Option<String>,

    #[schemars(
        description = "Maximum characters to return (-1 for unlimited, 0 for no output, default: 500)"
    )]
    #[serde(default)]
    pub max_output: Option<i64>,

    #[schemars(
        description = "Whether to save command and output to log file (default: true)"
    )]
    #[serde(default)]
    pub enable_logging: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ViewLogsParams {
    #[schemars(description = "Number of recent log entries to show (default: 10)")]
    #[serde(default)]
    pub lines: Option<i64>,
}
