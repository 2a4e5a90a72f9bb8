//! Type definitions for shell logger MCP

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Configuration Types
// ============================================================================

/// Server configuration, loaded from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub environment: EnvConfig,
}

impl Config {
    /// Parse a config file, failing on unreadable or malformed input
    pub fn from_file(path: &Path) -> Result<Self, ShellLoggerError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ShellLoggerError::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| ShellLoggerError::Config(format!("{}: {}", path.display(), e)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Audit log file; a leading `~` expands to the home directory
    #[serde(default = "default_log_path")]
    pub path: String,
}

fn default_log_path() -> String {
    "~/.mcp-shell-commands.log".to_string()
}

impl LogConfig {
    pub fn resolved_path(&self) -> PathBuf {
        resolve_path(&self.path)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: default_log_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Shell used to interpret command strings
    #[serde(default = "default_shell")]
    pub shell: String,

    /// Flag that makes the shell read the command from its next argument
    #[serde(default = "default_shell_arg")]
    pub shell_arg: String,

    /// Capture ceiling per stream (stdout/stderr) in bytes
    #[serde(default = "default_max_buffer")]
    pub max_buffer_bytes: usize,
}

#[cfg(not(windows))]
fn default_shell() -> String {
    "/bin/sh".to_string()
}

#[cfg(windows)]
fn default_shell() -> String {
    "cmd".to_string()
}

#[cfg(not(windows))]
fn default_shell_arg() -> String {
    "-c".to_string()
}

#[cfg(windows)]
fn default_shell_arg() -> String {
    "/C".to_string()
}

fn default_max_buffer() -> usize {
    10 * 1024 * 1024 // 10MB
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            shell_arg: default_shell_arg(),
            max_buffer_bytes: default_max_buffer(),
        }
    }
}

/// Values used when a tool call omits the corresponding parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_max_output")]
    pub max_output: i64,
    #[serde(default = "default_enable_logging")]
    pub enable_logging: bool,
    #[serde(default = "default_view_lines")]
    pub view_lines: i64,
}

fn default_max_output() -> i64 {
    500
}

fn default_enable_logging() -> bool {
    true
}

fn default_view_lines() -> i64 {
    10
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            max_output: default_max_output(),
            enable_logging: default_enable_logging(),
            view_lines: default_view_lines(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Environment variables to set
    #[serde(default)]
    pub set: HashMap<String, String>,
    /// Environment variables to remove
    #[serde(default)]
    pub remove: Vec<String>,
}

/// Resolve ~ to home directory
pub fn resolve_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(path)
}

// ============================================================================
// Execution Types
// ============================================================================

/// How much of each captured stream is shown to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLimit {
    Unlimited,
    Chars(usize),
}

impl From<i64> for OutputLimit {
    /// `-1` disables truncation; any other negative value shows nothing.
    fn from(value: i64) -> Self {
        match value {
            -1 => OutputLimit::Unlimited,
            n if n < 0 => OutputLimit::Chars(0),
            n => OutputLimit::Chars(usize::try_from(n).unwrap_or(usize::MAX)),
        }
    }
}

/// Streams captured from a finished (or failed) command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

/// Result of a single command run
#[derive(Debug)]
pub enum CommandOutcome {
    Success(CapturedOutput),
    Failure {
        output: CapturedOutput,
        error: ShellLoggerError,
    },
}

impl CommandOutcome {
    pub fn output(&self) -> &CapturedOutput {
        match self {
            CommandOutcome::Success(output) => output,
            CommandOutcome::Failure { output, .. } => output,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Success(_))
    }
}

// ============================================================================
// Audit Log Types
// ============================================================================

/// One line of the audit log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub timestamp: String,
    pub command: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration: u64,
}

impl LogRecord {
    /// Build a record from the untruncated outcome, stamped with the current time
    pub fn from_outcome(command: &str, outcome: &CommandOutcome) -> Self {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        match outcome {
            CommandOutcome::Success(output) => Self {
                timestamp,
                command: command.to_string(),
                exit_code: 0,
                stdout: output.stdout.clone(),
                stderr: output.stderr.clone(),
                duration: output.duration_ms,
            },
            CommandOutcome::Failure { output, error } => Self {
                timestamp,
                command: command.to_string(),
                exit_code: 1,
                stdout: output.stdout.clone(),
                stderr: if output.stderr.is_empty() {
                    error.to_string()
                } else {
                    output.stderr.clone()
                },
                duration: output.duration_ms,
            },
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum ShellLoggerError {
    #[error("Failed to spawn command: {0}")]
    Spawn(#[source] std::io::Error),

    /// `code` is `None` when the process was terminated by a signal
    #[error("Command failed: {command}\n{stderr}")]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{stream} maxBuffer length exceeded")]
    BufferExceeded { stream: &'static str },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
