//! Append-only JSON-lines audit log
//!
//! Every logged invocation becomes one [`LogRecord`] line. Appends are
//! best-effort: a write failure is reported to the diagnostic stream and
//! never reaches the caller. Concurrent appends are not coordinated beyond
//! the filesystem's own append semantics.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::types::{CommandOutcome, LogRecord, ShellLoggerError};

/// Handle to the audit log file
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record for `command`. Failures are logged, not returned.
    pub async fn record(&self, command: &str, outcome: &CommandOutcome) {
        let record = LogRecord::from_outcome(command, outcome);
        if let Err(e) = self.append(&record).await {
            tracing::error!(
                path = %self.path.display(),
                error = %e,
                "Failed to write log"
            );
        }
    }

    async fn append(&self, record: &LogRecord) -> Result<(), ShellLoggerError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Read the log and summarise its last `lines` entries, oldest first
    pub async fn tail(&self, lines: i64) -> std::io::Result<Vec<String>> {
        let content = fs::read_to_string(&self.path).await?;
        let all: Vec<&str> = content.trim().split('\n').collect();
        Ok(tail_window(&all, lines)
            .iter()
            .map(|line| format_entry(line))
            .collect())
    }
}

/// Select lines the way a negative-index slice would.
///
/// `n > 0` keeps the last `n`, `0` keeps everything, and `n < 0` drops
/// the first `|n|`.
fn tail_window<'a, 'b>(lines: &'a [&'b str], n: i64) -> &'a [&'b str] {
    let len = lines.len();
    let start = match n {
        0 => 0,
        n if n > 0 => len.saturating_sub(usize::try_from(n).unwrap_or(usize::MAX)),
        n => usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX).min(len),
    };
    &lines[start..]
}

/// Render one field of a log entry; absent fields show as `-`
fn entry_field(entry: &Value, key: &str) -> String {
    match entry.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => "-".to_string(),
        Some(other) => other.to_string(),
    }
}

/// One-line summary of a log line.
///
/// Any JSON value is summarised, with missing fields shown as `-`; lines
/// that are not JSON (or are `null`) pass through unchanged.
pub fn format_entry(line: &str) -> String {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Null) | Err(_) => line.to_string(),
        Ok(entry) => {
            let status = if entry.get("exitCode").and_then(Value::as_i64) == Some(0) {
                "SUCCESS"
            } else {
                "FAILED"
            };
            format!(
                "[{}] {} ({}, {}ms)",
                entry_field(&entry, "timestamp"),
                entry_field(&entry, "command"),
                status,
                entry_field(&entry, "duration")
            )
        }
    }
}
