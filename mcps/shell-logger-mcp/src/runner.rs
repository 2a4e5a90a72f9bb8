//! Subshell execution
//!
//! Spawns a command string through the configured shell, captures both
//! streams up to the per-stream byte ceiling, and times the run.

use std::process::Stdio;
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::types::{CapturedOutput, CommandOutcome, Config, ShellLoggerError};

/// Bytes read from one stream, and whether the ceiling was hit
#[derive(Debug, Default)]
struct StreamCapture {
    bytes: Vec<u8>,
    overflowed: bool,
}

impl StreamCapture {
    /// Append a chunk, keeping at most `limit` bytes. Returns true once the
    /// stream has gone over the ceiling.
    fn push(&mut self, chunk: &[u8], limit: usize) -> bool {
        let room = limit.saturating_sub(self.bytes.len());
        if chunk.len() > room {
            self.bytes.extend_from_slice(&chunk[..room]);
            self.overflowed = true;
        } else {
            self.bytes.extend_from_slice(chunk);
        }
        self.overflowed
    }
}

async fn read_some<R>(reader: &mut Option<R>, buf: &mut [u8]) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    match reader {
        Some(reader) => reader.read(buf).await,
        None => Ok(0),
    }
}

/// Read both streams until EOF, or until either goes over `limit`.
///
/// Returns as soon as one stream overflows, without waiting for the other
/// to close. Both readers are dropped on return.
async fn capture_streams<O, E>(
    mut stdout: Option<O>,
    mut stderr: Option<E>,
    limit: usize,
) -> std::io::Result<(StreamCapture, StreamCapture)>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let mut out = StreamCapture::default();
    let mut err = StreamCapture::default();
    let mut out_open = stdout.is_some();
    let mut err_open = stderr.is_some();
    let mut out_buf = vec![0u8; 8 * 1024];
    let mut err_buf = vec![0u8; 8 * 1024];

    while out_open || err_open {
        tokio::select! {
            n = read_some(&mut stdout, &mut out_buf), if out_open => {
                match n? {
                    0 => out_open = false,
                    n => {
                        if out.push(&out_buf[..n], limit) {
                            break;
                        }
                    }
                }
            }
            n = read_some(&mut stderr, &mut err_buf), if err_open => {
                match n? {
                    0 => err_open = false,
                    n => {
                        if err.push(&err_buf[..n], limit) {
                            break;
                        }
                    }
                }
            }
        }
    }

    Ok((out, err))
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Run `command` in a subshell and wait for it to finish.
///
/// Never fails: spawn errors, non-zero exits and buffer overflows all come
/// back as [`CommandOutcome::Failure`] carrying whatever was captured.
pub async fn run(config: &Config, command: &str, cwd: Option<&str>) -> CommandOutcome {
    let started = Instant::now();

    let mut cmd = Command::new(&config.execution.shell);
    cmd.arg(&config.execution.shell_arg)
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    // Apply environment config
    for (key, value) in &config.environment.set {
        cmd.env(key, value);
    }
    for key in &config.environment.remove {
        cmd.env_remove(key);
    }

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            return CommandOutcome::Failure {
                output: CapturedOutput {
                    duration_ms: elapsed_ms(started),
                    ..Default::default()
                },
                error: ShellLoggerError::Spawn(e),
            };
        }
    };

    let limit = config.execution.max_buffer_bytes;
    let captured =
        capture_streams(child.stdout.take(), child.stderr.take(), limit).await;

    let (stdout, stderr) = match captured {
        Ok(streams) => streams,
        Err(e) => {
            return CommandOutcome::Failure {
                output: CapturedOutput {
                    duration_ms: elapsed_ms(started),
                    ..Default::default()
                },
                error: ShellLoggerError::IoError(e),
            };
        }
    };

    let overflow = if stdout.overflowed {
        Some("stdout")
    } else if stderr.overflowed {
        Some("stderr")
    } else {
        None
    };

    if overflow.is_some() {
        if let Err(e) = child.start_kill() {
            tracing::debug!(error = %e, "Child already exited after buffer overflow");
        }
    }

    let status = child.wait().await;

    let output = CapturedOutput {
        stdout: String::from_utf8_lossy(&stdout.bytes).into_owned(),
        stderr: String::from_utf8_lossy(&stderr.bytes).into_owned(),
        duration_ms: elapsed_ms(started),
    };

    let error = match (overflow, status) {
        (Some(stream), _) => ShellLoggerError::BufferExceeded { stream },
        (None, Err(e)) => ShellLoggerError::IoError(e),
        (None, Ok(status)) if status.success() => {
            tracing::debug!(command, duration_ms = output.duration_ms, "Command succeeded");
            return CommandOutcome::Success(output);
        }
        (None, Ok(status)) => ShellLoggerError::NonZeroExit {
            command: command.to_string(),
            code: status.code(),
            stderr: output.stderr.clone(),
        },
    };

    tracing::debug!(
        command,
        duration_ms = output.duration_ms,
        error = %error,
        "Command failed"
    );

    CommandOutcome::Failure { output, error }
}
