//! Text bodies returned by `execute_command`
//!
//! Truncation here is presentation only; the audit log always receives the
//! full captured streams.

use std::fmt::Write;

use crate::types::{CapturedOutput, CommandOutcome, OutputLimit, ShellLoggerError};

const STDOUT_SUFFIX: &str = "\n... (output truncated)";
const STDERR_SUFFIX: &str = "\n... (error output truncated)";

/// Cut `text` to at most `limit` characters.
///
/// Returns the displayed text and whether anything was cut. The suffix is
/// only appended for a non-zero cap.
pub fn truncate(text: &str, limit: OutputLimit, suffix: &str) -> (String, bool) {
    let OutputLimit::Chars(max) = limit else {
        return (text.to_string(), false);
    };

    match text.char_indices().nth(max) {
        None => (text.to_string(), false),
        Some((cut, _)) => {
            let mut shown = text[..cut].to_string();
            if max > 0 {
                shown.push_str(suffix);
            }
            (shown, true)
        }
    }
}

/// Render the caller-facing text for an outcome.
///
/// `max_output` is the cap as the caller sent it; the header echoes it back.
pub fn render(outcome: &CommandOutcome, max_output: i64) -> String {
    let limit = OutputLimit::from(max_output);
    match outcome {
        CommandOutcome::Success(output) => success_body(output, limit, max_output),
        CommandOutcome::Failure { output, error } => failure_body(output, error, limit),
    }
}

fn success_body(output: &CapturedOutput, limit: OutputLimit, max_output: i64) -> String {
    let (stdout, stdout_cut) = truncate(&output.stdout, limit, STDOUT_SUFFIX);
    let (stderr, stderr_cut) = truncate(&output.stderr, limit, STDERR_SUFFIX);

    let mut body = format!("Command executed successfully ({}ms)", output.duration_ms);
    if stdout_cut || stderr_cut {
        let _ = write!(
            body,
            " - Output: {} chars (truncated to {})",
            output.stdout.chars().count(),
            max_output
        );
    }
    let _ = write!(body, ":\n\nOutput:\n{}\n", stdout);
    if !stderr.is_empty() {
        let _ = write!(body, "\nErrors:\n{}", stderr);
    }
    body
}

fn failure_body(output: &CapturedOutput, error: &ShellLoggerError, limit: OutputLimit) -> String {
    let total = output.stdout.chars().count() + output.stderr.chars().count();
    let (stdout, _) = truncate(&output.stdout, limit, STDOUT_SUFFIX);
    let (stderr, _) = truncate(&output.stderr, limit, STDERR_SUFFIX);

    format!(
        "Command failed ({}ms) - Total output: {} chars:\n\nError: {}\n\nOutput:\n{}\n\nError output:\n{}",
        output.duration_ms, total, error, stdout, stderr
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(stdout: &str, stderr: &str) -> CommandOutcome {
        CommandOutcome::Success(CapturedOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            duration_ms: 7,
        })
    }

    #[test]
    fn test_truncate_unlimited_keeps_everything() {
        let long = "x".repeat(100_000);
        let (shown, cut) = truncate(&long, OutputLimit::Unlimited, STDOUT_SUFFIX);
        assert_eq!(shown, long);
        assert!(!cut);
    }

    #[test]
    fn test_truncate_at_exact_length_is_untouched() {
        let (shown, cut) = truncate("hello", OutputLimit::Chars(5), STDOUT_SUFFIX);
        assert_eq!(shown, "hello");
        assert!(!cut);
    }

    #[test]
    fn test_truncate_appends_suffix() {
        let (shown, cut) = truncate("hello world", OutputLimit::Chars(5), STDOUT_SUFFIX);
        assert_eq!(shown, "hello\n... (output truncated)");
        assert!(cut);
    }

    #[test]
    fn test_truncate_zero_cap_has_no_suffix() {
        let (shown, cut) = truncate("hello", OutputLimit::Chars(0), STDOUT_SUFFIX);
        assert_eq!(shown, "");
        assert!(cut);

        let (shown, cut) = truncate("", OutputLimit::Chars(0), STDOUT_SUFFIX);
        assert_eq!(shown, "");
        assert!(!cut);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let (shown, cut) = truncate("héllo", OutputLimit::Chars(2), "");
        assert_eq!(shown, "hé");
        assert!(cut);
    }

    #[test]
    fn test_success_body_plain() {
        let text = render(&success("hi\n", ""), 500);
        assert_eq!(text, "Command executed successfully (7ms):\n\nOutput:\nhi\n\n");
    }

    #[test]
    fn test_success_body_with_stderr() {
        let text = render(&success("out\n", "warn\n"), -1);
        assert!(text.ends_with("Output:\nout\n\n\nErrors:\nwarn\n"));
    }

    #[test]
    fn test_success_body_truncation_header() {
        let stdout = format!("{}\n", "x".repeat(1000));
        let text = render(&success(&stdout, ""), 10);

        assert!(text.starts_with(
            "Command executed successfully (7ms) - Output: 1001 chars (truncated to 10):"
        ));
        assert!(text.contains("Output:\nxxxxxxxxxx\n... (output truncated)\n"));
    }

    #[test]
    fn test_success_body_stderr_only_truncation_flags_header() {
        let text = render(&success("ok", "a long warning"), 4);
        assert!(text.contains(" - Output: 2 chars (truncated to 4)"));
        assert!(text.contains("Errors:\na lo\n... (error output truncated)"));
    }

    #[test]
    fn test_zero_cap_hides_streams_but_reports_truncation() {
        let text = render(&success("data", "noise"), 0);
        assert_eq!(
            text,
            "Command executed successfully (7ms) - Output: 4 chars (truncated to 0):\n\nOutput:\n\n"
        );
    }

    #[test]
    fn test_negative_cap_hides_streams_and_echoes_request() {
        let text = render(&success("data", ""), -5);
        assert_eq!(
            text,
            "Command executed successfully (7ms) - Output: 4 chars (truncated to -5):\n\nOutput:\n\n"
        );
    }

    #[test]
    fn test_failure_body() {
        let outcome = CommandOutcome::Failure {
            output: CapturedOutput {
                stdout: "abc".to_string(),
                stderr: "boom\n".to_string(),
                duration_ms: 3,
            },
            error: ShellLoggerError::NonZeroExit {
                command: "false".to_string(),
                code: Some(1),
                stderr: "boom\n".to_string(),
            },
        };

        let text = render(&outcome, 500);
        assert_eq!(
            text,
            "Command failed (3ms) - Total output: 8 chars:\n\nError: Command failed: false\nboom\n\n\nOutput:\nabc\n\nError output:\nboom\n"
        );
    }
}
