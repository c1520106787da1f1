//! Process Runner
//!
//! Executes an argument vector as a direct child process (no shell),
//! bounded by a timeout, and normalizes exit status and captured
//! streams into a [`CallOutcome`].

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

/// Normalized outcome of one external call.
///
/// Invariants: `success == true` implies `error.is_none()` and
/// `exit_code == Some(0)`; exactly one of `output`/`error` is meaningful
/// to the renderer. Captured text is trimmed at the edges only —
/// interior newlines and JSON are preserved verbatim.
#[derive(Debug, Clone)]
pub struct CallOutcome {
    pub success: bool,
    pub output: String,
    pub stderr: String,
    pub error: Option<String>,
    pub exit_code: Option<i32>,
}

impl CallOutcome {
    pub fn ok(output: String, stderr: String) -> Self {
        Self {
            success: true,
            output,
            stderr,
            error: None,
            exit_code: Some(0),
        }
    }

    pub fn failed(error: String, exit_code: Option<i32>) -> Self {
        Self {
            success: false,
            output: String::new(),
            stderr: String::new(),
            error: Some(error),
            exit_code,
        }
    }

    pub fn timed_out(seconds: u64) -> Self {
        Self::failed(format!("Command timed out after {} seconds", seconds), None)
    }

    /// Error text for rendering; empty string for successful outcomes.
    pub fn error_text(&self) -> &str {
        self.error.as_deref().unwrap_or("")
    }
}

/// Run `argv` with stdout/stderr captured and a hard timeout.
///
/// The child is spawned from the literal token array; no shell
/// interpretation happens. On timeout the child is force-killed
/// (`kill_on_drop`), never left orphaned and never trusted to exit on
/// its own. A missing executable is reported with an install pointer,
/// distinct from a generic failure.
pub async fn run(argv: &[String], timeout_seconds: u64) -> CallOutcome {
    match try_run(argv, timeout_seconds).await {
        Ok(outcome) => outcome,
        Err(NotFound(bin)) => CallOutcome::failed(
            format!(
                "{} not found. Install it from https://github.com/steipete/gogcli/releases",
                bin
            ),
            None,
        ),
    }
}

/// Signals that the executable itself was absent, so callers with a
/// fallback strategy (the unlock adapter) can degrade instead of
/// surfacing the failure.
#[derive(Debug)]
pub struct NotFound(pub String);

/// Like [`run`], but a missing executable comes back as `Err` rather
/// than a failure outcome.
pub async fn try_run(argv: &[String], timeout_seconds: u64) -> Result<CallOutcome, NotFound> {
    let (bin, rest) = match argv.split_first() {
        Some(split) => split,
        None => return Ok(CallOutcome::failed("empty argument vector".to_string(), None)),
    };

    debug!(bin, args = ?rest, "spawning external command");

    let child = match Command::new(bin)
        .args(rest)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(NotFound(bin.clone()));
        }
        Err(e) => {
            return Ok(CallOutcome::failed(
                format!("Failed to launch {}: {}", bin, e),
                None,
            ));
        }
    };

    let waited = tokio::time::timeout(
        Duration::from_secs(timeout_seconds),
        child.wait_with_output(),
    )
    .await;

    let output = match waited {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Ok(CallOutcome::failed(
                format!("Failed to collect command output: {}", e),
                None,
            ));
        }
        Err(_) => {
            // Dropping the wait future kills the child via kill_on_drop.
            warn!(bin, timeout_seconds, "external command timed out");
            return Ok(CallOutcome::timed_out(timeout_seconds));
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let code = output.status.code();

    if output.status.success() {
        Ok(CallOutcome::ok(stdout, stderr))
    } else {
        let error = if stderr.is_empty() {
            stdout.clone()
        } else {
            stderr.clone()
        };
        // stdout is kept even on failure so the unlock adapter can
        // re-filter automation chatter out of it.
        Ok(CallOutcome {
            success: false,
            output: stdout,
            stderr,
            error: Some(error),
            exit_code: code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn test_success_captures_trimmed_stdout() {
        let outcome = run(&argv(&["echo", "hello world"]), 5).await;
        assert!(outcome.success);
        assert_eq!(outcome.output, "hello world");
        assert_eq!(outcome.exit_code, Some(0));
        assert!(outcome.error.is_none());
    }

    #[tokio::test]
    async fn test_interior_formatting_preserved() {
        let outcome = run(&argv(&["printf", "a\nb\n"]), 5).await;
        assert!(outcome.success);
        assert_eq!(outcome.output, "a\nb");
    }

    #[tokio::test]
    async fn test_nonzero_exit_uses_stderr() {
        let outcome = run(&argv(&["sh", "-c", "echo oops >&2; exit 3"]), 5).await;
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("oops"));
        assert_eq!(outcome.exit_code, Some(3));
    }

    #[tokio::test]
    async fn test_nonzero_exit_falls_back_to_stdout() {
        let outcome = run(&argv(&["sh", "-c", "echo diag; exit 1"]), 5).await;
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("diag"));
    }

    #[tokio::test]
    async fn test_executable_not_found_is_actionable() {
        let outcome = run(&argv(&["gogbridge-no-such-binary"]), 5).await;
        assert!(!outcome.success);
        let error = outcome.error.unwrap();
        assert!(error.contains("not found"));
        assert!(error.contains("Install"));
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let started = std::time::Instant::now();
        let outcome = run(&argv(&["sleep", "5"]), 1).await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("timed out after 1 seconds"));
        assert!(started.elapsed() < Duration::from_secs(3));
    }
}
