//! Interactive Unlock Adapter
//!
//! gog unlocks its credential keyring with an interactive "Enter
//! passphrase" prompt on first use per process. This module wraps a
//! call in an expect script that answers the prompt with a bare return,
//! filters expect's own chatter back out of the captured output, and
//! degrades to a plain direct invocation when expect is not installed.
//!
//! Quoting happens in two documented layers, innermost first:
//!   1. POSIX sh  — every argv token is quoted by [`shell::quote_argv`]
//!      before joining, because expect spawns `sh -c <command>`;
//!   2. Tcl       — the resulting command string is embedded into the
//!      script as a double-quoted Tcl word, with Tcl metacharacters
//!      backslash-escaped by [`tcl_quote`].
//! The HTML payload never enters either layer; only its file path does.

use tracing::{info, warn};

use crate::config::BackendConfig;
use crate::runner::{self, CallOutcome};
use crate::shell;

/// Literal prompt text gog prints when the keyring is locked. The
/// expect match is a substring match on exactly this.
pub const UNLOCK_PROMPT: &str = "Enter passphrase";

/// Headroom added to the expect process's own timeout so the caller's
/// bound expires inside the script first.
const EXPECT_OVERHEAD_SECS: u64 = 5;

/// Line prefixes of the script template's own diagnostics. Filtering is
/// literal prefix matching; keep this list in sync with
/// [`expect_script`]'s wording. The in-script timeout diagnostic is not
/// chatter — it is the only evidence a timeout happened, and is handled
/// separately by [`script_timed_out`].
const CHATTER_PREFIXES: &[&str] = &["spawn ", "set timeout "];

/// Line the script prints before `exit 1` when its own timeout fires.
const TIMEOUT_MARKER: &str = "Timeout waiting for response";

/// Execute `argv` under expect so a keyring passphrase prompt cannot
/// hang the call.
///
/// Falls back to the plain runner when the expect binary is missing;
/// the caller's temp payload (if any) outlives this call either way, so
/// cleanup is unaffected by which path ran.
pub async fn run_with_auto_unlock(
    config: &BackendConfig,
    argv: &[String],
    timeout_seconds: u64,
) -> CallOutcome {
    let command = match shell::quote_argv(argv) {
        Ok(command) => command,
        Err(e) => return CallOutcome::failed(e, None),
    };

    info!(timeout_seconds, "running command under unlock automation");
    let script = expect_script(&command, timeout_seconds);
    let expect_argv = vec![config.expect_bin.clone(), "-c".to_string(), script];

    match runner::try_run(&expect_argv, timeout_seconds + EXPECT_OVERHEAD_SECS).await {
        Ok(outcome) => normalize(outcome, timeout_seconds),
        Err(_) => {
            // expect not installed: run the command directly. The prompt
            // cannot be auto-answered on this path, but an unlocked
            // keyring works fine without it.
            warn!(expect_bin = %config.expect_bin, "expect unavailable, running without unlock automation");
            runner::run(argv, timeout_seconds).await
        }
    }
}

/// Render the expect script for one command.
fn expect_script(command: &str, timeout_seconds: u64) -> String {
    format!(
        "set timeout {timeout}\n\
         spawn sh -c {command}\n\
         expect {{\n\
         \t\"{prompt}\" {{ send \"\\r\"; exp_continue }}\n\
         \ttimeout {{ puts \"Timeout waiting for response\"; exit 1 }}\n\
         \teof\n\
         }}\n",
        timeout = timeout_seconds,
        command = tcl_quote(command),
        prompt = UNLOCK_PROMPT,
    )
}

/// Quote a string as a double-quoted Tcl word.
///
/// Backslash-escapes every Tcl metacharacter so the already-sh-quoted
/// command reaches `sh -c` byte-for-byte. Brace quoting would be
/// shorter but breaks on unbalanced braces inside argument values.
fn tcl_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' | '"' | '$' | '[' | ']' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Post-process a finished expect run: report the in-script timeout as
/// a timeout, otherwise strip the template's chatter.
///
/// The `set timeout N` inside the script fires before the runner's
/// `N + 5` outer bound, so a hung command surfaces here as exit 1 with
/// the marker line on stdout rather than as a runner timeout.
fn normalize(outcome: CallOutcome, timeout_seconds: u64) -> CallOutcome {
    if !outcome.success && script_timed_out(&outcome.output) {
        return CallOutcome::timed_out(timeout_seconds);
    }
    strip_chatter(outcome)
}

fn script_timed_out(output: &str) -> bool {
    output.lines().any(|line| line.starts_with(TIMEOUT_MARKER))
}

/// Drop the automation framework's own diagnostic lines from captured
/// output, then re-trim the edges.
fn strip_chatter(mut outcome: CallOutcome) -> CallOutcome {
    let filtered = filter_chatter(&outcome.output);
    if outcome.success {
        outcome.output = filtered;
    } else {
        // Recompute the error the same way the runner did, but from the
        // filtered stdout.
        if outcome.stderr.is_empty() {
            outcome.error = Some(filtered.clone());
        }
        outcome.output = filtered;
    }
    outcome
}

fn filter_chatter(output: &str) -> String {
    output
        .lines()
        .filter(|line| !CHATTER_PREFIXES.iter().any(|p| line.starts_with(p)))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_answers_prompt_and_bounds_time() {
        let script = expect_script("gog gmail list", 30);
        assert!(script.starts_with("set timeout 30\n"));
        assert!(script.contains("spawn sh -c \"gog gmail list\""));
        assert!(script.contains("\"Enter passphrase\" { send \"\\r\"; exp_continue }"));
        assert!(script.contains("exit 1"));
        assert!(script.contains("eof"));
    }

    #[test]
    fn test_tcl_quote_escapes_metacharacters() {
        assert_eq!(tcl_quote(r#"a "b" $c"#), r#""a \"b\" \$c""#);
        assert_eq!(tcl_quote(r"x\y"), r#""x\\y""#);
        assert_eq!(tcl_quote("a{b}[c]"), r#""a\{b\}\[c\]""#);
    }

    #[test]
    fn test_chatter_lines_filtered() {
        let raw = "spawn sh -c gog gmail list\nset timeout 60\nMessage one\nMessage two";
        assert_eq!(filter_chatter(raw), "Message one\nMessage two");
    }

    #[test]
    fn test_script_timeout_reported_not_swallowed() {
        // In-script timeout: marker on stdout, nothing on stderr, exit 1.
        let outcome = CallOutcome {
            success: false,
            output: "spawn sh -c gog gmail list\nset timeout 30\nTimeout waiting for response"
                .to_string(),
            stderr: String::new(),
            error: Some("spawn sh -c gog gmail list\nset timeout 30\nTimeout waiting for response".to_string()),
            exit_code: Some(1),
        };
        let normalized = normalize(outcome, 30);
        assert!(!normalized.success);
        assert_eq!(
            normalized.error.as_deref(),
            Some("Command timed out after 30 seconds")
        );
    }

    #[test]
    fn test_timeout_marker_in_successful_output_is_kept() {
        let outcome = CallOutcome::ok(
            "Subject: Timeout waiting for response".to_string(),
            String::new(),
        );
        let normalized = normalize(outcome, 30);
        assert!(normalized.success);
        assert_eq!(normalized.output, "Subject: Timeout waiting for response");
    }

    #[test]
    fn test_non_chatter_lines_untouched() {
        let raw = "respawn is not chatter\n  spawn indented is kept";
        assert_eq!(filter_chatter(raw), raw);
    }

    #[test]
    fn test_failure_error_recomputed_from_filtered_stdout() {
        let outcome = CallOutcome {
            success: false,
            output: "spawn sh -c gog x\nreal diagnostic".to_string(),
            stderr: String::new(),
            error: Some("spawn sh -c gog x\nreal diagnostic".to_string()),
            exit_code: Some(1),
        };
        let stripped = strip_chatter(outcome);
        assert_eq!(stripped.error.as_deref(), Some("real diagnostic"));
    }

    #[test]
    fn test_stderr_error_wins_over_stdout() {
        let outcome = CallOutcome {
            success: false,
            output: "spawn sh -c gog x".to_string(),
            stderr: "keyring locked".to_string(),
            error: Some("keyring locked".to_string()),
            exit_code: Some(1),
        };
        let stripped = strip_chatter(outcome);
        assert_eq!(stripped.error.as_deref(), Some("keyring locked"));
    }

    #[tokio::test]
    async fn test_fallback_when_expect_missing() {
        let config = BackendConfig {
            expect_bin: "gogbridge-missing-expect".to_string(),
            ..BackendConfig::default()
        };
        let argv = vec!["echo".to_string(), "direct".to_string()];
        let outcome = run_with_auto_unlock(&config, &argv, 5).await;
        assert!(outcome.success);
        assert_eq!(outcome.output, "direct");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_expect_path_filters_end_to_end() {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        // Stand-in for expect: prints template-style chatter around the
        // real payload lines.
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("expect");
        let mut f = std::fs::File::create(&fake).unwrap();
        writeln!(f, "#!/bin/sh").unwrap();
        writeln!(f, "echo 'spawn sh -c gog gmail list'").unwrap();
        writeln!(f, "echo 'set timeout 60'").unwrap();
        writeln!(f, "echo 'INBOX: 3 messages'").unwrap();
        drop(f);
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = BackendConfig {
            expect_bin: fake.display().to_string(),
            ..BackendConfig::default()
        };
        let argv = vec!["gog".to_string(), "gmail".to_string(), "list".to_string()];
        let outcome = run_with_auto_unlock(&config, &argv, 5).await;
        assert!(outcome.success);
        assert_eq!(outcome.output, "INBOX: 3 messages");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_expect_timeout_path_end_to_end() {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        // Stand-in for expect whose in-script timeout fired.
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("expect");
        let mut f = std::fs::File::create(&fake).unwrap();
        writeln!(f, "#!/bin/sh").unwrap();
        writeln!(f, "echo 'spawn sh -c gog gmail list'").unwrap();
        writeln!(f, "echo 'Timeout waiting for response'").unwrap();
        writeln!(f, "exit 1").unwrap();
        drop(f);
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = BackendConfig {
            expect_bin: fake.display().to_string(),
            ..BackendConfig::default()
        };
        let argv = vec!["gog".to_string(), "gmail".to_string(), "list".to_string()];
        let outcome = run_with_auto_unlock(&config, &argv, 7).await;
        assert!(!outcome.success);
        assert_eq!(
            outcome.error.as_deref(),
            Some("Command timed out after 7 seconds")
        );
    }
}
