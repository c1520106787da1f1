//! Invocation Model & Command Builder
//!
//! Normalized description of one gog call, and the deterministic
//! translation into an argument vector for process creation.

use std::path::Path;

use crate::config::BackendConfig;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// One tool call, normalized but not yet a concrete command line.
///
/// Ephemeral: built by dispatch, consumed by the execution path,
/// discarded once the call outcome exists.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    pub service: &'static str,
    pub command: &'static str,
    /// Flag/value pairs, in the order they will appear on the command
    /// line. Values are always separate tokens from their flags.
    pub args: Vec<(String, String)>,
    pub account: Option<String>,
    /// When set, the body travels by temp-file reference rather than as
    /// a command-line token.
    pub html_body: Option<String>,
    pub timeout_seconds: u64,
}

impl InvocationRequest {
    pub fn new(service: &'static str, command: &'static str) -> Self {
        Self {
            service,
            command,
            args: Vec::new(),
            account: None,
            html_body: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn arg(mut self, flag: &str, value: impl Into<String>) -> Self {
        self.args.push((flag.to_string(), value.into()));
        self
    }

    pub fn account(mut self, account: Option<String>) -> Self {
        self.account = account;
        self
    }

    pub fn html_body(mut self, body: impl Into<String>) -> Self {
        self.html_body = Some(body.into());
        self
    }

    /// Account that will actually be passed: the request's own if
    /// non-empty, else the configured default. Empty and absent behave
    /// identically (no `--account` emitted).
    fn effective_account<'a>(&'a self, config: &'a BackendConfig) -> &'a str {
        match self.account.as_deref() {
            Some(acc) if !acc.is_empty() => acc,
            _ => &config.default_account,
        }
    }

    /// Build the literal token array for process creation.
    ///
    /// `--account` goes immediately after the subcommand so flag-first
    /// CLIs parse it before any positionals. The vector is handed to
    /// process creation as-is; no shell ever sees it except inside the
    /// unlock adapter, which re-quotes every token.
    pub fn argv(&self, config: &BackendConfig, payload_path: Option<&Path>) -> Vec<String> {
        let mut argv = vec![
            config.gog_bin.clone(),
            self.service.to_string(),
            self.command.to_string(),
        ];

        let account = self.effective_account(config);
        if !account.is_empty() {
            argv.push("--account".to_string());
            argv.push(account.to_string());
        }

        for (flag, value) in &self.args {
            argv.push(flag.clone());
            argv.push(value.clone());
        }

        if let Some(path) = payload_path {
            argv.push("--body-html-file".to_string());
            argv.push(path.display().to_string());
        }

        argv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BackendConfig {
        BackendConfig::default()
    }

    #[test]
    fn test_base_vector_shape() {
        let req = InvocationRequest::new("gmail", "list").arg("--limit", "10");
        let argv = req.argv(&config(), None);
        assert_eq!(argv, vec!["gog", "gmail", "list", "--limit", "10"]);
    }

    #[test]
    fn test_empty_and_absent_account_identical() {
        let absent = InvocationRequest::new("gmail", "list");
        let empty = InvocationRequest::new("gmail", "list").account(Some(String::new()));
        assert_eq!(absent.argv(&config(), None), empty.argv(&config(), None));
    }

    #[test]
    fn test_account_precedes_other_flags() {
        let req = InvocationRequest::new("gmail", "search")
            .arg("--query", "is:unread")
            .account(Some("me@example.com".to_string()));
        let argv = req.argv(&config(), None);
        assert_eq!(
            argv,
            vec![
                "gog",
                "gmail",
                "search",
                "--account",
                "me@example.com",
                "--query",
                "is:unread"
            ]
        );
    }

    #[test]
    fn test_request_account_overrides_default() {
        let mut cfg = config();
        cfg.default_account = "default@example.com".to_string();
        let req = InvocationRequest::new("docs", "get")
            .arg("--id", "abc")
            .account(Some("other@example.com".to_string()));
        let argv = req.argv(&cfg, None);
        assert_eq!(argv[3..5], ["--account", "other@example.com"]);
    }

    #[test]
    fn test_default_account_applies_when_request_has_none() {
        let mut cfg = config();
        cfg.default_account = "default@example.com".to_string();
        let argv = InvocationRequest::new("docs", "get").argv(&cfg, None);
        assert_eq!(argv[3..5], ["--account", "default@example.com"]);
    }

    #[test]
    fn test_flag_and_value_stay_separate_tokens() {
        let req = InvocationRequest::new("sheets", "update")
            .arg("--range", "Sheet1!A1:D10")
            .arg("--data", "a,b\nc,d");
        let argv = req.argv(&config(), None);
        assert_eq!(argv[3], "--range");
        assert_eq!(argv[4], "Sheet1!A1:D10");
        assert_eq!(argv[5], "--data");
        assert_eq!(argv[6], "a,b\nc,d");
    }

    #[test]
    fn test_payload_referenced_by_path_at_end() {
        let req = InvocationRequest::new("gmail", "send")
            .arg("--to", "a@b.com")
            .arg("--subject", "Hi");
        let argv = req.argv(&config(), Some(Path::new("/tmp/body.html")));
        assert_eq!(argv[argv.len() - 2], "--body-html-file");
        assert_eq!(argv[argv.len() - 1], "/tmp/body.html");
        // The raw HTML itself never appears in the vector.
        assert!(!argv.iter().any(|t| t.contains('<')));
    }
}
