//! Shell Quoting
//!
//! The one place in the codebase where an argument vector becomes a
//! shell string. Only the unlock adapter needs this, because expect's
//! `spawn sh -c` takes a single command string. Dialect: POSIX sh —
//! expect's own brace-quoted block never sees the tokens unexpanded.

/// Flatten `argv` into a single POSIX-sh command string with every
/// token quoted.
///
/// Tokens are quoted individually, so embedded quotes, backslashes,
/// dollar signs and whitespace survive intact. Payload content never
/// passes through here — only its file path does.
pub fn quote_argv(argv: &[String]) -> Result<String, String> {
    let mut quoted = Vec::with_capacity(argv.len());
    for token in argv {
        let q = shlex::try_quote(token)
            .map_err(|e| format!("cannot shell-quote argument: {}", e))?;
        quoted.push(q.into_owned());
    }
    Ok(quoted.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_plain_tokens_pass_through() {
        let cmd = quote_argv(&argv(&["gog", "gmail", "list"])).unwrap();
        assert_eq!(cmd, "gog gmail list");
    }

    #[test]
    fn test_whitespace_and_quotes_neutralized() {
        let cmd = quote_argv(&argv(&["gog", "gmail", "send", "--subject", "it's \"big\""]))
            .unwrap();
        // Round-trip through a shell lexer yields the original tokens.
        let parsed = shlex::split(&cmd).unwrap();
        assert_eq!(parsed, argv(&["gog", "gmail", "send", "--subject", "it's \"big\""]));
    }

    #[test]
    fn test_dollar_and_backslash_neutralized() {
        let cmd = quote_argv(&argv(&["echo", "$HOME\\x"])).unwrap();
        let parsed = shlex::split(&cmd).unwrap();
        assert_eq!(parsed[1], "$HOME\\x");
    }

    #[test]
    fn test_nul_byte_rejected() {
        assert!(quote_argv(&argv(&["bad\0token"])).is_err());
    }
}
