//! Backend Configuration
//!
//! Read once at process start and passed by reference into dispatch.

/// Process-wide backend settings.
///
/// There are deliberately no hidden globals: the binary constructs one
/// of these and threads it through every call.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Path or name of the gog binary.
    pub gog_bin: String,
    /// Path or name of the expect binary used for keyring unlock.
    pub expect_bin: String,
    /// Account used when a call does not name one. Empty means
    /// "let gog pick its default".
    pub default_account: String,
}

impl BackendConfig {
    /// Build configuration from the environment.
    ///
    /// `GOGCLI_BIN` and `GOGCLI_ACCOUNT` match the variable names the
    /// gog ecosystem already uses; `GOGBRIDGE_EXPECT_BIN` exists mainly
    /// so the automation-unavailable fallback can be exercised.
    pub fn from_env() -> Self {
        Self {
            gog_bin: std::env::var("GOGCLI_BIN").unwrap_or_else(|_| "gog".to_string()),
            expect_bin: std::env::var("GOGBRIDGE_EXPECT_BIN")
                .unwrap_or_else(|_| "expect".to_string()),
            default_account: std::env::var("GOGCLI_ACCOUNT").unwrap_or_default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            gog_bin: "gog".to_string(),
            expect_bin: "expect".to_string(),
            default_account: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = BackendConfig::default();
        assert_eq!(cfg.gog_bin, "gog");
        assert_eq!(cfg.expect_bin, "expect");
        assert!(cfg.default_account.is_empty());
    }
}
