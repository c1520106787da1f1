//! Temp Payload Manager
//!
//! Scoped temp file for HTML email bodies. The body is referenced by
//! path on the command line instead of being inlined, so it must exist
//! on disk for exactly the duration of the child process.

use std::io::Write;
use std::path::Path;

use tempfile::{Builder, NamedTempFile};

/// RAII handle for an on-disk HTML payload.
///
/// The file is deleted when the handle drops, no matter how the
/// surrounding process execution terminated (normal exit, nonzero exit,
/// timeout, or the automation layer failing to start). Deletion is
/// best-effort: a stale temp file must never mask the real call outcome.
#[derive(Debug)]
pub struct HtmlPayload {
    file: NamedTempFile,
}

impl HtmlPayload {
    /// Write `content` verbatim into a fresh temp file.
    ///
    /// No escaping happens here; escaping for the consuming context is
    /// the command builder's concern.
    pub fn write(content: &str) -> std::io::Result<Self> {
        let mut file = Builder::new()
            .prefix("gogbridge-body-")
            .suffix(".html")
            .tempfile()?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_written_verbatim() {
        let payload = HtmlPayload::write("<p>hello \"there\"</p>\n").unwrap();
        let read = std::fs::read_to_string(payload.path()).unwrap();
        assert_eq!(read, "<p>hello \"there\"</p>\n");
    }

    #[test]
    fn test_file_removed_on_drop() {
        let path = {
            let payload = HtmlPayload::write("<b>x</b>").unwrap();
            assert!(payload.path().exists());
            payload.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
