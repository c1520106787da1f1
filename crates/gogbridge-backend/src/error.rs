//! Dispatch Error Types
//!
//! Protocol-level failures raised before any process is spawned. Every
//! variant is rendered to a text reply at the dispatch boundary; nothing
//! here ever crosses the MCP session as a transport fault.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Tool name not in the catalog.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A required argument was absent or had the wrong type. Required
    /// fields are never silently defaulted.
    #[error("Missing required argument '{field}' for {tool}")]
    MissingArgument { tool: &'static str, field: &'static str },

    /// Arguments were present but mutually invalid.
    #[error("{0}")]
    InvalidArguments(String),
}
