//! gogbridge backend
//!
//! Turns structured Google Workspace tool calls into `gog` CLI
//! invocations: argument-vector construction, temp-file handling for
//! HTML payloads, child-process execution with timeouts, and
//! keyring-unlock automation via `expect`.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod invocation;
pub mod payload;
pub mod runner;
pub mod shell;
pub mod unlock;

pub use config::BackendConfig;
pub use dispatch::{ToolKind, ToolReply};
pub use error::DispatchError;
pub use invocation::InvocationRequest;
pub use payload::HtmlPayload;
pub use runner::CallOutcome;
