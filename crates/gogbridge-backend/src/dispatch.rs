//! Tool Dispatch & Result Normalizer
//!
//! Maps an incoming tool name plus JSON argument object onto one gog
//! invocation, executes it through the unlock adapter, and renders the
//! outcome as MCP text. Every failure mode comes back as a text reply;
//! nothing escapes this boundary as a fault.

use serde_json::Value;
use tracing::info;

use crate::config::BackendConfig;
use crate::error::DispatchError;
use crate::invocation::InvocationRequest;
use crate::payload::HtmlPayload;
use crate::runner::CallOutcome;
use crate::unlock;

/// Text reply in MCP content shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolReply {
    pub text: String,
    pub is_error: bool,
}

impl ToolReply {
    fn ok(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: false }
    }

    fn err(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: true }
    }
}

/// Closed set of tools this server exposes. Adding a tool means adding
/// a variant here plus its schema in the catalog; the compiler keeps
/// the two dispatch matches exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    GmailSendEmail,
    GmailListEmails,
    GmailSearchEmails,
    GmailReadEmail,
    GmailLabelEmail,
    GmailArchiveEmail,
    GmailDeleteEmail,
    SheetsCreate,
    SheetsRead,
    SheetsWrite,
    SheetsAppend,
    SheetsDelete,
    DocsCreate,
    DocsRead,
    DocsAppend,
    DocsDelete,
    SlidesCreate,
    SlidesRead,
    SlidesDelete,
    CalendarCreateEvent,
    CalendarListEvents,
    CalendarUpdateEvent,
    CalendarDeleteEvent,
    DriveListFiles,
    DriveCreateFile,
    DriveShareFile,
}

impl ToolKind {
    pub fn from_name(name: &str) -> Option<Self> {
        use ToolKind::*;
        Some(match name {
            "gmail_send_email" => GmailSendEmail,
            "gmail_list_emails" => GmailListEmails,
            "gmail_search_emails" => GmailSearchEmails,
            "gmail_read_email" => GmailReadEmail,
            "gmail_label_email" => GmailLabelEmail,
            "gmail_archive_email" => GmailArchiveEmail,
            "gmail_delete_email" => GmailDeleteEmail,
            "sheets_create" => SheetsCreate,
            "sheets_read" => SheetsRead,
            "sheets_write" => SheetsWrite,
            "sheets_append" => SheetsAppend,
            "sheets_delete" => SheetsDelete,
            "docs_create" => DocsCreate,
            "docs_read" => DocsRead,
            "docs_append" => DocsAppend,
            "docs_delete" => DocsDelete,
            "slides_create" => SlidesCreate,
            "slides_read" => SlidesRead,
            "slides_delete" => SlidesDelete,
            "calendar_create_event" => CalendarCreateEvent,
            "calendar_list_events" => CalendarListEvents,
            "calendar_update_event" => CalendarUpdateEvent,
            "calendar_delete_event" => CalendarDeleteEvent,
            "drive_list_files" => DriveListFiles,
            "drive_create_file" => DriveCreateFile,
            "drive_share_file" => DriveShareFile,
            _ => return None,
        })
    }
}

/// How a successful outcome is rendered.
#[derive(Debug, Clone, Copy)]
enum Render {
    /// Emit the command's stdout.
    Output,
    /// Fire-and-forget action: emit a fixed confirmation instead of
    /// whatever gog printed.
    Confirmation(&'static str),
}

#[derive(Debug)]
struct Plan {
    request: InvocationRequest,
    render: Render,
}

/// Entry point: one tool call in, one text reply out.
pub async fn call(config: &BackendConfig, name: &str, arguments: &Value) -> ToolReply {
    let Some(kind) = ToolKind::from_name(name) else {
        return ToolReply::err(DispatchError::UnknownTool(name.to_string()).to_string());
    };

    let plan = match plan(kind, arguments) {
        Ok(plan) => plan,
        Err(e) => return ToolReply::err(format!("Error: {}", e)),
    };

    info!(tool = name, service = plan.request.service, command = plan.request.command, "dispatching tool call");
    execute(config, plan).await
}

/// Build the invocation for one tool without touching the filesystem or
/// spawning anything. Protocol errors (missing/invalid arguments) are
/// raised here, before any side effect.
fn plan(kind: ToolKind, args: &Value) -> Result<Plan, DispatchError> {
    use ToolKind::*;

    let account = optional_string(args, "account");

    let plan = match kind {
        GmailSendEmail => {
            let to = required(args, "gmail_send_email", "to")?;
            let subject = required(args, "gmail_send_email", "subject")?;
            let body = required(args, "gmail_send_email", "body")?;
            let html = args.get("html").and_then(Value::as_bool).unwrap_or(false);

            let mut request = InvocationRequest::new("gmail", "send")
                .arg("--to", to)
                .arg("--subject", subject);
            if html {
                request = request.html_body(body);
            } else {
                request = request.arg("--body", body);
            }
            Plan {
                request,
                render: Render::Confirmation("Email sent successfully!"),
            }
        }
        GmailListEmails => Plan {
            request: InvocationRequest::new("gmail", "list")
                .arg("--limit", limit(args, 10)),
            render: Render::Output,
        },
        GmailSearchEmails => Plan {
            request: InvocationRequest::new("gmail", "search")
                .arg("--query", required(args, "gmail_search_emails", "query")?)
                .arg("--limit", limit(args, 10)),
            render: Render::Output,
        },
        GmailReadEmail => Plan {
            request: InvocationRequest::new("gmail", "read")
                .arg("--id", required(args, "gmail_read_email", "message_id")?),
            render: Render::Output,
        },
        GmailLabelEmail => {
            let id = required(args, "gmail_label_email", "message_id")?;
            let labels = optional_string(args, "labels");
            let remove = optional_string(args, "remove");
            let request = match (labels, remove) {
                (Some(add), _) => InvocationRequest::new("gmail", "label")
                    .arg("--id", id)
                    .arg("--add", add),
                (None, Some(remove)) => InvocationRequest::new("gmail", "label")
                    .arg("--id", id)
                    .arg("--remove", remove),
                (None, None) => {
                    return Err(DispatchError::InvalidArguments(
                        "Must specify either 'labels' or 'remove'".to_string(),
                    ));
                }
            };
            Plan { request, render: Render::Output }
        }
        GmailArchiveEmail => Plan {
            request: InvocationRequest::new("gmail", "archive")
                .arg("--id", required(args, "gmail_archive_email", "message_id")?),
            render: Render::Output,
        },
        GmailDeleteEmail => Plan {
            request: InvocationRequest::new("gmail", "delete")
                .arg("--id", required(args, "gmail_delete_email", "message_id")?),
            render: Render::Output,
        },
        SheetsCreate => Plan {
            request: InvocationRequest::new("sheets", "create")
                .arg("--title", required(args, "sheets_create", "title")?),
            render: Render::Output,
        },
        SheetsRead => Plan {
            request: InvocationRequest::new("sheets", "get")
                .arg("--id", required(args, "sheets_read", "spreadsheet_id")?)
                .arg("--range", optional_string(args, "range").unwrap_or_else(|| "A1".to_string())),
            render: Render::Output,
        },
        SheetsWrite => Plan {
            request: InvocationRequest::new("sheets", "update")
                .arg("--id", required(args, "sheets_write", "spreadsheet_id")?)
                .arg("--range", required(args, "sheets_write", "range")?)
                .arg("--data", rows_to_csv(&required(args, "sheets_write", "data")?)),
            render: Render::Output,
        },
        SheetsAppend => Plan {
            request: InvocationRequest::new("sheets", "append")
                .arg("--id", required(args, "sheets_append", "spreadsheet_id")?)
                .arg("--range", optional_string(args, "range").unwrap_or_else(|| "A1".to_string()))
                .arg("--data", rows_to_csv(&required(args, "sheets_append", "data")?)),
            render: Render::Output,
        },
        SheetsDelete => Plan {
            request: InvocationRequest::new("sheets", "delete")
                .arg("--id", required(args, "sheets_delete", "spreadsheet_id")?),
            render: Render::Output,
        },
        DocsCreate => {
            let mut request = InvocationRequest::new("docs", "create")
                .arg("--title", required(args, "docs_create", "title")?);
            if let Some(content) = optional_string(args, "content") {
                request = request.arg("--content", content);
            }
            Plan { request, render: Render::Output }
        }
        DocsRead => Plan {
            request: InvocationRequest::new("docs", "get")
                .arg("--id", required(args, "docs_read", "doc_id")?),
            render: Render::Output,
        },
        DocsAppend => Plan {
            request: InvocationRequest::new("docs", "append")
                .arg("--id", required(args, "docs_append", "doc_id")?)
                .arg("--text", required(args, "docs_append", "text")?),
            render: Render::Output,
        },
        DocsDelete => Plan {
            request: InvocationRequest::new("docs", "delete")
                .arg("--id", required(args, "docs_delete", "doc_id")?),
            render: Render::Output,
        },
        SlidesCreate => Plan {
            request: InvocationRequest::new("slides", "create")
                .arg("--title", required(args, "slides_create", "title")?),
            render: Render::Output,
        },
        SlidesRead => Plan {
            request: InvocationRequest::new("slides", "get")
                .arg("--id", required(args, "slides_read", "presentation_id")?),
            render: Render::Output,
        },
        SlidesDelete => Plan {
            request: InvocationRequest::new("slides", "delete")
                .arg("--id", required(args, "slides_delete", "presentation_id")?),
            render: Render::Output,
        },
        CalendarCreateEvent => {
            let mut request = InvocationRequest::new("calendar", "create")
                .arg("--title", required(args, "calendar_create_event", "title")?)
                .arg("--start", required(args, "calendar_create_event", "start")?)
                .arg("--end", required(args, "calendar_create_event", "end")?);
            for field in ["description", "location", "attendees"] {
                if let Some(value) = optional_string(args, field) {
                    request = request.arg(&format!("--{}", field), value);
                }
            }
            Plan { request, render: Render::Output }
        }
        CalendarListEvents => {
            let mut request = InvocationRequest::new("calendar", "list")
                .arg("--limit", limit(args, 10));
            for field in ["start", "end"] {
                if let Some(value) = optional_string(args, field) {
                    request = request.arg(&format!("--{}", field), value);
                }
            }
            Plan { request, render: Render::Output }
        }
        CalendarUpdateEvent => {
            let mut request = InvocationRequest::new("calendar", "update")
                .arg("--id", required(args, "calendar_update_event", "event_id")?);
            for field in ["title", "start", "end", "description", "location"] {
                if let Some(value) = optional_string(args, field) {
                    request = request.arg(&format!("--{}", field), value);
                }
            }
            Plan { request, render: Render::Output }
        }
        CalendarDeleteEvent => Plan {
            request: InvocationRequest::new("calendar", "delete")
                .arg("--id", required(args, "calendar_delete_event", "event_id")?),
            render: Render::Output,
        },
        DriveListFiles => {
            let mut request = InvocationRequest::new("drive", "list")
                .arg("--limit", limit(args, 10));
            if let Some(query) = optional_string(args, "query") {
                request = request.arg("--query", query);
            }
            Plan { request, render: Render::Output }
        }
        DriveCreateFile => {
            let mut request = InvocationRequest::new("drive", "create")
                .arg("--name", required(args, "drive_create_file", "name")?)
                .arg("--mime-type", required(args, "drive_create_file", "mime_type")?);
            if let Some(content) = optional_string(args, "content") {
                request = request.arg("--content", content);
            }
            Plan { request, render: Render::Output }
        }
        DriveShareFile => {
            let mut request = InvocationRequest::new("drive", "share")
                .arg("--id", required(args, "drive_share_file", "file_id")?)
                .arg("--email", required(args, "drive_share_file", "email")?);
            if let Some(role) = optional_string(args, "role") {
                request = request.arg("--role", role);
            }
            Plan { request, render: Render::Output }
        }
    };

    Ok(Plan {
        request: plan.request.account(account),
        render: plan.render,
    })
}

/// Stage the payload (if any), run through the unlock adapter, render.
///
/// The payload guard lives on this stack frame, so the temp file is
/// gone by the time the reply exists — on success, failure, timeout,
/// and the expect-unavailable fallback alike.
async fn execute(config: &BackendConfig, plan: Plan) -> ToolReply {
    let payload = match plan.request.html_body.as_deref() {
        Some(body) => match HtmlPayload::write(body) {
            Ok(payload) => Some(payload),
            Err(e) => return ToolReply::err(format!("Error: failed to stage HTML body: {}", e)),
        },
        None => None,
    };

    let argv = plan.request.argv(config, payload.as_ref().map(|p| p.path()));
    let outcome = unlock::run_with_auto_unlock(config, &argv, plan.request.timeout_seconds).await;
    render(plan.render, &outcome)
}

fn render(render: Render, outcome: &CallOutcome) -> ToolReply {
    if outcome.success {
        match render {
            Render::Confirmation(text) => ToolReply::ok(text),
            Render::Output => ToolReply::ok(outcome.output.clone()),
        }
    } else {
        ToolReply::err(format!("Error: {}", outcome.error_text()))
    }
}

fn required(args: &Value, tool: &'static str, field: &'static str) -> Result<String, DispatchError> {
    match args.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(DispatchError::MissingArgument { tool, field }),
    }
}

/// Non-string and empty values are treated as absent, so an explicit
/// `"account": ""` behaves exactly like leaving the field out.
fn optional_string(args: &Value, field: &str) -> Option<String> {
    match args.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn limit(args: &Value, default: u64) -> String {
    args.get("limit")
        .and_then(Value::as_u64)
        .unwrap_or(default)
        .to_string()
}

/// Sheets data transform: a string that parses as a JSON array of
/// string rows is flattened to CSV (one row per line, comma-joined).
/// Anything else passes through unchanged — gog accepts both encodings.
fn rows_to_csv(data: &str) -> String {
    match serde_json::from_str::<Vec<Vec<String>>>(data) {
        Ok(rows) => rows
            .iter()
            .map(|row| row.join(","))
            .collect::<Vec<_>>()
            .join("\n"),
        Err(_) => data.to_string(),
    }
}
