//! Tool Catalog
//!
//! Names, descriptions and JSON schemas for every exposed tool, plus
//! the bridge from `tools/call` into the backend dispatcher. The
//! backend's `ToolKind` enum is the authority on which names exist;
//! [`catalog`] must list exactly those names.

use serde_json::{json, Value};

use gogbridge_backend::{dispatch, BackendConfig};

use crate::protocol::{McpTool, ToolAnnotations, ToolContent, ToolsCallResponse, ToolsListResponse};

pub fn list_response() -> ToolsListResponse {
    ToolsListResponse {
        tools: catalog(),
        next_cursor: None,
    }
}

/// Run one tool call. Every failure comes back as `isError` text
/// content; the MCP session never sees a transport fault from here.
pub async fn call_tool(config: &BackendConfig, name: &str, arguments: Value) -> ToolsCallResponse {
    let reply = dispatch::call(config, name, &arguments).await;
    ToolsCallResponse {
        content: vec![ToolContent::text(reply.text)],
        is_error: reply.is_error,
    }
}

fn tool(name: &str, description: &str, schema: Value) -> McpTool {
    McpTool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: schema,
        annotations: None,
    }
}

fn read_only(mut t: McpTool) -> McpTool {
    t.annotations = Some(ToolAnnotations {
        read_only_hint: Some(true),
        destructive_hint: None,
    });
    t
}

fn destructive(mut t: McpTool) -> McpTool {
    t.annotations = Some(ToolAnnotations {
        read_only_hint: None,
        destructive_hint: Some(true),
    });
    t
}

pub fn catalog() -> Vec<McpTool> {
    vec![
        tool(
            "gmail_send_email",
            "Send an email via Gmail (supports HTML - use html:true)",
            json!({
                "type": "object",
                "properties": {
                    "to": {"type": "string", "description": "Recipient email(s), comma-separated"},
                    "subject": {"type": "string", "description": "Email subject"},
                    "body": {"type": "string", "description": "Email body (plain text or HTML)"},
                    "html": {"type": "boolean", "description": "Treat body as HTML (default: false)", "default": false},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["to", "subject", "body"]
            }),
        ),
        read_only(tool(
            "gmail_list_emails",
            "List recent emails from Gmail",
            json!({
                "type": "object",
                "properties": {
                    "limit": {"type": "integer", "description": "Number of emails to list", "default": 10},
                    "account": {"type": "string", "description": "Google account to use"}
                }
            }),
        )),
        read_only(tool(
            "gmail_search_emails",
            "Search for emails in Gmail",
            json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Search query"},
                    "limit": {"type": "integer", "description": "Number of results", "default": 10},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["query"]
            }),
        )),
        read_only(tool(
            "gmail_read_email",
            "Read a full email by message ID",
            json!({
                "type": "object",
                "properties": {
                    "message_id": {"type": "string", "description": "Gmail message ID"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["message_id"]
            }),
        )),
        tool(
            "gmail_label_email",
            "Add or remove labels from an email",
            json!({
                "type": "object",
                "properties": {
                    "message_id": {"type": "string", "description": "Gmail message ID"},
                    "labels": {"type": "string", "description": "Labels to add (comma-separated)"},
                    "remove": {"type": "string", "description": "Labels to remove (comma-separated)"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["message_id"]
            }),
        ),
        tool(
            "gmail_archive_email",
            "Archive an email (remove from inbox)",
            json!({
                "type": "object",
                "properties": {
                    "message_id": {"type": "string", "description": "Gmail message ID"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["message_id"]
            }),
        ),
        destructive(tool(
            "gmail_delete_email",
            "Delete an email",
            json!({
                "type": "object",
                "properties": {
                    "message_id": {"type": "string", "description": "Gmail message ID"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["message_id"]
            }),
        )),
        tool(
            "sheets_create",
            "Create a new Google Sheets spreadsheet",
            json!({
                "type": "object",
                "properties": {
                    "title": {"type": "string", "description": "Spreadsheet title"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["title"]
            }),
        ),
        read_only(tool(
            "sheets_read",
            "Read data from a spreadsheet",
            json!({
                "type": "object",
                "properties": {
                    "spreadsheet_id": {"type": "string", "description": "Spreadsheet ID or URL"},
                    "range": {"type": "string", "description": "Cell range (e.g., Sheet1!A1:D10)"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["spreadsheet_id"]
            }),
        )),
        tool(
            "sheets_write",
            "Write data to a spreadsheet",
            json!({
                "type": "object",
                "properties": {
                    "spreadsheet_id": {"type": "string", "description": "Spreadsheet ID or URL"},
                    "range": {"type": "string", "description": "Cell range (e.g., Sheet1!A1:D10)"},
                    "data": {"type": "string", "description": "Data to write (JSON array of arrays or CSV)"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["spreadsheet_id", "range", "data"]
            }),
        ),
        tool(
            "sheets_append",
            "Append rows to a spreadsheet",
            json!({
                "type": "object",
                "properties": {
                    "spreadsheet_id": {"type": "string", "description": "Spreadsheet ID or URL"},
                    "range": {"type": "string", "description": "Range to append to"},
                    "data": {"type": "string", "description": "Data to append (JSON array or CSV)"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["spreadsheet_id", "data"]
            }),
        ),
        destructive(tool(
            "sheets_delete",
            "Delete a spreadsheet",
            json!({
                "type": "object",
                "properties": {
                    "spreadsheet_id": {"type": "string", "description": "Spreadsheet ID or URL"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["spreadsheet_id"]
            }),
        )),
        tool(
            "docs_create",
            "Create a new Google Doc",
            json!({
                "type": "object",
                "properties": {
                    "title": {"type": "string", "description": "Document title"},
                    "content": {"type": "string", "description": "Initial content"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["title"]
            }),
        ),
        read_only(tool(
            "docs_read",
            "Read a Google Doc",
            json!({
                "type": "object",
                "properties": {
                    "doc_id": {"type": "string", "description": "Document ID or URL"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["doc_id"]
            }),
        )),
        tool(
            "docs_append",
            "Append text to a Google Doc",
            json!({
                "type": "object",
                "properties": {
                    "doc_id": {"type": "string", "description": "Document ID or URL"},
                    "text": {"type": "string", "description": "Text to append"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["doc_id", "text"]
            }),
        ),
        destructive(tool(
            "docs_delete",
            "Delete a Google Doc",
            json!({
                "type": "object",
                "properties": {
                    "doc_id": {"type": "string", "description": "Document ID or URL"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["doc_id"]
            }),
        )),
        tool(
            "slides_create",
            "Create a new Google Slides presentation",
            json!({
                "type": "object",
                "properties": {
                    "title": {"type": "string", "description": "Presentation title"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["title"]
            }),
        ),
        read_only(tool(
            "slides_read",
            "Read a Google Slides presentation",
            json!({
                "type": "object",
                "properties": {
                    "presentation_id": {"type": "string", "description": "Presentation ID or URL"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["presentation_id"]
            }),
        )),
        destructive(tool(
            "slides_delete",
            "Delete a Google Slides presentation",
            json!({
                "type": "object",
                "properties": {
                    "presentation_id": {"type": "string", "description": "Presentation ID or URL"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["presentation_id"]
            }),
        )),
        tool(
            "calendar_create_event",
            "Create a new calendar event",
            json!({
                "type": "object",
                "properties": {
                    "title": {"type": "string", "description": "Event title"},
                    "start": {"type": "string", "description": "Start time (RFC3339 or 'tomorrow 10am')"},
                    "end": {"type": "string", "description": "End time (RFC3339 or 'tomorrow 11am')"},
                    "description": {"type": "string", "description": "Event description"},
                    "location": {"type": "string", "description": "Event location"},
                    "attendees": {"type": "string", "description": "Attendees (comma-separated emails)"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["title", "start", "end"]
            }),
        ),
        read_only(tool(
            "calendar_list_events",
            "List calendar events",
            json!({
                "type": "object",
                "properties": {
                    "start": {"type": "string", "description": "Start date (default: today)"},
                    "end": {"type": "string", "description": "End date"},
                    "limit": {"type": "integer", "description": "Max events to return", "default": 10},
                    "account": {"type": "string", "description": "Google account to use"}
                }
            }),
        )),
        tool(
            "calendar_update_event",
            "Update a calendar event",
            json!({
                "type": "object",
                "properties": {
                    "event_id": {"type": "string", "description": "Event ID"},
                    "title": {"type": "string", "description": "New title"},
                    "start": {"type": "string", "description": "New start time"},
                    "end": {"type": "string", "description": "New end time"},
                    "description": {"type": "string", "description": "New description"},
                    "location": {"type": "string", "description": "New location"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["event_id"]
            }),
        ),
        destructive(tool(
            "calendar_delete_event",
            "Delete a calendar event",
            json!({
                "type": "object",
                "properties": {
                    "event_id": {"type": "string", "description": "Event ID"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["event_id"]
            }),
        )),
        read_only(tool(
            "drive_list_files",
            "List files in Google Drive",
            json!({
                "type": "object",
                "properties": {
                    "limit": {"type": "integer", "description": "Max files to return", "default": 10},
                    "query": {"type": "string", "description": "Drive search query"},
                    "account": {"type": "string", "description": "Google account to use"}
                }
            }),
        )),
        tool(
            "drive_create_file",
            "Create a file in Google Drive",
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "File name"},
                    "mime_type": {"type": "string", "description": "MIME type (e.g., 'application/vnd.google-apps.document')"},
                    "content": {"type": "string", "description": "File content (for docs)"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["name", "mime_type"]
            }),
        ),
        tool(
            "drive_share_file",
            "Share a Drive file with another account",
            json!({
                "type": "object",
                "properties": {
                    "file_id": {"type": "string", "description": "Drive file ID"},
                    "email": {"type": "string", "description": "Email address to share with"},
                    "role": {"type": "string", "description": "Access role (reader, writer)"},
                    "account": {"type": "string", "description": "Google account to use"}
                },
                "required": ["file_id", "email"]
            }),
        ),
    ]
}
