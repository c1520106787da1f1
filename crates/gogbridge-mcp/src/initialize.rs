use crate::protocol::{
    InitializeRequest, InitializeResponse, MCP_PROTOCOL_VERSION, ServerCapabilities, ServerInfo,
    ToolsCapabilities,
};

pub fn handle_initialize(_request: InitializeRequest) -> InitializeResponse {
    InitializeResponse {
        protocol_version: MCP_PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: ToolsCapabilities { list_changed: false },
        },
        server_info: ServerInfo {
            name: "gogbridge-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        instructions: "Google Workspace tools backed by the gog CLI. Calls run under the configured GOGCLI_ACCOUNT unless a tool call names an account explicitly; destructive tools (deletes) act immediately, so confirm before calling them.".to_string(),
    }
}
