mod initialize;
mod protocol;
mod tools;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gogbridge_backend::BackendConfig;
use protocol::{error, success, InitializeRequest, JsonRpcRequest, ToolsCallRequest};

#[derive(Parser, Debug)]
#[command(name = "gogbridge-mcp")]
struct Args {
    #[arg(long, default_value = "stdio")]
    transport: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only protocol frames.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.transport != "stdio" {
        anyhow::bail!("only stdio transport is supported");
    }

    let config = BackendConfig::from_env();
    info!(gog_bin = %config.gog_bin, account = %config.default_account, "gogbridge-mcp starting");

    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin);
    let mut stdout = tokio::io::stdout();
    let mut line = String::new();

    loop {
        line.clear();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let request = match serde_json::from_str::<JsonRpcRequest>(trimmed) {
            Ok(req) => req,
            Err(e) => {
                let resp = error(serde_json::Value::Null, -32700, format!("parse error: {}", e));
                stdout.write_all(serde_json::to_string(&resp)?.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
                continue;
            }
        };

        let Some(id) = request.id.clone() else {
            // Notification; nothing to answer.
            continue;
        };

        let response = match request.method.as_str() {
            "initialize" => {
                let init: Result<InitializeRequest, _> = serde_json::from_value(request.params);
                match init {
                    Ok(init_req) => {
                        let result = initialize::handle_initialize(init_req);
                        success(id, serde_json::to_value(result)?)
                    }
                    Err(e) => error(id, -32602, format!("invalid initialize params: {}", e)),
                }
            }
            "tools/list" => success(id, serde_json::to_value(tools::list_response())?),
            "tools/call" => {
                let call: Result<ToolsCallRequest, _> = serde_json::from_value(request.params);
                match call {
                    Ok(call_req) => {
                        // Tool failures (unknown name, missing args,
                        // backend errors) come back as isError content
                        // so the session survives them.
                        let result =
                            tools::call_tool(&config, &call_req.name, call_req.arguments).await;
                        success(id, serde_json::to_value(result)?)
                    }
                    Err(e) => error(id, -32602, format!("invalid tools/call params: {}", e)),
                }
            }
            "notifications/initialized" => success(id, serde_json::json!({})),
            _ => error(id, -32601, format!("method not found: {}", request.method)),
        };

        stdout.write_all(serde_json::to_string(&response)?.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}
