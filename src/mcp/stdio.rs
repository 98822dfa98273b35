use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::handlers;
use super::jsonrpc::{JsonRpcErrorResponse, JsonRpcMessage, JsonRpcRequest};
use super::tools::ToolContext;

/// Serve newline-delimited JSON-RPC on stdin/stdout until stdin closes.
pub async fn run(ctx: &ToolContext) -> io::Result<()> {
    serve(ctx, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}

/// Read one JSON-RPC message per line from `reader`, write one reply per line to `writer`.
pub async fn serve<R, W>(ctx: &ToolContext, reader: R, mut writer: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reply: Option<JsonRpcMessage> = match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => handlers::handle_request(ctx, &request).await,
            Err(e) => {
                tracing::warn!("Discarding malformed message: {e}");
                Some(JsonRpcErrorResponse::parse_error(&e).into())
            }
        };

        if let Some(reply) = reply {
            let mut out = serde_json::to_vec(&reply)?;
            out.push(b'\n');
            writer.write_all(&out).await?;
            writer.flush().await?;
        }
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tools::fake::FakeApi;
    use serde_json::{Value, json};
    use std::sync::Arc;

    async fn run_lines(input: &str) -> Vec<Value> {
        let ctx = ToolContext::new(Arc::new(FakeApi::default()));
        let mut output = Vec::new();
        serve(&ctx, input.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_one_reply_per_request() {
        let input = [
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        ]
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join("\n");

        let replies = run_lines(&input).await;
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0]["id"], 1);
        assert_eq!(replies[1]["id"], 2);
        assert_eq!(replies[1]["result"]["tools"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_tool_call_over_stdio() {
        let input = json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": {"name": "cancel_event", "arguments": {"event_uuid": "EV123"}}
        })
        .to_string();

        let replies = run_lines(&input).await;
        assert_eq!(replies[0]["result"]["isError"], false);
        assert_eq!(
            replies[0]["result"]["content"][0]["text"],
            "Event EV123 cancelled successfully."
        );
    }

    #[tokio::test]
    async fn test_malformed_line_gets_parse_error() {
        let replies = run_lines("{oops\n\n").await;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0]["error"]["code"], -32700);
        assert_eq!(replies[0]["id"], Value::Null);
    }
}
