use serde_json::{Value, json};

use super::jsonrpc::{JsonRpcErrorResponse, JsonRpcMessage, JsonRpcRequest, JsonRpcResponse};
use super::tools::{self, ToolContext};

pub const PROTOCOL_VERSION: &str = "2025-03-26";
pub const SERVER_NAME: &str = "calendly-mcp";

/// Handle an MCP JSON-RPC request. Returns `None` for notifications.
pub async fn handle_request(ctx: &ToolContext, request: &JsonRpcRequest) -> Option<JsonRpcMessage> {
    let response = match request.method.as_str() {
        "initialize" => handle_initialize(request),
        "ping" => JsonRpcResponse::success(request.id.clone(), json!({})).into(),
        "tools/list" => handle_tools_list(request),
        "tools/call" => handle_tools_call(ctx, request).await,
        method if method.starts_with("notifications/") => return None,
        _ => JsonRpcErrorResponse::method_not_found(request.id.clone()).into(),
    };

    if request.is_notification() {
        return None;
    }
    Some(response)
}

/// Handle the MCP initialize request.
fn handle_initialize(request: &JsonRpcRequest) -> JsonRpcMessage {
    let client = request
        .params
        .pointer("/clientInfo/name")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    tracing::info!(client, "MCP client initializing");

    let result = json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        },
        "instructions": "This MCP server exposes the Calendly API. Use get_current_user to see the connected account, list_event_types and list_scheduled_events to browse, get_event and list_invitees for details, check_availability for open slots, and cancel_event to cancel a booking. List results include pagination.next_page_token; pass it back as page_token for the next page."
    });

    JsonRpcResponse::success(request.id.clone(), result).into()
}

/// Handle tools/list: return all tool definitions.
fn handle_tools_list(request: &JsonRpcRequest) -> JsonRpcMessage {
    let tools_json: Vec<Value> = tools::all_tools()
        .iter()
        .map(|t| {
            json!({
                "name": t.name,
                "description": t.description,
                "inputSchema": t.input_schema,
                "annotations": t.annotations,
            })
        })
        .collect();

    JsonRpcResponse::success(request.id.clone(), json!({ "tools": tools_json })).into()
}

/// Handle tools/call: dispatch to the appropriate tool handler.
async fn handle_tools_call(ctx: &ToolContext, request: &JsonRpcRequest) -> JsonRpcMessage {
    let Some(tool_name) = request.params.get("name").and_then(Value::as_str) else {
        return JsonRpcErrorResponse::invalid_params(request.id.clone(), "Missing 'name' in params")
            .into();
    };

    let arguments = request
        .params
        .get("arguments")
        .cloned()
        .unwrap_or(json!({}));

    let result = tools::dispatch(ctx, tool_name, &arguments).await;
    match serde_json::to_value(&result) {
        Ok(value) => JsonRpcResponse::success(request.id.clone(), value).into(),
        Err(e) => JsonRpcErrorResponse::internal_error(request.id.clone(), e.to_string()).into(),
    }
}
