use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use super::handlers;
use super::jsonrpc::{JsonRpcErrorResponse, JsonRpcRequest};
use super::session::SessionManager;
use super::tools::ToolContext;

pub const SESSION_HEADER: &str = "Mcp-Session-Id";

/// Request bodies above this size are rejected.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared state for the MCP server.
#[derive(Clone)]
pub struct McpState {
    pub ctx: ToolContext,
    pub sessions: SessionManager,
}

fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok())
}

/// Handle POST /mcp: receive JSON-RPC messages from the client.
pub async fn handle_post(State(state): State<McpState>, request: Request<Body>) -> Response {
    let incoming_session = session_id(request.headers()).map(str::to_string);

    let body = match axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES).await {
        Ok(b) => b,
        Err(_) => {
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let rpc_request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => return Json(JsonRpcErrorResponse::parse_error(&e)).into_response(),
    };

    let is_initialize = rpc_request.method == "initialize";
    let unknown_session = incoming_session
        .as_deref()
        .is_some_and(|sid| !state.sessions.contains(sid));
    if !is_initialize && unknown_session {
        return (StatusCode::NOT_FOUND, "Session not found").into_response();
    }

    let response = handlers::handle_request(&state.ctx, &rpc_request).await;

    // Notifications (no id) are accepted without a body
    let Some(response) = response else {
        return StatusCode::ACCEPTED.into_response();
    };

    let mut http_response = Json(response).into_response();
    if is_initialize {
        let client_name = rpc_request
            .params
            .pointer("/clientInfo/name")
            .and_then(Value::as_str);
        let sid = state.sessions.create_session(client_name);
        tracing::debug!(session_id = %sid, "Created MCP session");
        if let Ok(value) = sid.parse() {
            http_response.headers_mut().insert(SESSION_HEADER, value);
        }
    }
    http_response
}

/// Handle GET /mcp. This server never pushes messages, so there is no SSE stream.
pub async fn handle_get() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST, DELETE")],
        "Server-initiated messages are not supported",
    )
        .into_response()
}

/// Handle DELETE /mcp: terminate a session.
pub async fn handle_delete(State(state): State<McpState>, headers: HeaderMap) -> Response {
    let Some(sid) = session_id(&headers) else {
        return (StatusCode::BAD_REQUEST, "Missing Mcp-Session-Id header").into_response();
    };

    match state.sessions.remove_session(sid) {
        Some(session) => {
            tracing::debug!(
                session_id = sid,
                client = session.client_name.as_deref().unwrap_or("unknown"),
                opened_at = %session.created_at,
                "Terminated MCP session"
            );
            (StatusCode::OK, "Session terminated").into_response()
        }
        None => (StatusCode::NOT_FOUND, "Session not found").into_response(),
    }
}
