mod auth;
mod handlers;
mod identity;
mod jsonrpc;
mod session;
pub mod stdio;
mod tools;
mod transport;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::{delete, get, post};
use tower_http::trace::TraceLayer;

use session::SessionManager;
use transport::McpState;

pub use tools::ToolContext;

/// Build the streamable HTTP router. Requests must carry `auth_token` as a
/// bearer token when one is given.
pub fn router(ctx: ToolContext, auth_token: Option<String>) -> Router {
    let state = McpState {
        ctx,
        sessions: SessionManager::new(),
    };
    let required: auth::RequiredToken = auth_token.map(Arc::from);

    Router::new()
        .route("/mcp", post(transport::handle_post))
        .route("/mcp", get(transport::handle_get))
        .route("/mcp", delete(transport::handle_delete))
        .layer(middleware::from_fn_with_state(
            required,
            auth::require_bearer_auth,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
