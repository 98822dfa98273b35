use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

/// Bearer token the HTTP transport expects, if one is configured.
pub type RequiredToken = Option<Arc<str>>;

/// Middleware to require Bearer token authentication for MCP requests.
/// With no configured token every request passes.
pub async fn require_bearer_auth(
    State(expected): State<RequiredToken>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let Some(expected) = expected else {
        return Ok(next.run(request).await);
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized_response("Missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized_response("Invalid authorization scheme, expected Bearer"))?;

    if !tokens_match(token.as_bytes(), expected.as_bytes()) {
        tracing::warn!("Rejected MCP request with invalid bearer token");
        return Err(unauthorized_response("Invalid token"));
    }

    Ok(next.run(request).await)
}

/// Compare without short-circuiting on the first differing byte.
fn tokens_match(given: &[u8], expected: &[u8]) -> bool {
    if given.len() != expected.len() {
        return false;
    }
    given
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

fn unauthorized_response(msg: &str) -> Response {
    let mut response = Response::new(axum::body::Body::from(msg.to_string()));
    *response.status_mut() = StatusCode::UNAUTHORIZED;
    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        header::HeaderValue::from_static("Bearer realm=\"Calendly MCP\""),
    );
    response
}
