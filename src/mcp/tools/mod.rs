pub mod args;
pub mod availability;
pub mod event_types;
pub mod events;
pub mod invitees;
pub mod users;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::identity::UserUriCache;
use crate::calendly::SchedulingApi;
use crate::error::{CalendlyError, CalendlyResult};

/// A tool definition for the MCP tools/list response.
pub struct ToolDef {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    pub annotations: Value,
}

/// Get all registered MCP tool definitions.
pub fn all_tools() -> Vec<ToolDef> {
    let mut tools = Vec::new();
    tools.extend(users::tool_defs());
    tools.extend(event_types::tool_defs());
    tools.extend(events::tool_defs());
    tools.extend(invitees::tool_defs());
    tools.extend(availability::tool_defs());
    tools
}

/// Everything a tool call needs: the Calendly API and the memoized user URI.
#[derive(Clone)]
pub struct ToolContext {
    api: Arc<dyn SchedulingApi>,
    identity: Arc<UserUriCache>,
}

impl ToolContext {
    pub fn new(api: Arc<dyn SchedulingApi>) -> Self {
        Self {
            api,
            identity: Arc::new(UserUriCache::default()),
        }
    }

    pub fn api(&self) -> &dyn SchedulingApi {
        self.api.as_ref()
    }

    /// URI of the authenticated user, fetched on first use.
    pub async fn user_uri(&self) -> CalendlyResult<String> {
        self.identity.user_uri(self.api()).await
    }
}

/// Why a tool call produced an error result.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Upstream(#[from] CalendlyError),

    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

/// The MCP `tools/call` result: a single text block plus an error flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResult {
    pub content: Vec<TextContent>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextContent {
                kind: "text",
                text: text.into(),
            }],
            is_error: false,
        }
    }

    /// Pretty-printed JSON of `value` as the text payload.
    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(text) => Self::text(text),
            Err(e) => error_response(&ToolError::Encode(e)),
        }
    }

    #[cfg(test)]
    pub fn text_content(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or_default()
    }
}

/// Turn any tool failure into an error result. Upstream API errors already
/// carry the status code and body in their message.
pub fn error_response(err: &ToolError) -> ToolResult {
    let msg = match err {
        ToolError::Upstream(CalendlyError::Api { message, .. }) => message.clone(),
        other => other.to_string(),
    };
    ToolResult {
        is_error: true,
        ..ToolResult::text(format!("Error: {msg}"))
    }
}

/// Finish a handler: format a successful Calendly response, or normalize the error.
pub fn respond<T>(
    result: CalendlyResult<T>,
    on_success: impl FnOnce(&T) -> ToolResult,
) -> ToolResult {
    match result {
        Ok(value) => on_success(&value),
        Err(err) => {
            if let CalendlyError::Api { status_text, .. } = &err {
                tracing::warn!(status = ?err.status(), %status_text, "Calendly call failed");
            } else {
                tracing::warn!("Calendly call failed: {err}");
            }
            error_response(&ToolError::Upstream(err))
        }
    }
}

/// Dispatch a tools/call request to the appropriate handler.
pub async fn dispatch(ctx: &ToolContext, tool_name: &str, arguments: &Value) -> ToolResult {
    tracing::info!(tool = tool_name, "tools/call");
    match call_tool(ctx, tool_name, arguments).await {
        Ok(result) => result,
        Err(err) => {
            tracing::warn!(tool = tool_name, "Tool call rejected: {err}");
            error_response(&err)
        }
    }
}

async fn call_tool(
    ctx: &ToolContext,
    tool_name: &str,
    arguments: &Value,
) -> Result<ToolResult, ToolError> {
    let api = ctx.api();
    let result = match tool_name {
        "get_current_user" => {
            args::parse::<args::NoArgs>(arguments)?;
            users::get_current_user(api).await
        }
        "list_event_types" => {
            let args = args::parse(arguments)?;
            let user_uri = ctx.user_uri().await?;
            event_types::list_event_types(api, &user_uri, args).await
        }
        "list_scheduled_events" => {
            let args = args::parse(arguments)?;
            let user_uri = ctx.user_uri().await?;
            events::list_scheduled_events(api, &user_uri, args).await
        }
        "get_event" => events::get_event(api, args::parse(arguments)?).await,
        "cancel_event" => events::cancel_event(api, args::parse(arguments)?).await,
        "list_invitees" => invitees::list_invitees(api, args::parse(arguments)?).await,
        "check_availability" => {
            availability::check_availability(api, args::parse(arguments)?).await
        }
        _ => return Err(ToolError::UnknownTool(tool_name.to_string())),
    };
    Ok(result)
}


#[cfg(test)]
mod tests {
    use super::fake::{Call, FakeApi};
    use super::*;
    use crate::calendly::{PageOptions, ScheduledEventFilter};
    use crate::calendly::models::EventStatus;
    use serde_json::json;

    const USER_URI: &str = "https://api.calendly.com/users/USER123";

    fn setup() -> (Arc<FakeApi>, ToolContext) {
        let api = Arc::new(FakeApi::default());
        let ctx = ToolContext::new(api.clone());
        (api, ctx)
    }

    fn parsed(result: &ToolResult) -> Value {
        assert!(!result.is_error, "unexpected error: {}", result.text_content());
        serde_json::from_str(result.text_content()).unwrap()
    }

    #[test]
    fn test_all_tools_registered() {
        let tools = all_tools();
        let mut names: Vec<&str> = tools.iter().map(|t| t.name).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "cancel_event",
                "check_availability",
                "get_current_user",
                "get_event",
                "list_event_types",
                "list_invitees",
                "list_scheduled_events",
            ]
        );
        for tool in &tools {
            assert!(!tool.description.is_empty());
            assert_eq!(tool.input_schema["type"], "object");
            assert_eq!(tool.input_schema["additionalProperties"], false);
        }
    }

    #[test]
    fn test_only_cancel_is_destructive() {
        for tool in all_tools() {
            if tool.name == "cancel_event" {
                assert_eq!(tool.annotations["destructiveHint"], true);
            } else {
                assert_eq!(tool.annotations["readOnlyHint"], true, "{}", tool.name);
            }
        }
    }

    #[test]
    fn test_error_response_uses_api_message() {
        let err = ToolError::Upstream(CalendlyError::api(
            reqwest::StatusCode::NOT_FOUND,
            "{\"title\":\"Resource Not Found\"}",
        ));
        let result = error_response(&err);
        assert!(result.is_error);
        assert_eq!(result.content.len(), 1);
        assert_eq!(
            result.text_content(),
            "Error: Calendly API error 404: {\"title\":\"Resource Not Found\"}"
        );
    }

    #[test]
    fn test_error_response_stringifies_other_errors() {
        let result = error_response(&ToolError::UnknownTool("nope".to_string()));
        assert!(result.is_error);
        assert_eq!(result.text_content(), "Error: unknown tool: nope");
    }

    #[test]
    fn test_tool_result_serializes_is_error() {
        let value = serde_json::to_value(ToolResult::text("ok")).unwrap();
        assert_eq!(
            value,
            json!({"content": [{"type": "text", "text": "ok"}], "isError": false})
        );
    }

    #[tokio::test]
    async fn test_get_current_user() {
        let (_api, ctx) = setup();
        let result = dispatch(&ctx, "get_current_user", &json!({})).await;
        let user = parsed(&result);
        assert_eq!(user["name"], "Jane Doe");
        assert_eq!(user["timezone"], "America/New_York");
        assert_eq!(user["scheduling_url"], "https://calendly.com/jane-doe");
    }

    #[tokio::test]
    async fn test_list_scheduled_events_forwards_only_status() {
        let (api, ctx) = setup();
        let result = dispatch(&ctx, "list_scheduled_events", &json!({"status": "canceled"})).await;
        let page = parsed(&result);
        assert_eq!(page["items"][0]["location"], "https://zoom.us/j/123");
        assert_eq!(page["pagination"]["next_page_token"], "next");

        let expected = ScheduledEventFilter {
            status: Some(EventStatus::Canceled),
            ..Default::default()
        };
        assert_eq!(
            api.calls(),
            vec![
                Call::GetCurrentUser,
                Call::ListScheduledEvents(USER_URI.to_string(), expected),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_page_token_is_not_forwarded() {
        let (api, ctx) = setup();
        let result = dispatch(&ctx, "list_event_types", &json!({"page_token": ""})).await;
        assert!(!result.is_error);
        assert_eq!(
            api.calls(),
            vec![
                Call::GetCurrentUser,
                Call::ListEventTypes(USER_URI.to_string(), PageOptions::default()),
            ]
        );
    }

    #[tokio::test]
    async fn test_user_uri_is_resolved_once() {
        let (api, ctx) = setup();
        dispatch(&ctx, "list_event_types", &json!({})).await;
        dispatch(&ctx, "list_scheduled_events", &json!({})).await;
        dispatch(&ctx, "list_event_types", &json!({"count": 10})).await;

        let lookups = api
            .calls()
            .into_iter()
            .filter(|c| *c == Call::GetCurrentUser)
            .count();
        assert_eq!(lookups, 1);
    }

    #[tokio::test]
    async fn test_missing_uuid_never_reaches_api() {
        let (api, ctx) = setup();
        for tool in ["get_event", "list_invitees", "cancel_event"] {
            let result = dispatch(&ctx, tool, &json!({})).await;
            assert!(result.is_error, "{tool}");
            assert!(result.text_content().starts_with("Error: invalid arguments"));
        }
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_check_availability_missing_range_is_rejected() {
        let (api, ctx) = setup();
        let result = dispatch(
            &ctx,
            "check_availability",
            &json!({"event_type_uri": "https://api.calendly.com/event_types/ET123"}),
        )
        .await;
        assert!(result.is_error);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_count_out_of_range_is_rejected_before_identity_lookup() {
        let (api, ctx) = setup();
        let result = dispatch(&ctx, "list_event_types", &json!({"count": 0})).await;
        assert!(result.is_error);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let (_api, ctx) = setup();
        let result = dispatch(&ctx, "delete_everything", &json!({})).await;
        assert!(result.is_error);
        assert_eq!(result.text_content(), "Error: unknown tool: delete_everything");
    }

    #[tokio::test]
    async fn test_api_error_becomes_error_result() {
        let api = Arc::new(FakeApi::failing(401));
        let ctx = ToolContext::new(api);
        let result = dispatch(&ctx, "get_current_user", &json!({})).await;
        assert!(result.is_error);
        assert_eq!(
            result.text_content(),
            "Error: Calendly API error 401: upstream said no"
        );
    }

    #[tokio::test]
    async fn test_failed_identity_lookup_is_not_cached() {
        let api = Arc::new(FakeApi::failing(500));
        let ctx = ToolContext::new(api.clone());
        let first = dispatch(&ctx, "list_event_types", &json!({})).await;
        let second = dispatch(&ctx, "list_event_types", &json!({})).await;
        assert!(first.text_content().contains("500"));
        assert!(second.is_error);
        assert_eq!(api.calls(), vec![Call::GetCurrentUser, Call::GetCurrentUser]);
    }
}
