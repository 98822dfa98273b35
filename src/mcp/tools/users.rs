use serde_json::json;

use super::{ToolDef, ToolResult, respond};
use crate::calendly::SchedulingApi;
use crate::format::format_user;

pub fn tool_defs() -> Vec<ToolDef> {
    vec![ToolDef {
        name: "get_current_user",
        description: "Get the authenticated Calendly user's profile",
        input_schema: json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        }),
        annotations: json!({"readOnlyHint": true}),
    }]
}

pub async fn get_current_user(api: &dyn SchedulingApi) -> ToolResult {
    respond(api.get_current_user().await, |user| {
        ToolResult::json(&format_user(user))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tools::fake::FakeApi;
    use serde_json::Value;

    #[tokio::test]
    async fn test_get_current_user_formats_profile() {
        let api = FakeApi::default();
        let result = get_current_user(&api).await;
        assert!(!result.is_error);
        let user: Value = serde_json::from_str(result.text_content()).unwrap();
        assert_eq!(user["email"], "jane@example.com");
        assert_eq!(
            user["organization"],
            "https://api.calendly.com/organizations/ORG123"
        );
        assert!(user.get("uri").is_none());
    }

    #[tokio::test]
    async fn test_get_current_user_error_mentions_status() {
        let api = FakeApi::failing(401);
        let result = get_current_user(&api).await;
        assert!(result.is_error);
        assert!(result.text_content().starts_with("Error: "));
        assert!(result.text_content().contains("401"));
    }
}
