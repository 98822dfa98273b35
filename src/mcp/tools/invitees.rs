use serde_json::json;

use super::args::ListInviteesArgs;
use super::{ToolDef, ToolResult, respond};
use crate::calendly::SchedulingApi;
use crate::format::{format_invitee, format_paginated};

pub fn tool_defs() -> Vec<ToolDef> {
    vec![ToolDef {
        name: "list_invitees",
        description: "List invitees for a scheduled event",
        input_schema: json!({
            "type": "object",
            "properties": {
                "event_uuid": {"type": "string", "description": "UUID of the scheduled event", "minLength": 1},
                "count": {"type": "integer", "description": "Number of results (1-100)", "minimum": 1, "maximum": 100},
                "page_token": {"type": "string", "description": "Pagination token for next page"}
            },
            "required": ["event_uuid"],
            "additionalProperties": false
        }),
        annotations: json!({"readOnlyHint": true}),
    }]
}

pub async fn list_invitees(api: &dyn SchedulingApi, args: ListInviteesArgs) -> ToolResult {
    let page = args.page();
    respond(api.list_invitees(&args.event_uuid, &page).await, |result| {
        ToolResult::json(&format_paginated(result, format_invitee))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendly::PageOptions;
    use crate::mcp::tools::fake::{Call, FakeApi};
    use serde_json::Value;

    #[tokio::test]
    async fn test_list_invitees() {
        let api = FakeApi::default();
        let args = ListInviteesArgs {
            event_uuid: "EV123".to_string(),
            count: None,
            page_token: None,
        };
        let result = list_invitees(&api, args).await;
        let page: Value = serde_json::from_str(result.text_content()).unwrap();
        assert_eq!(page["items"].as_array().unwrap().len(), 1);
        assert_eq!(page["items"][0]["name"], "Bob Guest");
        assert_eq!(page["items"][0]["email"], "guest@example.com");
        assert_eq!(page["items"][0]["status"], "active");
        assert_eq!(
            api.calls(),
            vec![Call::ListInvitees("EV123".to_string(), PageOptions::default())]
        );
    }
}
