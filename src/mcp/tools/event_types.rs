use serde_json::json;

use super::args::ListEventTypesArgs;
use super::{ToolDef, ToolResult, respond};
use crate::calendly::SchedulingApi;
use crate::format::{format_event_type, format_paginated};

pub fn tool_defs() -> Vec<ToolDef> {
    vec![ToolDef {
        name: "list_event_types",
        description: "List the user's Calendly event types",
        input_schema: json!({
            "type": "object",
            "properties": {
                "count": {"type": "integer", "description": "Number of results (1-100)", "minimum": 1, "maximum": 100},
                "page_token": {"type": "string", "description": "Pagination token for next page"}
            },
            "additionalProperties": false
        }),
        annotations: json!({"readOnlyHint": true}),
    }]
}

pub async fn list_event_types(
    api: &dyn SchedulingApi,
    user_uri: &str,
    args: ListEventTypesArgs,
) -> ToolResult {
    let page = args.page();
    respond(api.list_event_types(user_uri, &page).await, |result| {
        ToolResult::json(&format_paginated(result, format_event_type))
    })
}
