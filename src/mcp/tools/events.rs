use serde_json::json;

use super::args::{CancelEventArgs, GetEventArgs, ListScheduledEventsArgs};
use super::{ToolDef, ToolResult, respond};
use crate::calendly::{ScheduledEventFilter, SchedulingApi};
use crate::format::{format_paginated, format_scheduled_event};

pub fn tool_defs() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "list_scheduled_events",
            description: "List scheduled Calendly events with optional filters",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "count": {"type": "integer", "description": "Number of results (1-100)", "minimum": 1, "maximum": 100},
                    "page_token": {"type": "string", "description": "Pagination token for next page"},
                    "status": {"type": "string", "enum": ["active", "canceled"], "description": "Filter by event status"},
                    "min_start_time": {"type": "string", "description": "Filter: events starting after this ISO 8601 time"},
                    "max_start_time": {"type": "string", "description": "Filter: events starting before this ISO 8601 time"}
                },
                "additionalProperties": false
            }),
            annotations: json!({"readOnlyHint": true}),
        },
        ToolDef {
            name: "get_event",
            description: "Get details of a specific scheduled event",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "event_uuid": {"type": "string", "description": "UUID of the scheduled event", "minLength": 1}
                },
                "required": ["event_uuid"],
                "additionalProperties": false
            }),
            annotations: json!({"readOnlyHint": true}),
        },
        ToolDef {
            name: "cancel_event",
            description: "Cancel a scheduled Calendly event",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "event_uuid": {"type": "string", "description": "UUID of the scheduled event to cancel", "minLength": 1},
                    "reason": {"type": "string", "description": "Reason for cancellation"}
                },
                "required": ["event_uuid"],
                "additionalProperties": false
            }),
            annotations: json!({"destructiveHint": true}),
        },
    ]
}

pub async fn list_scheduled_events(
    api: &dyn SchedulingApi,
    user_uri: &str,
    args: ListScheduledEventsArgs,
) -> ToolResult {
    let filter = ScheduledEventFilter::from(args);
    tracing::debug!(status = filter.status.map(|s| s.as_str()), "Listing scheduled events");
    respond(api.list_scheduled_events(user_uri, &filter).await, |result| {
        ToolResult::json(&format_paginated(result, format_scheduled_event))
    })
}

pub async fn get_event(api: &dyn SchedulingApi, args: GetEventArgs) -> ToolResult {
    respond(api.get_event(&args.event_uuid).await, |event| {
        ToolResult::json(&format_scheduled_event(event))
    })
}

pub async fn cancel_event(api: &dyn SchedulingApi, args: CancelEventArgs) -> ToolResult {
    let result = api
        .cancel_event(&args.event_uuid, args.reason.as_deref())
        .await;
    respond(result, |_| {
        ToolResult::text(format!("Event {} cancelled successfully.", args.event_uuid))
    })
}
