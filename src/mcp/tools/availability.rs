use serde_json::json;

use super::args::CheckAvailabilityArgs;
use super::{ToolDef, ToolResult, respond};
use crate::calendly::SchedulingApi;
use crate::format::format_available_time;

pub fn tool_defs() -> Vec<ToolDef> {
    vec![ToolDef {
        name: "check_availability",
        description: "Get available time slots for an event type",
        input_schema: json!({
            "type": "object",
            "properties": {
                "event_type_uri": {"type": "string", "description": "URI of the event type to check availability for", "minLength": 1},
                "start_time": {"type": "string", "description": "Start of time range (ISO 8601)", "minLength": 1},
                "end_time": {"type": "string", "description": "End of time range (ISO 8601)", "minLength": 1}
            },
            "required": ["event_type_uri", "start_time", "end_time"],
            "additionalProperties": false
        }),
        annotations: json!({"readOnlyHint": true}),
    }]
}

pub async fn check_availability(api: &dyn SchedulingApi, args: CheckAvailabilityArgs) -> ToolResult {
    let slots = api
        .get_available_times(&args.event_type_uri, &args.start_time, &args.end_time)
        .await;
    respond(slots, |slots| {
        let formatted: Vec<_> = slots.iter().map(format_available_time).collect();
        ToolResult::json(&formatted)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tools::fake::{Call, FakeApi};
    use serde_json::Value;

    #[tokio::test]
    async fn test_check_availability_returns_slots() {
        let api = FakeApi::default();
        let args = CheckAvailabilityArgs {
            event_type_uri: "https://api.calendly.com/event_types/ET123".to_string(),
            start_time: "2026-03-01T00:00:00Z".to_string(),
            end_time: "2026-03-02T00:00:00Z".to_string(),
        };
        let result = check_availability(&api, args).await;
        let slots: Value = serde_json::from_str(result.text_content()).unwrap();
        assert_eq!(slots.as_array().unwrap().len(), 1);
        assert_eq!(slots[0]["status"], "available");
        assert_eq!(slots[0]["start_time"], "2026-03-01T10:00:00Z");
        assert_eq!(slots[0]["invitees_remaining"], 1);
        assert_eq!(
            api.calls(),
            vec![Call::GetAvailableTimes(
                "https://api.calendly.com/event_types/ET123".to_string(),
                "2026-03-01T00:00:00Z".to_string(),
                "2026-03-02T00:00:00Z".to_string(),
            )]
        );
    }
}
