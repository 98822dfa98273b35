//! Compact, display-oriented projections of Calendly resources.
//!
//! Each formatter borrows from a validated model and keeps only the fields a
//! caller needs to read a result. Nullable upstream fields stay `None`.

use serde::Serialize;

use crate::calendly::models::{
    AvailableTime, EventStatus, EventType, Invitee, InviteesCounter, Paginated, ScheduledEvent,
    User,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub timezone: &'a str,
    pub scheduling_url: &'a str,
    pub organization: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventTypeSummary<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub uri: &'a str,
    pub duration: String,
    pub active: bool,
    pub scheduling_url: &'a str,
    pub description: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledEventSummary<'a> {
    pub name: &'a str,
    pub status: EventStatus,
    pub start_time: &'a str,
    pub end_time: &'a str,
    pub uri: &'a str,
    pub location: Option<&'a str>,
    pub invitees: InviteesCounter,
    pub members: Vec<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InviteeSummary<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub status: EventStatus,
    pub timezone: &'a str,
    pub reschedule_url: &'a str,
    pub cancel_url: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailableTimeSummary<'a> {
    pub start_time: &'a str,
    pub status: &'a str,
    pub invitees_remaining: u32,
    pub scheduling_url: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSummary<'a> {
    pub count: u32,
    pub next_page_token: Option<&'a str>,
}

/// A formatted page: `{ items, pagination: { count, next_page_token } }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedPage<'a, R> {
    pub items: Vec<R>,
    pub pagination: PageSummary<'a>,
}

pub fn format_user(user: &User) -> UserSummary<'_> {
    UserSummary {
        name: &user.name,
        email: &user.email,
        timezone: &user.timezone,
        scheduling_url: &user.scheduling_url,
        organization: &user.current_organization,
    }
}

pub fn format_event_type(et: &EventType) -> EventTypeSummary<'_> {
    EventTypeSummary {
        name: &et.name,
        slug: &et.slug,
        uri: &et.uri,
        duration: format!("{} minutes", et.duration),
        active: et.active,
        scheduling_url: &et.scheduling_url,
        description: et.description_plain.as_deref(),
    }
}

pub fn format_scheduled_event(event: &ScheduledEvent) -> ScheduledEventSummary<'_> {
    ScheduledEventSummary {
        name: &event.name,
        status: event.status,
        start_time: &event.start_time,
        end_time: &event.end_time,
        uri: &event.uri,
        location: event.location.as_ref().map(|l| l.location.as_str()),
        invitees: event.invitees_counter,
        members: event
            .event_memberships
            .iter()
            .map(|m| m.user_email.as_str())
            .collect(),
    }
}

pub fn format_invitee(inv: &Invitee) -> InviteeSummary<'_> {
    InviteeSummary {
        name: &inv.name,
        email: &inv.email,
        status: inv.status,
        timezone: &inv.timezone,
        reschedule_url: &inv.reschedule_url,
        cancel_url: &inv.cancel_url,
    }
}

pub fn format_available_time(slot: &AvailableTime) -> AvailableTimeSummary<'_> {
    AvailableTimeSummary {
        start_time: &slot.start_time,
        status: &slot.status,
        invitees_remaining: slot.invitees_remaining,
        scheduling_url: &slot.scheduling_url,
    }
}

/// Apply `formatter` to every item of a page, keeping the count and cursor.
pub fn format_paginated<'a, T, R>(
    page: &'a Paginated<T>,
    formatter: impl Fn(&'a T) -> R,
) -> FormattedPage<'a, R> {
    FormattedPage {
        items: page.collection.iter().map(formatter).collect(),
        pagination: PageSummary {
            count: page.pagination.count,
            next_page_token: page.pagination.next_page_token.as_deref(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendly::models::fixtures::*;
    use serde_json::json;

    fn event() -> ScheduledEvent {
        serde_json::from_value(scheduled_event_json()).unwrap()
    }

    #[test]
    fn test_format_user() {
        let user: User = serde_json::from_value(user_json()).unwrap();
        let out = serde_json::to_value(format_user(&user)).unwrap();
        assert_eq!(
            out,
            json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "timezone": "America/New_York",
                "scheduling_url": "https://calendly.com/jane-doe",
                "organization": "https://api.calendly.com/organizations/ORG123"
            })
        );
    }

    #[test]
    fn test_format_event_type_duration_and_description() {
        let mut et: EventType = serde_json::from_value(event_type_json()).unwrap();
        let out = format_event_type(&et);
        assert_eq!(out.duration, "30 minutes");
        assert_eq!(out.description, Some("A quick 30 minute chat."));

        et.description_plain = None;
        let out = serde_json::to_value(format_event_type(&et)).unwrap();
        assert_eq!(out["description"], json!(null));
    }

    #[test]
    fn test_format_scheduled_event() {
        let ev = event();
        let out = serde_json::to_value(format_scheduled_event(&ev)).unwrap();
        assert_eq!(out["status"], "active");
        assert_eq!(out["location"], "https://zoom.us/j/123");
        assert_eq!(out["invitees"], json!({"total": 1, "active": 1, "limit": 1}));
        assert_eq!(out["members"], json!(["jane@example.com"]));
        assert!(out.get("calendar_event").is_none());
        assert!(out.get("event_type").is_none());
    }

    #[test]
    fn test_format_scheduled_event_without_location() {
        let mut ev = event();
        ev.location = None;
        ev.event_memberships.clear();
        let out = serde_json::to_value(format_scheduled_event(&ev)).unwrap();
        assert_eq!(out["location"], json!(null));
        assert_eq!(out["members"], json!([]));
    }

    #[test]
    fn test_format_invitee_and_slot() {
        let inv: Invitee = serde_json::from_value(invitee_json()).unwrap();
        let out = format_invitee(&inv);
        assert_eq!(out.name, "Bob Guest");
        assert_eq!(out.status, EventStatus::Active);

        let slot: AvailableTime = serde_json::from_value(available_time_json()).unwrap();
        let out = serde_json::to_value(format_available_time(&slot)).unwrap();
        assert_eq!(out["status"], "available");
        assert_eq!(out["invitees_remaining"], 1);
    }

    #[test]
    fn test_format_paginated_keeps_cursor() {
        let page: Paginated<Invitee> =
            serde_json::from_value(paginated_json(vec![invitee_json()], Some("tok"))).unwrap();
        let out = serde_json::to_value(format_paginated(&page, format_invitee)).unwrap();
        assert_eq!(out["items"].as_array().unwrap().len(), 1);
        assert_eq!(out["items"][0]["email"], "guest@example.com");
        assert_eq!(out["pagination"], json!({"count": 1, "next_page_token": "tok"}));
    }

    #[test]
    fn test_format_paginated_null_cursor() {
        let page: Paginated<EventType> =
            serde_json::from_value(paginated_json(vec![], None)).unwrap();
        let out = serde_json::to_value(format_paginated(&page, format_event_type)).unwrap();
        assert_eq!(out["items"], json!([]));
        assert_eq!(out["pagination"]["next_page_token"], json!(null));
    }

    #[test]
    fn test_formatting_is_deterministic() {
        let ev = event();
        assert_eq!(format_scheduled_event(&ev), format_scheduled_event(&ev));
        let a = serde_json::to_string(&format_scheduled_event(&ev)).unwrap();
        let b = serde_json::to_string(&format_scheduled_event(&ev)).unwrap();
        assert_eq!(a, b);
    }
}
