use serde::{Deserialize, Deserializer, Serialize};

/// A key that must be present but may be `null`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// The authenticated Calendly user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub uri: String,
    pub name: String,
    pub slug: String,
    pub email: String,
    pub scheduling_url: String,
    pub timezone: String,
    #[serde(deserialize_with = "nullable")]
    pub avatar_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub current_organization: String,
}

/// A bookable event type (e.g. "30 Minute Meeting").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventType {
    pub uri: String,
    pub name: String,
    pub active: bool,
    pub slug: String,
    pub scheduling_url: String,
    /// Length in minutes.
    pub duration: u32,
    pub kind: String,
    #[serde(rename = "type")]
    pub kind_type: String,
    pub color: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(deserialize_with = "nullable")]
    pub description_plain: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub description_html: Option<String>,
}

/// Lifecycle state shared by scheduled events and invitees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Canceled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Active => "active",
            EventStatus::Canceled => "canceled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLocation {
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteesCounter {
    pub total: u32,
    pub active: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMembership {
    pub user: String,
    pub user_email: String,
}

/// External calendar entry an event was synced to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub kind: String,
    pub external_id: String,
}

/// A booked meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub uri: String,
    pub name: String,
    pub status: EventStatus,
    pub start_time: String,
    pub end_time: String,
    pub event_type: String,
    #[serde(deserialize_with = "nullable")]
    pub location: Option<EventLocation>,
    pub invitees_counter: InviteesCounter,
    pub created_at: String,
    pub updated_at: String,
    pub event_memberships: Vec<EventMembership>,
    #[serde(deserialize_with = "nullable")]
    pub calendar_event: Option<CalendarEvent>,
}

/// A person booked into a scheduled event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitee {
    pub uri: String,
    pub email: String,
    pub name: String,
    pub status: EventStatus,
    pub timezone: String,
    pub created_at: String,
    pub updated_at: String,
    pub reschedule_url: String,
    pub cancel_url: String,
}

/// An open slot computed by Calendly for an event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableTime {
    pub status: String,
    pub invitees_remaining: u32,
    pub start_time: String,
    pub scheduling_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub count: u32,
    pub next_page: Option<String>,
    pub previous_page: Option<String>,
    pub next_page_token: Option<String>,
}

/// One page of a collection endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub collection: Vec<T>,
    pub pagination: Pagination,
}

/// `{"resource": ...}` wrapper used by single-resource endpoints.
#[derive(Debug, Deserialize)]
pub struct ResourceEnvelope<T> {
    pub resource: T,
}

/// `{"collection": [...]}` wrapper used by endpoints without pagination.
#[derive(Debug, Deserialize)]
pub struct CollectionEnvelope<T> {
    pub collection: Vec<T>,
}
