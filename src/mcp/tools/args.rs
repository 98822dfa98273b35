//! Typed tool arguments.
//!
//! Every tool's `arguments` object is deserialized into one of these structs
//! before its handler runs, so handlers only ever see well-formed input.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::ToolError;
use crate::calendly::models::EventStatus;
use crate::calendly::{PageOptions, ScheduledEventFilter};

/// Page size accepted by Calendly collection endpoints (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u64")]
pub struct PageSize(u8);

impl PageSize {
    pub const MIN: u64 = 1;
    pub const MAX: u64 = 100;

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u64> for PageSize {
    type Error = String;

    fn try_from(n: u64) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            Ok(PageSize(n as u8))
        } else {
            Err(format!(
                "count must be between {} and {}, got {n}",
                Self::MIN,
                Self::MAX
            ))
        }
    }
}

fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let s = String::deserialize(deserializer)?;
    if s.trim().is_empty() {
        return Err(serde::de::Error::custom("must not be empty"));
    }
    Ok(s)
}

/// An event UUID: non-empty and usable as one URL path segment.
fn event_uuid<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let s = non_empty(deserializer)?;
    if matches!(s.as_str(), "." | "..") {
        return Err(serde::de::Error::custom("must be an event UUID"));
    }
    Ok(s)
}

/// Optional filter where `""` means the same as leaving it out.
fn blank_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let s = Option::<String>::deserialize(deserializer)?;
    Ok(s.filter(|v| !v.is_empty()))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoArgs {}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListEventTypesArgs {
    pub count: Option<PageSize>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page_token: Option<String>,
}

impl ListEventTypesArgs {
    pub fn page(self) -> PageOptions {
        PageOptions {
            count: self.count.map(PageSize::get),
            page_token: self.page_token,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListScheduledEventsArgs {
    pub count: Option<PageSize>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page_token: Option<String>,
    pub status: Option<EventStatus>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_start_time: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_start_time: Option<String>,
}

impl From<ListScheduledEventsArgs> for ScheduledEventFilter {
    fn from(args: ListScheduledEventsArgs) -> Self {
        ScheduledEventFilter {
            count: args.count.map(PageSize::get),
            page_token: args.page_token,
            status: args.status,
            min_start_time: args.min_start_time,
            max_start_time: args.max_start_time,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetEventArgs {
    #[serde(deserialize_with = "event_uuid")]
    pub event_uuid: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListInviteesArgs {
    #[serde(deserialize_with = "event_uuid")]
    pub event_uuid: String,
    pub count: Option<PageSize>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page_token: Option<String>,
}

impl ListInviteesArgs {
    pub fn page(&self) -> PageOptions {
        PageOptions {
            count: self.count.map(PageSize::get),
            page_token: self.page_token.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CancelEventArgs {
    #[serde(deserialize_with = "event_uuid")]
    pub event_uuid: String,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckAvailabilityArgs {
    #[serde(deserialize_with = "non_empty")]
    pub event_type_uri: String,
    #[serde(deserialize_with = "non_empty")]
    pub start_time: String,
    #[serde(deserialize_with = "non_empty")]
    pub end_time: String,
}

/// Deserialize a tool's `arguments`. A `null` argument object counts as `{}`.
pub fn parse<T: DeserializeOwned>(arguments: &Value) -> Result<T, ToolError> {
    let result = match arguments {
        Value::Null => T::deserialize(&Value::Object(Default::default())),
        other => T::deserialize(other),
    };
    result.map_err(|e| ToolError::InvalidArguments(e.to_string()))
}
