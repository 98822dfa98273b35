use std::fmt;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::models::{
    AvailableTime, CollectionEnvelope, EventStatus, EventType, Invitee, Paginated,
    ResourceEnvelope, ScheduledEvent, User,
};
use crate::error::{CalendlyError, CalendlyResult};

/// Production Calendly API origin.
pub const DEFAULT_BASE_URL: &str = "https://api.calendly.com";

/// Unset and empty strings are never sent as query parameters.
fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

/// Page size and cursor shared by the collection endpoints.
/// `None` fields are left out of the query string entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u8>,
    #[serde(skip_serializing_if = "is_blank")]
    pub page_token: Option<String>,
}

/// Filters for `GET /scheduled_events`. Time bounds are passed through as-is;
/// Calendly does the comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScheduledEventFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u8>,
    #[serde(skip_serializing_if = "is_blank")]
    pub page_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
    #[serde(skip_serializing_if = "is_blank")]
    pub min_start_time: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub max_start_time: Option<String>,
}

/// The scheduling operations the MCP tools are built on.
///
/// `CalendlyClient` is the real implementation; anything else is a test double.
#[async_trait]
pub trait SchedulingApi: Send + Sync {
    async fn get_current_user(&self) -> CalendlyResult<User>;

    async fn list_event_types(
        &self,
        user_uri: &str,
        page: &PageOptions,
    ) -> CalendlyResult<Paginated<EventType>>;

    async fn list_scheduled_events(
        &self,
        user_uri: &str,
        filter: &ScheduledEventFilter,
    ) -> CalendlyResult<Paginated<ScheduledEvent>>;

    async fn get_event(&self, event_uuid: &str) -> CalendlyResult<ScheduledEvent>;

    async fn list_invitees(
        &self,
        event_uuid: &str,
        page: &PageOptions,
    ) -> CalendlyResult<Paginated<Invitee>>;

    /// Cancel a scheduled event. A missing reason is sent as `""`.
    async fn cancel_event(&self, event_uuid: &str, reason: Option<&str>) -> CalendlyResult<()>;

    async fn get_available_times(
        &self,
        event_type_uri: &str,
        start_time: &str,
        end_time: &str,
    ) -> CalendlyResult<Vec<AvailableTime>>;
}

#[derive(Serialize)]
struct CancellationRequest<'a> {
    reason: &'a str,
}

/// Typed HTTP client for the Calendly REST API v2.
///
/// Holds no mutable state; clones share the underlying connection pool.
#[derive(Clone)]
pub struct CalendlyClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    extra_headers: HeaderMap,
}

impl fmt::Debug for CalendlyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendlyClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CalendlyClient {
    /// Client for `base_url`: normally [`DEFAULT_BASE_URL`], or a proxy or mock server.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            extra_headers: HeaderMap::new(),
        }
    }

    /// Add a header to every request. Authorization and Content-Type are
    /// always set by the client and cannot be replaced this way.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.extra_headers.insert(name, value);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a path against the base URL. Fully-qualified URLs (such as
    /// `pagination.next_page` links) are used verbatim.
    fn url(&self, path: &str) -> String {
        if path.starts_with("https://") || path.starts_with("http://") {
            path.to_string()
        } else {
            format!("{}{path}", self.base_url)
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut headers = self.extra_headers.clone();
        headers.remove(AUTHORIZATION);
        headers.remove(CONTENT_TYPE);

        self.http
            .request(method, self.url(path))
            .headers(headers)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
    }

    /// Send a request and return the body of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> CalendlyResult<String> {
        let request = request.build()?;
        tracing::debug!(method = %request.method(), url = %request.url(), "Calendly request");

        let response = self.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Calendly API returned an error");
            let body = response.text().await.unwrap_or_default();
            return Err(CalendlyError::api(status, &body));
        }
        Ok(response.text().await?)
    }

    async fn fetch_resource<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &'static str,
    ) -> CalendlyResult<T> {
        let body = self.send(request).await?;
        let envelope: ResourceEnvelope<T> = decode(&body, what)?;
        Ok(envelope.resource)
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &'static str,
    ) -> CalendlyResult<Paginated<T>> {
        let body = self.send(request).await?;
        decode(&body, what)
    }

    fn current_user_request(&self) -> RequestBuilder {
        self.request(Method::GET, "/users/me")
    }

    fn event_types_request(&self, user_uri: &str, page: &PageOptions) -> RequestBuilder {
        self.request(Method::GET, "/event_types")
            .query(&[("user", user_uri)])
            .query(page)
    }

    fn scheduled_events_request(
        &self,
        user_uri: &str,
        filter: &ScheduledEventFilter,
    ) -> RequestBuilder {
        self.request(Method::GET, "/scheduled_events")
            .query(&[("user", user_uri)])
            .query(filter)
    }

    /// URL of a scheduled event or one of its sub-resources. The UUID is
    /// percent-encoded as a single path segment.
    fn event_url(&self, event_uuid: &str, sub_resource: Option<&str>) -> String {
        let Ok(mut url) = Url::parse(&self.base_url) else {
            // Unparseable base: the request fails when it is built.
            return self.base_url.clone();
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("scheduled_events")
                .push(event_uuid)
                .extend(sub_resource);
        }
        url.into()
    }

    fn event_request(&self, event_uuid: &str) -> RequestBuilder {
        self.request(Method::GET, &self.event_url(event_uuid, None))
    }

    fn invitees_request(&self, event_uuid: &str, page: &PageOptions) -> RequestBuilder {
        self.request(Method::GET, &self.event_url(event_uuid, Some("invitees")))
            .query(page)
    }

    fn cancellation_request(&self, event_uuid: &str, reason: Option<&str>) -> RequestBuilder {
        self.request(
            Method::POST,
            &self.event_url(event_uuid, Some("cancellation")),
        )
        .json(&CancellationRequest {
            reason: reason.unwrap_or_default(),
        })
    }

    fn available_times_request(
        &self,
        event_type_uri: &str,
        start_time: &str,
        end_time: &str,
    ) -> RequestBuilder {
        self.request(Method::GET, "/event_type_available_times")
            .query(&[
                ("event_type", event_type_uri),
                ("start_time", start_time),
                ("end_time", end_time),
            ])
    }
}

fn decode<T: DeserializeOwned>(body: &str, what: &'static str) -> CalendlyResult<T> {
    serde_json::from_str(body).map_err(|source| CalendlyError::Schema { what, source })
}

#[async_trait]
impl SchedulingApi for CalendlyClient {
    async fn get_current_user(&self) -> CalendlyResult<User> {
        self.fetch_resource(self.current_user_request(), "user").await
    }

    async fn list_event_types(
        &self,
        user_uri: &str,
        page: &PageOptions,
    ) -> CalendlyResult<Paginated<EventType>> {
        self.fetch_page(self.event_types_request(user_uri, page), "event type list")
            .await
    }

    async fn list_scheduled_events(
        &self,
        user_uri: &str,
        filter: &ScheduledEventFilter,
    ) -> CalendlyResult<Paginated<ScheduledEvent>> {
        self.fetch_page(
            self.scheduled_events_request(user_uri, filter),
            "scheduled event list",
        )
        .await
    }

    async fn get_event(&self, event_uuid: &str) -> CalendlyResult<ScheduledEvent> {
        self.fetch_resource(self.event_request(event_uuid), "scheduled event")
            .await
    }

    async fn list_invitees(
        &self,
        event_uuid: &str,
        page: &PageOptions,
    ) -> CalendlyResult<Paginated<Invitee>> {
        self.fetch_page(self.invitees_request(event_uuid, page), "invitee list")
            .await
    }

    async fn cancel_event(&self, event_uuid: &str, reason: Option<&str>) -> CalendlyResult<()> {
        self.send(self.cancellation_request(event_uuid, reason)).await?;
        tracing::info!(event_uuid, "Cancelled scheduled event");
        Ok(())
    }

    async fn get_available_times(
        &self,
        event_type_uri: &str,
        start_time: &str,
        end_time: &str,
    ) -> CalendlyResult<Vec<AvailableTime>> {
        let body = self
            .send(self.available_times_request(event_type_uri, start_time, end_time))
            .await?;
        let envelope: CollectionEnvelope<AvailableTime> = decode(&body, "available time list")?;
        Ok(envelope.collection)
    }
}
