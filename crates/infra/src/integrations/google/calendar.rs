//! Google Calendar v3 REST client.

use async_trait::async_trait;
use calbridge_core::{EventOrder, ListEventsRequest, NewRemoteCalendar, RemoteCalendarService};
use calbridge_domain::{
    AccessCredential, CalBridgeError, RemoteCalendar, RemoteEvent, RemoteEventDraft, Result,
};
use chrono::SecondsFormat;
use reqwest::{Method, RequestBuilder, Response};
use tracing::{debug, instrument, warn};

use super::types::{
    GoogleCalendarBody, GoogleCalendarEntry, GoogleCalendarListResponse, GoogleEvent,
    GoogleEventBody, GoogleEventsResponse,
};
use super::{decode_json, error_parts};
use crate::http::HttpClient;

/// Google Calendar v3 REST adapter.
pub struct GoogleCalendarClient {
    http: HttpClient,
    base_url: String,
}

impl GoogleCalendarClient {
    /// `base_url` is the API root, e.g. `https://www.googleapis.com/calendar/v3`.
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!("{}/calendars/{}/events", self.base_url, urlencoding::encode(calendar_id))
    }

    fn event_url(&self, calendar_id: &str, event_id: &str) -> String {
        format!("{}/{}", self.events_url(calendar_id), urlencoding::encode(event_id))
    }

    fn calendar_url(&self, calendar_id: &str) -> String {
        format!("{}/calendars/{}", self.base_url, urlencoding::encode(calendar_id))
    }

    fn request(&self, method: Method, url: String, credential: &AccessCredential) -> RequestBuilder {
        self.http.request(method, url).bearer_auth(&credential.access_token)
    }

    /// Send and fail on any non-success status.
    async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let response = self.http.send(builder).await?;
        if response.status().is_success() {
            return Ok(response);
        }

        let (status, text) = error_parts(response).await;
        warn!(%status, "Google Calendar API returned an error");
        Err(CalBridgeError::RemoteService(format!("Google API error ({}): {}", status, text)))
    }

    fn parse_event(event: GoogleEvent) -> Result<RemoteEvent> {
        event.into_remote().map_err(|id| {
            CalBridgeError::RemoteService(format!("Google returned event {id} without a valid start"))
        })
    }
}

fn order_param(order: EventOrder) -> &'static str {
    match order {
        EventOrder::StartTime => "startTime",
        EventOrder::Updated => "updated",
    }
}

#[async_trait]
impl RemoteCalendarService for GoogleCalendarClient {
    #[instrument(skip_all)]
    async fn list_calendars(&self, credential: &AccessCredential) -> Result<Vec<RemoteCalendar>> {
        let url = format!("{}/users/me/calendarList", self.base_url);
        let response = self.execute(self.request(Method::GET, url, credential)).await?;
        let list: GoogleCalendarListResponse = decode_json(response, "calendar list").await?;

        Ok(list.items.into_iter().map(RemoteCalendar::from).collect())
    }

    #[instrument(skip(self, credential, request), fields(calendar_id = %request.calendar_id))]
    async fn list_events(
        &self,
        credential: &AccessCredential,
        request: &ListEventsRequest,
    ) -> Result<Vec<RemoteEvent>> {
        let mut query: Vec<(&str, String)> = vec![
            ("timeMin", request.time_min.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("timeMax", request.time_max.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("maxResults", request.max_results.to_string()),
            ("singleEvents", request.single_events.to_string()),
        ];
        if let Some(order) = request.order_by {
            query.push(("orderBy", order_param(order).to_string()));
        }

        let builder =
            self.request(Method::GET, self.events_url(&request.calendar_id), credential).query(&query);
        let response = self.execute(builder).await?;
        let page: GoogleEventsResponse = decode_json(response, "events").await?;

        if page.next_page_token.is_some() {
            warn!(
                max_results = request.max_results,
                "event listing truncated; additional pages are not fetched"
            );
        }

        let mut events = Vec::with_capacity(page.items.len());
        for item in page.items {
            match item.into_remote() {
                Ok(event) => events.push(event),
                Err(event_id) => warn!(%event_id, "skipping event with unparseable start"),
            }
        }

        debug!(count = events.len(), "fetched remote events");
        Ok(events)
    }

    #[instrument(skip(self, credential, event))]
    async fn insert_event(
        &self,
        credential: &AccessCredential,
        calendar_id: &str,
        event: &RemoteEventDraft,
        notify_attendees: bool,
    ) -> Result<RemoteEvent> {
        let send_updates = if notify_attendees { "all" } else { "none" };
        let builder = self
            .request(Method::POST, self.events_url(calendar_id), credential)
            .query(&[("sendUpdates", send_updates)])
            .json(&GoogleEventBody::from(event));

        let response = self.execute(builder).await?;
        Self::parse_event(decode_json(response, "event").await?)
    }

    #[instrument(skip(self, credential, event))]
    async fn update_event(
        &self,
        credential: &AccessCredential,
        calendar_id: &str,
        event_id: &str,
        event: &RemoteEventDraft,
    ) -> Result<RemoteEvent> {
        let builder = self
            .request(Method::PUT, self.event_url(calendar_id, event_id), credential)
            .json(&GoogleEventBody::from(event));

        let response = self.execute(builder).await?;
        Self::parse_event(decode_json(response, "event").await?)
    }

    #[instrument(skip(self, credential))]
    async fn delete_event(
        &self,
        credential: &AccessCredential,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<()> {
        let url = self.event_url(calendar_id, event_id);
        self.execute(self.request(Method::DELETE, url, credential)).await?;
        Ok(())
    }

    #[instrument(skip_all)]
    async fn insert_calendar(
        &self,
        credential: &AccessCredential,
        calendar: &NewRemoteCalendar,
    ) -> Result<RemoteCalendar> {
        let body = GoogleCalendarBody {
            summary: &calendar.summary,
            description: calendar.description.as_deref(),
            time_zone: &calendar.time_zone,
        };
        let url = format!("{}/calendars", self.base_url);
        let response = self.execute(self.request(Method::POST, url, credential).json(&body)).await?;
        let created: GoogleCalendarEntry = decode_json(response, "calendar").await?;

        Ok(created.into())
    }

    #[instrument(skip(self, credential))]
    async fn delete_calendar(&self, credential: &AccessCredential, calendar_id: &str) -> Result<()> {
        let url = self.calendar_url(calendar_id);
        self.execute(self.request(Method::DELETE, url, credential)).await?;
        Ok(())
    }
}
