use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use calbridge_core::{
    CalendarEventRepository, ListEventsRequest, NewRemoteCalendar, RemoteCalendarService,
};
use calbridge_domain::{
    AccessCredential, CalBridgeError, CalendarEvent, EventTime, RemoteCalendar, RemoteEvent,
    RemoteEventDraft, Result, SyncedEventQuery,
};
use chrono::NaiveDate;

/// Remote calendar double. Serves a fixed event list and records writes
/// together with the access token each call carried.
#[derive(Default, Clone)]
pub struct MockRemoteCalendar {
    pub events: Arc<Mutex<Vec<RemoteEvent>>>,
    pub list_requests: Arc<Mutex<Vec<ListEventsRequest>>>,
    pub inserted: Arc<Mutex<Vec<(String, RemoteEventDraft, bool)>>>,
    pub updated: Arc<Mutex<Vec<(String, String, RemoteEventDraft)>>>,
    pub deleted_events: Arc<Mutex<Vec<(String, String)>>>,
    pub calendars: Arc<Mutex<Vec<NewRemoteCalendar>>>,
    pub deleted_calendars: Arc<Mutex<Vec<String>>>,
    pub tokens_seen: Arc<Mutex<Vec<String>>>,
}

impl MockRemoteCalendar {
    pub fn with_events(events: Vec<RemoteEvent>) -> Self {
        let mock = Self::default();
        *mock.events.lock().unwrap() = events;
        mock
    }

    pub fn call_count(&self) -> usize {
        self.tokens_seen.lock().unwrap().len()
    }

    fn seen(&self, credential: &AccessCredential) {
        self.tokens_seen.lock().unwrap().push(credential.access_token.clone());
    }
}

#[async_trait]
impl RemoteCalendarService for MockRemoteCalendar {
    async fn list_calendars(&self, credential: &AccessCredential) -> Result<Vec<RemoteCalendar>> {
        self.seen(credential);
        Ok(vec![RemoteCalendar {
            id: "primary".into(),
            summary: "student@example.com".into(),
            description: None,
            time_zone: Some("UTC".into()),
            primary: true,
            access_role: Some("owner".into()),
        }])
    }

    async fn list_events(
        &self,
        credential: &AccessCredential,
        request: &ListEventsRequest,
    ) -> Result<Vec<RemoteEvent>> {
        self.seen(credential);
        self.list_requests.lock().unwrap().push(request.clone());
        Ok(self.events.lock().unwrap().clone())
    }

    async fn insert_event(
        &self,
        credential: &AccessCredential,
        calendar_id: &str,
        event: &RemoteEventDraft,
        notify_attendees: bool,
    ) -> Result<RemoteEvent> {
        self.seen(credential);
        let mut inserted = self.inserted.lock().unwrap();
        inserted.push((calendar_id.to_string(), event.clone(), notify_attendees));
        let id = format!("remote-{}", inserted.len());
        Ok(echo(&id, event))
    }

    async fn update_event(
        &self,
        credential: &AccessCredential,
        calendar_id: &str,
        event_id: &str,
        event: &RemoteEventDraft,
    ) -> Result<RemoteEvent> {
        self.seen(credential);
        self.updated.lock().unwrap().push((calendar_id.into(), event_id.into(), event.clone()));
        Ok(echo(event_id, event))
    }

    async fn delete_event(
        &self,
        credential: &AccessCredential,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<()> {
        self.seen(credential);
        self.deleted_events.lock().unwrap().push((calendar_id.into(), event_id.into()));
        Ok(())
    }

    async fn insert_calendar(
        &self,
        credential: &AccessCredential,
        calendar: &NewRemoteCalendar,
    ) -> Result<RemoteCalendar> {
        self.seen(credential);
        self.calendars.lock().unwrap().push(calendar.clone());
        Ok(RemoteCalendar {
            id: "new-calendar@group.calendar.google.com".into(),
            summary: calendar.summary.clone(),
            description: calendar.description.clone(),
            time_zone: Some(calendar.time_zone.clone()),
            primary: false,
            access_role: Some("owner".into()),
        })
    }

    async fn delete_calendar(&self, credential: &AccessCredential, calendar_id: &str) -> Result<()> {
        self.seen(credential);
        self.deleted_calendars.lock().unwrap().push(calendar_id.into());
        Ok(())
    }
}

fn echo(id: &str, event: &RemoteEventDraft) -> RemoteEvent {
    RemoteEvent {
        id: id.to_string(),
        summary: Some(event.summary.clone()),
        description: Some(event.description.clone()),
        location: Some(event.location.clone()),
        start: EventTime::DateTime {
            instant: event.start.date_time,
            time_zone: Some(event.start.time_zone.clone()),
        },
        end: Some(EventTime::DateTime {
            instant: event.end.date_time,
            time_zone: Some(event.end.time_zone.clone()),
        }),
        status: Some("confirmed".into()),
        html_link: Some(format!("https://calendar.google.com/event?eid={}", id)),
        attendees: vec![],
        organizer: None,
    }
}

/// Event store enforcing the (`user_id`, `title`, `due_date`) upsert key.
#[derive(Default, Clone)]
pub struct InMemoryEventRepository {
    rows: Arc<Mutex<Vec<CalendarEvent>>>,
    fail: Arc<AtomicBool>,
}

impl InMemoryEventRepository {
    pub fn rows(&self) -> Vec<CalendarEvent> {
        self.rows.lock().unwrap().clone()
    }

    pub fn fail_upserts(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CalendarEventRepository for InMemoryEventRepository {
    async fn upsert_events(&self, events: &[CalendarEvent]) -> Result<usize> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CalBridgeError::Store("disk I/O error".into()));
        }
        let mut rows = self.rows.lock().unwrap();
        for event in events {
            match rows.iter_mut().find(|row| {
                row.user_id == event.user_id && row.title == event.title && row.due_date == event.due_date
            }) {
                Some(existing) => {
                    let id = existing.id;
                    let created_at = existing.created_at;
                    *existing = CalendarEvent { id, created_at, ..event.clone() };
                }
                None => rows.push(event.clone()),
            }
        }
        Ok(events.len())
    }

    async fn list_events(&self, user_id: &str, query: &SyncedEventQuery) -> Result<Vec<CalendarEvent>> {
        let mut rows: Vec<CalendarEvent> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.user_id == user_id)
            .filter(|row| query.from.map_or(true, |from| row.due_date >= from))
            .filter(|row| query.to.map_or(true, |to| row.due_date <= to))
            .filter(|row| query.event_type.map_or(true, |t| row.event_type == t))
            .cloned()
            .collect();
        rows.sort_by_key(|row| (row.due_date, row.due_time));
        Ok(rows)
    }
}

pub fn all_day_remote(id: &str, summary: &str, date: NaiveDate) -> RemoteEvent {
    RemoteEvent {
        id: id.to_string(),
        summary: Some(summary.to_string()),
        description: None,
        location: None,
        start: EventTime::Date(date),
        end: date.succ_opt().map(EventTime::Date),
        status: Some("confirmed".into()),
        html_link: None,
        attendees: vec![],
        organizer: None,
    }
}
