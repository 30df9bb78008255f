//! Pull sync through the command layer.

mod support;

use calbridge_api::{list_synced_events, sync_events};
use calbridge_domain::{EventType, SyncRequest, SyncedEventQuery};
use chrono::{NaiveDate, NaiveTime};
use serde_json::json;
use support::{TestApp, USER};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

async fn mount_events(app: &TestApp) {
    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .and(query_param("singleEvents", "true"))
        .and(query_param("orderBy", "startTime"))
        .and(query_param("maxResults", "2500"))
        .and(query_param("timeMin", "2024-01-10T09:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {
                    "id": "a",
                    "summary": "Lecture",
                    "start": { "dateTime": "2024-01-15T14:00:00-05:00" },
                    "end": { "dateTime": "2024-01-15T15:00:00-05:00" }
                },
                {
                    "id": "b",
                    "summary": "Holiday",
                    "start": { "date": "2024-01-16" },
                    "end": { "date": "2024-01-17" }
                },
                {
                    "id": "c",
                    "start": { "date": "2024-01-17" }
                }
            ]
        })))
        .mount(&app.server)
        .await;
}

#[tokio::test]
async fn repeated_sync_does_not_duplicate_rows() {
    let app = TestApp::new().await;
    app.connect().await;
    mount_events(&app).await;

    let first = sync_events(&app.ctx, USER, SyncRequest::default()).await.expect("first sync");
    assert_eq!(first.synced_count, 3);
    assert_eq!(app.row_count("calendar_events"), 3);

    let second = sync_events(&app.ctx, USER, SyncRequest::default()).await.expect("second sync");
    assert_eq!(second.synced_count, 3);
    assert_eq!(app.row_count("calendar_events"), 3);
}

#[tokio::test]
async fn synced_rows_use_configured_timezone() {
    let app = TestApp::new().await;
    app.connect().await;
    mount_events(&app).await;

    sync_events(&app.ctx, USER, SyncRequest::default()).await.expect("sync");
    let stored = list_synced_events(&app.ctx, USER, SyncedEventQuery::default())
        .await
        .expect("list");

    let titles: Vec<_> = stored.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Lecture", "Holiday", "Untitled Event"]);

    let lecture = &stored[0];
    assert_eq!(lecture.due_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    assert_eq!(lecture.due_time, Some(NaiveTime::from_hms_opt(14, 0, 0).unwrap()));
    assert_eq!(lecture.event_type, EventType::GoogleCalendar);
    assert_eq!(lecture.class_id, None);
    assert_eq!(lecture.source_text, "Imported from Google Calendar: Lecture");
    assert!(stored[1].due_time.is_none());
}

#[tokio::test]
async fn list_synced_events_filters_by_range_and_type() {
    let app = TestApp::new().await;
    app.connect().await;
    mount_events(&app).await;
    sync_events(&app.ctx, USER, SyncRequest::default()).await.expect("sync");

    let ranged = list_synced_events(
        &app.ctx,
        USER,
        SyncedEventQuery {
            from: NaiveDate::from_ymd_opt(2024, 1, 16),
            to: NaiveDate::from_ymd_opt(2024, 1, 16),
            event_type: None,
        },
    )
    .await
    .expect("ranged");
    assert_eq!(ranged.len(), 1);
    assert_eq!(ranged[0].title, "Holiday");

    let exams = list_synced_events(
        &app.ctx,
        USER,
        SyncedEventQuery { event_type: Some(EventType::Exam), ..Default::default() },
    )
    .await
    .expect("typed");
    assert!(exams.is_empty());

    let err = list_synced_events(
        &app.ctx,
        USER,
        SyncedEventQuery {
            from: NaiveDate::from_ymd_opt(2024, 2, 1),
            to: NaiveDate::from_ymd_opt(2024, 1, 1),
            event_type: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.status, 400);
}

#[tokio::test]
async fn sync_without_credential_is_not_found() {
    let app = TestApp::new().await;

    let err = sync_events(&app.ctx, USER, SyncRequest::default()).await.unwrap_err();

    assert_eq!(err.status, 404);
    assert_eq!(err.code, "not_connected");
}

#[tokio::test]
async fn remote_failure_is_server_error_and_writes_nothing() {
    let app = TestApp::new().await;
    app.connect().await;
    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .mount(&app.server)
        .await;

    let err = sync_events(&app.ctx, USER, SyncRequest::default()).await.unwrap_err();

    assert_eq!(err.status, 500);
    assert_eq!(err.code, "remote_service_error");
    assert!(err.detail.contains("backend error"));
    assert_eq!(app.row_count("calendar_events"), 0);
}

#[tokio::test]
async fn inverted_window_is_bad_request() {
    let app = TestApp::new().await;
    app.connect().await;

    let request = SyncRequest {
        calendar_id: None,
        time_min: Some(support::start_time()),
        time_max: Some(support::start_time() - chrono::Duration::days(1)),
    };
    let err = sync_events(&app.ctx, USER, request).await.unwrap_err();

    assert_eq!(err.status, 400);
    assert_eq!(err.code, "invalid_input");
}
