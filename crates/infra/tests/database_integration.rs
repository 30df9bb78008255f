//! SQLite repository coverage against the real schema.
//!
//! Each test operates on an isolated database file with migrations applied.

mod support;

use calbridge_core::{CalendarEventRepository, CredentialRepository};
use calbridge_domain::{CredentialRecord, EventType, SyncedEventQuery};
use calbridge_infra::database::{SqliteCalendarEventRepository, SqliteCredentialRepository};
use chrono::Duration;
use support::{base_time, date, make_event, time, TestDatabase};

fn record(user_id: &str, refresh: Option<&str>) -> CredentialRecord {
    CredentialRecord {
        user_id: user_id.to_string(),
        access_token: format!("access-{user_id}"),
        refresh_token: refresh.map(str::to_string),
        expiry: Some(base_time() + Duration::hours(1)),
        updated_at: base_time(),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn credential_round_trip_and_overwrite() {
    let db = TestDatabase::new();
    let repo = SqliteCredentialRepository::new(db.manager.clone());

    assert!(repo.get("user-1").await.expect("get").is_none());

    let original = record("user-1", Some("refresh-1"));
    repo.upsert(&original).await.expect("insert");
    assert_eq!(repo.get("user-1").await.expect("get"), Some(original.clone()));

    let replacement = CredentialRecord {
        access_token: "access-2".into(),
        expiry: Some(base_time() + Duration::microseconds(1)),
        updated_at: base_time() + Duration::minutes(5),
        ..original
    };
    repo.upsert(&replacement).await.expect("overwrite");

    let stored = repo.get("user-1").await.expect("get").expect("record");
    assert_eq!(stored, replacement);
    assert_eq!(db.count("credential_records"), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn credential_without_refresh_token_or_expiry() {
    let db = TestDatabase::new();
    let repo = SqliteCredentialRepository::new(db.manager.clone());

    let bare = CredentialRecord { expiry: None, ..record("user-2", None) };
    repo.upsert(&bare).await.expect("insert");

    let stored = repo.get("user-2").await.expect("get").expect("record");
    assert_eq!(stored.refresh_token, None);
    assert_eq!(stored.expiry, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn credential_delete_is_idempotent() {
    let db = TestDatabase::new();
    let repo = SqliteCredentialRepository::new(db.manager.clone());

    repo.upsert(&record("user-1", Some("refresh"))).await.expect("insert");
    repo.delete("user-1").await.expect("first delete");
    repo.delete("user-1").await.expect("second delete");

    assert!(repo.get("user-1").await.expect("get").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn upserting_same_batch_twice_keeps_one_row_per_key() {
    let db = TestDatabase::new();
    let repo = SqliteCalendarEventRepository::new(db.manager.clone());

    let batch = vec![
        make_event("user-1", "Lecture", date(2024, 1, 15), Some(time(10, 0))),
        make_event("user-1", "Holiday", date(2024, 1, 16), None),
    ];

    assert_eq!(repo.upsert_events(&batch).await.expect("first"), 2);
    let first_ids: Vec<_> = repo
        .list_events("user-1", &SyncedEventQuery::default())
        .await
        .expect("list")
        .into_iter()
        .map(|e| e.id)
        .collect();

    let resynced: Vec<_> = batch
        .iter()
        .map(|e| make_event("user-1", &e.title, e.due_date, e.due_time))
        .collect();
    repo.upsert_events(&resynced).await.expect("second");

    let stored = repo.list_events("user-1", &SyncedEventQuery::default()).await.expect("list");
    assert_eq!(stored.len(), 2);
    assert_eq!(stored.iter().map(|e| e.id).collect::<Vec<_>>(), first_ids);
    assert_eq!(db.count("calendar_events"), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn upsert_overwrites_mutable_fields_in_place() {
    let db = TestDatabase::new();
    let repo = SqliteCalendarEventRepository::new(db.manager.clone());

    let original = make_event("user-1", "Exam", date(2024, 2, 1), Some(time(9, 0)));
    repo.upsert_events(std::slice::from_ref(&original)).await.expect("insert");

    let mut moved = make_event("user-1", "Exam", date(2024, 2, 1), Some(time(13, 30)));
    moved.description = Some("Room 4".into());
    repo.upsert_events(&[moved]).await.expect("update");

    let stored = repo.list_events("user-1", &SyncedEventQuery::default()).await.expect("list");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, original.id);
    assert_eq!(stored[0].due_time, Some(time(13, 30)));
    assert_eq!(stored[0].description.as_deref(), Some("Room 4"));
}

#[tokio::test(flavor = "multi_thread")]
async fn later_entry_in_batch_wins() {
    let db = TestDatabase::new();
    let repo = SqliteCalendarEventRepository::new(db.manager.clone());

    let batch = vec![
        make_event("user-1", "Standup", date(2024, 3, 1), Some(time(9, 0))),
        make_event("user-1", "Standup", date(2024, 3, 1), Some(time(17, 0))),
    ];
    repo.upsert_events(&batch).await.expect("upsert");

    let stored = repo.list_events("user-1", &SyncedEventQuery::default()).await.expect("list");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].due_time, Some(time(17, 0)));
}

#[tokio::test(flavor = "multi_thread")]
async fn same_title_on_other_day_or_user_is_distinct() {
    let db = TestDatabase::new();
    let repo = SqliteCalendarEventRepository::new(db.manager.clone());

    repo.upsert_events(&[
        make_event("user-1", "Gym", date(2024, 3, 1), None),
        make_event("user-1", "Gym", date(2024, 3, 2), None),
        make_event("user-2", "Gym", date(2024, 3, 1), None),
    ])
    .await
    .expect("upsert");

    assert_eq!(db.count("calendar_events"), 3);
    let user1 = repo.list_events("user-1", &SyncedEventQuery::default()).await.expect("list");
    assert_eq!(user1.len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_batch_leaves_no_partial_rows() {
    let db = TestDatabase::new();
    let repo = SqliteCalendarEventRepository::new(db.manager.clone());

    let mut invalid = make_event("user-1", "Broken", date(2024, 3, 2), None);
    invalid.confidence_score = 2.0;
    let batch = vec![make_event("user-1", "Fine", date(2024, 3, 1), None), invalid];

    let err = repo.upsert_events(&batch).await.unwrap_err();
    assert!(matches!(err, calbridge_domain::CalBridgeError::Store(_)));
    assert_eq!(db.count("calendar_events"), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_filters_and_orders() {
    let db = TestDatabase::new();
    let repo = SqliteCalendarEventRepository::new(db.manager.clone());

    let mut reading = make_event("user-1", "Chapter 3", date(2024, 4, 2), None);
    reading.event_type = EventType::Reading;
    repo.upsert_events(&[
        make_event("user-1", "Late", date(2024, 4, 3), Some(time(18, 0))),
        make_event("user-1", "Early", date(2024, 4, 3), Some(time(8, 0))),
        make_event("user-1", "All day", date(2024, 4, 3), None),
        make_event("user-1", "Before", date(2024, 3, 31), None),
        reading,
    ])
    .await
    .expect("upsert");

    let all = repo.list_events("user-1", &SyncedEventQuery::default()).await.expect("list");
    let titles: Vec<_> = all.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Before", "Chapter 3", "All day", "Early", "Late"]);

    let ranged = repo
        .list_events(
            "user-1",
            &SyncedEventQuery {
                from: Some(date(2024, 4, 1)),
                to: Some(date(2024, 4, 2)),
                event_type: None,
            },
        )
        .await
        .expect("ranged");
    assert_eq!(ranged.len(), 1);
    assert_eq!(ranged[0].title, "Chapter 3");

    let synced_only = repo
        .list_events(
            "user-1",
            &SyncedEventQuery { event_type: Some(EventType::GoogleCalendar), ..Default::default() },
        )
        .await
        .expect("typed");
    assert_eq!(synced_only.len(), 4);
    assert!(synced_only.iter().all(|e| e.event_type == EventType::GoogleCalendar));
}

#[tokio::test(flavor = "multi_thread")]
async fn stored_event_round_trips_fields() {
    let db = TestDatabase::new();
    let repo = SqliteCalendarEventRepository::new(db.manager.clone());

    let mut event = make_event("user-1", "Seminar", date(2024, 5, 6), Some(time(14, 15)));
    event.class_id = Some("class-9".into());
    event.description = Some("Bring notes".into());
    repo.upsert_events(std::slice::from_ref(&event)).await.expect("upsert");

    let stored = repo.list_events("user-1", &SyncedEventQuery::default()).await.expect("list");
    assert_eq!(stored, vec![event]);
}

#[test]
fn migrations_create_tables_and_version() {
    let db = TestDatabase::new();
    db.manager.run_migrations().expect("second run is a no-op");

    assert_eq!(db.count("schema_version"), 1);
    db.manager.health_check().expect("healthy");
}
