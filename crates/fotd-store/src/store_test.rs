use chrono::{NaiveDate, TimeZone, Utc, Weekday};
use fotd_core::{
    CalendarDate, DayLabel, Flavor, FlavorDay, Location, LocationStatus, SourceError,
    PLACEHOLDER_DESCRIPTION,
};
use tempfile::TempDir;

use super::*;

/// One day of every date form and day label the adapters emit.
fn calendar() -> Vec<FlavorDay> {
    let date = |d| CalendarDate::Resolved(NaiveDate::from_ymd_opt(2026, 1, d).unwrap());
    vec![
        FlavorDay {
            date: date(5),
            day_label: DayLabel::Today,
            flavors: vec![
                Flavor::new("Butter Pecan", "Buttery custard with roasted pecans"),
                Flavor::new("Mint Explosion", PLACEHOLDER_DESCRIPTION),
            ],
        },
        FlavorDay {
            date: date(6),
            day_label: DayLabel::Tomorrow,
            flavors: vec![Flavor::new("Turtle", "Caramel, fudge and pecans")],
        },
        FlavorDay {
            date: CalendarDate::label("Thursday"),
            day_label: DayLabel::Weekday(Weekday::Thu),
            flavors: vec![Flavor::new("Caramel Cashew", PLACEHOLDER_DESCRIPTION)],
        },
        FlavorDay {
            date: CalendarDate::label("Every day"),
            day_label: DayLabel::Always,
            flavors: vec![Flavor::new("Vanilla", "Classic vanilla custard")],
        },
        FlavorDay {
            date: CalendarDate::label("Closed for winter"),
            day_label: DayLabel::Closed,
            flavors: vec![Flavor::new("Closed for the season", "Reopening in March")],
        },
        FlavorDay {
            date: date(9),
            day_label: DayLabel::Weekday(Weekday::Fri),
            flavors: Vec::new(),
        },
    ]
}

fn snapshot(ids: &[&str]) -> Snapshot {
    let timestamp = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
    let locations = ids
        .iter()
        .map(|id| Location {
            id: (*id).to_owned(),
            name: "Example Custard".to_owned(),
            location: "Downtown".to_owned(),
            address: "1 Main St".to_owned(),
            phone: "(555) 010-0000".to_owned(),
            status: LocationStatus::Open,
            hours: "11 AM - 10 PM".to_owned(),
            website: "https://custard.example.com".to_owned(),
            flavor_calendar: calendar(),
        })
        .collect();
    let errors = vec![SourceError {
        source: "broken".to_owned(),
        message: "browser unavailable: launch failed".to_owned(),
        timestamp,
    }];
    Snapshot::new(timestamp, "Monday, January 5, 2026 at 6:00 AM CST", locations, errors)
}

#[test]
fn absent_file_reads_as_empty_snapshot() {
    let dir = TempDir::new().unwrap();
    let loaded = read_snapshot(&dir.path().join("missing.json")).unwrap();
    assert_eq!(loaded, Snapshot::empty());
    assert!(loaded.timestamp.is_none());
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flavors.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        read_snapshot(&path),
        Err(StoreError::Deserialize { .. })
    ));
}

#[test]
fn write_atomic_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/data/flavors.json");
    write_atomic(&path, b"{}").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
}

#[test]
fn write_atomic_leaves_no_temp_files_behind() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flavors.json");
    write_atomic(&path, b"first").unwrap();
    write_atomic(&path, b"second").unwrap();

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), "second");
}

#[test]
fn write_into_a_file_path_fails_without_touching_it() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let result = write_atomic(&blocker.join("flavors.json"), b"{}");
    assert!(matches!(result, Err(StoreError::Io { .. })));
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}

#[tokio::test]
async fn save_then_load_returns_equal_snapshot() {
    let dir = TempDir::new().unwrap();
    let store = SnapshotStore::open(dir.path().join("flavors.json")).await.unwrap();
    assert_eq!(*store.current().await, Snapshot::empty());

    let saved = snapshot(&["a", "b"]);
    store.save(saved.clone()).await.unwrap();

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded, saved);
    assert_eq!(loaded.locations[1].flavor_calendar, calendar());
    assert_eq!(*store.current().await, saved);
}

#[test]
fn calendar_forms_survive_a_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flavors.json");
    let saved = snapshot(&["a"]);
    write_atomic(&path, &serde_json::to_vec_pretty(&saved).unwrap()).unwrap();

    let loaded = read_snapshot(&path).unwrap();
    let days = &loaded.locations[0].flavor_calendar;
    assert_eq!(days[2].date, CalendarDate::Label("Thursday".to_owned()));
    assert_eq!(days[2].day_label, DayLabel::Weekday(Weekday::Thu));
    assert_eq!(days[3].day_label, DayLabel::Always);
    assert_eq!(days[4].day_label, DayLabel::Closed);
    assert!(days[5].flavors.is_empty());
    assert_eq!(loaded, saved);
}

#[tokio::test]
async fn save_replaces_previous_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flavors.json");
    let store = SnapshotStore::open(&path).await.unwrap();

    store.save(snapshot(&["a", "b"])).await.unwrap();
    store.save(snapshot(&["c"])).await.unwrap();

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.total_locations, 1);
    assert_eq!(loaded.locations[0].id, "c");
}

#[tokio::test]
async fn reopening_picks_up_saved_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flavors.json");
    SnapshotStore::open(&path)
        .await
        .unwrap()
        .save(snapshot(&["a"]))
        .await
        .unwrap();

    let reopened = SnapshotStore::open(&path).await.unwrap();
    assert_eq!(reopened.current().await.locations[0].id, "a");
}

#[tokio::test]
async fn saved_document_uses_wire_field_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flavors.json");
    let store = SnapshotStore::open(&path).await.unwrap();
    store.save(snapshot(&["a"])).await.unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["totalLocations"], 1);
    assert_eq!(raw["lastUpdatedDisplay"], "Monday, January 5, 2026 at 6:00 AM CST");
    assert_eq!(raw["errors"][0]["error"], "browser unavailable: launch failed");
    assert!(raw["locations"][0]["flavors"].is_array());
}
