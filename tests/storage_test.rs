mod helpers;

use chrono::{TimeZone, Utc};
use helpers::test_db;
use things::storage::{self, Field, Row, RowQuery};

fn row_at(kind: &str, summary: &str, year: i32, month: u32, day: u32) -> Row {
    let mut row = Row::new(kind, summary);
    row.date_created = Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap();
    row
}

#[test]
fn insert_assigns_id_and_namespace() {
    let conn = test_db();
    let first = storage::insert(&conn, "alice", Row::new("note", "one")).unwrap();
    let second = storage::insert(&conn, "alice", Row::new("note", "two")).unwrap();

    assert!(first.id > 0);
    assert!(second.id > first.id);
    assert_eq!(first.namespace, "alice");
}

#[test]
fn namespaces_are_isolated() {
    let conn = test_db();
    let mine = storage::insert(&conn, "alice", Row::new("task", "mine")).unwrap();
    storage::insert(&conn, "bob", Row::new("task", "theirs")).unwrap();

    let rows = storage::query(&conn, "alice", &RowQuery::new()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].summary, "mine");

    // Bob cannot read or update Alice's row.
    assert!(storage::get(&conn, "bob", "task", mine.id).unwrap().is_none());
    assert!(storage::set_bool(&conn, "bob", "task", mine.id, true).unwrap().is_none());
    let unchanged = storage::get(&conn, "alice", "task", mine.id).unwrap().unwrap();
    assert_eq!(unchanged.bool, None);
}

#[test]
fn query_returns_newest_first_and_respects_limit() {
    let conn = test_db();
    storage::insert(&conn, "ns", row_at("note", "old", 2023, 1, 1)).unwrap();
    storage::insert(&conn, "ns", row_at("note", "new", 2024, 1, 1)).unwrap();
    storage::insert(&conn, "ns", row_at("note", "middle", 2023, 6, 1)).unwrap();

    let rows = storage::query(&conn, "ns", &RowQuery::new()).unwrap();
    let summaries: Vec<&str> = rows.iter().map(|r| r.summary.as_str()).collect();
    assert_eq!(summaries, vec!["new", "middle", "old"]);

    let rows = storage::query(&conn, "ns", &RowQuery::new().limit(1)).unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn filters_by_kind_summary_and_match() {
    let conn = test_db();
    storage::insert(&conn, "ns", Row::new("track", "sleep")).unwrap();
    storage::insert(&conn, "ns", Row::new("track", "sleepy")).unwrap();
    storage::insert(&conn, "ns", Row::new("note", "Sleep well")).unwrap();

    let exact = storage::query(&conn, "ns", &RowQuery::new().kind("track").summary("sleep")).unwrap();
    assert_eq!(exact.len(), 1);

    let fuzzy = storage::query(
        &conn,
        "ns",
        &RowQuery::new().matching(Field::Summary, "sleep"),
    )
    .unwrap();
    assert_eq!(fuzzy.len(), 3, "LIKE is case-insensitive");

    let notes = storage::query(
        &conn,
        "ns",
        &RowQuery::new().kind("note").matching(Field::Summary, "sleep"),
    )
    .unwrap();
    assert_eq!(notes.len(), 1);
}

#[test]
fn matches_content_field() {
    let conn = test_db();
    storage::insert(&conn, "ns", Row::new("track", "sleep").with_content("woke up at 4")).unwrap();
    storage::insert(&conn, "ns", Row::new("track", "sleep")).unwrap();

    let rows = storage::query(
        &conn,
        "ns",
        &RowQuery::new().matching(Field::Content, "woke"),
    )
    .unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn filters_by_created_prefix() {
    let conn = test_db();
    storage::insert(&conn, "ns", row_at("note", "august", 2024, 8, 15)).unwrap();
    storage::insert(&conn, "ns", row_at("task", "august too", 2024, 8, 2)).unwrap();
    storage::insert(&conn, "ns", row_at("note", "september", 2024, 9, 1)).unwrap();

    let month = storage::query(&conn, "ns", &RowQuery::new().created_prefix("2024-08")).unwrap();
    assert_eq!(month.len(), 2);

    let day = storage::query(&conn, "ns", &RowQuery::new().created_prefix("2024-08-15")).unwrap();
    assert_eq!(day.len(), 1);
    assert_eq!(day[0].summary, "august");

    let year = storage::query(&conn, "ns", &RowQuery::new().created_prefix("2024")).unwrap();
    assert_eq!(year.len(), 3);
}

#[test]
fn filters_by_tag() {
    let conn = test_db();
    storage::insert(&conn, "ns", Row::new("note", "milk #shopping")).unwrap();
    storage::insert(&conn, "ns", Row::new("task", "eggs #shopping #urgent")).unwrap();
    storage::insert(&conn, "ns", Row::new("note", "shopping without tag")).unwrap();

    let tagged = storage::query(&conn, "ns", &RowQuery::new().tag("shopping")).unwrap();
    assert_eq!(tagged.len(), 2);

    let urgent = storage::query(&conn, "ns", &RowQuery::new().tag("#urgent")).unwrap();
    assert_eq!(urgent.len(), 1);
    assert_eq!(urgent[0].kind, "task");
}

#[test]
fn set_bool_updates_only_the_flag() {
    let conn = test_db();
    let mut row = Row::new("task", "buy milk");
    row.bool = Some(false);
    let stored = storage::insert(&conn, "ns", row).unwrap();

    let updated = storage::set_bool(&conn, "ns", "task", stored.id, true)
        .unwrap()
        .unwrap();
    assert_eq!(updated.bool, Some(true));
    assert_eq!(updated.summary, "buy milk");
    assert_eq!(updated.date_created, stored.date_created);
}

#[test]
fn count_by_kind_groups_rows() {
    let conn = test_db();
    storage::insert(&conn, "a", Row::new("note", "1")).unwrap();
    storage::insert(&conn, "a", Row::new("note", "2")).unwrap();
    storage::insert(&conn, "a", Row::new("task", "3")).unwrap();
    storage::insert(&conn, "b", Row::new("note", "4")).unwrap();

    let counts = storage::query::count_by_kind(&conn, Some("a")).unwrap();
    assert_eq!(counts.get("note"), Some(&2));
    assert_eq!(counts.get("task"), Some(&1));

    let all = storage::query::count_by_kind(&conn, None).unwrap();
    assert_eq!(all.get("note"), Some(&3));
}
