use closedlist_core::db::migrations::latest_version;
use closedlist_core::db::{open_db, open_db_in_memory};
use closedlist_core::{
    parse_list_date, DailyList, FallbackReason, FixedClock, LiveState, Slot, SlotStore,
    SqliteKeyValueStore, StoreError, Task,
};
use rusqlite::{params, Connection};

fn clock(date: &str) -> FixedClock {
    FixedClock::new(parse_list_date(date).unwrap())
}

fn write_raw(conn: &Connection, key: &str, value: &str) {
    conn.execute(
        "INSERT INTO slots (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
        params![key, value],
    )
    .unwrap();
}

fn read_raw(conn: &Connection, key: &str) -> Option<String> {
    conn.query_row("SELECT value FROM slots WHERE key = ?1;", [key], |row| {
        row.get(0)
    })
    .ok()
}

#[test]
fn fresh_database_loads_defaults_and_pins_today() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();

    let store = SlotStore::load(kv, &clock("2024-01-01"));

    assert!(store.current_day_tasks().is_empty());
    assert!(store.tomorrow_inbox().is_empty());
    assert!(store.past_daily_lists().is_empty());
    assert_eq!(store.current_date(), parse_list_date("2024-01-01").unwrap());
    assert_eq!(store.load_report().fallbacks().len(), 4);
    assert_eq!(
        store.load_report().reason_for(Slot::CurrentDate),
        Some(&FallbackReason::Missing)
    );
    assert_eq!(
        read_raw(&conn, "currentDate").as_deref(),
        Some("\"2024-01-01\"")
    );
}

#[test]
fn pinned_date_is_not_requeried_from_the_calendar() {
    let conn = open_db_in_memory().unwrap();
    SlotStore::load(
        SqliteKeyValueStore::try_new(&conn).unwrap(),
        &clock("2024-01-01"),
    );

    let reloaded = SlotStore::load(
        SqliteKeyValueStore::try_new(&conn).unwrap(),
        &clock("2024-03-15"),
    );

    assert_eq!(
        reloaded.current_date(),
        parse_list_date("2024-01-01").unwrap()
    );
    assert!(reloaded.load_report().reason_for(Slot::CurrentDate).is_none());
}

#[test]
fn corrupted_values_fall_back_to_defaults() {
    let conn = open_db_in_memory().unwrap();
    write_raw(&conn, "currentTasks", "{\"not\":\"a list\"}");
    write_raw(&conn, "tomorrowInbox", "[oops");
    write_raw(&conn, "pastLists", "");
    write_raw(&conn, "currentDate", "\"someday\"");

    let store = SlotStore::load(
        SqliteKeyValueStore::try_new(&conn).unwrap(),
        &clock("2024-02-10"),
    );

    assert!(store.current_day_tasks().is_empty());
    assert!(store.tomorrow_inbox().is_empty());
    assert!(store.past_daily_lists().is_empty());
    assert_eq!(store.current_date(), parse_list_date("2024-02-10").unwrap());

    let report = store.load_report();
    assert!(matches!(
        report.reason_for(Slot::CurrentDayTasks),
        Some(FallbackReason::Malformed(_))
    ));
    assert!(matches!(
        report.reason_for(Slot::TomorrowInbox),
        Some(FallbackReason::Malformed(_))
    ));
    assert_eq!(
        report.reason_for(Slot::PastDailyLists),
        Some(&FallbackReason::Empty)
    );
    assert!(matches!(
        report.reason_for(Slot::CurrentDate),
        Some(FallbackReason::Malformed(_))
    ));
}

#[test]
fn history_with_non_uuid_ids_loads_intact() {
    let conn = open_db_in_memory().unwrap();
    write_raw(
        &conn,
        "pastLists",
        r#"[
            {"date":"2024-01-02","tasks":[{"id":"ok-1","text":"imported","completed":true}],"tomorrowInbox":[]},
            {"date":"2024-01-01","tasks":[],"tomorrowInbox":[{"id":"b7c1","text":"later"}]}
        ]"#,
    );
    write_raw(&conn, "currentDate", "\"2024-01-03\"");

    let store = SlotStore::load(
        SqliteKeyValueStore::try_new(&conn).unwrap(),
        &clock("2024-06-01"),
    );

    let history = store.past_daily_lists();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].tasks[0].id.as_str(), "ok-1");
    assert!(history[0].tasks[0].completed);
    assert_eq!(history[1].tomorrow_inbox[0].id.as_str(), "b7c1");
    assert_eq!(store.load_report().dropped_for(Slot::PastDailyLists), None);
    assert!(store.load_report().reason_for(Slot::PastDailyLists).is_none());
}

#[test]
fn malformed_entries_are_dropped_and_the_rest_kept() {
    let conn = open_db_in_memory().unwrap();
    write_raw(
        &conn,
        "currentTasks",
        r#"[{"id":"a","text":"kept"},{"text":"no id"},7,{"id":"b","text":"also kept"}]"#,
    );

    let store = SlotStore::load(
        SqliteKeyValueStore::try_new(&conn).unwrap(),
        &clock("2024-01-01"),
    );

    let texts: Vec<&str> = store
        .current_day_tasks()
        .iter()
        .map(|task| task.text.as_str())
        .collect();
    assert_eq!(texts, ["kept", "also kept"]);
    assert_eq!(store.load_report().dropped_for(Slot::CurrentDayTasks), Some(2));
    assert!(store.load_report().reason_for(Slot::CurrentDayTasks).is_none());
    assert!(!store.load_report().is_clean());
}

#[test]
fn read_failures_fall_back_instead_of_failing() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    conn.execute_batch("DROP TABLE slots;").unwrap();

    let store = SlotStore::load(kv, &clock("2024-01-01"));

    assert!(store.current_day_tasks().is_empty());
    assert_eq!(store.current_date(), parse_list_date("2024-01-01").unwrap());
    assert!(store
        .load_report()
        .fallbacks()
        .iter()
        .all(|(_, reason)| matches!(reason, FallbackReason::ReadFailed(_))));
}

#[test]
fn per_slot_writes_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("closedlist.sqlite3");
    let task = Task::new("persist me", 1).unwrap();
    let inbox_task = Task::new("later", 2).unwrap();

    {
        let conn = open_db(&path).unwrap();
        let mut store = SlotStore::load(
            SqliteKeyValueStore::try_new(&conn).unwrap(),
            &clock("2024-01-01"),
        );
        store.set_current_day_tasks(vec![task.clone()]).unwrap();
        store.set_tomorrow_inbox(vec![inbox_task.clone()]).unwrap();
        store
            .set_current_date(parse_list_date("2024-01-07").unwrap())
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SlotStore::load(
        SqliteKeyValueStore::try_new(&conn).unwrap(),
        &clock("2030-01-01"),
    );
    assert!(store.load_report().reason_for(Slot::CurrentDayTasks).is_none());
    assert_eq!(store.current_day_tasks(), &[task]);
    assert_eq!(store.tomorrow_inbox(), &[inbox_task]);
    assert_eq!(store.current_date(), parse_list_date("2024-01-07").unwrap());
}

#[test]
fn commit_replaces_all_slots() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SlotStore::load(
        SqliteKeyValueStore::try_new(&conn).unwrap(),
        &clock("2024-01-01"),
    );
    let archived = DailyList::new(
        parse_list_date("2024-01-01").unwrap(),
        vec![Task::new("old", 0).unwrap()],
        Vec::new(),
    );
    let next = LiveState {
        current_day_tasks: vec![Task::new("new", 0).unwrap()],
        tomorrow_inbox: Vec::new(),
        past_daily_lists: vec![archived],
        current_date: parse_list_date("2024-01-02").unwrap(),
    };

    store.commit(next.clone()).unwrap();
    assert_eq!(store.state(), &next);

    let reloaded = SlotStore::load(
        SqliteKeyValueStore::try_new(&conn).unwrap(),
        &clock("2024-05-05"),
    );
    assert!(reloaded.load_report().is_clean());
    assert_eq!(reloaded.state(), &next);
}

#[test]
fn failed_commit_leaves_disk_and_cache_untouched() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SlotStore::load(
        SqliteKeyValueStore::try_new(&conn).unwrap(),
        &clock("2024-01-01"),
    );
    store
        .set_current_day_tasks(vec![Task::new("keep", 0).unwrap()])
        .unwrap();
    let before = store.state().clone();

    conn.execute_batch(
        "CREATE TRIGGER reject_slot_writes BEFORE INSERT ON slots
         BEGIN SELECT RAISE(ABORT, 'writes disabled'); END;",
    )
    .unwrap();

    let mut next = LiveState::empty(parse_list_date("2024-01-02").unwrap());
    next.tomorrow_inbox = vec![Task::new("lost", 0).unwrap()];
    let err = store.commit(next).unwrap_err();
    assert!(matches!(err, StoreError::Db(_)));
    assert_eq!(store.state(), &before);

    conn.execute_batch("DROP TRIGGER reject_slot_writes;").unwrap();
    let reloaded = SlotStore::load(
        SqliteKeyValueStore::try_new(&conn).unwrap(),
        &clock("2024-09-09"),
    );
    assert_eq!(reloaded.state(), &before);
}

#[test]
fn key_value_store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteKeyValueStore::try_new(&conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn key_value_store_rejects_missing_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteKeyValueStore::try_new(&conn),
        Err(StoreError::MissingRequiredTable("slots"))
    ));
}

#[test]
fn key_value_store_rejects_missing_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE slots (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteKeyValueStore::try_new(&conn),
        Err(StoreError::MissingRequiredColumn {
            table: "slots",
            column: "updated_at"
        })
    ));
}
