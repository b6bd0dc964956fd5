use acal_store::StoreHandle;

/// Schema and seed rows shared with the store's integration tests
pub const CALENDAR_SQL: &str = include_str!("../../../acal-store/tests/fixtures/calendar.sql");

/// In-memory store with the seeded calendar
#[allow(dead_code)]
pub fn seeded_store() -> StoreHandle {
    let handle = StoreHandle::open_in_memory().unwrap();
    handle.connection().execute_batch(CALENDAR_SQL).unwrap();
    handle
}

#[allow(dead_code)]
pub fn schedule_titles(handle: &StoreHandle) -> Vec<String> {
    let mut stmt = handle
        .connection()
        .prepare("SELECT title FROM schedule ORDER BY schedule_id")
        .unwrap();
    let titles = stmt
        .query_map([], |r| r.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap();
    titles
}
