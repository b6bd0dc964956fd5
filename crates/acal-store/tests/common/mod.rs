use acal_store::{CountedTable, StoreConfig, StoreHandle};
use rusqlite::Connection;
use tempfile::TempDir;

/// Schema plus the seeded 202502 term
pub const CALENDAR_SQL: &str = include_str!("../fixtures/calendar.sql");

/// In-memory store with the seeded calendar
#[allow(dead_code)]
pub fn seeded_store() -> StoreHandle {
    let handle = StoreHandle::open_in_memory().unwrap();
    handle.connection().execute_batch(CALENDAR_SQL).unwrap();
    handle
}

/// Seeded calendar in a temp file; keep the `TempDir` alive for the test
#[allow(dead_code)]
pub fn seeded_file_store() -> (TempDir, StoreConfig) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("calendar.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(CALENDAR_SQL).unwrap();
    conn.close().unwrap();
    (dir, StoreConfig::with_path(path))
}

/// Enroll `n` extra students in CSE101 section 1 of the reporting term
#[allow(dead_code)]
pub fn enroll_extra_students(handle: &StoreHandle, n: usize) {
    let conn = handle.connection();
    for i in 0..n {
        let student_id = format!("2023{:06}", i);
        conn.execute(
            "INSERT INTO student (student_id, name, dept_id) VALUES (?1, ?2, 'CSE')",
            [&student_id, &format!("Extra {:02}", i)],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO takes (student_id, course_id, section_id) VALUES (?1, 'CSE101', '1')",
            [&student_id],
        )
        .unwrap();
    }
}

/// Make every insert into `table` a silent no-op
#[allow(dead_code)]
pub fn ignore_inserts(handle: &StoreHandle, table: &str) {
    handle
        .connection()
        .execute_batch(&format!(
            "CREATE TRIGGER ignore_{table}_insert BEFORE INSERT ON {table} \
             BEGIN SELECT RAISE(IGNORE); END;"
        ))
        .unwrap();
}

/// Make every update of `table` a silent no-op
#[allow(dead_code)]
pub fn ignore_updates(handle: &StoreHandle, table: &str) {
    handle
        .connection()
        .execute_batch(&format!(
            "CREATE TRIGGER ignore_{table}_update BEFORE UPDATE ON {table} \
             BEGIN SELECT RAISE(IGNORE); END;"
        ))
        .unwrap();
}

/// Make every update of `table` fail
#[allow(dead_code)]
pub fn reject_updates(handle: &StoreHandle, table: &str) {
    handle
        .connection()
        .execute_batch(&format!(
            "CREATE TRIGGER reject_{table}_update BEFORE UPDATE ON {table} \
             BEGIN SELECT RAISE(ABORT, '{table} is read-only'); END;"
        ))
        .unwrap();
}

/// Make every delete from `table` fail
#[allow(dead_code)]
pub fn reject_deletes(handle: &StoreHandle, table: &str) {
    handle
        .connection()
        .execute_batch(&format!(
            "CREATE TRIGGER reject_{table}_delete BEFORE DELETE ON {table} \
             BEGIN SELECT RAISE(ABORT, '{table} is append-only'); END;"
        ))
        .unwrap();
}

#[allow(dead_code)]
pub fn schedule_count(handle: &StoreHandle) -> i64 {
    handle.row_count(CountedTable::Schedule).unwrap()
}

#[allow(dead_code)]
pub fn group_count(handle: &StoreHandle) -> i64 {
    handle.row_count(CountedTable::StudentGroup).unwrap()
}
