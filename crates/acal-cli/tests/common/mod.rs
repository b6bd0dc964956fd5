use rusqlite::Connection;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Schema and seed rows shared with the store's integration tests
pub const CALENDAR_SQL: &str = include_str!("../../../acal-store/tests/fixtures/calendar.sql");

/// Temp directory holding a seeded `calendar.db`
pub fn setup_calendar() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("calendar.db");
    let conn = Connection::open(&db_path).unwrap();
    conn.execute_batch(CALENDAR_SQL).unwrap();
    conn.close().unwrap();
    (temp_dir, db_path)
}

/// The binary, run in `dir` with no inherited `ACAL_*` settings
pub fn acal(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_acal"));
    cmd.current_dir(dir)
        .env_remove("ACAL_CONFIG")
        .env_remove("ACAL_DB")
        .env_remove("ACAL_TERM")
        .env("ACAL_LOG_PROFILE", "test");
    cmd
}

/// Run with `--db` pointing at the seeded database
#[allow(dead_code)]
pub fn run_with_db(dir: &Path, db: &Path, args: &[&str]) -> Output {
    acal(dir)
        .arg("--db")
        .arg(db)
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

/// Drive the interactive menu with `script` on stdin
#[allow(dead_code)]
pub fn run_menu(dir: &Path, db: &Path, script: &str) -> Output {
    let mut child = acal(dir)
        .arg("--db")
        .arg(db)
        .arg("menu")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start CLI");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(script.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[allow(dead_code)]
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[allow(dead_code)]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[allow(dead_code)]
pub fn count(db: &Path, table: &str) -> i64 {
    let conn = Connection::open(db).unwrap();
    let count: i64 = conn
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .unwrap();
    count
}

#[allow(dead_code)]
pub fn schedule_row(db: &Path, schedule_id: i64) -> (String, String, String) {
    let conn = Connection::open(db).unwrap();
    let row = conn
        .query_row(
            "SELECT title, start_time, end_time FROM schedule WHERE schedule_id = ?1",
            [schedule_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    row
}
