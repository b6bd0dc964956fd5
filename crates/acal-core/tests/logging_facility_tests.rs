#![allow(clippy::unwrap_used, clippy::expect_used)]

use acal_core::errors::{ExError, ExErrorKind};
use acal_core::logging_facility::test_capture::init_test_capture;
use acal_core::{log_op_end, log_op_error, log_op_start};
use acal_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use tracing::Level;

#[test]
fn test_start_carries_extra_fields() {
    let capture = init_test_capture();
    let op = "logging_test_start";

    log_op_start!(op, query = "students_by_department");

    let starts = capture.lifecycle(op, EVENT_START);
    assert_eq!(starts.len(), 1);
    assert_eq!(starts[0].level, Level::INFO);
    assert_eq!(starts[0].field("query"), Some("students_by_department"));
    assert!(starts[0]
        .field("component")
        .is_some_and(|c| c.starts_with("logging_facility_tests")));
}

#[test]
fn test_end_records_duration_and_counts() {
    let capture = init_test_capture();
    let op = "logging_test_end";

    log_op_end!(op, duration_ms = 42, row_count = 3);

    let ends = capture.lifecycle(op, EVENT_END);
    assert_eq!(ends.len(), 1, "Should have exactly one end event");
    assert_eq!(ends[0].field("duration_ms"), Some("42"));
    assert_eq!(ends[0].field("row_count"), Some("3"));
}

#[test]
fn test_error_records_kind_and_code_and_leaves_error_usable() {
    let capture = init_test_capture();
    let op = "logging_test_error";

    let err = ExError::new(ExErrorKind::Execution).with_message("database is locked");
    log_op_error!(op, err, duration_ms = 10, workflow = "delete_schedule");

    let failures = capture.lifecycle(op, EVENT_END_ERROR);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].level, Level::ERROR);
    assert_eq!(failures[0].field("err_code"), Some("ERR_EXECUTION"));
    assert_eq!(failures[0].field("err_kind"), Some("Execution"));
    assert_eq!(failures[0].field("workflow"), Some("delete_schedule"));
    assert_eq!(err.message(), "database is locked");
}

#[test]
fn test_ops_do_not_bleed_into_each_other() {
    let capture = init_test_capture();

    log_op_start!("logging_test_first");
    log_op_start!("logging_test_second");
    log_op_end!("logging_test_second", duration_ms = 1);

    assert_eq!(capture.events_for_op("logging_test_first").len(), 1);
    assert_eq!(capture.events_for_op("logging_test_second").len(), 2);
    assert!(capture.lifecycle("logging_test_first", EVENT_END).is_empty());
}
