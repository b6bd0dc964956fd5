//! Personal schedule workflows: create, edit, delete

use super::{instrumented, CommitReceipt, Failure, FailureReason, WorkflowKind, WorkflowOutcome};
use crate::db::StoreHandle;
use crate::errors::{store_error, Result};
use crate::tx::{run_in_transaction, TxDecision, WorkflowState};
use acal_core::rules::parse_integer;
use acal_core::{NewSchedule, ScheduleEntry, SchedulePatch};
use rusqlite::{params, Connection, OptionalExtension};

const INSERT_SCHEDULE: &str = "INSERT INTO schedule (schedule_id, student_id, title, start_time, end_time) \
     VALUES ((SELECT COALESCE(MAX(schedule_id), 0) + 1 FROM schedule), ?1, ?2, ?3, ?4) \
     RETURNING schedule_id";

const SELECT_SCHEDULE: &str = "SELECT schedule_id, title, \
            strftime('%Y-%m-%d %H:%M', start_time), \
            strftime('%Y-%m-%d %H:%M', end_time) \
     FROM schedule WHERE schedule_id = ?1";

const UPDATE_SCHEDULE: &str =
    "UPDATE schedule SET title = ?1, start_time = ?2, end_time = ?3 WHERE schedule_id = ?4";

const DELETE_SCHEDULE: &str = "DELETE FROM schedule WHERE schedule_id = ?1";

/// Create a schedule entry with the next free id
///
/// Both times must be `YYYY-MM-DD HH:MM`; nothing is written otherwise.
///
/// # Errors
/// `Validation` for malformed input, or whatever the store reports.
pub fn create_schedule(
    handle: &mut StoreHandle,
    student_id: &str,
    title: &str,
    start_time: &str,
    end_time: &str,
) -> Result<WorkflowOutcome> {
    let kind = WorkflowKind::CreateSchedule;
    instrumented(kind, |tracker| {
        tracker.advance(WorkflowState::ValidatingInput);
        let input = NewSchedule::parse(student_id, title, start_time, end_time)?;

        run_in_transaction(handle, tracker, |tx| {
            let assigned = tx
                .query_row(
                    INSERT_SCHEDULE,
                    params![
                        input.student_id,
                        input.title,
                        input.start.to_store_text(),
                        input.end.to_store_text()
                    ],
                    |row| row.get::<_, i64>(0),
                )
                .optional()
                .map_err(|e| store_error(kind.as_str(), e))?;

            Ok(match assigned {
                Some(schedule_id) => TxDecision::Commit(CommitReceipt {
                    workflow: kind,
                    key: schedule_id,
                    rows_affected: 1,
                }),
                None => TxDecision::Rollback(Failure {
                    workflow: kind,
                    key: None,
                    reason: FailureReason::NoRowsAffected,
                }),
            })
        })
    })
}

/// Read one entry with its times rendered as `YYYY-MM-DD HH:MM`
///
/// # Errors
/// Whatever the store reports.
pub fn read_schedule(conn: &Connection, schedule_id: i64) -> Result<Option<ScheduleEntry>> {
    conn.query_row(SELECT_SCHEDULE, [schedule_id], |row| {
        Ok(ScheduleEntry {
            schedule_id: row.get(0)?,
            title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            start_time: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            end_time: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        })
    })
    .optional()
    .map_err(|e| store_error("read_schedule", e))
}

/// Read-modify-write edit of one entry
///
/// The current entry is read outside any transaction and handed to
/// `replacements`, which may prompt a user; blank patch fields keep the
/// current value. Only the UPDATE runs in a transaction, so other writers
/// are not blocked while the user types. An entry deleted in the meantime
/// ends in `NoRowsAffected`.
///
/// # Errors
/// `Validation` for a non-numeric id or a malformed replacement time, any
/// error raised by `replacements`, or whatever the store reports.
pub fn update_schedule<F>(
    handle: &mut StoreHandle,
    schedule_id: &str,
    replacements: F,
) -> Result<WorkflowOutcome>
where
    F: FnOnce(&ScheduleEntry) -> Result<SchedulePatch>,
{
    let kind = WorkflowKind::UpdateSchedule;
    instrumented(kind, |tracker| {
        tracker.advance(WorkflowState::ValidatingInput);
        let schedule_id = parse_integer("schedule_id", schedule_id)?;

        let Some(current) = read_schedule(handle.connection(), schedule_id)? else {
            return Ok(WorkflowOutcome::RolledBack(Failure {
                workflow: kind,
                key: Some(schedule_id),
                reason: FailureReason::NotFound,
            }));
        };
        let merged = replacements(&current)?.merge(&current)?;

        run_in_transaction(handle, tracker, |tx| {
            let affected = tx
                .execute(
                    UPDATE_SCHEDULE,
                    params![merged.title, merged.start_time, merged.end_time, schedule_id],
                )
                .map_err(|e| store_error(kind.as_str(), e))?;

            Ok(decide(kind, schedule_id, affected))
        })
    })
}

/// Delete one entry by id
///
/// # Errors
/// `Validation` for a non-numeric id, or whatever the store reports.
pub fn delete_schedule(handle: &mut StoreHandle, schedule_id: &str) -> Result<WorkflowOutcome> {
    let kind = WorkflowKind::DeleteSchedule;
    instrumented(kind, |tracker| {
        tracker.advance(WorkflowState::ValidatingInput);
        let schedule_id = parse_integer("schedule_id", schedule_id)?;

        run_in_transaction(handle, tracker, |tx| {
            let affected = tx
                .execute(DELETE_SCHEDULE, [schedule_id])
                .map_err(|e| store_error(kind.as_str(), e))?;
            Ok(decide(kind, schedule_id, affected))
        })
    })
}

/// Commit when the statement touched a row, roll back otherwise
pub(super) fn decide(kind: WorkflowKind, key: i64, affected: usize) -> TxDecision {
    if affected == 0 {
        TxDecision::Rollback(Failure {
            workflow: kind,
            key: Some(key),
            reason: FailureReason::NoRowsAffected,
        })
    } else {
        TxDecision::Commit(CommitReceipt {
            workflow: kind,
            key,
            rows_affected: affected,
        })
    }
}
