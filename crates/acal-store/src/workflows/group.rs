//! Study group workflows: create, change leader, delete

use super::schedule::decide;
use super::{instrumented, CommitReceipt, Failure, FailureReason, WorkflowKind, WorkflowOutcome};
use crate::db::StoreHandle;
use crate::errors::{store_error, Result};
use crate::tx::{run_in_transaction, TxDecision, WorkflowState};
use acal_core::rules::parse_integer;
use acal_core::{LeaderChange, NewStudentGroup};
use rusqlite::{params, OptionalExtension};

const INSERT_GROUP: &str = "INSERT INTO student_group (group_id, g_name, purpose, leader, member_count) \
     VALUES ((SELECT COALESCE(MAX(group_id), 0) + 1 FROM student_group), ?1, ?2, ?3, ?4) \
     RETURNING group_id";

const UPDATE_LEADER: &str = "UPDATE student_group SET leader = ?1 WHERE group_id = ?2";

const DELETE_GROUP: &str = "DELETE FROM student_group WHERE group_id = ?1";

/// Create a study group led by `leader_student_id`
///
/// The group starts with one member. No membership row is written.
///
/// # Errors
/// `Validation` for a blank name or leader, or whatever the store reports
/// (an unknown leader fails only if the schema enforces it).
pub fn create_group(
    handle: &mut StoreHandle,
    group_name: &str,
    purpose: &str,
    leader_student_id: &str,
) -> Result<WorkflowOutcome> {
    let kind = WorkflowKind::CreateGroup;
    instrumented(kind, |tracker| {
        tracker.advance(WorkflowState::ValidatingInput);
        let group = NewStudentGroup::parse(group_name, purpose, leader_student_id)?;

        run_in_transaction(handle, tracker, |tx| {
            let assigned = tx
                .query_row(
                    INSERT_GROUP,
                    params![
                        group.name,
                        group.purpose,
                        group.leader_student_id,
                        NewStudentGroup::INITIAL_MEMBER_COUNT
                    ],
                    |row| row.get::<_, i64>(0),
                )
                .optional()
                .map_err(|e| store_error(kind.as_str(), e))?;

            Ok(match assigned {
                Some(group_id) => TxDecision::Commit(CommitReceipt {
                    workflow: kind,
                    key: group_id,
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

/// Point a group at a new leader
///
/// Membership of the new leader is not checked here.
///
/// # Errors
/// `Validation` for a non-numeric group id or blank leader, or whatever the
/// store reports.
pub fn change_group_leader(
    handle: &mut StoreHandle,
    group_id: &str,
    new_leader_student_id: &str,
) -> Result<WorkflowOutcome> {
    let kind = WorkflowKind::ChangeGroupLeader;
    instrumented(kind, |tracker| {
        tracker.advance(WorkflowState::ValidatingInput);
        let change = LeaderChange::parse(group_id, new_leader_student_id)?;

        run_in_transaction(handle, tracker, |tx| {
            let affected = tx
                .execute(
                    UPDATE_LEADER,
                    params![change.new_leader_student_id, change.group_id],
                )
                .map_err(|e| store_error(kind.as_str(), e))?;
            Ok(decide(kind, change.group_id, affected))
        })
    })
}

/// Delete a study group by id
///
/// # Errors
/// `Validation` for a non-numeric id, or whatever the store reports.
pub fn delete_group(handle: &mut StoreHandle, group_id: &str) -> Result<WorkflowOutcome> {
    let kind = WorkflowKind::DeleteGroup;
    instrumented(kind, |tracker| {
        tracker.advance(WorkflowState::ValidatingInput);
        let group_id = parse_integer("group_id", group_id)?;

        run_in_transaction(handle, tracker, |tx| {
            let affected = tx
                .execute(DELETE_GROUP, [group_id])
                .map_err(|e| store_error(kind.as_str(), e))?;
            Ok(decide(kind, group_id, affected))
        })
    })
}
