//! Engine-level mutation commands.
//!
//! Every variant carries the dispatcher's raw text; validation happens inside
//! the workflow so that it is tracked and logged with the invocation.

#![allow(clippy::result_large_err)]

use crate::context::EngineContext;
use acal_core::{ScheduleEntry, SchedulePatch};
use acal_store::errors::Result;
use acal_store::workflows::{
    change_group_leader, create_group, create_schedule, delete_group, delete_schedule,
    update_schedule,
};
use acal_store::{StoreHandle, WorkflowKind, WorkflowOutcome};

/// Mutation commands supported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowCommand {
    CreateSchedule {
        student_id: String,
        title: String,
        /// `YYYY-MM-DD HH:MM`
        start_time: String,
        /// `YYYY-MM-DD HH:MM`
        end_time: String,
    },
    /// Edit with replacements known up front; blank fields keep their value
    UpdateSchedule {
        schedule_id: String,
        patch: SchedulePatch,
    },
    DeleteSchedule {
        schedule_id: String,
    },
    CreateGroup {
        group_name: String,
        purpose: String,
        leader_student_id: String,
    },
    ChangeGroupLeader {
        group_id: String,
        new_leader_student_id: String,
    },
    DeleteGroup {
        group_id: String,
    },
}

impl WorkflowCommand {
    pub fn kind(&self) -> WorkflowKind {
        match self {
            WorkflowCommand::CreateSchedule { .. } => WorkflowKind::CreateSchedule,
            WorkflowCommand::UpdateSchedule { .. } => WorkflowKind::UpdateSchedule,
            WorkflowCommand::DeleteSchedule { .. } => WorkflowKind::DeleteSchedule,
            WorkflowCommand::CreateGroup { .. } => WorkflowKind::CreateGroup,
            WorkflowCommand::ChangeGroupLeader { .. } => WorkflowKind::ChangeGroupLeader,
            WorkflowCommand::DeleteGroup { .. } => WorkflowKind::DeleteGroup,
        }
    }
}

/// Apply a mutation command.
///
/// # Errors
/// `Validation` for malformed input, `Execution` or `Connection` when the
/// store fails. The transaction is rolled back before any error returns.
pub fn apply_workflow_command(
    handle: &mut StoreHandle,
    cmd: WorkflowCommand,
    ctx: &EngineContext,
) -> Result<WorkflowOutcome> {
    tracing::debug!(
        workflow = cmd.kind().as_str(),
        request_id = %ctx.request.request_id,
        origin = ctx.request.origin.as_str(),
        "Applying workflow command"
    );

    let result = match cmd {
        WorkflowCommand::CreateSchedule {
            student_id,
            title,
            start_time,
            end_time,
        } => create_schedule(handle, &student_id, &title, &start_time, &end_time),
        WorkflowCommand::UpdateSchedule { schedule_id, patch } => {
            update_schedule(handle, &schedule_id, move |_| Ok(patch))
        }
        WorkflowCommand::DeleteSchedule { schedule_id } => delete_schedule(handle, &schedule_id),
        WorkflowCommand::CreateGroup {
            group_name,
            purpose,
            leader_student_id,
        } => create_group(handle, &group_name, &purpose, &leader_student_id),
        WorkflowCommand::ChangeGroupLeader {
            group_id,
            new_leader_student_id,
        } => change_group_leader(handle, &group_id, &new_leader_student_id),
        WorkflowCommand::DeleteGroup { group_id } => delete_group(handle, &group_id),
    };

    result.map_err(|e| ctx.tag(e))
}

/// Edit a schedule entry whose replacements are only known after the
/// current values have been shown, e.g. by prompting
///
/// No transaction is open while `replacements` runs.
///
/// # Errors
/// As [`apply_workflow_command`], plus any error raised by `replacements`.
pub fn apply_schedule_edit<F>(
    handle: &mut StoreHandle,
    schedule_id: &str,
    replacements: F,
    ctx: &EngineContext,
) -> Result<WorkflowOutcome>
where
    F: FnOnce(&ScheduleEntry) -> Result<SchedulePatch>,
{
    tracing::debug!(
        workflow = WorkflowKind::UpdateSchedule.as_str(),
        request_id = %ctx.request.request_id,
        origin = ctx.request.origin.as_str(),
        "Applying interactive schedule edit"
    );
    update_schedule(handle, schedule_id, replacements).map_err(|e| ctx.tag(e))
}
