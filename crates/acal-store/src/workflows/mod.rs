//! Mutation workflows
//!
//! Each workflow validates raw dispatcher input, then writes inside one
//! transaction via [`crate::tx::run_in_transaction`]. Zero matched or
//! affected rows is an expected outcome (`RolledBack`), not an error.

#![allow(clippy::result_large_err)]

pub mod group;
pub mod schedule;

pub use group::{change_group_leader, create_group, delete_group};
pub use schedule::{create_schedule, delete_schedule, read_schedule, update_schedule};

use crate::errors::Result;
use crate::tx::{StateTracker, WorkflowState};
use acal_core::{log_op_end, log_op_error, log_op_start};
use std::fmt;
use std::time::Instant;

/// The six mutation workflows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowKind {
    CreateSchedule,
    UpdateSchedule,
    DeleteSchedule,
    CreateGroup,
    ChangeGroupLeader,
    DeleteGroup,
}

impl WorkflowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowKind::CreateSchedule => "create_schedule",
            WorkflowKind::UpdateSchedule => "update_schedule",
            WorkflowKind::DeleteSchedule => "delete_schedule",
            WorkflowKind::CreateGroup => "create_group",
            WorkflowKind::ChangeGroupLeader => "change_group_leader",
            WorkflowKind::DeleteGroup => "delete_group",
        }
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proof of a committed workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    pub workflow: WorkflowKind,
    /// Id of the schedule entry or study group written
    pub key: i64,
    pub rows_affected: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The targeted row does not exist
    NotFound,
    /// The write statement changed nothing
    NoRowsAffected,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::NotFound => "not_found",
            FailureReason::NoRowsAffected => "no_rows_affected",
        }
    }
}

/// A workflow that ran to completion without committing anything
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub workflow: WorkflowKind,
    /// Targeted id, when the workflow had one
    pub key: Option<i64>,
    pub reason: FailureReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    Committed(CommitReceipt),
    RolledBack(Failure),
}

impl WorkflowOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, WorkflowOutcome::Committed(_))
    }

    pub fn receipt(&self) -> Option<&CommitReceipt> {
        match self {
            WorkflowOutcome::Committed(receipt) => Some(receipt),
            WorkflowOutcome::RolledBack(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            WorkflowOutcome::Committed(_) => None,
            WorkflowOutcome::RolledBack(failure) => Some(failure),
        }
    }
}

/// Wrap one workflow invocation in start/end logging
///
/// An error raised before the transaction began still ends the invocation
/// in `RolledBack`.
pub(crate) fn instrumented<F>(kind: WorkflowKind, body: F) -> Result<WorkflowOutcome>
where
    F: FnOnce(&mut StateTracker) -> Result<WorkflowOutcome>,
{
    let op = kind.as_str();
    let start = Instant::now();
    log_op_start!(op);

    let mut tracker = StateTracker::new(kind);
    let result = body(&mut tracker);
    if !tracker.state().is_terminal() {
        tracker.advance(WorkflowState::RolledBack);
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(outcome) => {
            log_op_end!(
                op,
                duration_ms = duration_ms,
                state = tracker.state().as_str(),
                committed = outcome.is_committed()
            );
        }
        Err(e) => log_op_error!(op, e, duration_ms = duration_ms),
    }
    result
}
