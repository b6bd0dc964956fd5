//! Transaction scope for mutation workflows
//!
//! A workflow body runs against an open transaction and decides whether to
//! commit or roll back. An error from the body rolls back before it is
//! returned, so no transaction outlives the call.

#![allow(clippy::result_large_err)]

use crate::db::StoreHandle;
use crate::errors::{rollback_failed, store_error, Result};
use crate::workflows::{CommitReceipt, Failure, WorkflowKind, WorkflowOutcome};
use rusqlite::{Transaction, TransactionBehavior};
use std::fmt;

/// Lifecycle of one workflow invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    ValidatingInput,
    Executing,
    Committed,
    RolledBack,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::ValidatingInput => "validating_input",
            WorkflowState::Executing => "executing",
            WorkflowState::Committed => "committed",
            WorkflowState::RolledBack => "rolled_back",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Committed | WorkflowState::RolledBack)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records and logs state transitions of one invocation
#[derive(Debug)]
pub struct StateTracker {
    workflow: WorkflowKind,
    state: WorkflowState,
    history: Vec<WorkflowState>,
}

impl StateTracker {
    pub fn new(workflow: WorkflowKind) -> Self {
        Self {
            workflow,
            state: WorkflowState::Idle,
            history: vec![WorkflowState::Idle],
        }
    }

    pub fn advance(&mut self, next: WorkflowState) {
        tracing::debug!(
            workflow = self.workflow.as_str(),
            from = self.state.as_str(),
            state = next.as_str(),
            "Workflow state transition"
        );
        self.state = next;
        self.history.push(next);
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Every state visited, starting with `Idle`
    pub fn history(&self) -> &[WorkflowState] {
        &self.history
    }

    pub fn workflow(&self) -> WorkflowKind {
        self.workflow
    }
}

/// What the body asks the scope to do with the open transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxDecision {
    Commit(CommitReceipt),
    Rollback(Failure),
}

/// Run `body` inside an immediate transaction
///
/// `Commit` commits and reports `Committed`; `Rollback` rolls back and
/// reports `RolledBack`. An `Err` from the body is returned after an
/// explicit rollback; if that rollback fails too, the rollback error is
/// returned with the original attached as its source.
///
/// # Errors
/// Failure to begin or commit, or any error raised by `body`.
pub fn run_in_transaction<F>(
    handle: &mut StoreHandle,
    tracker: &mut StateTracker,
    body: F,
) -> Result<WorkflowOutcome>
where
    F: FnOnce(&Transaction<'_>) -> Result<TxDecision>,
{
    let op = tracker.workflow().as_str();
    tracker.advance(WorkflowState::Executing);

    let tx = match handle
        .connection_mut()
        .transaction_with_behavior(TransactionBehavior::Immediate)
    {
        Ok(tx) => tx,
        Err(e) => {
            tracker.advance(WorkflowState::RolledBack);
            return Err(store_error(op, e).with_message("Failed to start transaction"));
        }
    };

    match body(&tx) {
        Ok(TxDecision::Commit(receipt)) => {
            // A failed COMMIT drops the transaction, which rolls it back.
            if let Err(e) = tx.commit() {
                tracker.advance(WorkflowState::RolledBack);
                return Err(store_error(op, e));
            }
            tracker.advance(WorkflowState::Committed);
            tracing::debug!(
                workflow = op,
                key = receipt.key,
                rows_affected = receipt.rows_affected,
                "Transaction committed"
            );
            Ok(WorkflowOutcome::Committed(receipt))
        }
        Ok(TxDecision::Rollback(failure)) => {
            tx.rollback().map_err(|e| store_error(op, e))?;
            tracker.advance(WorkflowState::RolledBack);
            tracing::debug!(
                workflow = op,
                reason = failure.reason.as_str(),
                "Transaction rolled back"
            );
            Ok(WorkflowOutcome::RolledBack(failure))
        }
        Err(err) => {
            let rollback = tx.rollback();
            tracker.advance(WorkflowState::RolledBack);
            match rollback {
                Ok(()) => {
                    tracing::debug!(
                        workflow = op,
                        err_code = err.code(),
                        "Transaction rolled back after error"
                    );
                    Err(err)
                }
                Err(e) => Err(rollback_failed(op, err, e)),
            }
        }
    }
}
