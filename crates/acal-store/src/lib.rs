//! acal store - SQLite store handle, query catalog and transactional workflows
//!
//! Provides:
//! - `StoreHandle`: the single, explicitly passed connection with manual
//!   transaction control
//! - The read-only query catalog, a query builder for optional predicates,
//!   and a binder/executor producing lazy row streams
//! - Mutation workflows for schedules and study groups, each bracketed by an
//!   explicit transaction that commits on success and rolls back otherwise
//!
//! The schema is assumed to exist; nothing here issues DDL.

pub mod catalog;
pub mod config;
pub mod db;
pub mod errors;
pub mod executor;
pub mod tx;
pub mod workflows;

// Re-export key types
pub use catalog::{CatalogEntry, ParamKind, QueryBuilder, QueryId};
pub use config::{CatalogConfig, StoreConfig};
pub use db::{CountedTable, StoreHandle};
pub use errors::Result;
pub use executor::{bind, Arg, BoundQuery, QueryExecutor, Record, ResultSet, RowStream, Value};
pub use tx::{StateTracker, TxDecision, WorkflowState};
pub use workflows::{CommitReceipt, Failure, FailureReason, WorkflowKind, WorkflowOutcome};
