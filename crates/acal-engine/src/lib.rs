//! acal engine - command surface over the store
//!
//! `apply_catalog_query` runs one read-only catalog query and shapes the
//! rows into a `CatalogOutcome`; `apply_workflow_command` runs one mutation
//! workflow. Both attach the caller's request id to any error they return.

pub mod commands;
pub mod context;

pub use commands::catalog_query::{apply_catalog_query, CatalogOutcome, CatalogQuery};
pub use commands::workflow_command::{
    apply_schedule_edit, apply_workflow_command, WorkflowCommand,
};
pub use context::EngineContext;
