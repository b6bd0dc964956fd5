//! Command orchestration layer.
//!
//! Translates typed commands into store calls and store results into
//! outcomes the dispatcher can render.

pub mod catalog_query;
pub mod workflow_command;
