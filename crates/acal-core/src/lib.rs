//! acal core - error facility, logging facility and calendar record model
//!
//! This crate holds everything the query and workflow layers share that does
//! not touch the store:
//! - Canonical error facility (`ExError`, `ExErrorKind`) and input errors
//! - Structured logging facility (`init`, `log_op_*` macros, test capture)
//! - Schedule and study-group records, timestamp and term parsing
//! - Field-by-field merge of partial schedule edits

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod rules;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, InputError, Result};
pub use model::{
    AcademicTerm, CalendarTimestamp, LeaderChange, MergedSchedule, NewSchedule, NewStudentGroup,
    ScheduleEntry, SchedulePatch, YearMonth,
};
