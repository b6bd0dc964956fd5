//! Operation logging macros
//!
//! Every catalog query and workflow brackets its work with these so that a
//! single `op` can be followed from `start` to `end` or `end_error`.
//! Callers must depend on `acal-core-types` (event names) and `tracing`.

/// Emit one operation event at `$level`; not for direct use
#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event
            $(, $($field)*)?
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use acal_core::log_op_start;
/// log_op_start!("students_by_department");
/// log_op_start!("update_schedule", schedule_id = 7);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            acal_core_types::schema::EVENT_START
            $(, $($field)*)?
        )
    };
}

/// Log the successful end of an operation; `duration_ms` is mandatory
///
/// ```
/// # use acal_core::log_op_end;
/// log_op_end!("students_by_department", duration_ms = 3, row_count = 2);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            acal_core_types::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Log the failed end of an operation with the error's kind and code
///
/// The error is borrowed, so the caller can still return it.
///
/// ```
/// # use acal_core::{log_op_error, errors::{ExError, ExErrorKind}};
/// let err = ExError::new(ExErrorKind::Execution).with_message("locked");
/// log_op_error!("create_schedule", err, duration_ms = 10);
/// assert_eq!(err.code(), "ERR_EXECUTION");
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let failed: &$crate::errors::ExError = &$err;
        $crate::__log_op_event!(
            error,
            $op,
            acal_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?failed.kind(),
            err_code = failed.code()
            $(, $($field)*)?
        )
    }};
}
