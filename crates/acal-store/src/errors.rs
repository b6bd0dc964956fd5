//! Error handling for acal-store
//!
//! Classifies `rusqlite` failures into the canonical `ExError` kinds so that
//! no raw store error leaves this crate.

use acal_core::errors::{ExError, ExErrorKind};
use rusqlite::ErrorCode;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Classify a `rusqlite::Error` into an error kind
///
/// - open/IO/corruption failures mean the store is unreachable → `Connection`
/// - parameter binding failures are caller mistakes → `Validation`
/// - `QueryReturnedNoRows` → `NotFound`
/// - everything else the store rejected → `Execution`
pub fn classify(err: &rusqlite::Error) -> ExErrorKind {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
            ErrorCode::CannotOpen
            | ErrorCode::NotADatabase
            | ErrorCode::DatabaseCorrupt
            | ErrorCode::SystemIoFailure
            | ErrorCode::PermissionDenied => ExErrorKind::Connection,
            _ => ExErrorKind::Execution,
        },
        rusqlite::Error::InvalidParameterCount(_, _)
        | rusqlite::Error::InvalidParameterName(_)
        | rusqlite::Error::ToSqlConversionFailure(_) => ExErrorKind::Validation,
        rusqlite::Error::QueryReturnedNoRows => ExErrorKind::NotFound,
        _ => ExErrorKind::Execution,
    }
}

/// Create an error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(classify(&err))
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an error from rusqlite::Error with operation context
pub fn store_error(op: &str, err: rusqlite::Error) -> ExError {
    ExError::new(classify(&err))
        .with_op(op.to_string())
        .with_message(err.to_string())
}

/// Create a connection error for a store location
pub fn connection_error(location: &str, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Connection)
        .with_op("open_store")
        .with_entity_id(location.to_string())
        .with_message(err.to_string())
}

/// Attach a failed rollback to the error that triggered it
pub fn rollback_failed(op: &str, original: ExError, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Execution)
        .with_op(format!("{}:rollback", op))
        .with_message(err.to_string())
        .with_source(original)
}
