//! Error facility shared by every acal crate
//!
//! `ExError` is the only error type that crosses a crate boundary. Input
//! problems are first described by `InputError` and converted on the way out.

use acal_core_types::RequestId;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExError>;

/// Failure classes with stable codes for the dispatcher and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    /// The store cannot be opened or is not a database
    Connection,
    /// Caller input rejected before it reached the store
    Validation,
    /// A targeted lookup matched nothing
    NotFound,
    /// The store rejected a statement (constraint, syntax, lock timeout)
    Execution,
    /// Configuration file or value unusable
    Config,
    /// Terminal or file I/O
    Io,
    /// Broken invariant inside acal itself
    Internal,
}

impl ExErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Connection => "ERR_CONNECTION",
            ExErrorKind::Validation => "ERR_VALIDATION",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Execution => "ERR_EXECUTION",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Classified error plus where it happened
///
/// Built with `ExError::new(kind)` and the `with_*` methods; the store and
/// engine add `op`, `entity_id` and `request_id` as the error travels out.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    message: String,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    cause: Option<Box<ExError>>,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            message: String::new(),
            op: None,
            entity_id: None,
            request_id: None,
            cause: None,
        }
    }

    /// Store statement, workflow, or parser that failed
    pub fn with_op(self, op: impl Into<String>) -> Self {
        Self {
            op: Some(op.into()),
            ..self
        }
    }

    /// Key, field, or path the failure is about
    pub fn with_entity_id(self, entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: Some(entity_id.into()),
            ..self
        }
    }

    pub fn with_request_id(self, request_id: RequestId) -> Self {
        Self {
            request_id: Some(request_id),
            ..self
        }
    }

    pub fn with_message(self, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..self
        }
    }

    /// Chain the error this one was raised while handling
    pub fn with_source(self, cause: ExError) -> Self {
        Self {
            cause: Some(Box::new(cause)),
            ..self
        }
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.cause.as_deref()
    }
}

/// `[CODE] op: message (entity) <- cause`, request id last when known
impl fmt::Display for ExError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.code())?;
        match (&self.op, self.message.is_empty()) {
            (Some(op), false) => write!(f, " {}: {}", op, self.message)?,
            (Some(op), true) => write!(f, " {} failed", op)?,
            (None, false) => write!(f, " {}", self.message)?,
            (None, true) => {}
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " ({})", entity_id)?;
        }
        if let Some(cause) = &self.cause {
            write!(f, " <- {}", cause)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " [request {}]", request_id.short())?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

/// Malformed caller input, detected before anything reaches the store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// Timestamp does not match `YYYY-MM-DD HH:MM`
    #[error("Invalid {field} timestamp '{value}': expected YYYY-MM-DD HH:MM")]
    MalformedTimestamp { field: String, value: String },

    /// Year-month does not match `YYYY-MM`
    #[error("Invalid year-month '{value}': expected YYYY-MM")]
    MalformedYearMonth { value: String },

    /// A numeric field received non-numeric text
    #[error("Invalid {field} '{value}': expected an integer")]
    NotAnInteger { field: String, value: String },

    /// A required field was empty
    #[error("Missing value for {field}")]
    MissingValue { field: String },

    /// Argument count does not match the query's declared parameters
    #[error("Query {query} takes {expected} argument(s), got {actual}")]
    ArityMismatch {
        query: String,
        expected: usize,
        actual: usize,
    },

    /// Argument kind does not match the declared parameter kind
    #[error("Query {query} parameter {position} expects {expected}, got {actual}")]
    ArgumentKindMismatch {
        query: String,
        position: usize,
        expected: String,
        actual: String,
    },

    /// Selection code not known to the dispatcher
    #[error("Unknown selection '{code}'")]
    UnknownSelection { code: String },
}

impl From<InputError> for ExError {
    fn from(err: InputError) -> Self {
        let base = ExError::new(ExErrorKind::Validation).with_message(err.to_string());
        match err {
            InputError::MalformedTimestamp { field, .. } => {
                base.with_op("parse_timestamp").with_entity_id(field)
            }
            InputError::MalformedYearMonth { .. } => base.with_op("parse_year_month"),
            InputError::NotAnInteger { field, .. } => {
                base.with_op("parse_integer").with_entity_id(field)
            }
            InputError::MissingValue { field } => {
                base.with_op("require_value").with_entity_id(field)
            }
            InputError::ArityMismatch { query, .. }
            | InputError::ArgumentKindMismatch { query, .. } => {
                base.with_op("bind").with_entity_id(query)
            }
            InputError::UnknownSelection { code } => {
                base.with_op("dispatch").with_entity_id(code)
            }
        }
    }
}
