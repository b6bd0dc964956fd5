//! Correlation of log events and errors with the command that caused them

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of one dispatched command (UUIDv7, so ids sort by creation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Accept an id handed over by another process, e.g. from a log line
    ///
    /// # Errors
    /// When `raw` is not a UUID.
    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw.trim()).map(Self)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Last 12 hex digits; enough to tell commands of one session apart
    pub fn short(&self) -> String {
        let simple = self.0.simple().to_string();
        simple[simple.len() - 12..].to_string()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Who asked for a command, and under which id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: RequestId,
    /// Menu, subcommand, or library caller that produced the request
    pub origin: String,
}

impl RequestContext {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            origin: origin.into(),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new("library")
    }
}
