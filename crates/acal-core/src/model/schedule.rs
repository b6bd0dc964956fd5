//! Personal schedule entries and partial edits

use serde::{Deserialize, Serialize};

use super::time::CalendarTimestamp;
use crate::errors::InputError;
use crate::rules::{optional_value, require_value};

/// A schedule row as read back from the store, times rendered as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub schedule_id: i64,
    pub title: String,
    /// `YYYY-MM-DD HH:MM`
    pub start_time: String,
    /// `YYYY-MM-DD HH:MM`
    pub end_time: String,
}

/// Validated input for the create-schedule workflow
///
/// `end` is not checked against `start`; ordering is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSchedule {
    pub student_id: String,
    pub title: String,
    pub start: CalendarTimestamp,
    pub end: CalendarTimestamp,
}

impl NewSchedule {
    /// Validate raw dispatcher fields
    ///
    /// # Errors
    /// `MissingValue` for a blank student id, `MalformedTimestamp` for either
    /// time that is not `YYYY-MM-DD HH:MM`.
    pub fn parse(
        student_id: &str,
        title: &str,
        start_time: &str,
        end_time: &str,
    ) -> Result<Self, InputError> {
        let student_id = require_value("student_id", student_id)?.to_string();
        let start = CalendarTimestamp::parse("start_time", start_time)?;
        let end = CalendarTimestamp::parse("end_time", end_time)?;
        Ok(Self {
            student_id,
            title: title.to_string(),
            start,
            end,
        })
    }
}

/// Replacement values for an existing entry; blank means "keep current"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePatch {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
}

impl SchedulePatch {
    pub fn new(
        title: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    /// Patch that keeps every field
    pub fn keep_all() -> Self {
        Self::default()
    }

    /// Merge into `current` field by field
    ///
    /// Each blank replacement independently keeps the current value.
    /// Supplied times are validated and normalised; retained times are
    /// passed through as the store rendered them.
    ///
    /// # Errors
    /// `MalformedTimestamp` when a supplied time is not `YYYY-MM-DD HH:MM`.
    pub fn merge(&self, current: &ScheduleEntry) -> Result<MergedSchedule, InputError> {
        let title = match optional_value(&self.title) {
            Some(_) => self.title.clone(),
            None => current.title.clone(),
        };
        let start_time = match optional_value(&self.start_time) {
            Some(raw) => CalendarTimestamp::parse("start_time", raw)?.to_store_text(),
            None => current.start_time.clone(),
        };
        let end_time = match optional_value(&self.end_time) {
            Some(raw) => CalendarTimestamp::parse("end_time", raw)?.to_store_text(),
            None => current.end_time.clone(),
        };

        Ok(MergedSchedule {
            schedule_id: current.schedule_id,
            title,
            start_time,
            end_time,
        })
    }
}

/// The triple written back by the update-schedule workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedSchedule {
    pub schedule_id: i64,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
}

impl MergedSchedule {
    /// Whether the merge changed nothing
    pub fn is_unchanged_from(&self, current: &ScheduleEntry) -> bool {
        self.title == current.title
            && self.start_time == current.start_time
            && self.end_time == current.end_time
    }
}
