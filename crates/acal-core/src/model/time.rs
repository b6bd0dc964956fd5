//! Calendar time values exchanged with the store as text
//!
//! The store holds schedule times as `YYYY-MM-DD HH:MM` text and event dates
//! as `YYYY-MM-DD` text. These types own the parsing so that malformed input
//! is rejected before a statement is bound.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::InputError;
use crate::rules::parse_integer;

/// Textual timestamp format used on every write path and re-rendered on reads
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A schedule timestamp with minute precision (24-hour clock)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarTimestamp(NaiveDateTime);

impl CalendarTimestamp {
    /// Parse `YYYY-MM-DD HH:MM`; `field` names the input in the error
    pub fn parse(field: &str, raw: &str) -> Result<Self, InputError> {
        let trimmed = raw.trim();
        NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT)
            .map(Self)
            .map_err(|_| InputError::MalformedTimestamp {
                field: field.to_string(),
                value: raw.to_string(),
            })
    }

    /// Canonical text form bound to the store
    pub fn to_store_text(&self) -> String {
        self.0.format(TIMESTAMP_FORMAT).to_string()
    }
}

impl fmt::Display for CalendarTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

/// A calendar month given as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearMonth {
    first_day: NaiveDate,
}

impl YearMonth {
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let malformed = || InputError::MalformedYearMonth {
            value: raw.to_string(),
        };
        let trimmed = raw.trim();
        // Exactly YYYY-MM; chrono alone would also accept single-digit months.
        let (year, month) = trimmed.split_once('-').ok_or_else(malformed)?;
        let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if year.len() != 4 || month.len() != 2 || !digits(year) || !digits(month) {
            return Err(malformed());
        }
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_day| Self { first_day })
            .ok_or_else(malformed)
    }

    /// Inclusive lower bound of the month
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Exclusive upper bound: the first day of the following month
    pub fn next_month_first_day(&self) -> NaiveDate {
        // Adding one month to a first-of-month date cannot overflow the day.
        self.first_day
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX)
    }

    /// `YYYY-MM-DD` text of the first day, as bound to the store
    pub fn first_day_text(&self) -> String {
        self.first_day.format(DATE_FORMAT).to_string()
    }

    pub fn next_month_first_day_text(&self) -> String {
        self.next_month_first_day().format(DATE_FORMAT).to_string()
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// Academic term code such as `202502` (year followed by term number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcademicTerm(i64);

impl AcademicTerm {
    pub const fn new(code: i64) -> Self {
        Self(code)
    }

    /// Parse a term from dispatcher text; non-numeric input is rejected
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        parse_integer("term", raw).map(Self)
    }

    pub fn code(&self) -> i64 {
        self.0
    }
}

impl Default for AcademicTerm {
    fn default() -> Self {
        Self(202502)
    }
}

impl fmt::Display for AcademicTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
