//! Bound arguments and returned values

use crate::catalog::ParamKind;
use acal_core::errors::InputError;
use acal_core::rules::parse_integer;
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use std::fmt;
use std::rc::Rc;

/// A positional argument on its way to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Text(String),
    Integer(i64),
}

impl Arg {
    /// Convert raw dispatcher text into an argument of the declared kind
    ///
    /// Year-month text passes through unchanged; [`crate::bind`] checks it.
    ///
    /// # Errors
    /// `NotAnInteger` for a non-numeric integer parameter.
    pub fn parse(kind: ParamKind, field: &str, raw: &str) -> Result<Self, InputError> {
        match kind {
            ParamKind::Text | ParamKind::YearMonth => Ok(Arg::Text(raw.trim().to_string())),
            ParamKind::Integer => parse_integer(field, raw).map(Arg::Integer),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Arg::Text(value.into())
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Arg::Text(_) => "text",
            Arg::Integer(_) => "integer",
        }
    }

    /// Whether this is blank text, which optional predicates treat as absent
    pub fn is_blank(&self) -> bool {
        matches!(self, Arg::Text(text) if text.trim().is_empty())
    }
}

impl ToSql for Arg {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Arg::Text(text) => text.to_sql(),
            Arg::Integer(value) => value.to_sql(),
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Text(text) => write!(f, "{}", text),
            Arg::Integer(value) => write!(f, "{}", value),
        }
    }
}

/// A single column value read back from the store
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(v) => Value::Integer(v),
            ValueRef::Real(v) => Value::Real(v),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                Value::Text(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

/// One result row; column names are shared by every row of a query
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    columns: Rc<[String]>,
    values: Vec<Value>,
}

impl Record {
    pub(crate) fn new(columns: Rc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Look up a value by column name
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_text)
    }

    pub fn integer(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_integer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_kind() {
        assert_eq!(
            Arg::parse(ParamKind::Integer, "min_count", " 3 "),
            Ok(Arg::Integer(3))
        );
        assert_eq!(
            Arg::parse(ParamKind::Text, "dept_id", "CSE"),
            Ok(Arg::text("CSE"))
        );
        assert!(matches!(
            Arg::parse(ParamKind::Integer, "term", "fall"),
            Err(InputError::NotAnInteger { .. })
        ));
        assert_eq!(
            Arg::parse(ParamKind::YearMonth, "year_month", " 2025-05 "),
            Ok(Arg::text("2025-05"))
        );
    }

    #[test]
    fn test_record_lookup_by_column() {
        let columns: Rc<[String]> = vec!["name".to_string(), "cnt".to_string()].into();
        let record = Record::new(
            columns,
            vec![Value::Text("Kim".to_string()), Value::Integer(4)],
        );
        assert_eq!(record.text("name"), Some("Kim"));
        assert_eq!(record.integer("cnt"), Some(4));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_null_renders_empty() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Real(1.5).to_string(), "1.5");
    }
}
