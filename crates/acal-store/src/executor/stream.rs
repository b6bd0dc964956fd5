//! Prepared statements and lazy row streams

use super::value::{Arg, Record, Value};
use crate::catalog::QueryId;
use crate::errors::{store_error, Result};
use acal_core::errors::{ExError, ExErrorKind};
use rusqlite::{params_from_iter, Row, Rows, Statement};
use std::rc::Rc;

/// A catalog statement prepared on the store, ready to run once
pub struct PreparedQuery<'conn> {
    query: QueryId,
    stmt: Statement<'conn>,
    args: Vec<Arg>,
    columns: Rc<[String]>,
    started: bool,
}

impl<'conn> PreparedQuery<'conn> {
    pub(crate) fn new(query: QueryId, stmt: Statement<'conn>, args: Vec<Arg>) -> Self {
        let columns: Rc<[String]> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>()
            .into();
        Self {
            query,
            stmt,
            args,
            columns,
            started: false,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Execute and return the rows; a prepared query runs at most once
    ///
    /// # Errors
    /// `Internal` when called a second time, `Execution` (or whatever the
    /// store reports) when execution fails.
    pub fn rows(&mut self) -> Result<RowStream<'_>> {
        if self.started {
            return Err(ExError::new(ExErrorKind::Internal)
                .with_op(self.query.name())
                .with_message("row stream already consumed"));
        }
        self.started = true;

        let op = self.query.name();
        let rows = self
            .stmt
            .query(params_from_iter(self.args.iter()))
            .map_err(|e| store_error(op, e))?;

        Ok(RowStream {
            op,
            rows,
            columns: Rc::clone(&self.columns),
            finished: false,
        })
    }
}

/// Single-pass iterator over result rows, fetched on demand
///
/// Ends after the first error.
pub struct RowStream<'stmt> {
    op: &'static str,
    rows: Rows<'stmt>,
    columns: Rc<[String]>,
    finished: bool,
}

impl Iterator for RowStream<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let op = self.op;
        let item = match self.rows.next() {
            Ok(Some(row)) => read_record(row, &self.columns).map_err(|e| store_error(op, e)),
            Ok(None) => {
                self.finished = true;
                return None;
            }
            Err(e) => Err(store_error(op, e)),
        };
        if item.is_err() {
            self.finished = true;
        }
        Some(item)
    }
}

fn read_record(row: &Row<'_>, columns: &Rc<[String]>) -> rusqlite::Result<Record> {
    let values = (0..columns.len())
        .map(|i| row.get_ref(i).map(Value::from))
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(Record::new(Rc::clone(columns), values))
}
