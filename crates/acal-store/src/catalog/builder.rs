//! Query builder for optional predicates
//!
//! Composes a catalog entry's base statement with predicates that are only
//! present when the caller supplied their argument. Every appended predicate
//! gets the next positional placeholder; argument values never touch the SQL
//! text.

use crate::executor::Arg;

/// Base statement plus positionally bound arguments
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    sql: String,
    args: Vec<Arg>,
    order_by: Option<&'static str>,
}

impl QueryBuilder {
    /// Start from a base statement whose placeholders `?1..?n` are bound by `args`
    pub fn new(base: &str, args: Vec<Arg>) -> Self {
        Self {
            sql: base.to_string(),
            args,
            order_by: None,
        }
    }

    /// Append `AND {lhs} ?{n}` and bind `arg` to the new placeholder
    pub fn and_where(mut self, lhs: &'static str, arg: Arg) -> Self {
        self.args.push(arg);
        self.sql.push_str(&format!(" AND {} ?{}", lhs, self.args.len()));
        self
    }

    /// Append `ORDER BY` after all predicates
    pub fn order_by(mut self, columns: &'static str) -> Self {
        self.order_by = Some(columns);
        self
    }

    pub fn build(self) -> (String, Vec<Arg>) {
        let mut sql = self.sql;
        if let Some(columns) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(columns);
        }
        (sql, self.args)
    }
}
