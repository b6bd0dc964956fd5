//! Catalog query command
//!
//! Usage: acal query <NAME|NUMBER> [ARGS]...

use super::{io_error, Session};
use crate::render::write_catalog_outcome;
use acal_core::{InputError, Result};
use acal_engine::{apply_catalog_query, CatalogQuery};
use acal_store::QueryId;
use clap::Args;
use std::io::Write;

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Query name (e.g. students_by_department) or catalog number 1-14
    pub name: String,

    /// Positional arguments, in catalog order
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Execute query command
pub fn execute<W: Write>(args: QueryArgs, session: &Session, out: &mut W) -> Result<()> {
    let id = resolve(&args.name)?;
    let raw: Vec<&str> = args.args.iter().map(String::as_str).collect();
    run(session, id, &raw, "cli:query", out)
}

/// Look a query up by catalog name or number
pub fn resolve(name: &str) -> Result<QueryId> {
    let name = name.trim();
    QueryId::from_name(name)
        .or_else(|| name.parse::<u8>().ok().and_then(QueryId::from_number))
        .ok_or_else(|| {
            InputError::UnknownSelection {
                code: name.to_string(),
            }
            .into()
        })
}

/// Build, apply and print one catalog query
pub(crate) fn run<W: Write>(
    session: &Session,
    id: QueryId,
    raw: &[&str],
    origin: &str,
    out: &mut W,
) -> Result<()> {
    let query = CatalogQuery::from_raw(id, raw)?;
    let outcome = apply_catalog_query(&session.handle, &query, &session.request(origin))?;
    write_catalog_outcome(out, &outcome).map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use acal_core::ExErrorKind;

    #[test]
    fn test_resolve_by_name_and_number() {
        assert_eq!(resolve("enrolled_union").unwrap(), QueryId::EnrolledUnion);
        assert_eq!(resolve("11").unwrap(), QueryId::EnrolledUnion);
        assert_eq!(resolve(" 14 ").unwrap(), QueryId::StudentSchedules);
    }

    #[test]
    fn test_resolve_unknown() {
        for name in ["0", "15", "everything", ""] {
            let err = resolve(name).unwrap_err();
            assert_eq!(err.kind(), ExErrorKind::Validation, "{}", name);
        }
    }
}
