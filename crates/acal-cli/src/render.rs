//! Plain-text rendering of engine outcomes

use acal_engine::CatalogOutcome;
use acal_store::{ResultSet, WorkflowOutcome};
use std::io::{self, Write};

/// Left-aligned table, columns as wide as their widest cell
pub fn write_table<W: Write>(out: &mut W, rows: &ResultSet) -> io::Result<()> {
    let mut widths: Vec<usize> = rows.columns.iter().map(|c| c.chars().count()).collect();
    let cells: Vec<Vec<String>> = rows
        .rows
        .iter()
        .map(|record| record.values().iter().map(|v| v.to_string()).collect())
        .collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_line(out, &rows.columns, &widths)?;
    let rule: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    writeln!(out, "{}", "-".repeat(rule))?;
    for row in &cells {
        write_line(out, row, &widths)?;
    }
    Ok(())
}

fn write_line<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", line.trim_end())
}

pub fn write_catalog_outcome<W: Write>(out: &mut W, outcome: &CatalogOutcome) -> io::Result<()> {
    match outcome {
        CatalogOutcome::NoMatch { query } => {
            writeln!(out, "No match for {}.", query.entry().title.to_lowercase())
        }
        CatalogOutcome::Rows(rows) if rows.is_empty() => writeln!(out, "(no rows)"),
        CatalogOutcome::Rows(rows) => write_table(out, rows),
        CatalogOutcome::Counted { rows, total } => {
            write_table(out, rows)?;
            writeln!(out, "Total: {}", total)
        }
    }
}

pub fn write_workflow_outcome<W: Write>(out: &mut W, outcome: &WorkflowOutcome) -> io::Result<()> {
    match outcome {
        WorkflowOutcome::Committed(receipt) => writeln!(
            out,
            "✓ {} committed (id {}, {} row(s))",
            receipt.workflow, receipt.key, receipt.rows_affected
        ),
        WorkflowOutcome::RolledBack(failure) => match failure.key {
            Some(key) => writeln!(
                out,
                "✗ {} rolled back for id {}: {}",
                failure.workflow,
                key,
                failure.reason.as_str()
            ),
            None => writeln!(
                out,
                "✗ {} rolled back: {}",
                failure.workflow,
                failure.reason.as_str()
            ),
        },
    }
}
