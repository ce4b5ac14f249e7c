//! Fixed-width pipe-delimited summary tables.
//!
//! Cells of the form `name (L:<line>)` sort numerically by line within the
//! same name; everything else sorts lexicographically. A table that cannot
//! be assembled from a rule's findings degrades to an empty string; a
//! rendering problem never fails the run.

use crate::core::{Finding, Rule, TableColumn, TableSpec};
use serde_json::Value;
use tracing::debug;

/// Sort key for one cell: the name part plus the parsed line number when
/// the cell carries a `(L:<int>)` suffix.
fn cell_sort_key(cell: &str) -> (String, Option<u64>) {
    if let Some((name, rest)) = cell.split_once(" (L:") {
        if let Some(line) = rest.strip_suffix(')').and_then(|n| n.parse::<u64>().ok()) {
            return (name.to_string(), Some(line));
        }
    }
    (cell.to_string(), None)
}

/// Render header + rows as a markdown-style table, rows sorted by the
/// designated column. Empty input renders as an empty string.
pub fn render_table(headers: &[&str], mut rows: Vec<Vec<String>>, sort_by: usize) -> String {
    if rows.is_empty() {
        return String::new();
    }

    rows.sort_by(|a, b| {
        let left = a.get(sort_by).map(|c| cell_sort_key(c));
        let right = b.get(sort_by).map(|c| cell_sort_key(c));
        left.cmp(&right)
    });

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() && cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    let mut out = String::new();
    let format_row = |cells: &[String], out: &mut String| {
        out.push('|');
        for (i, cell) in cells.iter().enumerate() {
            let width = widths.get(i).copied().unwrap_or(cell.len());
            out.push_str(&format!(" {:<width$} |", cell, width = width));
        }
        out.push('\n');
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    format_row(&header_cells, &mut out);
    out.push('|');
    for width in &widths {
        out.push_str(&"-".repeat(width + 2));
        out.push('|');
    }
    out.push('\n');
    for row in &rows {
        format_row(row, &mut out);
    }
    out.push('\n');
    out
}

fn build_row(finding: &Finding, columns: &[TableColumn]) -> Option<Vec<String>> {
    let element = finding.first_element()?;
    let mut row = Vec::with_capacity(columns.len());
    for column in columns {
        let cell = match column {
            TableColumn::File => {
                let file = element
                    .source_mapping
                    .filename_short
                    .rsplit('/')
                    .next()
                    .unwrap_or_default();
                let line = element.source_mapping.first_line()?;
                format!("{} (L:{})", file, line)
            }
            TableColumn::Contract => element.parent_name()?.to_string(),
            TableColumn::Function => format!("{}()", element.name),
            TableColumn::Version => element.name.clone(),
            TableColumn::Modifiers => match finding.additional_fields.get("modifiers") {
                Some(Value::Array(names)) => names
                    .iter()
                    .filter_map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                _ => String::new(),
            },
        };
        row.push(cell);
    }
    Some(row)
}

/// The per-rule summary table, built from each finding's first source
/// element according to the rule's declared spec. `None` when the rule
/// carries no table capability.
pub fn summary_table(rule: &dyn Rule, findings: &[Finding]) -> Option<String> {
    let spec = rule.table_spec()?;
    let headers: Vec<&str> = spec.columns.iter().map(|c| c.header()).collect();

    let mut rows = Vec::new();
    for finding in findings {
        match build_row(finding, &spec.columns) {
            Some(row) => rows.push(row),
            None => {
                // Missing element data: degrade this table, keep the run.
                debug!(rule = rule.id(), "summary table row could not be built");
                return Some(String::new());
            }
        }
    }
    Some(render_table(&headers, rows, spec.sort_by))
}
