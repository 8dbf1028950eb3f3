//! Extraction from multi-row consolidated reports with a header at an
//! unknown offset.

use crate::error::ProcessError;
use crate::grid::{Cell, Grid};
use crate::trace::ParseTrace;
use crate::types::InvoiceRecord;

use super::parse_number;

/// A located header: its row index and the raw cell labels.
struct HeaderRow {
    index: usize,
    labels: Vec<String>,
}

type HeaderStrategy = fn(&Grid) -> Option<HeaderRow>;

/// Header discovery strategies, tried in order, first success wins.
/// Kept as a flat list on purpose: each entry is an independent
/// predicate-and-locate function, not a branch of the next one.
const HEADER_STRATEGIES: &[(&str, HeaderStrategy)] = &[
    ("header-keywords", find_by_keywords),
    ("data-row-backtrack", find_by_data_row),
    ("first-wide-row", find_by_width),
];

/// Column labels any real header row carries somewhere.
const HEADER_KEYWORDS: &[&str] = &["invoice", "date", "ntn", "name"];

/// Rows whose first cell is one of these are decoration or summary lines,
/// never invoices. Exact, case-sensitive.
const SKIP_MARKERS: &[&str] = &["*", "TOTAL", "Gross Amount"];

/// Keyword each target field looks for in the header labels, and the
/// positional column used when no label matches.
const FIELD_COLUMNS: &[(&str, usize)] = &[
    ("invoice", 0),
    ("date", 1),
    ("ntn", 2),
    ("name", 3),
    ("quantity", 4),
    ("quantity-a", 5),
    ("exclusive", 6),
    ("sales", 7),
    ("%", 8),
    ("code", 9),
];

/// Extract zero or more records from a consolidated report grid.
/// Fails only when no header row can be located by any strategy.
pub fn extract_consolidated(
    grid: &Grid,
    trace: &mut ParseTrace,
) -> Result<Vec<InvoiceRecord>, ProcessError> {
    let mut header = None;
    for (name, locate) in HEADER_STRATEGIES {
        if let Some(found) = locate(grid) {
            trace.note(
                "header-strategy",
                format!("{} matched row {}", name, found.index),
            );
            header = Some(found);
            break;
        }
    }
    let header = header.ok_or(ProcessError::HeaderNotFound)?;

    let labels: Vec<String> = header
        .labels
        .iter()
        .map(|l| l.replace('*', "").trim().to_string())
        .collect();
    let columns = resolve_columns(&labels);

    let mut records = Vec::new();
    for (i, row) in grid.rows().iter().enumerate().skip(header.index + 1) {
        let first = row.first().map(|c| c.to_text()).unwrap_or_default();
        let first = first.trim();
        if first.is_empty() || SKIP_MARKERS.contains(&first) {
            trace.note("row-skip", format!("row {} ({:?})", i, first));
            continue;
        }

        let mut record = record_from_row(row, &columns);
        if record.invoice_no.is_empty() {
            // Header mapping came up empty for this row; rebuild the whole
            // record positionally rather than mixing the two schemes.
            trace.note("row-fallback", format!("row {} positional", i));
            record = record_from_row(row, &POSITIONAL_COLUMNS);
        }

        if record.passes_acceptance_gate() {
            records.push(record);
        } else {
            trace.note("row-reject", format!("row {} failed gate", i));
        }
    }
    trace.note("rows", format!("{} accepted", records.len()));
    Ok(records)
}

/// Resolved column index per target field, in canonical field order.
struct ColumnIndices([usize; 10]);

const POSITIONAL_COLUMNS: ColumnIndices =
    ColumnIndices([0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);

/// Map each field to the first header label containing its keyword
/// (lower-cased containment; the percentage field looks for a literal `%`),
/// falling back to the field's fixed position.
fn resolve_columns(labels: &[String]) -> ColumnIndices {
    let lowered: Vec<String> = labels.iter().map(|l| l.to_lowercase()).collect();
    let mut indices = [0usize; 10];
    for (slot, (keyword, fallback)) in FIELD_COLUMNS.iter().enumerate() {
        let found = if *keyword == "%" {
            labels.iter().position(|l| l.contains('%'))
        } else {
            lowered.iter().position(|l| l.contains(keyword))
        };
        indices[slot] = found.unwrap_or(*fallback);
    }
    ColumnIndices(indices)
}

fn record_from_row(row: &[Cell], columns: &ColumnIndices) -> InvoiceRecord {
    let text = |slot: usize| -> String {
        row.get(columns.0[slot])
            .map(|c| c.to_text())
            .unwrap_or_default()
    };
    InvoiceRecord {
        invoice_no: text(0),
        date: text(1),
        ntn: text(2),
        name: text(3),
        quantity: parse_number(&text(4)),
        quantity_a: parse_number(&text(5)),
        exclusive: parse_number(&text(6)),
        sales_tax: parse_number(&text(7)),
        percentage: parse_number(&text(8)),
        code: text(9),
    }
}

/// Primary: first row where any cell mentions one of the header keywords.
fn find_by_keywords(grid: &Grid) -> Option<HeaderRow> {
    for (i, row) in grid.rows().iter().enumerate() {
        let hit = row.iter().any(|cell| {
            let text = cell.to_text().to_lowercase();
            let text = text.trim();
            !text.is_empty() && HEADER_KEYWORDS.iter().any(|k| text.contains(k))
        });
        if hit {
            return Some(HeaderRow {
                index: i,
                labels: row.iter().map(|c| c.to_text()).collect(),
            });
        }
    }
    None
}

/// Secondary: find a row that looks like data (all-digit first cell,
/// date-like second cell) and treat the row above it as the header.
fn find_by_data_row(grid: &Grid) -> Option<HeaderRow> {
    for (i, row) in grid.rows().iter().enumerate() {
        if i == 0 || row.len() < 5 {
            continue;
        }
        let first = row[0].to_text();
        let second = row[1].to_text();
        let digits_only = !first.is_empty() && first.chars().all(|c| c.is_ascii_digit());
        if digits_only && second.contains('/') {
            return Some(HeaderRow {
                index: i - 1,
                labels: grid
                    .row(i - 1)
                    .map(|r| r.iter().map(|c| c.to_text()).collect())
                    .unwrap_or_default(),
            });
        }
    }
    None
}

/// Tertiary: among the first ten rows, the first one wide enough to be a
/// header; empty labels are synthesized.
fn find_by_width(grid: &Grid) -> Option<HeaderRow> {
    for (i, row) in grid.rows().iter().enumerate().take(10) {
        if row.len() >= 8 {
            let labels = row
                .iter()
                .enumerate()
                .map(|(j, c)| {
                    let text = c.to_text();
                    if text.is_empty() {
                        format!("Column{}", j + 1)
                    } else {
                        text
                    }
                })
                .collect();
            return Some(HeaderRow { index: i, labels });
        }
    }
    None
}
