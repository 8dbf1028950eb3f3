//! Merging per-file records into the consolidated report and rendering it
//! back into the canonical grid shape.

use crate::grid::{Cell, Grid};
use crate::types::{InvoiceRecord, ReportAggregate};

/// The ten canonical column labels, in field order.
pub const REPORT_HEADERS: [&str; 10] = [
    "Invoice No",
    "Date",
    "NTN",
    "Name",
    "Quantity",
    "Quantity-A",
    "Exclusive",
    "Sales tax",
    "%",
    "Code",
];

/// Fixed title lines above the header row.
const REPORT_TITLES: [&str; 2] = ["Mumtaz Brothers", "Sale Report - Langnese"];

/// Merge per-file record lists, in file-processing order, into one
/// aggregate with derived totals. A file that failed contributes an empty
/// list and never aborts the pass.
pub fn aggregate(per_file: &[Vec<InvoiceRecord>]) -> ReportAggregate {
    let invoices: Vec<InvoiceRecord> = per_file.iter().flatten().cloned().collect();
    let total_amount = invoices.iter().map(|r| r.exclusive).sum();
    let total_tax = invoices.iter().map(|r| r.sales_tax).sum();
    ReportAggregate {
        total_invoices: invoices.len(),
        total_amount,
        total_tax,
        invoices,
    }
}

/// Render the aggregate into the canonical consolidated shape: two title
/// rows, the fixed header row, then one row per record. No totals row is
/// appended.
pub fn serialize_report(report: &ReportAggregate) -> Grid {
    let mut rows = Vec::with_capacity(report.invoices.len() + 3);
    for title in REPORT_TITLES {
        rows.push(vec![Cell::Empty, Cell::Empty, Cell::Text(title.to_string())]);
    }
    rows.push(
        REPORT_HEADERS
            .iter()
            .map(|h| Cell::Text(h.to_string()))
            .collect(),
    );
    for record in &report.invoices {
        rows.push(vec![
            Cell::Text(record.invoice_no.clone()),
            Cell::Text(record.date.clone()),
            Cell::Text(record.ntn.clone()),
            Cell::Text(record.name.clone()),
            Cell::Number(record.quantity),
            Cell::Number(record.quantity_a),
            Cell::Number(record.exclusive),
            Cell::Number(record.sales_tax),
            Cell::Number(record.percentage),
            Cell::Text(record.code.clone()),
        ]);
    }
    Grid::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::consolidated::extract_consolidated;
    use crate::trace::ParseTrace;

    fn record(invoice_no: &str, exclusive: f64, sales_tax: f64) -> InvoiceRecord {
        InvoiceRecord {
            invoice_no: invoice_no.to_string(),
            date: "28/Oct/25".to_string(),
            ntn: "4269497-3".to_string(),
            name: "ZUBAIDA ASSOCIATES".to_string(),
            quantity: 30.0,
            quantity_a: 0.0,
            exclusive,
            sales_tax,
            percentage: 18.0,
            code: "1517.9000".to_string(),
        }
    }

    #[test]
    fn totals_derive_from_all_contributing_files() {
        let per_file = vec![
            vec![record("483", 100.0, 18.0), record("484", 200.0, 36.0)],
            Vec::new(), // a file that errored out entirely
        ];
        let report = aggregate(&per_file);
        assert_eq!(report.total_invoices, 2);
        assert_eq!(report.total_amount, 300.0);
        assert_eq!(report.total_tax, 54.0);
    }

    #[test]
    fn empty_batch_is_a_valid_aggregate() {
        let report = aggregate(&[]);
        assert_eq!(report.total_invoices, 0);
        assert_eq!(report.total_amount, 0.0);
    }

    #[test]
    fn serialized_grid_has_titles_header_and_data() {
        let report = aggregate(&[vec![record("483", 23135.59, 4164.41)]]);
        let grid = serialize_report(&report);

        assert_eq!(grid.len(), 4);
        assert_eq!(grid.text(0, 2), "Mumtaz Brothers");
        assert_eq!(grid.text(1, 2), "Sale Report - Langnese");
        assert_eq!(grid.text(2, 0), "Invoice No");
        assert_eq!(grid.text(2, 9), "Code");
        assert_eq!(grid.text(3, 0), "483");
        assert_eq!(grid.rows()[3][6], Cell::Number(23135.59));
        assert_eq!(grid.text(3, 9), "1517.9000");
    }

    #[test]
    fn round_trip_preserves_the_record_set() {
        let original = vec![
            record("483", 23135.59, 4164.41),
            record("484", 19240.0, 3463.2),
        ];
        let report = aggregate(&[original.clone()]);
        let grid = serialize_report(&report);

        let mut trace = ParseTrace::new();
        let reparsed = extract_consolidated(&grid, &mut trace).unwrap();

        let mut original_nos: Vec<&str> =
            original.iter().map(|r| r.invoice_no.as_str()).collect();
        let mut reparsed_nos: Vec<&str> =
            reparsed.iter().map(|r| r.invoice_no.as_str()).collect();
        original_nos.sort_unstable();
        reparsed_nos.sort_unstable();
        assert_eq!(original_nos, reparsed_nos);
        assert_eq!(reparsed[0].exclusive, 23135.59);
        assert_eq!(reparsed[0].percentage, 18.0);
    }
}
