//! Workbook I/O: decoding uploads into grids and writing the consolidated
//! report back out.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Reader};
use rust_xlsxwriter::{Workbook, XlsxError};

use crate::error::ProcessError;
use crate::grid::{Cell, Grid};
use crate::services::report::serialize_report;
use crate::types::ReportAggregate;

/// Accepted upload extensions.
const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// Sheet picked when reading: the consolidated reports use "Sheet1", the
/// individual invoice files in the wild use "3rd", anything else falls
/// back to the first sheet.
const PREFERRED_SHEETS: &[&str] = &["Sheet1", "3rd"];

/// Cosmetic column widths for the export, in character units.
const REPORT_COLUMN_WIDTHS: [f64; 10] =
    [10.0, 12.0, 15.0, 20.0, 10.0, 12.0, 15.0, 12.0, 8.0, 15.0];

/// Name of the single sheet in the generated report workbook.
const REPORT_SHEET: &str = "Sheet1";

pub fn is_excel_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_lowercase();
            EXCEL_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// Decode a workbook file into a grid. Rejects non-Excel extensions before
/// touching the bytes; any decode problem is a per-file read failure.
pub fn read_grid(path: &Path) -> Result<Grid, ProcessError> {
    if !is_excel_file(path) {
        return Err(ProcessError::FileTypeRejected);
    }
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ProcessError::ReadFailure(e.to_string()))?;
    let names = workbook.sheet_names().to_vec();
    let sheet = pick_sheet(&names)
        .ok_or_else(|| ProcessError::ReadFailure("Workbook has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| ProcessError::ReadFailure(format!("Sheet not found: {}", e)))?;
    Ok(Grid::from_range(&range))
}

fn pick_sheet(names: &[String]) -> Option<String> {
    for preferred in PREFERRED_SHEETS {
        if let Some(name) = names.iter().find(|n| n.as_str() == *preferred) {
            return Some(name.clone());
        }
    }
    names.first().cloned()
}

/// Write the consolidated report workbook. With no override, the file lands
/// in Downloads (or Desktop) as `Consolidated_Invoice_Report_<date>.xlsx`.
/// Returns the saved path.
pub fn write_report(
    report: &ReportAggregate,
    path_override: Option<&Path>,
) -> Result<PathBuf, ProcessError> {
    let path = match path_override {
        Some(p) => {
            let mut pb = p.to_path_buf();
            if pb.extension().map(|e| e.to_str()) != Some(Some("xlsx")) {
                pb.set_extension("xlsx");
            }
            pb
        }
        None => {
            let dir = dirs::download_dir()
                .or_else(dirs::desktop_dir)
                .ok_or_else(|| {
                    ProcessError::WriteFailure(
                        "Could not find Downloads or Desktop folder".to_string(),
                    )
                })?;
            let date = chrono::Local::now().format("%Y-%m-%d");
            dir.join(format!("Consolidated_Invoice_Report_{}.xlsx", date))
        }
    };

    let grid = serialize_report(report);
    write_grid(&grid, &path)?;
    Ok(path)
}

/// Write a grid to a one-sheet workbook: text cells as strings, numeric
/// cells as numbers, empties left unwritten.
fn write_grid(grid: &Grid, path: &Path) -> Result<(), ProcessError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(REPORT_SHEET)
        .map_err(|e: XlsxError| ProcessError::WriteFailure(e.to_string()))?;

    for (col, &width) in REPORT_COLUMN_WIDTHS.iter().enumerate() {
        worksheet
            .set_column_width(col as u16, width)
            .map_err(|e: XlsxError| ProcessError::WriteFailure(e.to_string()))?;
    }

    for (row_idx, row) in grid.rows().iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(s) if !s.is_empty() => {
                    worksheet
                        .write_string(row_idx as u32, col_idx as u16, s)
                        .map_err(|e: XlsxError| ProcessError::WriteFailure(e.to_string()))?;
                }
                Cell::Number(n) => {
                    worksheet
                        .write_number(row_idx as u32, col_idx as u16, *n)
                        .map_err(|e: XlsxError| ProcessError::WriteFailure(e.to_string()))?;
                }
                _ => {}
            }
        }
    }

    workbook
        .save(path)
        .map_err(|e: XlsxError| ProcessError::WriteFailure(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::report::aggregate;
    use crate::types::InvoiceRecord;

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(is_excel_file(Path::new("report.xlsx")));
        assert!(is_excel_file(Path::new("REPORT.XLS")));
        assert!(!is_excel_file(Path::new("report.csv")));
        assert!(!is_excel_file(Path::new("report")));
    }

    #[test]
    fn rejected_extension_never_reaches_the_reader() {
        let err = read_grid(Path::new("invoices.pdf")).unwrap_err();
        assert!(matches!(err, ProcessError::FileTypeRejected));
    }

    #[test]
    fn sheet_preference_order() {
        let names = vec!["3rd".to_string(), "Sheet1".to_string()];
        assert_eq!(pick_sheet(&names).as_deref(), Some("Sheet1"));
        let names = vec!["Summary".to_string(), "3rd".to_string()];
        assert_eq!(pick_sheet(&names).as_deref(), Some("3rd"));
        let names = vec!["Summary".to_string()];
        assert_eq!(pick_sheet(&names).as_deref(), Some("Summary"));
        assert_eq!(pick_sheet(&[]), None);
    }

    #[test]
    fn written_report_reads_back_as_the_same_grid_shape() {
        let record = InvoiceRecord {
            invoice_no: "483".to_string(),
            date: "28/Oct/25".to_string(),
            ntn: "4269497-3".to_string(),
            name: "ZUBAIDA ASSOCIATES".to_string(),
            quantity: 30.0,
            quantity_a: 0.0,
            exclusive: 23135.59,
            sales_tax: 4164.41,
            percentage: 18.0,
            code: "1517.9000".to_string(),
        };
        let report = aggregate(&[vec![record]]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        let saved = write_report(&report, Some(&path)).unwrap();
        assert_eq!(saved, path);

        let grid = read_grid(&path).unwrap();
        assert_eq!(grid.text(0, 2), "Mumtaz Brothers");
        assert_eq!(grid.text(2, 0), "Invoice No");
        assert_eq!(grid.text(3, 0), "483");
        assert_eq!(grid.text(3, 6), "23135.59");
    }
}
