//! Sequential batch pipeline: one file at a time, in upload order, with
//! per-file status transitions and error capture.

use std::path::{Path, PathBuf};

use tokio::task;
use tracing::info;

use crate::error::ProcessError;
use crate::excel::{self, is_excel_file};
use crate::services::classifier::{classify, Layout};
use crate::services::consolidated::extract_consolidated;
use crate::services::individual::extract_individual;
use crate::services::report::aggregate;
use crate::trace::ParseTrace;
use crate::types::{BatchOutcome, FileStatus, InvoiceRecord, ProcessedFile};

/// Process uploaded files strictly sequentially, so status transitions are
/// observable in a stable order and the aggregate always reflects fully
/// settled predecessors. A failing file is recorded on its own entry and
/// the queue continues; only a bad extension stops the batch before it
/// starts. The final aggregate is rebuilt from scratch from whatever
/// succeeded.
pub async fn process_batch(paths: &[PathBuf]) -> Result<BatchOutcome, ProcessError> {
    if paths.iter().any(|p| !is_excel_file(p)) {
        return Err(ProcessError::FileTypeRejected);
    }

    let mut files: Vec<ProcessedFile> = paths.iter().map(|p| ProcessedFile::pending(file_name(p))).collect();

    for (i, path) in paths.iter().enumerate() {
        files[i].status = FileStatus::Processing;
        match process_file(path).await {
            Ok((records, trace)) => {
                info!(file = %files[i].name, invoices = records.len(), "processed");
                files[i].records = records;
                files[i].trace = trace.into_events();
                files[i].status = FileStatus::Completed;
            }
            Err(e) => {
                info!(file = %files[i].name, error = %e, "failed");
                files[i].error = Some(e.to_string());
                files[i].status = FileStatus::Error;
            }
        }
    }

    let per_file: Vec<Vec<InvoiceRecord>> =
        files.iter().map(|f| f.records.clone()).collect();
    let report = aggregate(&per_file);
    Ok(BatchOutcome { files, report })
}

/// Decode, classify, and extract one file. Decoding suspends on a blocking
/// task; extraction itself runs on owned data with no shared state.
async fn process_file(path: &Path) -> Result<(Vec<InvoiceRecord>, ParseTrace), ProcessError> {
    let owned = path.to_path_buf();
    let grid = task::spawn_blocking(move || excel::read_grid(&owned))
        .await
        .map_err(|e| ProcessError::ReadFailure(format!("Task join error: {}", e)))??;

    let mut trace = ParseTrace::new();
    let records = match classify(&grid) {
        Layout::Individual => {
            trace.note("layout", "individual");
            vec![extract_individual(&grid, &mut trace)]
        }
        Layout::Consolidated => {
            trace.note("layout", "consolidated");
            extract_consolidated(&grid, &mut trace)?
        }
    };

    if records.is_empty() {
        return Err(ProcessError::NoInvoiceData);
    }
    Ok((records, trace))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::write_report;
    use crate::services::report;
    use crate::types::InvoiceRecord;
    use std::fs;

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

    /// Write a consolidated report workbook usable as batch input.
    fn fixture_file(dir: &Path, name: &str, records: Vec<InvoiceRecord>) -> PathBuf {
        let path = dir.join(name);
        write_report(&report::aggregate(&[records]), Some(&path)).unwrap();
        path
    }

    #[tokio::test]
    async fn batch_round_trips_a_written_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture_file(
            dir.path(),
            "sale_report.xlsx",
            vec![record("483", 100.0, 18.0), record("484", 200.0, 36.0)],
        );

        let outcome = process_batch(&[path]).await.unwrap();
        assert_eq!(outcome.files.len(), 1);
        assert_eq!(outcome.files[0].status, FileStatus::Completed);
        assert_eq!(outcome.report.total_invoices, 2);
        assert_eq!(outcome.report.total_amount, 300.0);
        assert_eq!(outcome.report.total_tax, 54.0);
    }

    #[tokio::test]
    async fn broken_file_errors_without_aborting_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let good = fixture_file(dir.path(), "good.xlsx", vec![record("483", 100.0, 18.0)]);
        let broken = dir.path().join("broken.xlsx");
        fs::write(&broken, b"definitely not a workbook").unwrap();

        let outcome = process_batch(&[broken.clone(), good]).await.unwrap();
        assert_eq!(outcome.files[0].status, FileStatus::Error);
        assert!(outcome.files[0].error.is_some());
        assert_eq!(outcome.files[1].status, FileStatus::Completed);
        assert_eq!(outcome.report.total_invoices, 1);
        assert_eq!(outcome.report.total_amount, 100.0);
    }

    #[tokio::test]
    async fn wrong_extension_rejects_the_whole_batch() {
        let dir = tempfile::tempdir().unwrap();
        let good = fixture_file(dir.path(), "good.xlsx", vec![record("483", 100.0, 18.0)]);
        let bad = dir.path().join("notes.txt");
        fs::write(&bad, b"hello").unwrap();

        let err = process_batch(&[good, bad]).await.unwrap_err();
        assert!(matches!(err, ProcessError::FileTypeRejected));
    }

    #[tokio::test]
    async fn report_with_only_skippable_rows_is_no_invoice_data() {
        let dir = tempfile::tempdir().unwrap();
        // A header but zero acceptable data rows.
        let path = fixture_file(dir.path(), "empty.xlsx", Vec::new());

        let outcome = process_batch(&[path]).await.unwrap();
        assert_eq!(outcome.files[0].status, FileStatus::Error);
        assert_eq!(
            outcome.files[0].error.as_deref(),
            Some("No valid invoice data found in the file")
        );
        assert_eq!(outcome.report.total_invoices, 0);
    }
}
