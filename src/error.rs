use thiserror::Error;

/// Everything that can go wrong between a file path and its records.
///
/// Only `FileTypeRejected` stops a batch before it starts; the rest are
/// caught at the per-file boundary and recorded on that file's entry.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Please upload only Excel files (.xlsx or .xls)")]
    FileTypeRejected,

    #[error("Could not open Excel file: {0}")]
    ReadFailure(String),

    #[error("Could not find invoice data header row")]
    HeaderNotFound,

    #[error("No valid invoice data found in the file")]
    NoInvoiceData,

    #[error("Cannot write to file: {0}")]
    WriteFailure(String),
}
