//! Layout-inference parsing of heterogeneous invoice spreadsheets.
//!
//! Ingests Excel files that are either a single fixed-template invoice or
//! a consolidated multi-row report, normalizes both into one record
//! schema, aggregates across files, and re-exports the consolidated
//! report workbook.

pub mod error;
pub mod excel;
pub mod grid;
pub mod processor;
pub mod services;
pub mod trace;
pub mod types;

pub use error::ProcessError;
pub use grid::{Cell, Grid};
pub use processor::process_batch;
pub use services::classifier::{classify, Layout};
pub use services::consolidated::extract_consolidated;
pub use services::individual::{extract_individual, TemplateAnchors, ZUBAIDA_TEMPLATE};
pub use services::report::{aggregate, serialize_report, REPORT_HEADERS};
pub use trace::{ParseTrace, TraceEvent};
pub use types::{
    BatchOutcome, FileStatus, InvoiceRecord, ProcessedFile, ReportAggregate,
};
