use serde::{Deserialize, Serialize};

use crate::trace::TraceEvent;

/// One normalized invoice, whichever layout it came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    pub invoice_no: String,
    pub date: String,
    pub ntn: String,
    pub name: String,
    pub quantity: f64,
    pub quantity_a: f64,
    pub exclusive: f64,
    pub sales_tax: f64,
    pub percentage: f64,
    pub code: String,
}

impl InvoiceRecord {
    /// Minimal-completeness check separating real data rows from stray,
    /// blank, and total rows: an invoice number and a date, plus either a
    /// positive amount or a positive quantity.
    pub fn passes_acceptance_gate(&self) -> bool {
        !self.invoice_no.is_empty()
            && !self.date.is_empty()
            && (self.exclusive > 0.0 || self.quantity > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

/// Per-file processing result. A failed file keeps its error message and
/// contributes zero records; siblings are unaffected.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedFile {
    pub name: String,
    pub status: FileStatus,
    pub records: Vec<InvoiceRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub trace: Vec<TraceEvent>,
}

impl ProcessedFile {
    pub fn pending(name: impl Into<String>) -> Self {
        ProcessedFile {
            name: name.into(),
            status: FileStatus::Pending,
            records: Vec::new(),
            error: None,
            trace: Vec::new(),
        }
    }
}

/// The consolidated record set with derived totals. Always rebuilt from
/// scratch from the per-file results, never patched incrementally, since
/// files can still be erroring out while the batch settles.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAggregate {
    pub invoices: Vec<InvoiceRecord>,
    pub total_invoices: usize,
    pub total_amount: f64,
    pub total_tax: f64,
}

/// Result of one batch run: per-file entries in upload order plus the
/// rebuilt aggregate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub files: Vec<ProcessedFile>,
    pub report: ReportAggregate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(invoice_no: &str, date: &str, exclusive: f64, quantity: f64) -> InvoiceRecord {
        InvoiceRecord {
            invoice_no: invoice_no.to_string(),
            date: date.to_string(),
            exclusive,
            quantity,
            ..InvoiceRecord::default()
        }
    }

    #[test]
    fn gate_drops_missing_invoice_no() {
        assert!(!record("", "28/Oct/25", 100.0, 0.0).passes_acceptance_gate());
    }

    #[test]
    fn gate_drops_zero_amount_and_quantity() {
        assert!(!record("483", "28/Oct/25", 0.0, 0.0).passes_acceptance_gate());
    }

    #[test]
    fn gate_keeps_real_rows() {
        assert!(record("483", "28/Oct/25", 23135.59, 0.0).passes_acceptance_gate());
        assert!(record("483", "28/Oct/25", 0.0, 30.0).passes_acceptance_gate());
    }
}
