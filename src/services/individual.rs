//! Extraction from the fixed single-invoice template.
//!
//! The template is known and stable for one vendor/customer pair, so row
//! anchors are absolute; within an anchored row the label is found by
//! scanning cell-by-cell, which tolerates drift in column placement only.

use regex::Regex;

use super::{parse_leading_int, parse_number};
use crate::grid::Grid;
use crate::trace::ParseTrace;
use crate::types::InvoiceRecord;

/// Row/column anchors and fallback values for one invoice template.
/// Adding a template means adding a constant, not touching control flow.
#[derive(Debug, Clone)]
pub struct TemplateAnchors {
    /// Row scanned for the invoice-number label (lower-cased containment).
    pub invoice_no_row: usize,
    pub invoice_no_label: &'static str,
    /// Row scanned for the date label (exact-case containment).
    pub date_row: usize,
    pub date_label: &'static str,
    /// Row scanned for the customer keyword; presence alone fixes the name.
    pub name_row: usize,
    pub name_keyword: &'static str,
    /// Row scanned for the tax-ID label; the guard digits must co-occur.
    pub ntn_row: usize,
    pub ntn_label: &'static str,
    pub ntn_guard: &'static str,
    /// Inclusive-exclusive row band scanned for the totals block.
    pub totals_rows: (usize, usize),
    pub quantity_col: usize,
    pub exclusive_col: usize,
    pub sales_tax_col: usize,
    /// Column holding amounts on the Gross Amount / GST fallback rows.
    pub fallback_amount_col: usize,
    pub default_ntn: &'static str,
    pub default_name: &'static str,
    pub product_code: &'static str,
}

/// The one template observed so far.
pub const ZUBAIDA_TEMPLATE: TemplateAnchors = TemplateAnchors {
    invoice_no_row: 8,
    invoice_no_label: "invoice #",
    date_row: 6,
    date_label: "DATE:",
    name_row: 4,
    name_keyword: "ZUBAIDA",
    ntn_row: 5,
    ntn_label: "NTN:",
    ntn_guard: "4269497",
    totals_rows: (60, 70),
    quantity_col: 5,
    exclusive_col: 9,
    sales_tax_col: 10,
    fallback_amount_col: 11,
    default_ntn: "4269497-3",
    default_name: "ZUBAIDA ASSOCIATES",
    product_code: "1517.9000",
};

/// Pull the single record out of a fixed-template grid. Best effort by
/// contract: anchors that fail to match fall back to placeholder values
/// rather than failing the file.
pub fn extract_individual(grid: &Grid, trace: &mut ParseTrace) -> InvoiceRecord {
    extract_with_anchors(grid, &ZUBAIDA_TEMPLATE, trace)
}

pub fn extract_with_anchors(
    grid: &Grid,
    anchors: &TemplateAnchors,
    trace: &mut ParseTrace,
) -> InvoiceRecord {
    let invoice_no = find_invoice_no(grid, anchors, trace);
    let date = find_date(grid, anchors, trace);
    let name = find_name(grid, anchors, trace);
    let ntn = find_ntn(grid, anchors, trace);

    let (quantity, mut exclusive, mut sales_tax) = find_totals_row(grid, anchors, trace);

    // The totals row is missing its amounts on some printouts; the Gross
    // Amount / GST rows underneath carry them instead.
    if exclusive == 0.0 {
        let (gross, gst) = find_gross_and_gst(grid, anchors, trace);
        if let Some(gross) = gross {
            exclusive = gross;
        }
        if let Some(gst) = gst {
            sales_tax = gst;
        }
    }

    let percentage = if exclusive > 0.0 {
        sales_tax / exclusive * 100.0
    } else {
        18.0
    };

    InvoiceRecord {
        invoice_no: or_default(invoice_no, "UNKNOWN"),
        date: or_default(date, "UNKNOWN"),
        ntn: or_default(ntn, anchors.default_ntn),
        name: or_default(name, anchors.default_name),
        quantity,
        quantity_a: 0.0,
        exclusive,
        sales_tax,
        percentage,
        code: anchors.product_code.to_string(),
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}

fn find_invoice_no(
    grid: &Grid,
    anchors: &TemplateAnchors,
    trace: &mut ParseTrace,
) -> Option<String> {
    let row = grid.row(anchors.invoice_no_row)?;
    for cell in row {
        let text = cell.to_text();
        if text.to_lowercase().contains(anchors.invoice_no_label) {
            let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
            trace.note("anchor", format!("invoice no {:?} at row {}", digits, anchors.invoice_no_row));
            return Some(digits);
        }
    }
    None
}

fn find_date(grid: &Grid, anchors: &TemplateAnchors, trace: &mut ParseTrace) -> Option<String> {
    // Greedy prefix strip, so "SALE DATE:30-10-25" keeps only the value.
    let strip = Regex::new(r"(?i).*date:").expect("date label regex");
    let row = grid.row(anchors.date_row)?;
    for cell in row {
        let text = cell.to_text();
        if text.contains(anchors.date_label) {
            let date = strip.replace(&text, "").trim().to_string();
            trace.note("anchor", format!("date {:?} at row {}", date, anchors.date_row));
            return Some(date);
        }
    }
    None
}

fn find_name(grid: &Grid, anchors: &TemplateAnchors, trace: &mut ParseTrace) -> Option<String> {
    let row = grid.row(anchors.name_row)?;
    for cell in row {
        if cell.to_text().to_uppercase().contains(anchors.name_keyword) {
            trace.note("anchor", format!("customer keyword at row {}", anchors.name_row));
            // Only presence matters; the canonical spelling is fixed.
            return Some(anchors.default_name.to_string());
        }
    }
    None
}

fn find_ntn(grid: &Grid, anchors: &TemplateAnchors, trace: &mut ParseTrace) -> Option<String> {
    let strip = Regex::new(r"(?i).*ntn:\s*").expect("ntn label regex");
    let row = grid.row(anchors.ntn_row)?;
    for cell in row {
        let text = cell.to_text();
        if text.contains(anchors.ntn_label) && text.contains(anchors.ntn_guard) {
            let ntn = strip.replace(&text, "").trim().to_string();
            trace.note("anchor", format!("ntn {:?} at row {}", ntn, anchors.ntn_row));
            return Some(ntn);
        }
    }
    None
}

/// Scan the totals band for the row that says TOTAL and nothing about
/// GST/GROSS/NET, then read quantity and amounts from its fixed columns.
fn find_totals_row(
    grid: &Grid,
    anchors: &TemplateAnchors,
    trace: &mut ParseTrace,
) -> (f64, f64, f64) {
    let (start, end) = anchors.totals_rows;
    let end = end.min(grid.len());
    for i in start..end {
        let row_text = grid.row_text_upper(i);
        if row_text.is_empty() {
            continue;
        }
        if row_text.contains("TOTAL")
            && !row_text.contains("GST")
            && !row_text.contains("GROSS")
            && !row_text.contains("NET")
        {
            trace.note("totals", format!("TOTAL row at {}", i));
            let quantity = non_empty_text(grid, i, anchors.quantity_col)
                .map(|t| parse_leading_int(&t))
                .unwrap_or(0.0);
            let exclusive = non_empty_text(grid, i, anchors.exclusive_col)
                .map(|t| parse_number(&t))
                .unwrap_or(0.0);
            let sales_tax = non_empty_text(grid, i, anchors.sales_tax_col)
                .map(|t| parse_number(&t))
                .unwrap_or(0.0);
            return (quantity, exclusive, sales_tax);
        }
    }
    trace.note("totals", "no TOTAL row in band");
    (0.0, 0.0, 0.0)
}

/// Fallback pass over the same band: Gross Amount row for the exclusive
/// amount, and independently the "Gst @ 18%" row for the tax. Later
/// matches overwrite earlier ones.
fn find_gross_and_gst(
    grid: &Grid,
    anchors: &TemplateAnchors,
    trace: &mut ParseTrace,
) -> (Option<f64>, Option<f64>) {
    let (start, end) = anchors.totals_rows;
    let end = end.min(grid.len());
    let mut gross = None;
    let mut gst = None;
    for i in start..end {
        let row_text = grid.row_text_upper(i);
        if row_text.is_empty() {
            continue;
        }
        if row_text.contains("GROSS AMOUNT") {
            if let Some(t) = non_empty_text(grid, i, anchors.fallback_amount_col) {
                gross = Some(parse_number(&t));
                trace.note("fallback", format!("gross amount from row {}", i));
            }
        }
        if row_text.contains("GST") && row_text.contains("18%") {
            if let Some(t) = non_empty_text(grid, i, anchors.fallback_amount_col) {
                gst = Some(parse_number(&t));
                trace.note("fallback", format!("gst from row {}", i));
            }
        }
    }
    (gross, gst)
}

fn non_empty_text(grid: &Grid, row: usize, col: usize) -> Option<String> {
    let text = grid.text(row, col);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
