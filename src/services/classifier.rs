//! Decides which of the two observed invoice layouts a grid uses.

use crate::grid::Grid;

/// The two spreadsheet shapes this system understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Single-invoice document on a fixed, row-anchored vendor template.
    Individual,
    /// Multi-row report, one row per invoice, header at an unknown offset.
    Consolidated,
}

/// Phrases that only ever appear on the fixed invoice template.
const INDIVIDUAL_MARKERS: &[&str] = &["sales tax invoice", "product barcode"];

/// Classify by serializing the whole grid into one lower-cased text blob
/// and checking substring containment. Deliberately coarse: no word
/// boundaries, so the `"to"` + `"from"` clause matches almost any business
/// document that happens to carry both fragments anywhere in its text.
/// That false-positive risk is a known property of the observed corpus,
/// kept as-is rather than silently narrowed.
pub fn classify(grid: &Grid) -> Layout {
    let blob = serde_json::to_string(grid)
        .unwrap_or_default()
        .to_lowercase();

    let is_individual = INDIVIDUAL_MARKERS.iter().any(|m| blob.contains(m))
        || (blob.contains("to") && blob.contains("from"));

    if is_individual {
        Layout::Individual
    } else {
        Layout::Consolidated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    fn grid_of(rows: &[&[&str]]) -> Grid {
        Grid::new(
            rows.iter()
                .map(|r| r.iter().map(|s| Cell::Text(s.to_string())).collect())
                .collect(),
        )
    }

    #[test]
    fn product_barcode_marks_individual() {
        let grid = grid_of(&[&["Item", "Product Barcode", "Qty"]]);
        assert_eq!(classify(&grid), Layout::Individual);
    }

    #[test]
    fn sales_tax_invoice_marks_individual() {
        let grid = grid_of(&[&["", "SALES TAX INVOICE", ""]]);
        assert_eq!(classify(&grid), Layout::Individual);
    }

    #[test]
    fn marker_matches_inside_a_single_cell_only() {
        // The phrase split across two cells is not the marker.
        let grid = grid_of(&[&["sales tax", "invoice summary"]]);
        assert_eq!(classify(&grid), Layout::Consolidated);
    }

    #[test]
    fn plain_report_is_consolidated() {
        let grid = grid_of(&[
            &["Invoice No", "Date", "NTN", "Name"],
            &["483", "28/Oct/25", "4269497-3", "ZUBAIDA ASSOCIATES"],
        ]);
        assert_eq!(classify(&grid), Layout::Consolidated);
    }

    #[test]
    fn to_and_from_fragments_still_trip_the_heuristic() {
        // Substring containment: "stock" carries "to", "fromage" carries
        // "from". Documented weakness, not a defect to narrow.
        let grid = grid_of(&[&["stock list", "fromage counter"]]);
        assert_eq!(classify(&grid), Layout::Individual);
    }
}
