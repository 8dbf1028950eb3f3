use calamine::{Data, DataType, Range};
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// One raw value from a source spreadsheet. Type is a convention of the
/// producing workbook, never a guarantee of position.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    /// Render the cell the way the source formats it: integers without a
    /// fractional part, empty cells as "".
    pub fn to_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
            Cell::Empty => String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            Cell::Number(_) => false,
        }
    }
}

/// Integers print as integers (30, not 30.0) so keyword scans and all-digit
/// tests see the same text the original cell carried.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// Serializes as the raw value (string / number / "" for empty), matching the
// array-of-arrays shape the external reader convention produces.
impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Number(n) => serializer.serialize_f64(*n),
            Cell::Empty => serializer.serialize_str(""),
        }
    }
}

/// Ordered rows of cells, 0-indexed; rows may vary in length. Read-only
/// input to all extraction logic once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Grid { rows }
    }

    /// Build a grid from a calamine range, keeping absolute coordinates:
    /// a range starting at (r0, c0) is padded with r0 empty rows and c0
    /// leading empty cells, and trailing empty cells are trimmed from each
    /// row so row length reflects the last meaningful cell.
    pub fn from_range(range: &Range<Data>) -> Self {
        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
        for row in range.rows() {
            let mut cells: Vec<Cell> = Vec::with_capacity(col_offset + row.len());
            cells.resize(col_offset, Cell::Empty);
            cells.extend(row.iter().map(cell_from_data));
            while cells.last().is_some_and(|c| matches!(c, Cell::Empty)) {
                cells.pop();
            }
            rows.push(cells);
        }
        Grid { rows }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell text at (row, col); missing cells read as "".
    pub fn text(&self, row: usize, col: usize) -> String {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|c| c.to_text())
            .unwrap_or_default()
    }

    /// A row's cells joined with spaces and upper-cased, for keyword scans
    /// that do not care which column a label sits in.
    pub fn row_text_upper(&self, index: usize) -> String {
        self.rows
            .get(index)
            .map(|r| {
                r.iter()
                    .map(|c| c.to_text())
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_uppercase()
            })
            .unwrap_or_default()
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(b.to_string()),
        other => Cell::Text(other.as_string().unwrap_or_default()),
    }
}
