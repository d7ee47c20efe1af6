use core::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of rows in an Excel worksheet.
pub const EXCEL_MAX_ROWS: u32 = 1_048_576;
/// Maximum number of columns in an Excel worksheet (`XFD`).
pub const EXCEL_MAX_COLS: u32 = 16_384;

/// Row/column limits of the sheet that owns a rule collection.
///
/// The host document supplies these; ranges are clamped into `[1, limit]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetLimits {
    pub max_rows: u32,
    pub max_cols: u32,
}

impl Default for SheetLimits {
    fn default() -> Self {
        Self {
            max_rows: EXCEL_MAX_ROWS,
            max_cols: EXCEL_MAX_COLS,
        }
    }
}

impl SheetLimits {
    fn clamp_row(&self, row: u32) -> u32 {
        row.clamp(1, self.max_rows.max(1))
    }

    fn clamp_col(&self, col: u32) -> u32 {
        col.clamp(1, self.max_cols.max(1))
    }
}

/// A reference to a single cell within a worksheet.
///
/// Rows and columns are **1-based**, matching A1 notation:
/// - `row = 1` is Excel row `1`
/// - `col = 1` is Excel column `A`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawCellRef")]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

#[derive(Deserialize)]
struct RawCellRef {
    row: u32,
    col: u32,
}

impl From<RawCellRef> for CellRef {
    fn from(raw: RawCellRef) -> Self {
        CellRef::new(raw.row, raw.col)
    }
}

impl CellRef {
    /// Construct a cell reference clamped to the default Excel limits.
    pub fn new(row: u32, col: u32) -> Self {
        Self::with_limits(row, col, SheetLimits::default())
    }

    pub fn with_limits(row: u32, col: u32, limits: SheetLimits) -> Self {
        Self {
            row: limits.clamp_row(row),
            col: limits.clamp_col(col),
        }
    }

    /// Convert to Excel A1 notation (e.g. `A1`, `BC32`).
    pub fn to_a1(self) -> String {
        format!("{}{}", col_to_name(self.col), self.row)
    }

    /// Parse an Excel A1-style reference (e.g. `A1`, `$B$2`).
    ///
    /// Rows and columns past the Excel limits are rejected.
    pub fn from_a1(a1: &str) -> Result<Self, A1ParseError> {
        let (col, row) = split_a1(a1)?;
        let col = name_to_col(col);
        if col > EXCEL_MAX_COLS {
            return Err(A1ParseError::InvalidColumn);
        }
        let row = parse_row(row);
        if row == 0 || row > EXCEL_MAX_ROWS {
            return Err(A1ParseError::InvalidRow);
        }
        Ok(Self { row, col })
    }

    /// Parse an A1-style reference, clamping out-of-bounds rows and columns into
    /// `limits` instead of rejecting them. Only text that is not A1 at all is an error.
    pub fn from_a1_clamped(a1: &str, limits: SheetLimits) -> Result<Self, A1ParseError> {
        let (col, row) = split_a1(a1)?;
        Ok(Self::with_limits(parse_row(row), name_to_col(col), limits))
    }
}

/// Split `$A$1` into its column letters and row digits.
fn split_a1(a1: &str) -> Result<(&str, &str), A1ParseError> {
    let s = a1.trim();
    if s.is_empty() {
        return Err(A1ParseError::Empty);
    }

    // Accept optional `$` markers.
    let bytes = s.as_bytes();
    let mut idx = 0usize;
    if bytes.get(idx) == Some(&b'$') {
        idx += 1;
    }

    let col_start = idx;
    while idx < bytes.len() && bytes[idx].is_ascii_alphabetic() {
        idx += 1;
    }
    if idx == col_start {
        return Err(A1ParseError::MissingColumn);
    }
    let col = &s[col_start..idx];

    if bytes.get(idx) == Some(&b'$') {
        idx += 1;
    }

    let row_start = idx;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    if idx == row_start {
        return Err(A1ParseError::MissingRow);
    }
    if idx != bytes.len() {
        return Err(A1ParseError::TrailingCharacters);
    }
    Ok((col, &s[row_start..idx]))
}

/// Row digits, saturating at `u32::MAX`.
fn parse_row(digits: &str) -> u32 {
    digits.parse().unwrap_or(u32::MAX)
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

/// A rectangular, inclusive region targeted by a conditional formatting block.
///
/// Always normalized so that `start.row <= end.row` and `start.col <= end.col`, including
/// when deserialized.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawCellRange")]
pub struct CellRange {
    pub start: CellRef,
    pub end: CellRef,
}

#[derive(Deserialize)]
struct RawCellRange {
    start: CellRef,
    end: CellRef,
}

impl From<RawCellRange> for CellRange {
    fn from(raw: RawCellRange) -> Self {
        CellRange::from_corners(raw.start, raw.end)
    }
}

impl CellRange {
    /// Construct a range from 1-based corners, clamped to the default Excel limits.
    ///
    /// Reversed corners are swapped rather than rejected.
    pub fn new(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self::with_limits(start_row, start_col, end_row, end_col, SheetLimits::default())
    }

    pub fn with_limits(
        start_row: u32,
        start_col: u32,
        end_row: u32,
        end_col: u32,
        limits: SheetLimits,
    ) -> Self {
        let a = CellRef::with_limits(start_row, start_col, limits);
        let b = CellRef::with_limits(end_row, end_col, limits);
        Self::from_corners(a, b)
    }

    pub fn from_corners(a: CellRef, b: CellRef) -> Self {
        Self {
            start: CellRef {
                row: a.row.min(b.row),
                col: a.col.min(b.col),
            },
            end: CellRef {
                row: a.row.max(b.row),
                col: a.col.max(b.col),
            },
        }
    }

    pub fn single(cell: CellRef) -> Self {
        Self {
            start: cell,
            end: cell,
        }
    }

    /// Top-left cell, used as the relative anchor for synthesized formulas.
    pub fn first_cell(&self) -> CellRef {
        self.start
    }

    pub fn is_single_cell(&self) -> bool {
        self.start == self.end
    }

    /// Parse an A1-style range like `A1:B2` or a single-cell reference like `C3`.
    pub fn from_a1(a1: &str) -> Result<Self, RangeParseError> {
        let s = a1.trim();
        if s.is_empty() {
            return Err(RangeParseError::Empty);
        }

        match s.split_once(':') {
            None => Ok(Self::single(CellRef::from_a1(s)?)),
            Some((a, b)) => Ok(Self::from_corners(CellRef::from_a1(a)?, CellRef::from_a1(b)?)),
        }
    }

    /// Like [`CellRange::from_a1`], but corners past `limits` are clamped.
    pub fn from_a1_clamped(a1: &str, limits: SheetLimits) -> Result<Self, RangeParseError> {
        let s = a1.trim();
        if s.is_empty() {
            return Err(RangeParseError::Empty);
        }

        let (a, b) = s.split_once(':').unwrap_or((s, s));
        Ok(Self::from_corners(
            CellRef::from_a1_clamped(a, limits)?,
            CellRef::from_a1_clamped(b, limits)?,
        ))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_cell() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

/// Errors that can occur when parsing an A1 cell reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum A1ParseError {
    #[error("empty A1 reference")]
    Empty,
    #[error("missing column in A1 reference")]
    MissingColumn,
    #[error("missing row in A1 reference")]
    MissingRow,
    #[error("invalid column in A1 reference")]
    InvalidColumn,
    #[error("invalid row in A1 reference")]
    InvalidRow,
    #[error("trailing characters in A1 reference")]
    TrailingCharacters,
}

/// Errors that can occur when parsing an A1 range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RangeParseError {
    #[error("empty A1 range")]
    Empty,
    #[error("invalid cell reference in range: {0}")]
    Cell(#[from] A1ParseError),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid sqref token `{token}`: {source}")]
pub struct SqrefParseError {
    pub token: String,
    #[source]
    pub source: RangeParseError,
}

/// Format ranges as a SpreadsheetML `sqref` attribute (`A1 B2:C4`).
pub fn format_sqref(ranges: &[CellRange]) -> String {
    ranges
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a SpreadsheetML `sqref` attribute (`A1`, `A1:B2`, `A1 A3:B7`).
///
/// Ranges are clamped to the default Excel limits; see [`parse_sqref_with_limits`].
pub fn parse_sqref(sqref: &str) -> Result<Vec<CellRange>, SqrefParseError> {
    parse_sqref_with_limits(sqref, SheetLimits::default())
}

/// Parse a `sqref` attribute, clamping every range into `limits`. Only tokens that are
/// not A1 references at all are errors.
pub fn parse_sqref_with_limits(
    sqref: &str,
    limits: SheetLimits,
) -> Result<Vec<CellRange>, SqrefParseError> {
    sqref
        .split_whitespace()
        .map(|token| {
            CellRange::from_a1_clamped(token, limits).map_err(|source| SqrefParseError {
                token: token.to_string(),
                source,
            })
        })
        .collect()
}

fn col_to_name(col: u32) -> String {
    let mut n = col;
    let mut out = Vec::<u8>::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Column letters (already known to be ASCII alphabetic), saturating at `u32::MAX`.
fn name_to_col(s: &str) -> u32 {
    s.bytes().fold(0u32, |col, b| {
        let v = (b.to_ascii_uppercase() - b'A') as u32 + 1;
        col.saturating_mul(26).saturating_add(v)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a1_roundtrip() {
        let c = CellRef::new(1, 1);
        assert_eq!(c.to_a1(), "A1");
        assert_eq!(CellRef::from_a1("A1").unwrap(), c);
        assert_eq!(CellRef::from_a1("$A$1").unwrap(), c);

        let c2 = CellRef::new(32, 55);
        assert_eq!(c2.to_a1(), "BC32");
        assert_eq!(CellRef::from_a1("bc32").unwrap(), c2);
    }

    #[test]
    fn reversed_corners_are_normalized() {
        let r = CellRange::new(10, 4, 2, 1);
        assert_eq!(r.start, CellRef { row: 2, col: 1 });
        assert_eq!(r.end, CellRef { row: 10, col: 4 });
        assert_eq!(r.to_string(), "A2:D10");
    }

    #[test]
    fn out_of_bounds_indices_clamp() {
        let r = CellRange::new(0, 0, 2_000_000, 20_000);
        assert_eq!(r.to_string(), "A1:XFD1048576");

        let small = SheetLimits {
            max_rows: 100,
            max_cols: 10,
        };
        let r = CellRange::with_limits(500, 3, 1, 50, small);
        assert_eq!(r.to_string(), "C1:J100");
    }

    #[test]
    fn sqref_parse_and_format() {
        let ranges = parse_sqref("A1 B2:C4").unwrap();
        assert_eq!(ranges.len(), 2);
        assert_eq!(format_sqref(&ranges), "A1 B2:C4");
        assert!(parse_sqref("A1 nope").is_err());
    }

    #[test]
    fn deserialized_ranges_are_normalized_and_clamped() {
        let r: CellRange = serde_json::from_str(
            r#"{"start":{"row":10,"col":4},"end":{"row":0,"col":20000}}"#,
        )
        .unwrap();
        assert_eq!(r, CellRange::new(1, 4, 10, 16_384));
        assert_eq!(serde_json::to_value(r).unwrap()["start"]["row"], 1);
    }

    #[test]
    fn sqref_parse_clamps_out_of_bounds_ranges() {
        let ranges = parse_sqref("A1:A1048577 XFE1 B0:C2").unwrap();
        assert_eq!(format_sqref(&ranges), "A1:A1048576 XFD1 B1:C2");

        let small = SheetLimits {
            max_rows: 100,
            max_cols: 10,
        };
        let ranges = parse_sqref_with_limits("Z500:B7", small).unwrap();
        assert_eq!(format_sqref(&ranges), "B7:J100");

        let huge = parse_sqref("ZZZZZZZZ99999999999").unwrap();
        assert_eq!(format_sqref(&huge), "XFD1048576");
    }

    #[test]
    fn a1_bounds_are_excel_compatible() {
        assert!(CellRef::from_a1("XFD1048576").is_ok());
        assert!(CellRef::from_a1("XFE1").is_err());
        assert!(CellRef::from_a1("A1048577").is_err());
    }
}
