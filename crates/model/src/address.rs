//! A1-style cell addresses and rectangular ranges.
//!
//! Rows and columns are 1-based throughout, matching what appears in the
//! sheet XML (`r="B5"` is row 5, column 2).

use std::fmt;

/// Largest row number a worksheet can address.
pub const MAX_ROW: u32 = 1_048_576;
/// Largest column number a worksheet can address (`XFD`).
pub const MAX_COL: u32 = 16_384;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    pub row: u32,
    pub col: u32,
}

impl CellAddress {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse a reference like `B5` or `$B$5`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let split = s
            .char_indices()
            .find(|(_, ch)| ch.is_ascii_digit())
            .map(|(i, _)| i)?;
        let (letters, digits) = s.split_at(split);
        let letters = letters.trim_start_matches('$');
        let letters = letters.strip_suffix('$').unwrap_or(letters);
        if letters.is_empty() || !letters.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return None;
        }
        if !digits.chars().all(|ch| ch.is_ascii_digit()) {
            return None;
        }

        let col = column_index(letters)?;
        let row: u32 = digits.parse().ok()?;
        if row == 0 || row > MAX_ROW {
            return None;
        }
        Some(Self { row, col })
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letter(self.col), self.row)
    }
}

/// Convert a 1-based column number to letters: 1 → `A`, 27 → `AA`.
pub fn column_letter(col: u32) -> String {
    let mut n = col;
    let mut out = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        out.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Convert column letters to a 1-based column number: `A` → 1, `AA` → 27.
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }
    let mut col: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        col = col * 26 + (ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }
    if col > MAX_COL {
        return None;
    }
    Some(col)
}

/// Inclusive rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start: CellAddress,
    pub end: CellAddress,
}

impl CellRange {
    /// Build a range from two corners in any order.
    pub fn new(a: CellAddress, b: CellAddress) -> Self {
        Self {
            start: CellAddress::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellAddress::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Parse `A1:F42` or a single-cell `A1`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.split_once(':') {
            Some((a, b)) => Some(Self::new(CellAddress::parse(a)?, CellAddress::parse(b)?)),
            None => {
                let a = CellAddress::parse(s)?;
                Some(Self::new(a, a))
            }
        }
    }

    pub fn contains(&self, addr: CellAddress) -> bool {
        (self.start.row..=self.end.row).contains(&addr.row)
            && (self.start.col..=self.end.col).contains(&addr.col)
    }

    /// Overlap of two ranges, if any.
    pub fn intersect(&self, other: &CellRange) -> Option<CellRange> {
        let start = CellAddress::new(
            self.start.row.max(other.start.row),
            self.start.col.max(other.start.col),
        );
        let end = CellAddress::new(
            self.end.row.min(other.end.row),
            self.end.col.min(other.end.col),
        );
        (start.row <= end.row && start.col <= end.col).then_some(CellRange { start, end })
    }

    pub fn cell_count(&self) -> u64 {
        let rows = u64::from(self.end.row - self.start.row + 1);
        let cols = u64::from(self.end.col - self.start.col + 1);
        rows * cols
    }

    /// Every address in the rectangle, row-major.
    pub fn addresses(&self) -> impl Iterator<Item = CellAddress> {
        let (start, end) = (self.start, self.end);
        (start.row..=end.row)
            .flat_map(move |row| (start.col..=end.col).map(move |col| CellAddress::new(row, col)))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}
