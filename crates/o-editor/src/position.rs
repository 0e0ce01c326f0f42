//! Data and screen coordinate types.
//!
//! Two coordinate spaces exist and must never be confused:
//!
//! - **Data** ([`Position`]): `(line, col)` where `col` counts Unicode scalar
//!   values into the line. `col == line length` is the "after the last
//!   character" position and is valid.
//! - **Screen** ([`ScreenPos`]): `(x, y)` cell coordinates inside the text
//!   area, after tab expansion and after subtracting the scroll offsets.
//!
//! Both are 0-indexed. The conversions between them live in
//! [`view`](crate::view) and [`cursor`](crate::cursor).

use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A position in a document: (line, column), both 0-indexed.
///
/// Positions order lexicographically, line first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    /// The origin, line 0 column 0.
    pub const ZERO: Self = Self { line: 0, col: 0 };

    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// Same line, different column.
    #[inline]
    #[must_use]
    pub const fn with_col(self, col: usize) -> Self {
        Self { line: self.line, col }
    }
}

impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line
            .cmp(&other.line)
            .then(self.col.cmp(&other.col))
    }
}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.line, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-indexed for the status line.
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

// ---------------------------------------------------------------------------
// ScreenPos
// ---------------------------------------------------------------------------

/// A cell in the text area, relative to its top-left corner.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenPos {
    pub x: usize,
    pub y: usize,
}

impl ScreenPos {
    #[inline]
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Debug for ScreenPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Screen({},{})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_line_first() {
        assert!(Position::new(0, 50) < Position::new(1, 0));
        assert!(Position::new(2, 1) < Position::new(2, 3));
        assert_eq!(Position::new(4, 4).cmp(&Position::new(4, 4)), std::cmp::Ordering::Equal);
    }

    #[test]
    fn display_is_one_indexed() {
        assert_eq!(Position::new(0, 0).to_string(), "1:1");
        assert_eq!(Position::new(9, 3).to_string(), "10:4");
    }

    #[test]
    fn debug_formats() {
        assert_eq!(format!("{:?}", Position::new(2, 7)), "Pos(2:7)");
        assert_eq!(format!("{:?}", ScreenPos::new(5, 1)), "Screen(5,1)");
    }

    #[test]
    fn with_col_keeps_line() {
        assert_eq!(Position::new(3, 1).with_col(8), Position::new(3, 8));
    }

    #[test]
    fn zero_is_default() {
        assert_eq!(Position::default(), Position::ZERO);
        assert_eq!(ScreenPos::default(), ScreenPos::new(0, 0));
    }
}
