//! Tab expansion and the data/screen column mapping.
//!
//! This module owns the one conversion in each direction between a data
//! column (char index into a line) and a visual column (terminal cell,
//! before horizontal scroll). Everything else that needs a screen column,
//! including the cursor, the sticky column and the renderer, goes through
//! [`data_to_visual`] and [`visual_to_data`].
//!
//! A tab advances to the next multiple of the tab width. Every other char
//! advances exactly one cell; there is no wide-character handling.
//!
//! ```text
//! "ab\tcd", tab width 4
//!
//!  data:    a  b  \t       c  d
//!  visual:  0  1  2  3     4  5
//!                 └──┘ one tab, two cells
//! ```

/// Cells a tab occupies when it starts at visual column `col`. Always at
/// least 1.
#[inline]
#[must_use]
pub const fn tab_advance(col: usize, tab_width: usize) -> usize {
    let tab_w = if tab_width == 0 { 1 } else { tab_width };
    tab_w - col % tab_w
}

/// Cells `ch` occupies when it starts at visual column `col`.
#[inline]
#[must_use]
pub const fn char_advance(ch: char, col: usize, tab_width: usize) -> usize {
    if ch == '\t' { tab_advance(col, tab_width) } else { 1 }
}

/// Visual column of data column `x` on the line made of `chars`.
///
/// Columns past the end of the line count one cell each, so the result is
/// monotonic in `x`.
#[must_use]
pub fn data_to_visual<I: IntoIterator<Item = char>>(chars: I, x: usize, tab_width: usize) -> usize {
    let mut col = 0;
    let mut seen = 0;
    for ch in chars.into_iter().take(x) {
        col += char_advance(ch, col, tab_width);
        seen += 1;
    }
    col + (x - seen)
}

/// Data column under visual column `vx` on the line made of `chars`.
///
/// A cell in the middle of a tab resolves to the tab itself, the nearest
/// preceding data column. Cells past the end of the line resolve to the
/// line length.
#[must_use]
pub fn visual_to_data<I: IntoIterator<Item = char>>(chars: I, vx: usize, tab_width: usize) -> usize {
    let mut col = 0;
    let mut x = 0;
    for ch in chars {
        let next = col + char_advance(ch, col, tab_width);
        if vx < next {
            return x;
        }
        col = next;
        x += 1;
    }
    x
}

/// Total cells the line made of `chars` occupies.
#[must_use]
pub fn visual_width<I: IntoIterator<Item = char>>(chars: I, tab_width: usize) -> usize {
    chars
        .into_iter()
        .fold(0, |col, ch| col + char_advance(ch, col, tab_width))
}

/// The cells of a line with tabs replaced by spaces.
#[must_use]
pub fn expand_tabs<I: IntoIterator<Item = char>>(chars: I, tab_width: usize) -> String {
    let mut out = String::new();
    let mut col = 0;
    for ch in chars {
        let w = char_advance(ch, col, tab_width);
        if ch == '\t' {
            out.extend(std::iter::repeat_n(' ', w));
        } else {
            out.push(ch);
        }
        col += w;
    }
    out
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// Size of the text area in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    #[inline]
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Largest valid top line for a document of `line_count` lines.
    #[inline]
    #[must_use]
    pub const fn max_top(self, line_count: usize) -> usize {
        line_count.saturating_sub(self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
