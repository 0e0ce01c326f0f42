//! Cursor, with scroll offsets and a sticky column.
//!
//! The `Cursor` holds the data position plus the viewport's scroll state:
//! the first visible line and the horizontal cell offset. Screen coordinates
//! are never stored; they are derived from the data position on demand via
//! [`view::data_to_visual`], so no cached column can drift from the text.
//!
//! # Sticky column
//!
//! `saved_x` is a *visual* column. Moving up or down lands on the char under
//! that column on the destination line, clamped to its end. Lines with tabs
//! above or below therefore keep the cursor in the same on-screen column
//! rather than the same char index. Horizontal movement, `home` and `end`
//! refresh it; vertical movement and scrolling leave it alone.
//!
//! # Errors vs. no-ops
//!
//! Explicit placement ([`set_position`](Cursor::set_position),
//! [`goto_line`](Cursor::goto_line)) fails on an invalid target without
//! moving. Relative moves stop at the document edges and report whether
//! they moved.

use crate::document::Document;
use crate::error::{EditError, Result};
use crate::position::{Position, ScreenPos};
use crate::view::{self, Viewport};

/// The cursor and the scroll offsets of the window showing it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cursor {
    pos: Position,
    /// Remembered visual column for vertical moves.
    saved_x: usize,
    /// First visible line (`scrollY`).
    top: usize,
    /// Cells scrolled off the left edge (`scrollX`).
    left: usize,
}

impl Cursor {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pos: Position::ZERO,
            saved_x: 0,
            top: 0,
            left: 0,
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    #[must_use]
    pub const fn line(&self) -> usize {
        self.pos.line
    }

    #[inline]
    #[must_use]
    pub const fn col(&self) -> usize {
        self.pos.col
    }

    /// The sticky visual column.
    #[inline]
    #[must_use]
    pub const fn saved_x(&self) -> usize {
        self.saved_x
    }

    #[inline]
    #[must_use]
    pub const fn top_line(&self) -> usize {
        self.top
    }

    #[inline]
    #[must_use]
    pub const fn left_col(&self) -> usize {
        self.left
    }

    /// True when the position satisfies the document bounds.
    #[must_use]
    pub fn is_valid(&self, doc: &Document) -> bool {
        doc.line_len(self.pos.line).is_ok_and(|len| self.pos.col <= len)
    }

    // -- Coordinates --------------------------------------------------------

    /// Visual column of the cursor, before horizontal scroll.
    #[must_use]
    pub fn visual_col(&self, doc: &Document, tab: usize) -> usize {
        visual_col_of(doc, self.pos, tab)
    }

    /// Screen cell of an arbitrary data position, or `None` when it lies
    /// above or left of the visible area. Positions below or right of the
    /// viewport still map; the caller compares against its size.
    #[must_use]
    pub fn to_screen(&self, doc: &Document, pos: Position, tab: usize) -> Option<ScreenPos> {
        let y = pos.line.checked_sub(self.top)?;
        let x = visual_col_of(doc, pos, tab).checked_sub(self.left)?;
        Some(ScreenPos::new(x, y))
    }

    /// Screen cell of the cursor itself.
    #[must_use]
    pub fn screen_pos(&self, doc: &Document, tab: usize) -> Option<ScreenPos> {
        self.to_screen(doc, self.pos, tab)
    }

    /// Data position under a screen cell. Rows past the document land on
    /// the last line; a cell inside a tab lands on the tab; a cell past the
    /// end of a line lands at its end.
    #[must_use]
    pub fn to_data(&self, doc: &Document, screen: ScreenPos, tab: usize) -> Position {
        let line = (self.top + screen.y).min(doc.last_line());
        let col = doc
            .line_slice(line)
            .map_or(0, |s| view::visual_to_data(s.chars(), self.left + screen.x, tab));
        Position::new(line, col)
    }

    // -- Placement ----------------------------------------------------------

    /// Move to `pos` and make its column sticky.
    ///
    /// # Errors
    ///
    /// Out-of-range line or column. The cursor does not move.
    pub fn set_position(&mut self, doc: &Document, pos: Position, tab: usize) -> Result<()> {
        let len = doc.line_len(pos.line)?;
        if pos.col > len {
            return Err(EditError::ColumnOutOfRange {
                line: pos.line,
                col: pos.col,
                len,
            });
        }
        self.pos = pos;
        self.save_x(doc, tab);
        Ok(())
    }

    /// Move to the start of line `y`.
    ///
    /// # Errors
    ///
    /// [`EditError::LineOutOfRange`] when `y` does not exist.
    pub fn goto_line(&mut self, doc: &Document, y: usize) -> Result<()> {
        doc.line_len(y)?;
        self.pos = Position::new(y, 0);
        self.saved_x = 0;
        Ok(())
    }

    /// Pull the position back inside the document after an external change,
    /// such as restoring a snapshot or shrinking a block.
    pub fn clamp(&mut self, doc: &Document) {
        self.pos.line = self.pos.line.min(doc.last_line());
        let len = doc.line_len(self.pos.line).unwrap_or(0);
        self.pos.col = self.pos.col.min(len);
    }

    /// Record the current visual column as the sticky column.
    pub fn save_x(&mut self, doc: &Document, tab: usize) {
        self.saved_x = self.visual_col(doc, tab);
    }

    // -- Horizontal movement ------------------------------------------------

    /// One char left. At column 0, `wrap` moves to the end of the previous
    /// line. Returns whether the cursor moved.
    pub fn move_left(&mut self, doc: &Document, wrap: bool, tab: usize) -> bool {
        if self.pos.col > 0 {
            self.pos.col -= 1;
        } else if wrap && self.pos.line > 0 {
            self.pos.line -= 1;
            self.pos.col = doc.line_len(self.pos.line).unwrap_or(0);
        } else {
            return false;
        }
        self.save_x(doc, tab);
        true
    }

    /// One char right. At the end of a line, `wrap` moves to the start of
    /// the next line. Returns whether the cursor moved.
    pub fn move_right(&mut self, doc: &Document, wrap: bool, tab: usize) -> bool {
        let len = doc.line_len(self.pos.line).unwrap_or(0);
        if self.pos.col < len {
            self.pos.col += 1;
        } else if wrap && self.pos.line < doc.last_line() {
            self.pos.line += 1;
            self.pos.col = 0;
        } else {
            return false;
        }
        self.save_x(doc, tab);
        true
    }

    /// Jump to the end of the line.
    pub fn end(&mut self, doc: &Document, tab: usize) {
        self.pos.col = doc.line_len(self.pos.line).unwrap_or(0);
        self.save_x(doc, tab);
    }

    /// Toggle between column 0 and the first non-space column. From
    /// anywhere other than the first non-space column, go there.
    pub fn home(&mut self, doc: &Document, tab: usize) {
        let first = doc.first_non_space(self.pos.line).unwrap_or(0);
        self.pos.col = if self.pos.col == first { 0 } else { first };
        self.save_x(doc, tab);
    }

    // -- Vertical movement --------------------------------------------------

    /// One line up, landing on the sticky column. Returns whether it moved.
    pub fn move_up(&mut self, doc: &Document, tab: usize) -> bool {
        if self.pos.line == 0 {
            return false;
        }
        self.pos.line -= 1;
        self.apply_saved_x(doc, tab);
        true
    }

    /// One line down, landing on the sticky column. Returns whether it moved.
    pub fn move_down(&mut self, doc: &Document, tab: usize) -> bool {
        if self.pos.line >= doc.last_line() {
            return false;
        }
        self.pos.line += 1;
        self.apply_saved_x(doc, tab);
        true
    }

    // -- Scrolling ----------------------------------------------------------

    /// Scroll the view up by `n` lines, taking the cursor along. If the view
    /// is already at the top, the cursor alone moves up. Returns whether
    /// the view moved.
    pub fn scroll_up(&mut self, doc: &Document, n: usize, tab: usize) -> bool {
        let new_top = self.top.saturating_sub(n);
        let delta = self.top - new_top;
        self.top = new_top;
        let step = if delta > 0 { delta } else { n };
        self.pos.line = self.pos.line.saturating_sub(step);
        self.apply_saved_x(doc, tab);
        delta > 0
    }

    /// Scroll the view down by `n` lines, taking the cursor along. The top
    /// line never passes `line_count - height`. If the view cannot move, the
    /// cursor alone moves down. Returns whether the view moved.
    pub fn scroll_down(&mut self, doc: &Document, n: usize, viewport: Viewport, tab: usize) -> bool {
        let max_top = viewport.max_top(doc.line_count());
        let new_top = self.top.saturating_add(n).min(max_top).max(self.top);
        let delta = new_top - self.top;
        self.top = new_top;
        let step = if delta > 0 { delta } else { n };
        self.pos.line = self.pos.line.saturating_add(step).min(doc.last_line());
        self.apply_saved_x(doc, tab);
        delta > 0
    }

    /// Adjust both scroll offsets so the cursor cell is inside `viewport`.
    pub fn ensure_visible(&mut self, doc: &Document, viewport: Viewport, tab: usize) {
        let height = viewport.height.max(1);
        if self.pos.line < self.top {
            self.top = self.pos.line;
        } else if self.pos.line >= self.top + height {
            self.top = self.pos.line + 1 - height;
        }
        // Don't leave blank rows below the last line unless the cursor needs them.
        let floor = self.pos.line.saturating_sub(height - 1);
        self.top = self.top.min(viewport.max_top(doc.line_count()).max(floor));

        let width = viewport.width.max(1);
        let vx = self.visual_col(doc, tab);
        if vx < self.left {
            self.left = vx;
        } else if vx >= self.left + width {
            self.left = vx + 1 - width;
        }
    }

    /// Put `line` in the middle of the viewport when possible.
    pub fn center_on(&mut self, doc: &Document, line: usize, viewport: Viewport) {
        let half = viewport.height / 2;
        self.top = line.saturating_sub(half).min(viewport.max_top(doc.line_count()));
    }

    // -- Internals ----------------------------------------------------------

    fn apply_saved_x(&mut self, doc: &Document, tab: usize) {
        self.pos.col = doc
            .line_slice(self.pos.line)
            .map_or(0, |s| view::visual_to_data(s.chars(), self.saved_x, tab));
    }
}

fn visual_col_of(doc: &Document, pos: Position, tab: usize) -> usize {
    doc.line_slice(pos.line)
        .map_or(pos.col, |s| view::data_to_visual(s.chars(), pos.col, tab))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TAB: usize = 4;

    fn doc(lines: &[&str]) -> Document {
        Document::from_lines(lines)
    }

    fn at(d: &Document, line: usize, col: usize) -> Cursor {
        let mut c = Cursor::new();
        c.set_position(d, Position::new(line, col), TAB).unwrap();
        c
    }

    // -- Coordinates --------------------------------------------------------

    #[test]
    fn screen_column_expands_tabs() {
        let d = doc(&["ab\tcd"]);
        let c = at(&d, 0, 3);
        assert_eq!(c.screen_pos(&d, TAB), Some(ScreenPos::new(4, 0)));
    }

    #[test]
    fn screen_subtracts_scroll() {
        let d = doc(&["0", "1", "2", "\t\tx"]);
        let mut c = at(&d, 3, 2);
        c.top = 2;
        c.left = 3;
        assert_eq!(c.screen_pos(&d, TAB), Some(ScreenPos::new(5, 1)));
        assert_eq!(c.to_screen(&d, Position::new(1, 0), TAB), None);
    }

    #[test]
    fn to_data_inverts_to_screen() {
        let d = doc(&["a\tb", "\t\tz"]);
        let c = Cursor::new();
        assert_eq!(c.to_data(&d, ScreenPos::new(2, 0), TAB), Position::new(0, 1));
        assert_eq!(c.to_data(&d, ScreenPos::new(8, 1), TAB), Position::new(1, 2));
        assert_eq!(c.to_data(&d, ScreenPos::new(99, 1), TAB), Position::new(1, 3));
        assert_eq!(c.to_data(&d, ScreenPos::new(0, 9), TAB), Position::new(1, 0));
    }

    // -- Placement ----------------------------------------------------------

    #[test]
    fn set_position_rejects_bad_targets() {
        let d = doc(&["ab", "c"]);
        let mut c = at(&d, 0, 1);
        assert!(c.set_position(&d, Position::new(2, 0), TAB).is_err());
        assert!(c.set_position(&d, Position::new(1, 2), TAB).is_err());
        assert_eq!(c.position(), Position::new(0, 1));
        assert!(c.set_position(&d, Position::new(0, 2), TAB).is_ok());
    }

    #[test]
    fn clamp_after_document_shrinks() {
        let big = doc(&["hello", "world"]);
        let mut c = at(&big, 1, 5);
        c.clamp(&doc(&["hi"]));
        assert_eq!(c.position(), Position::new(0, 2));
    }

    // -- Horizontal ---------------------------------------------------------

    #[test]
    fn left_right_without_wrap_stop_at_edges() {
        let d = doc(&["ab", "cd"]);
        let mut c = at(&d, 1, 0);
        assert!(!c.move_left(&d, false, TAB));
        assert_eq!(c.position(), Position::new(1, 0));
        let mut c = at(&d, 0, 2);
        assert!(!c.move_right(&d, false, TAB));
    }

    #[test]
    fn left_right_with_wrap_cross_lines() {
        let d = doc(&["ab", "cd"]);
        let mut c = at(&d, 1, 0);
        assert!(c.move_left(&d, true, TAB));
        assert_eq!(c.position(), Position::new(0, 2));
        assert!(c.move_right(&d, true, TAB));
        assert_eq!(c.position(), Position::new(1, 0));
        let mut c = at(&d, 1, 2);
        assert!(!c.move_right(&d, true, TAB));
    }

    #[test]
    fn home_toggles() {
        let d = doc(&["    code"]);
        let mut c = at(&d, 0, 6);
        c.home(&d, TAB);
        assert_eq!(c.col(), 4);
        c.home(&d, TAB);
        assert_eq!(c.col(), 0);
        c.home(&d, TAB);
        assert_eq!(c.col(), 4);
    }

    #[test]
    fn home_on_unindented_line_goes_to_zero() {
        let d = doc(&["code"]);
        let mut c = at(&d, 0, 2);
        c.home(&d, TAB);
        assert_eq!(c.col(), 0);
        c.home(&d, TAB);
        assert_eq!(c.col(), 0);
    }

    #[test]
    fn end_goes_past_last_char() {
        let d = doc(&["hello"]);
        let mut c = at(&d, 0, 0);
        c.end(&d, TAB);
        assert_eq!(c.col(), 5);
    }

    // -- Vertical -----------------------------------------------------------

    #[test]
    fn sticky_column_survives_short_line() {
        let d = doc(&["long line here", "ab", "another long one"]);
        let mut c = at(&d, 0, 10);
        assert!(c.move_down(&d, TAB));
        assert_eq!(c.position(), Position::new(1, 2));
        assert!(c.move_down(&d, TAB));
        assert_eq!(c.position(), Position::new(2, 10));
    }

    #[test]
    fn sticky_column_is_visual() {
        // Column 8 on screen: char 8 on a plain line, char 2 after two tabs.
        let d = doc(&["abcdefghij", "\t\txyz"]);
        let mut c = at(&d, 0, 8);
        c.move_down(&d, TAB);
        assert_eq!(c.position(), Position::new(1, 2));
        c.move_up(&d, TAB);
        assert_eq!(c.position(), Position::new(0, 8));
    }

    #[test]
    fn vertical_stops_at_edges() {
        let d = doc(&["a", "b"]);
        let mut c = at(&d, 0, 0);
        assert!(!c.move_up(&d, TAB));
        c.move_down(&d, TAB);
        assert!(!c.move_down(&d, TAB));
        assert_eq!(c.line(), 1);
    }

    #[test]
    fn goto_line_checks_bounds() {
        let d = doc(&["a", "b", "c"]);
        let mut c = Cursor::new();
        c.goto_line(&d, 2).unwrap();
        assert_eq!(c.position(), Position::new(2, 0));
        assert!(c.goto_line(&d, 3).is_err());
        assert_eq!(c.line(), 2);
    }

    // -- Scrolling ----------------------------------------------------------

    fn numbered(n: usize) -> Document {
        let lines: Vec<String> = (0..n).map(|i| i.to_string()).collect();
        Document::from_lines(&lines)
    }

    #[test]
    fn scroll_down_clamps_to_last_page() {
        let d = numbered(30);
        let vp = Viewport::new(80, 10);
        let mut c = Cursor::new();
        assert!(c.scroll_down(&d, 15, vp, TAB));
        assert_eq!(c.top_line(), 15);
        assert_eq!(c.line(), 15);
        assert!(c.scroll_down(&d, 15, vp, TAB));
        assert_eq!(c.top_line(), 20);
        assert_eq!(c.line(), 20);
        assert!(!c.scroll_down(&d, 15, vp, TAB));
        assert_eq!(c.top_line(), 20);
        assert_eq!(c.line(), 29);
    }

    #[test]
    fn scroll_up_clamps_to_zero() {
        let d = numbered(30);
        let vp = Viewport::new(80, 10);
        let mut c = Cursor::new();
        c.scroll_down(&d, 12, vp, TAB);
        assert!(c.scroll_up(&d, 5, TAB));
        assert_eq!((c.top_line(), c.line()), (7, 7));
        assert!(c.scroll_up(&d, 50, TAB));
        assert_eq!((c.top_line(), c.line()), (0, 0));
        assert!(!c.scroll_up(&d, 1, TAB));
    }

    #[test]
    fn huge_scroll_step_saturates() {
        let d = numbered(30);
        let vp = Viewport::new(80, 10);
        let mut c = Cursor::new();
        assert!(c.scroll_down(&d, usize::MAX, vp, TAB));
        assert_eq!((c.top_line(), c.line()), (20, 20));
        assert!(!c.scroll_down(&d, usize::MAX, vp, TAB));
        assert_eq!((c.top_line(), c.line()), (20, 29));
    }

    #[test]
    fn short_document_never_scrolls() {
        let d = numbered(3);
        let vp = Viewport::new(80, 10);
        let mut c = Cursor::new();
        assert!(!c.scroll_down(&d, 10, vp, TAB));
        assert_eq!(c.top_line(), 0);
        assert_eq!(c.line(), 2);
    }

    #[test]
    fn ensure_visible_follows_cursor() {
        let d = numbered(50);
        let vp = Viewport::new(4, 10);
        let mut c = Cursor::new();
        c.goto_line(&d, 30).unwrap();
        c.ensure_visible(&d, vp, TAB);
        assert_eq!(c.top_line(), 21);
        c.goto_line(&d, 5).unwrap();
        c.ensure_visible(&d, vp, TAB);
        assert_eq!(c.top_line(), 5);
    }

    #[test]
    fn ensure_visible_scrolls_horizontally() {
        let d = doc(&["0123456789abcdef"]);
        let vp = Viewport::new(4, 10);
        let mut c = at(&d, 0, 10);
        c.ensure_visible(&d, vp, TAB);
        assert_eq!(c.left_col(), 7);
        assert_eq!(c.screen_pos(&d, TAB), Some(ScreenPos::new(3, 0)));
        c.set_position(&d, Position::new(0, 2), TAB).unwrap();
        c.ensure_visible(&d, vp, TAB);
        assert_eq!(c.left_col(), 2);
    }

    #[test]
    fn center_on_line() {
        let d = numbered(100);
        let vp = Viewport::new(80, 20);
        let mut c = Cursor::new();
        c.center_on(&d, 50, vp);
        assert_eq!(c.top_line(), 40);
        c.center_on(&d, 99, vp);
        assert_eq!(c.top_line(), 80);
    }
}
