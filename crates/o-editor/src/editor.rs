//! Editor, the controller that keeps document and cursor consistent.
//!
//! Every method that mutates the [`Document`] also places the [`Cursor`]
//! and scrolls the view so the cursor stays visible. After any call, the
//! cursor line exists and its column is at most the line length.
//!
//! The editor does not snapshot for undo. The caller (normally the
//! [`Session`](crate::session::Session)) takes an
//! [`UndoStack::snapshot`](crate::undo::UndoStack::snapshot) before each
//! mutating command.
//!
//! # Enter
//!
//! The line is right-trimmed first, then exactly one of five actions runs,
//! chosen in this order by [`Editor::classify_enter`]:
//!
//! | # | Cursor                                  | Action                                |
//! |---|-----------------------------------------|---------------------------------------|
//! | 1 | column 0, not the first line            | open a line above, stay on the text   |
//! | 2 | at or before the first non-space column | open a line above, keep the column    |
//! | 3 | at end of line, last line               | open an indented line below           |
//! | 4 | at end of line, elsewhere               | open an indented line below           |
//! | 5 | inside the text                         | split the line at the cursor          |
//!
//! "Indented" means the old line's leading whitespace, plus one indent unit
//! when the trimmed line ends with `(`, `{` or `[`.

use std::ops::Range;
use std::path::Path;

use crate::cursor::Cursor;
use crate::document::Document;
use crate::error::Result;
use crate::options::Options;
use crate::position::{Position, ScreenPos};
use crate::view::Viewport;

/// Closing brackets that trigger smart dedent.
const DEDENT_CHARS: [char; 3] = ['}', ']', ')'];

/// Line endings that trigger smart indent on Enter.
const INDENT_CHARS: [char; 3] = ['(', '{', '['];

/// Which of the five Enter behaviors applies at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterAction {
    /// Insert an empty line above; the cursor goes to column 0 of the text.
    OpenAbove,
    /// Insert an empty line above; the cursor keeps its column.
    OpenAboveKeepColumn,
    /// Open an indented line below the last line.
    OpenBelowLast,
    /// Open an indented line below.
    OpenBelow,
    /// Break the line at the cursor.
    Split,
}

/// Document, cursor, options and viewport, edited as one unit.
#[derive(Debug, Clone)]
pub struct Editor {
    doc: Document,
    cursor: Cursor,
    options: Options,
    viewport: Viewport,
}

impl Editor {
    #[must_use]
    pub fn new(doc: Document, options: Options) -> Self {
        Self {
            doc,
            cursor: Cursor::new(),
            options,
            viewport: Viewport::default(),
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn doc(&self) -> &Document {
        &self.doc
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    #[inline]
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.cursor.position()
    }

    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.doc.line_count()
    }

    /// # Errors
    ///
    /// [`EditError::LineOutOfRange`](crate::error::EditError::LineOutOfRange).
    pub fn line(&self, y: usize) -> Result<String> {
        self.doc.line(y)
    }

    /// The line under the cursor.
    #[must_use]
    pub fn current_line(&self) -> String {
        self.doc.line(self.cursor.line()).unwrap_or_default()
    }

    /// Cursor cell inside the text area.
    #[must_use]
    pub fn screen_cursor(&self) -> Option<ScreenPos> {
        self.cursor.screen_pos(&self.doc, self.options.tab_width)
    }

    /// Whitespace-separated words in the whole document.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.doc
            .to_lines()
            .iter()
            .map(|l| l.split_whitespace().count())
            .sum()
    }

    /// True when the cursor satisfies the document bounds.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.cursor.is_valid(&self.doc)
    }

    // -- State replacement --------------------------------------------------

    /// Swap in a previously captured document and cursor as they were.
    pub fn restore_state(&mut self, doc: Document, cursor: Cursor) {
        self.doc = doc;
        self.cursor = cursor;
        self.cursor.clamp(&self.doc);
    }

    /// Resize the text area and bring the cursor back into view.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.follow();
    }

    pub const fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    /// Mutable access for saving. Content edits go through the editor.
    pub const fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    // -- Navigation ---------------------------------------------------------

    /// # Errors
    ///
    /// Out-of-range target; the cursor does not move.
    pub fn set_position(&mut self, pos: Position) -> Result<()> {
        self.cursor.set_position(&self.doc, pos, self.options.tab_width)?;
        self.follow();
        Ok(())
    }

    /// Jump to a line, clamping the position back inside the document.
    pub fn jump_to(&mut self, pos: Position) {
        let line = pos.line.min(self.doc.last_line());
        let col = pos.col.min(self.doc.line_len(line).unwrap_or(0));
        self.place(Position::new(line, col));
    }

    /// Go to a 1-based line number, clamped to the document, and center it.
    /// Returns the 0-based line reached.
    pub fn go_to_line_number(&mut self, number: usize) -> usize {
        let y = number.saturating_sub(1).min(self.doc.last_line());
        self.place(Position::new(y, 0));
        self.cursor.center_on(&self.doc, y, self.viewport);
        self.follow();
        y
    }

    pub fn move_left(&mut self, wrap: bool) -> bool {
        let moved = self.cursor.move_left(&self.doc, wrap, self.options.tab_width);
        self.follow();
        moved
    }

    pub fn move_right(&mut self, wrap: bool) -> bool {
        let moved = self.cursor.move_right(&self.doc, wrap, self.options.tab_width);
        self.follow();
        moved
    }

    pub fn move_up(&mut self) -> bool {
        let moved = self.cursor.move_up(&self.doc, self.options.tab_width);
        self.follow();
        moved
    }

    pub fn move_down(&mut self) -> bool {
        let moved = self.cursor.move_down(&self.doc, self.options.tab_width);
        self.follow();
        moved
    }

    pub fn home(&mut self) {
        self.cursor.home(&self.doc, self.options.tab_width);
        self.follow();
    }

    pub fn end(&mut self) {
        self.cursor.end(&self.doc, self.options.tab_width);
        self.follow();
    }

    /// End of line; when already there, end of the next line.
    pub fn end_or_next(&mut self) {
        let len = self.doc.line_len(self.cursor.line()).unwrap_or(0);
        if self.cursor.col() >= len {
            self.cursor.move_down(&self.doc, self.options.tab_width);
        }
        self.end();
    }

    /// Scroll down by the configured scroll speed. Returns whether the view
    /// moved.
    pub fn page_down(&mut self) -> bool {
        let moved = self.cursor.scroll_down(
            &self.doc,
            self.options.scroll_speed,
            self.viewport,
            self.options.tab_width,
        );
        self.follow();
        moved
    }

    /// Scroll up by the configured scroll speed. Returns whether the view
    /// moved.
    pub fn page_up(&mut self) -> bool {
        let moved = self
            .cursor
            .scroll_up(&self.doc, self.options.scroll_speed, self.options.tab_width);
        self.follow();
        moved
    }

    // -- Typing -------------------------------------------------------------

    /// Insert `ch` at the cursor and step past it.
    ///
    /// # Errors
    ///
    /// Only if the cursor was already invalid.
    pub fn insert_rune(&mut self, ch: char) -> Result<()> {
        let pos = self.cursor.position();
        self.doc.insert_rune_at(pos.line, pos.col, ch)?;
        self.place(Position::new(pos.line, pos.col + 1));
        Ok(())
    }

    /// Insert typed text: [`insert_rune`](Self::insert_rune) with smart
    /// dedent for closing brackets.
    ///
    /// Typing `}`, `]` or `)` on a line that is only indentation removes
    /// one column of indentation before the cursor and everything after it.
    ///
    /// # Errors
    ///
    /// Only if the cursor was already invalid.
    pub fn type_rune(&mut self, ch: char) -> Result<()> {
        if DEDENT_CHARS.contains(&ch) {
            let Position { line, col } = self.cursor.position();
            if col > 0 && self.doc.is_blank(line)? && self.doc.first_non_space(line)? > 0 {
                self.doc.truncate_line(line, col - 1)?;
                self.place(Position::new(line, col - 1));
            }
        }
        self.insert_rune(ch)
    }

    /// Insert one indent unit (`\t`, or spaces with `expandtab`).
    ///
    /// # Errors
    ///
    /// Only if the cursor was already invalid.
    pub fn insert_tab(&mut self) -> Result<()> {
        let Position { line, col } = self.cursor.position();
        let unit = self.options.indent_unit();
        self.doc.insert_str_at(line, col, &unit)?;
        self.place(Position::new(line, col + unit.chars().count()));
        Ok(())
    }

    /// Insert `text` at the cursor and move to its end. A `\n` in `text`
    /// breaks the line there. No indent logic runs.
    ///
    /// # Errors
    ///
    /// Only if the cursor was already invalid.
    pub fn insert_text(&mut self, text: &str) -> Result<()> {
        let pos = self.cursor.position();
        self.doc.insert_str_at(pos.line, pos.col, text)?;
        let end = match text.rsplit_once('\n') {
            Some((_, tail)) => Position::new(
                pos.line + text.matches('\n').count(),
                tail.chars().count(),
            ),
            None => pos.with_col(pos.col + text.chars().count()),
        };
        self.place(end);
        Ok(())
    }

    /// Insert the contents of the file at `path` at the cursor, including
    /// its final newline when it has one. Returns the number of lines the
    /// file held.
    ///
    /// # Errors
    ///
    /// The load errors of [`Document::load`]. The editor is untouched then.
    pub fn insert_file(&mut self, path: &Path) -> Result<usize> {
        let other = Document::load(path)?;
        let mut text = other.text();
        if other.has_trailing_newline() {
            text.push('\n');
        }
        self.insert_text(&text)?;
        Ok(other.line_count())
    }

    // -- Enter --------------------------------------------------------------

    /// Which Enter behavior applies at the cursor, judged on the line as it
    /// is (call after trimming to match [`enter`](Self::enter)).
    ///
    /// # Errors
    ///
    /// Only if the cursor was already invalid.
    pub fn classify_enter(&self) -> Result<EnterAction> {
        let Position { line, col } = self.cursor.position();
        let len = self.doc.line_len(line)?;
        let first = self.doc.first_non_space(line)?;
        Ok(if col == 0 && line > 0 {
            EnterAction::OpenAbove
        } else if col <= first {
            EnterAction::OpenAboveKeepColumn
        } else if col >= len && line == self.doc.last_line() {
            EnterAction::OpenBelowLast
        } else if col >= len {
            EnterAction::OpenBelow
        } else {
            EnterAction::Split
        })
    }

    /// Break the line, open a new one, or split, per the table in the
    /// module docs. Returns the action taken.
    ///
    /// # Errors
    ///
    /// Only if the cursor was already invalid.
    pub fn enter(&mut self) -> Result<EnterAction> {
        let y = self.cursor.line();
        self.doc.trim_right(y)?;
        self.cursor.clamp(&self.doc);
        let col = self.cursor.col();

        let action = self.classify_enter()?;
        match action {
            EnterAction::OpenAbove => {
                self.doc.insert_line_at(y, "")?;
                self.place(Position::new(y + 1, 0));
            }
            EnterAction::OpenAboveKeepColumn => {
                self.doc.insert_line_at(y, "")?;
                self.place(Position::new(y + 1, col));
            }
            EnterAction::OpenBelowLast | EnterAction::OpenBelow => self.open_below_indented(y)?,
            EnterAction::Split => {
                if self.doc.split_line_at(y, col).is_ok() {
                    self.doc.trim_right(y)?;
                    self.place(Position::new(y + 1, 0));
                } else {
                    self.open_below_indented(y)?;
                }
            }
        }
        Ok(action)
    }

    fn open_below_indented(&mut self, y: usize) -> Result<()> {
        let mut indent = self.doc.leading_whitespace(y)?;
        let trimmed = self.doc.line(y)?;
        if trimmed.trim_end().ends_with(INDENT_CHARS) {
            indent.push_str(&self.options.indent_unit());
        }
        self.doc.insert_line_at(y + 1, &indent)?;
        self.place(Position::new(y + 1, indent.chars().count()));
        Ok(())
    }

    // -- Deletion -----------------------------------------------------------

    /// Backspace.
    ///
    /// - On an empty line: delete it and go to the end of the line above
    ///   (trimmed).
    /// - At column 0 of any other line: join it onto the trimmed line above.
    /// - Otherwise: delete the char left of the cursor.
    ///
    /// # Errors
    ///
    /// Only if the cursor was already invalid.
    pub fn backspace(&mut self) -> Result<()> {
        let Position { line, col } = self.cursor.position();
        if self.doc.line_len(line)? == 0 {
            self.doc.delete_line_at(line)?;
            let up = line.saturating_sub(1).min(self.doc.last_line());
            let len = self.doc.trim_right(up)?;
            self.place(Position::new(up, len));
        } else if col == 0 {
            if line > 0 {
                let len = self.doc.trim_right(line - 1)?;
                self.doc.join_line_with_next(line - 1)?;
                self.place(Position::new(line - 1, len));
            }
        } else {
            self.doc.delete_rune_at(line, col - 1)?;
            self.place(Position::new(line, col - 1));
        }
        Ok(())
    }

    /// Delete the char under the cursor; at end of line, join the next line.
    /// Returns `false` when there was nothing to delete.
    ///
    /// # Errors
    ///
    /// Only if the cursor was already invalid.
    pub fn delete(&mut self) -> Result<bool> {
        let Position { line, col } = self.cursor.position();
        let changed = if col < self.doc.line_len(line)? {
            self.doc.delete_rune_at(line, col)?;
            true
        } else {
            self.doc.join_line_with_next(line)?
        };
        self.follow();
        Ok(changed)
    }

    /// Delete from the cursor to the end of the line. If that leaves the
    /// line blank, delete the line too.
    ///
    /// # Errors
    ///
    /// Only if the cursor was already invalid.
    pub fn delete_rest_of_line(&mut self) -> Result<()> {
        let Position { line, col } = self.cursor.position();
        self.doc.truncate_line(line, col)?;
        if self.doc.is_blank(line)? {
            self.doc.delete_line_at(line)?;
        }
        self.jump_to(Position::new(line, col));
        Ok(())
    }

    // -- Whole lines --------------------------------------------------------

    /// Replace line `y` and keep the cursor valid.
    ///
    /// # Errors
    ///
    /// [`EditError::LineOutOfRange`](crate::error::EditError::LineOutOfRange).
    pub fn set_line(&mut self, y: usize, text: &str) -> Result<()> {
        self.doc.set_line(y, text)?;
        self.jump_to(self.cursor.position());
        Ok(())
    }

    /// The cursor line, for the clipboard.
    #[must_use]
    pub fn copy_line(&self) -> String {
        self.current_line()
    }

    /// Remove the cursor line and return it.
    ///
    /// # Errors
    ///
    /// Only if the cursor was already invalid.
    pub fn cut_line(&mut self) -> Result<String> {
        let pos = self.cursor.position();
        let text = self.doc.line(pos.line)?;
        self.doc.delete_line_at(pos.line)?;
        self.jump_to(pos);
        Ok(text)
    }

    /// Replace the cursor line with `text` and go to its end.
    ///
    /// # Errors
    ///
    /// Only if the cursor was already invalid.
    pub fn paste_line(&mut self, text: &str) -> Result<()> {
        self.doc.set_line(self.cursor.line(), text)?;
        self.cursor.clamp(&self.doc);
        self.end();
        Ok(())
    }

    /// Open an empty line below the cursor line and move onto it.
    ///
    /// # Errors
    ///
    /// Only if the cursor was already invalid.
    pub fn insert_line_below(&mut self) -> Result<()> {
        let y = self.cursor.line();
        self.doc.insert_line_at(y + 1, "")?;
        self.place(Position::new(y + 1, 0));
        Ok(())
    }

    /// Open an empty line above the cursor line and move onto it.
    ///
    /// # Errors
    ///
    /// Only if the cursor was already invalid.
    pub fn insert_line_above(&mut self) -> Result<()> {
        let y = self.cursor.line();
        self.doc.insert_line_at(y, "")?;
        self.place(Position::new(y, 0));
        Ok(())
    }

    // -- Blocks -------------------------------------------------------------

    /// The block around line `y`: the maximal run of non-blank lines
    /// containing it. A blank line is a block of its own.
    ///
    /// # Errors
    ///
    /// [`EditError::LineOutOfRange`](crate::error::EditError::LineOutOfRange).
    pub fn block_range(&self, y: usize) -> Result<Range<usize>> {
        if self.doc.is_blank(y)? {
            return Ok(y..y + 1);
        }
        let mut start = y;
        while start > 0 && !self.doc.is_blank(start - 1)? {
            start -= 1;
        }
        let mut end = y + 1;
        while end < self.doc.line_count() && !self.doc.is_blank(end)? {
            end += 1;
        }
        Ok(start..end)
    }

    /// The block around line `y`, each line followed by `\n`.
    ///
    /// # Errors
    ///
    /// [`EditError::LineOutOfRange`](crate::error::EditError::LineOutOfRange).
    pub fn block_text(&self, y: usize) -> Result<String> {
        let mut out = String::new();
        for line in self.block_range(y)? {
            out.push_str(&self.doc.line(line)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Replace the block around `anchor` with `text`. One trailing newline
    /// in `text` is dropped; remaining newlines separate lines. The cursor
    /// keeps its place relative to the block.
    ///
    /// # Errors
    ///
    /// [`EditError::LineOutOfRange`](crate::error::EditError::LineOutOfRange)
    /// when `anchor` is outside the document.
    pub fn replace_block(&mut self, anchor: Position, text: &str) -> Result<Range<usize>> {
        let old = self.block_range(anchor.line)?;
        let body = text.strip_suffix('\n').unwrap_or(text);
        let new_len = body.split('\n').count();
        self.doc.replace_lines(old.clone(), body)?;

        let new = old.start..old.start + new_len;
        let Position { line, col } = self.cursor.position();
        let line = if line >= old.end {
            line - old.len() + new_len
        } else if line >= old.start {
            line.min(new.end - 1)
        } else {
            line
        };
        self.jump_to(Position::new(line, col));
        Ok(new)
    }

    // -- Internals ----------------------------------------------------------

    /// Put the cursor at a position the caller just made valid.
    fn place(&mut self, pos: Position) {
        if self.cursor.set_position(&self.doc, pos, self.options.tab_width).is_err() {
            self.cursor.clamp(&self.doc);
        }
        self.follow();
    }

    fn follow(&mut self) {
        self.cursor
            .ensure_visible(&self.doc, self.viewport, self.options.tab_width);
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Document::new(), Options::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
