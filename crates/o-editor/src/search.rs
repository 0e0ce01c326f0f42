//! Forward literal search, without wraparound.
//!
//! Searching starts strictly after the cursor: on the cursor line from the
//! next column, then every following line from column 0. It never wraps
//! back to the top. A miss puts the cursor back where the search began and
//! reports [`EditError::NotFound`].
//!
//! Matching is case-sensitive and literal. Columns are char offsets, so a
//! match after multi-byte text lands on the right data column.
//!
//! # Search flow
//!
//! 1. Ctrl-F opens a [`SearchState`] prompt, pre-filled with the last term
//!    and remembering the cursor position
//! 2. Keystrokes edit the term
//! 3. Enter runs [`SearchState::next`]
//! 4. Escape clears the term

use crate::document::Document;
use crate::editor::Editor;
use crate::error::{EditError, Result};
use crate::position::Position;

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// A search match: start position and length in chars.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub start: Position,
    pub len: usize,
}

// ---------------------------------------------------------------------------
// SearchState
// ---------------------------------------------------------------------------

/// The search term being typed, plus where the search started.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    needle: String,
    origin: Position,
}

impl SearchState {
    /// Start a search at `origin` with a pre-filled term.
    #[must_use]
    pub fn new(needle: impl Into<String>, origin: Position) -> Self {
        Self {
            needle: needle.into(),
            origin,
        }
    }

    #[inline]
    #[must_use]
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// The cursor position when the search began.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Position {
        self.origin
    }

    /// The line restored on a miss.
    #[inline]
    #[must_use]
    pub const fn line_before_search(&self) -> usize {
        self.origin.line
    }

    pub fn push(&mut self, ch: char) {
        self.needle.push(ch);
    }

    /// Remove the last char of the term. Returns `false` if it was empty.
    pub fn pop(&mut self) -> bool {
        self.needle.pop().is_some()
    }

    pub fn clear(&mut self) {
        self.needle.clear();
    }

    /// Move the cursor to the next match after it.
    ///
    /// # Errors
    ///
    /// [`EditError::NotFound`] when there is no match before the end of the
    /// document or the term is empty. The cursor goes back to the search
    /// origin.
    pub fn next(&self, editor: &mut Editor) -> Result<Position> {
        match find_forward(editor.doc(), &self.needle, editor.position()) {
            Some(m) => {
                editor.set_position(m.start)?;
                Ok(m.start)
            }
            None => {
                editor.jump_to(self.origin);
                Err(EditError::NotFound)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Search functions
// ---------------------------------------------------------------------------

/// First match of `needle` strictly after `from`.
///
/// On `from.line` the search covers columns `from.col + 1..`; a cursor on
/// or past the last char skips the line. Later lines are searched in full.
/// Returns `None` for an empty needle and never wraps.
#[must_use]
pub fn find_forward(doc: &Document, needle: &str, from: Position) -> Option<Match> {
    if needle.is_empty() {
        return None;
    }
    let len = needle.chars().count();

    for y in from.line..doc.line_count() {
        let Ok(line) = doc.line(y) else {
            break;
        };
        let start_col = if y == from.line {
            let next = from.col + 1;
            if next >= line.chars().count() {
                continue;
            }
            next
        } else {
            0
        };
        let start_byte = char_to_byte(&line, start_col);
        if let Some(idx) = line[start_byte..].find(needle) {
            let col = start_col + line[start_byte..start_byte + idx].chars().count();
            return Some(Match {
                start: Position::new(y, col),
                len,
            });
        }
    }
    None
}

/// All non-overlapping matches in lines `[start_line, end_line)`, in
/// document order. Used to highlight visible matches.
#[must_use]
pub fn find_all(doc: &Document, needle: &str, start_line: usize, end_line: usize) -> Vec<Match> {
    if needle.is_empty() {
        return Vec::new();
    }
    let len = needle.chars().count();
    let mut matches = Vec::new();

    for y in start_line..end_line.min(doc.line_count()) {
        let Ok(line) = doc.line(y) else {
            continue;
        };
        let mut from = 0;
        while let Some(idx) = line[from..].find(needle) {
            let abs = from + idx;
            matches.push(Match {
                start: Position::new(y, line[..abs].chars().count()),
                len,
            });
            from = abs + needle.len();
        }
    }
    matches
}

fn char_to_byte(s: &str, col: usize) -> usize {
    s.char_indices().nth(col).map_or(s.len(), |(b, _)| b)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
