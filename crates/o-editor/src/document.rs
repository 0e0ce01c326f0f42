//! Document, the line store every edit goes through.
//!
//! A `Document` wraps a [`ropey::Rope`] holding the lines joined by `\n`,
//! without a final newline. Whether the file on disk ended in a newline is
//! tracked separately so that saving reproduces the original bytes exactly.
//!
//! # Design choices
//!
//! - **Only `\n` breaks lines.** ropey is built without its CR and Unicode
//!   line-break features, so `\r`, U+0085 and U+2028 are ordinary
//!   characters inside a line and survive a load/save round trip.
//!
//! - **Columns are char offsets.** Column 3 of `"café!"` is `'!'`. Byte
//!   offsets never reach the public API.
//!
//! - **At least one line.** An empty document is a single empty line, and
//!   deleting the last remaining line leaves one empty line behind.
//!
//! - **Errors instead of clamping.** Index-taking methods return
//!   [`EditError::LineOutOfRange`] or [`EditError::ColumnOutOfRange`] and
//!   leave the document untouched. The two documented exceptions are
//!   deleting the only line and joining the last line.
//!
//! - **Clones are snapshots.** Cloning a rope shares its tree and copies on
//!   write, so a cloned `Document` is independent of the original and cheap
//!   to take before every keystroke.

use std::fmt;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use ropey::{Rope, RopeSlice};
use tracing::debug;

use crate::error::{EditError, Result};

/// Characters treated as indentation and as trailing whitespace.
///
/// Deliberately narrow: a `\r` left over from a CRLF file is content, not
/// whitespace, so trimming never eats it.
#[inline]
#[must_use]
pub const fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t')
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// An ordered sequence of lines backed by a rope.
#[derive(Clone)]
pub struct Document {
    rope: Rope,
    path: Option<PathBuf>,
    changed: bool,
    trailing_newline: bool,
}

impl Document {
    // -- Construction -------------------------------------------------------

    /// One empty line. New documents are saved with a final newline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            path: None,
            changed: false,
            trailing_newline: true,
        }
    }

    /// Parse file contents. A single final `\n` is recorded in the trailing
    /// newline flag rather than producing an extra empty line.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let (body, trailing_newline) = match text.strip_suffix('\n') {
            Some(body) => (body, true),
            None => (text, false),
        };
        Self {
            rope: Rope::from_str(body),
            path: None,
            changed: false,
            trailing_newline,
        }
    }

    /// Build a document from individual lines (none may contain `\n`).
    #[must_use]
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut body = String::new();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                body.push('\n');
            }
            body.push_str(line.as_ref());
        }
        Self {
            rope: Rope::from_str(&body),
            path: None,
            changed: false,
            trailing_newline: true,
        }
    }

    /// Read a document from disk.
    ///
    /// # Errors
    ///
    /// [`EditError::FileNotFound`], [`EditError::IsDirectory`] and
    /// [`EditError::PermissionDenied`] for the matching conditions, and
    /// [`EditError::Io`] for anything else, including invalid UTF-8.
    pub fn load(path: &Path) -> Result<Self> {
        let meta = fs::metadata(path).map_err(|e| EditError::from_open(e, path.to_path_buf()))?;
        if meta.is_dir() {
            return Err(EditError::IsDirectory {
                path: path.to_path_buf(),
            });
        }
        let bytes = fs::read(path).map_err(|e| EditError::from_open(e, path.to_path_buf()))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| EditError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

        let mut doc = Self::from_text(&text);
        doc.path = Some(path.to_path_buf());
        debug!(
            path = %path.display(),
            lines = doc.line_count(),
            trailing_newline = doc.trailing_newline,
            "loaded document"
        );
        Ok(doc)
    }

    /// Load `path`, or start an empty document bound to it when it does not
    /// exist yet.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load) except that a missing file is not an error.
    pub fn load_or_new(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(EditError::FileNotFound { .. }) => {
                let mut doc = Self::new();
                doc.path = Some(path.to_path_buf());
                Ok(doc)
            }
            other => other,
        }
    }

    // -- Line access --------------------------------------------------------

    /// Number of lines. Never zero.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Index of the last line.
    #[inline]
    #[must_use]
    pub fn last_line(&self) -> usize {
        self.line_count() - 1
    }

    /// Content of line `y`, without its line break.
    ///
    /// # Errors
    ///
    /// [`EditError::LineOutOfRange`] when `y >= line_count()`.
    pub fn line_slice(&self, y: usize) -> Result<RopeSlice<'_>> {
        self.check_line(y)?;
        let start = self.rope.line_to_char(y);
        Ok(self.rope.slice(start..start + self.content_len(y)))
    }

    /// Owned copy of line `y`.
    ///
    /// # Errors
    ///
    /// [`EditError::LineOutOfRange`] when `y >= line_count()`.
    pub fn line(&self, y: usize) -> Result<String> {
        self.line_slice(y).map(|s| s.to_string())
    }

    /// Number of chars on line `y`, line break excluded.
    ///
    /// # Errors
    ///
    /// [`EditError::LineOutOfRange`] when `y >= line_count()`.
    pub fn line_len(&self, y: usize) -> Result<usize> {
        self.check_line(y)?;
        Ok(self.content_len(y))
    }

    /// The char at `(y, x)`, or `None` past the end of the line.
    #[must_use]
    pub fn char_at(&self, y: usize, x: usize) -> Option<char> {
        let line = self.line_slice(y).ok()?;
        (x < line.len_chars()).then(|| line.char(x))
    }

    /// Leading spaces and tabs of line `y`.
    ///
    /// # Errors
    ///
    /// [`EditError::LineOutOfRange`] when `y >= line_count()`.
    pub fn leading_whitespace(&self, y: usize) -> Result<String> {
        Ok(self.line_slice(y)?.chars().take_while(|c| is_space(*c)).collect())
    }

    /// Column of the first non-space char of line `y` (the line length when
    /// the line is blank).
    ///
    /// # Errors
    ///
    /// [`EditError::LineOutOfRange`] when `y >= line_count()`.
    pub fn first_non_space(&self, y: usize) -> Result<usize> {
        Ok(self.line_slice(y)?.chars().take_while(|c| is_space(*c)).count())
    }

    /// True when line `y` is empty or only spaces and tabs.
    ///
    /// # Errors
    ///
    /// [`EditError::LineOutOfRange`] when `y >= line_count()`.
    pub fn is_blank(&self, y: usize) -> Result<bool> {
        Ok(self.line_slice(y)?.chars().all(is_space))
    }

    /// True for a document that is a single empty line.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// All lines as owned strings.
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        (0..self.line_count())
            .map(|y| {
                let start = self.rope.line_to_char(y);
                self.rope.slice(start..start + self.content_len(y)).to_string()
            })
            .collect()
    }

    /// The lines joined with `\n`, without the final newline.
    #[must_use]
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// The exact bytes [`save`](Self::save) would write.
    ///
    /// With `trim`, trailing spaces and tabs are dropped from every line of
    /// the output. The document itself is not modified.
    #[must_use]
    pub fn serialize(&self, trim: bool) -> String {
        let mut out = String::with_capacity(self.rope.len_bytes() + 1);
        for (i, line) in self.to_lines().iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            if trim {
                out.push_str(line.trim_end_matches(is_space));
            } else {
                out.push_str(line);
            }
        }
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }

    // -- Line-level editing -------------------------------------------------

    /// Replace the content of line `y`. A `\n` inside `text` splits it into
    /// several lines.
    ///
    /// # Errors
    ///
    /// [`EditError::LineOutOfRange`] when `y >= line_count()`.
    pub fn set_line(&mut self, y: usize, text: &str) -> Result<()> {
        self.check_line(y)?;
        let start = self.rope.line_to_char(y);
        let end = start + self.content_len(y);
        self.rope.remove(start..end);
        self.rope.insert(start, text);
        self.changed = true;
        Ok(())
    }

    /// Insert a new line so that it becomes line `y`. `y == line_count()`
    /// appends.
    ///
    /// # Errors
    ///
    /// [`EditError::LineOutOfRange`] when `y > line_count()`.
    pub fn insert_line_at(&mut self, y: usize, text: &str) -> Result<()> {
        let count = self.line_count();
        if y > count {
            return Err(EditError::LineOutOfRange { line: y, len: count });
        }
        if y == count {
            let end = self.rope.len_chars();
            self.rope.insert_char(end, '\n');
            self.rope.insert(end + 1, text);
        } else {
            let start = self.rope.line_to_char(y);
            self.rope.insert_char(start, '\n');
            self.rope.insert(start, text);
        }
        self.changed = true;
        Ok(())
    }

    /// Remove line `y`. Removing the only line leaves one empty line.
    ///
    /// # Errors
    ///
    /// [`EditError::LineOutOfRange`] when `y >= line_count()`.
    pub fn delete_line_at(&mut self, y: usize) -> Result<()> {
        self.check_line(y)?;
        let count = self.line_count();
        if count == 1 {
            self.rope = Rope::new();
        } else if y + 1 < count {
            let start = self.rope.line_to_char(y);
            let end = self.rope.line_to_char(y + 1);
            self.rope.remove(start..end);
        } else {
            // Last line: take the preceding line break with it.
            let start = self.rope.line_to_char(y) - 1;
            let end = self.rope.len_chars();
            self.rope.remove(start..end);
        }
        self.changed = true;
        Ok(())
    }

    /// Replace the lines in `range` with `text`, which may span several
    /// lines. The range must be non-empty.
    ///
    /// # Errors
    ///
    /// [`EditError::LineOutOfRange`] when the range is empty or reaches past
    /// the last line.
    pub fn replace_lines(&mut self, range: Range<usize>, text: &str) -> Result<()> {
        if range.is_empty() {
            return Err(EditError::LineOutOfRange {
                line: range.start,
                len: self.line_count(),
            });
        }
        self.check_line(range.end - 1)?;
        let start = self.rope.line_to_char(range.start);
        let end = self.rope.line_to_char(range.end - 1) + self.content_len(range.end - 1);
        self.rope.remove(start..end);
        self.rope.insert(start, text);
        self.changed = true;
        Ok(())
    }

    // -- Char-level editing -------------------------------------------------

    /// Insert `ch` before column `x` of line `y`. `x` may equal the line
    /// length (append).
    ///
    /// # Errors
    ///
    /// Out-of-range line or column.
    pub fn insert_rune_at(&mut self, y: usize, x: usize, ch: char) -> Result<()> {
        let idx = self.char_idx(y, x)?;
        self.rope.insert_char(idx, ch);
        self.changed = true;
        Ok(())
    }

    /// Insert `text` before column `x` of line `y`.
    ///
    /// # Errors
    ///
    /// Out-of-range line or column.
    pub fn insert_str_at(&mut self, y: usize, x: usize, text: &str) -> Result<()> {
        let idx = self.char_idx(y, x)?;
        self.rope.insert(idx, text);
        self.changed = true;
        Ok(())
    }

    /// Remove the char at column `x` of line `y`. Returns the removed char.
    ///
    /// # Errors
    ///
    /// Out-of-range line, or `x >= line length` (there is no char there).
    pub fn delete_rune_at(&mut self, y: usize, x: usize) -> Result<char> {
        let len = self.line_len(y)?;
        if x >= len {
            return Err(EditError::ColumnOutOfRange { line: y, col: x, len });
        }
        let idx = self.rope.line_to_char(y) + x;
        let ch = self.rope.char(idx);
        self.rope.remove(idx..=idx);
        self.changed = true;
        Ok(ch)
    }

    /// Break line `y` at column `x`. The text after `x` becomes a new line
    /// directly below. Returns `(before, after)`.
    ///
    /// # Errors
    ///
    /// Out-of-range line or column.
    pub fn split_line_at(&mut self, y: usize, x: usize) -> Result<(String, String)> {
        let idx = self.char_idx(y, x)?;
        let line = self.line(y)?;
        let split = line.char_indices().nth(x).map_or(line.len(), |(b, _)| b);
        let (before, after) = line.split_at(split);
        let parts = (before.to_string(), after.to_string());
        self.rope.insert_char(idx, '\n');
        self.changed = true;
        Ok(parts)
    }

    /// Append line `y + 1` to line `y`. Returns `false` without changing
    /// anything when `y` is the last line.
    ///
    /// # Errors
    ///
    /// [`EditError::LineOutOfRange`] when `y >= line_count()`.
    pub fn join_line_with_next(&mut self, y: usize) -> Result<bool> {
        self.check_line(y)?;
        if y == self.last_line() {
            return Ok(false);
        }
        let brk = self.rope.line_to_char(y) + self.content_len(y);
        self.rope.remove(brk..=brk);
        self.changed = true;
        Ok(true)
    }

    /// Drop trailing spaces and tabs from line `y`. Returns the new length.
    ///
    /// # Errors
    ///
    /// [`EditError::LineOutOfRange`] when `y >= line_count()`.
    pub fn trim_right(&mut self, y: usize) -> Result<usize> {
        let line = self.line_slice(y)?;
        let len = line.len_chars();
        let trailing = line
            .chars_at(len)
            .reversed()
            .take_while(|c| is_space(*c))
            .count();
        if trailing > 0 {
            let start = self.rope.line_to_char(y) + len - trailing;
            self.rope.remove(start..start + trailing);
            self.changed = true;
        }
        Ok(len - trailing)
    }

    /// Truncate line `y` to its first `x` chars.
    ///
    /// # Errors
    ///
    /// Out-of-range line or column.
    pub fn truncate_line(&mut self, y: usize, x: usize) -> Result<()> {
        let idx = self.char_idx(y, x)?;
        let end = self.rope.line_to_char(y) + self.content_len(y);
        if idx < end {
            self.rope.remove(idx..end);
            self.changed = true;
        }
        Ok(())
    }

    // -- Metadata -----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[inline]
    pub fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    /// True if the content changed since load or the last save.
    #[inline]
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        self.changed
    }

    #[inline]
    pub const fn set_changed(&mut self, changed: bool) {
        self.changed = changed;
    }

    /// Whether saving appends a final `\n`.
    #[inline]
    #[must_use]
    pub const fn has_trailing_newline(&self) -> bool {
        self.trailing_newline
    }

    #[inline]
    pub const fn set_trailing_newline(&mut self, on: bool) {
        self.trailing_newline = on;
    }

    // -- File I/O -----------------------------------------------------------

    /// Write the document to its own path. Returns the bytes written.
    ///
    /// # Errors
    ///
    /// [`EditError::NoFileName`] when the document has no path, otherwise
    /// the same errors as [`save_as`](Self::save_as).
    pub fn save(&mut self, trim: bool) -> Result<usize> {
        let path = self.path.clone().ok_or(EditError::NoFileName)?;
        self.save_as(&path, trim)
    }

    /// Write the document to `path` and bind it there.
    ///
    /// # Errors
    ///
    /// Permission and I/O failures from the write.
    pub fn save_as(&mut self, path: &Path, trim: bool) -> Result<usize> {
        if path.is_dir() {
            return Err(EditError::IsDirectory {
                path: path.to_path_buf(),
            });
        }
        let bytes = self.serialize(trim);
        fs::write(path, &bytes).map_err(|e| EditError::from_open(e, path.to_path_buf()))?;
        debug!(path = %path.display(), bytes = bytes.len(), trim, "saved document");
        self.path = Some(path.to_path_buf());
        self.changed = false;
        Ok(bytes.len())
    }

    // -- Internals ----------------------------------------------------------

    fn check_line(&self, y: usize) -> Result<()> {
        let len = self.line_count();
        if y < len {
            Ok(())
        } else {
            Err(EditError::LineOutOfRange { line: y, len })
        }
    }

    /// Content length of an existing line.
    fn content_len(&self, y: usize) -> usize {
        let total = self.rope.line(y).len_chars();
        if y + 1 < self.rope.len_lines() {
            total - 1
        } else {
            total
        }
    }

    /// Rope char index of `(y, x)` where `x <= line length`.
    fn char_idx(&self, y: usize, x: usize) -> Result<usize> {
        let len = self.line_len(y)?;
        if x > len {
            return Err(EditError::ColumnOutOfRange { line: y, col: x, len });
        }
        Ok(self.rope.line_to_char(y) + x)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("lines", &self.line_count())
            .field("path", &self.path)
            .field("changed", &self.changed)
            .field("trailing_newline", &self.trailing_newline)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(lines: &[&str]) -> Document {
        Document::from_lines(lines)
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn new_document_has_one_empty_line() {
        let d = Document::new();
        assert_eq!(d.line_count(), 1);
        assert_eq!(d.line(0).unwrap(), "");
        assert!(d.has_trailing_newline());
        assert!(!d.is_changed());
        assert!(d.is_empty());
        assert!(!doc(&["", ""]).is_empty());
        assert!(!doc(&[" "]).is_empty());
    }

    #[test]
    fn from_text_strips_one_final_newline() {
        let d = Document::from_text("a\nb\n");
        assert_eq!(d.to_lines(), vec!["a", "b"]);
        assert!(d.has_trailing_newline());

        let d = Document::from_text("a\nb");
        assert_eq!(d.to_lines(), vec!["a", "b"]);
        assert!(!d.has_trailing_newline());
    }

    #[test]
    fn from_text_keeps_blank_last_line() {
        let d = Document::from_text("a\n\n");
        assert_eq!(d.to_lines(), vec!["a", ""]);
        assert_eq!(d.serialize(false), "a\n\n");
    }

    #[test]
    fn carriage_returns_are_content() {
        let d = Document::from_text("one\r\ntwo\r\n");
        assert_eq!(d.line_count(), 2);
        assert_eq!(d.line(0).unwrap(), "one\r");
        assert_eq!(d.line_len(1).unwrap(), 4);
        assert_eq!(d.serialize(true), "one\r\ntwo\r\n");
    }

    #[test]
    fn unicode_separators_do_not_split() {
        let d = Document::from_text("a\u{2028}b\u{85}c");
        assert_eq!(d.line_count(), 1);
        assert_eq!(d.line_len(0).unwrap(), 5);
    }

    // -- Line access --------------------------------------------------------

    #[test]
    fn line_out_of_range() {
        let d = doc(&["x"]);
        assert!(matches!(
            d.line(1),
            Err(EditError::LineOutOfRange { line: 1, len: 1 })
        ));
        assert!(d.line_len(5).is_err());
    }

    #[test]
    fn leading_whitespace_and_first_non_space() {
        let d = doc(&["\t  foo ", "   ", ""]);
        assert_eq!(d.leading_whitespace(0).unwrap(), "\t  ");
        assert_eq!(d.first_non_space(0).unwrap(), 3);
        assert_eq!(d.first_non_space(1).unwrap(), 3);
        assert!(d.is_blank(1).unwrap());
        assert!(d.is_blank(2).unwrap());
        assert!(!d.is_blank(0).unwrap());
    }

    #[test]
    fn char_at_bounds() {
        let d = doc(&["héllo"]);
        assert_eq!(d.char_at(0, 1), Some('é'));
        assert_eq!(d.char_at(0, 5), None);
        assert_eq!(d.char_at(3, 0), None);
    }

    // -- Line-level editing -------------------------------------------------

    #[test]
    fn set_line_replaces_content() {
        let mut d = doc(&["a", "b", "c"]);
        d.set_line(1, "middle").unwrap();
        assert_eq!(d.to_lines(), vec!["a", "middle", "c"]);
        assert!(d.is_changed());
    }

    #[test]
    fn insert_line_at_front_middle_and_end() {
        let mut d = doc(&["b"]);
        d.insert_line_at(0, "a").unwrap();
        d.insert_line_at(2, "d").unwrap();
        d.insert_line_at(2, "c").unwrap();
        assert_eq!(d.to_lines(), vec!["a", "b", "c", "d"]);
        assert!(d.insert_line_at(9, "x").is_err());
    }

    #[test]
    fn delete_line_middle_and_last() {
        let mut d = doc(&["a", "b", "c"]);
        d.delete_line_at(1).unwrap();
        assert_eq!(d.to_lines(), vec!["a", "c"]);
        d.delete_line_at(1).unwrap();
        assert_eq!(d.to_lines(), vec!["a"]);
    }

    #[test]
    fn delete_only_line_leaves_empty_line() {
        let mut d = doc(&["only"]);
        d.delete_line_at(0).unwrap();
        assert_eq!(d.line_count(), 1);
        assert_eq!(d.line(0).unwrap(), "");
        assert!(d.delete_line_at(1).is_err());
    }

    #[test]
    fn replace_lines_spanning_block() {
        let mut d = doc(&["head", "b", "a", "tail"]);
        d.replace_lines(1..3, "x\ny\nz").unwrap();
        assert_eq!(d.to_lines(), vec!["head", "x", "y", "z", "tail"]);
        assert!(d.replace_lines(2..2, "q").is_err());
        assert!(d.replace_lines(4..6, "q").is_err());
    }

    #[test]
    fn replace_lines_at_end() {
        let mut d = doc(&["a", "b"]);
        d.replace_lines(1..2, "c").unwrap();
        assert_eq!(d.to_lines(), vec!["a", "c"]);
    }

    // -- Char-level editing -------------------------------------------------

    #[test]
    fn insert_and_delete_rune() {
        let mut d = doc(&["ac"]);
        d.insert_rune_at(0, 1, 'b').unwrap();
        d.insert_rune_at(0, 3, 'd').unwrap();
        assert_eq!(d.line(0).unwrap(), "abcd");
        assert_eq!(d.delete_rune_at(0, 0).unwrap(), 'a');
        assert_eq!(d.line(0).unwrap(), "bcd");
    }

    #[test]
    fn rune_ops_reject_bad_columns() {
        let mut d = doc(&["ab"]);
        assert!(matches!(
            d.insert_rune_at(0, 3, 'x'),
            Err(EditError::ColumnOutOfRange { line: 0, col: 3, len: 2 })
        ));
        assert!(d.delete_rune_at(0, 2).is_err());
        assert_eq!(d.line(0).unwrap(), "ab");
        assert!(!d.is_changed());
    }

    #[test]
    fn split_line_returns_halves() {
        let mut d = doc(&["héllo world", "next"]);
        let (before, after) = d.split_line_at(0, 5).unwrap();
        assert_eq!(before, "héllo");
        assert_eq!(after, " world");
        assert_eq!(d.to_lines(), vec!["héllo", " world", "next"]);
    }

    #[test]
    fn split_at_line_edges() {
        let mut d = doc(&["ab"]);
        d.split_line_at(0, 2).unwrap();
        assert_eq!(d.to_lines(), vec!["ab", ""]);
        d.split_line_at(0, 0).unwrap();
        assert_eq!(d.to_lines(), vec!["", "ab", ""]);
    }

    #[test]
    fn join_with_next() {
        let mut d = doc(&["foo", "bar"]);
        assert!(d.join_line_with_next(0).unwrap());
        assert_eq!(d.to_lines(), vec!["foobar"]);
        assert!(!d.join_line_with_next(0).unwrap());
        assert_eq!(d.to_lines(), vec!["foobar"]);
    }

    #[test]
    fn trim_right_drops_spaces_and_tabs() {
        let mut d = doc(&["code  \t", "none"]);
        assert_eq!(d.trim_right(0).unwrap(), 4);
        assert_eq!(d.line(0).unwrap(), "code");
        assert_eq!(d.trim_right(1).unwrap(), 4);
    }

    #[test]
    fn trim_right_edge_lines() {
        let mut d = doc(&[" \t ", "", "x \r", "a b  ", "last"]);
        assert_eq!(d.trim_right(0).unwrap(), 0);
        assert_eq!(d.trim_right(1).unwrap(), 0);
        assert_eq!(d.trim_right(2).unwrap(), 3);
        assert_eq!(d.trim_right(3).unwrap(), 3);
        assert_eq!(d.to_lines(), vec!["", "", "x \r", "a b", "last"]);
        assert!(d.trim_right(5).is_err());
    }

    #[test]
    fn truncate_line_drops_tail() {
        let mut d = doc(&["hello world"]);
        d.truncate_line(0, 5).unwrap();
        assert_eq!(d.line(0).unwrap(), "hello");
        assert!(d.truncate_line(0, 9).is_err());
    }

    // -- Save / load --------------------------------------------------------

    #[test]
    fn save_load_roundtrip_is_bit_exact() {
        let dir = tempfile::tempdir().unwrap();
        for original in ["", "\n", "a", "a\n", "a\n\n\n", "x\r\ny\r\n", "\tend  \n  "] {
            let path = dir.path().join("file.txt");
            fs::write(&path, original).unwrap();
            let mut d = Document::load(&path).unwrap();
            d.save(false).unwrap();
            assert_eq!(fs::read_to_string(&path).unwrap(), original);
        }
    }

    #[test]
    fn trimmed_save_leaves_document_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.txt");
        let mut d = doc(&["a  ", "b\t"]);
        d.set_changed(true);
        d.save_as(&path, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
        assert_eq!(d.to_lines(), vec!["a  ", "b\t"]);
        assert!(!d.is_changed());
        assert_eq!(d.path(), Some(path.as_path()));
    }

    #[test]
    fn new_document_saves_final_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.txt");
        let mut d = Document::new();
        d.insert_rune_at(0, 0, 'x').unwrap();
        d.save_as(&path, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "x\n");
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        assert!(matches!(
            Document::load(&path),
            Err(EditError::FileNotFound { .. })
        ));
        let d = Document::load_or_new(&path).unwrap();
        assert_eq!(d.path(), Some(path.as_path()));
        assert_eq!(d.line_count(), 1);
    }

    #[test]
    fn load_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Document::load(dir.path()),
            Err(EditError::IsDirectory { .. })
        ));
    }

    #[test]
    fn load_invalid_utf8_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin");
        fs::write(&path, [0xff, 0xfe, b'\n']).unwrap();
        assert!(matches!(Document::load(&path), Err(EditError::Io(_))));
    }

    #[test]
    fn save_without_path_fails() {
        let mut d = Document::new();
        assert!(matches!(d.save(true), Err(EditError::NoFileName)));
        assert_eq!(d.path(), None);
    }

    #[test]
    fn clone_is_independent() {
        let mut d = doc(&["same"]);
        let snap = d.clone();
        d.set_line(0, "different").unwrap();
        assert_eq!(snap.line(0).unwrap(), "same");
    }
}
