//! Block-scoped transformations.
//!
//! A block is the maximal run of non-blank lines around a line (see
//! [`Editor::block_range`]). These operations rewrite text in place through
//! the editor; the caller snapshots for undo first.

use crate::editor::Editor;
use crate::error::Result;
use crate::position::Position;

/// Sort the lines of the block containing `pos` by code point.
///
/// The cursor stays on the same line offset within the block, with its
/// column clamped to the new line there. Returns `false` when the block
/// was already sorted (nothing is rewritten).
///
/// # Errors
///
/// [`EditError::LineOutOfRange`](crate::error::EditError::LineOutOfRange)
/// when `pos` is outside the document.
pub fn sort_block(editor: &mut Editor, pos: Position) -> Result<bool> {
    let range = editor.block_range(pos.line)?;
    let mut lines = range
        .map(|y| editor.line(y))
        .collect::<Result<Vec<_>>>()?;
    if lines.is_sorted() {
        return Ok(false);
    }
    lines.sort_unstable();

    let cursor = editor.position();
    editor.replace_block(pos, &lines.join("\n"))?;
    editor.jump_to(cursor);
    Ok(true)
}

/// Sort the whitespace-separated words of line `y` and rejoin them with
/// single spaces. Leading indentation is dropped along with every other
/// whitespace run.
///
/// # Errors
///
/// [`EditError::LineOutOfRange`](crate::error::EditError::LineOutOfRange).
pub fn sort_line_tokens(editor: &mut Editor, y: usize) -> Result<()> {
    let line = editor.line(y)?;
    let mut words: Vec<&str> = line.split_whitespace().collect();
    words.sort_unstable();
    editor.set_line(y, &words.join(" "))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::options::Options;
    use pretty_assertions::assert_eq;

    fn editor_at(lines: &[&str], line: usize, col: usize) -> Editor {
        let mut ed = Editor::new(Document::from_lines(lines), Options::default());
        ed.set_position(Position::new(line, col)).unwrap();
        ed
    }

    #[test]
    fn sorts_only_the_block() {
        let mut ed = editor_at(&["b", "a", "c", "", "z"], 1, 0);
        let pos = ed.position();
        assert!(sort_block(&mut ed, pos).unwrap());
        assert_eq!(ed.doc().to_lines(), vec!["a", "b", "c", "", "z"]);
        assert_eq!(ed.position(), Position::new(1, 0));
    }

    #[test]
    fn sort_is_by_code_point() {
        let mut ed = editor_at(&["b", "B", "a", "_", "Ä"], 0, 0);
        let pos = ed.position();
        sort_block(&mut ed, pos).unwrap();
        assert_eq!(ed.doc().to_lines(), vec!["B", "_", "a", "b", "Ä"]);
    }

    #[test]
    fn cursor_column_is_clamped() {
        let mut ed = editor_at(&["zzzzzz", "a"], 0, 6);
        let pos = ed.position();
        sort_block(&mut ed, pos).unwrap();
        assert_eq!(ed.doc().to_lines(), vec!["a", "zzzzzz"]);
        assert_eq!(ed.position(), Position::new(0, 1));
    }

    #[test]
    fn sorted_block_is_untouched() {
        let mut ed = editor_at(&["a", "b"], 0, 0);
        let pos = ed.position();
        assert!(!sort_block(&mut ed, pos).unwrap());
        assert!(!ed.doc().is_changed());
    }

    #[test]
    fn blank_line_block_is_noop() {
        let mut ed = editor_at(&["b", "", "a"], 1, 0);
        let pos = ed.position();
        assert!(!sort_block(&mut ed, pos).unwrap());
        assert_eq!(ed.doc().to_lines(), vec!["b", "", "a"]);
    }

    #[test]
    fn sort_block_at_other_anchor() {
        let mut ed = editor_at(&["top", "", "c", "b"], 0, 1);
        sort_block(&mut ed, Position::new(3, 0)).unwrap();
        assert_eq!(ed.doc().to_lines(), vec!["top", "", "b", "c"]);
        assert_eq!(ed.position(), Position::new(0, 1));
    }

    #[test]
    fn sort_tokens_collapses_whitespace() {
        let mut ed = editor_at(&["  pear   apple\tfig "], 0, 0);
        sort_line_tokens(&mut ed, 0).unwrap();
        assert_eq!(ed.doc().to_lines(), vec!["apple fig pear"]);
    }

    #[test]
    fn sort_tokens_out_of_range() {
        let mut ed = editor_at(&["x"], 0, 0);
        assert!(sort_line_tokens(&mut ed, 1).is_err());
    }
}
