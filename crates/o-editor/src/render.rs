//! Painting the visible text onto a character grid.
//!
//! The editor core does not know about terminals. A front end implements
//! [`Canvas`] for whatever it draws on and calls [`draw_lines`] after each
//! key the session marks for redraw. Tabs are expanded, the horizontal
//! scroll offset is applied, and every row is padded to the canvas width
//! so stale cells from the previous frame are overwritten.

use crate::editor::Editor;
use crate::search::find_all;
use crate::view::{data_to_visual, expand_tabs};

/// A grid of cells, `size()` wide and high, origin at the top left.
pub trait Canvas {
    /// Whatever the canvas uses to describe a color.
    type Color: Copy;

    /// `(width, height)` in cells.
    fn size(&self) -> (usize, usize);

    /// Paint one cell. Cells outside [`size`](Self::size) are ignored.
    fn put(&mut self, x: usize, y: usize, fg: Self::Color, bg: Self::Color, ch: char);
}

/// Paint the editor's visible lines. Rows below the last line are blanked.
/// Returns the number of document lines drawn.
pub fn draw_lines<C: Canvas>(editor: &Editor, canvas: &mut C, fg: C::Color, bg: C::Color) -> usize {
    let (width, height) = canvas.size();
    let rows = height.min(editor.viewport().height);
    let top = editor.cursor().top_line();
    let left = editor.cursor().left_col();
    let tab = editor.options().tab_width;

    let mut drawn = 0;
    for row in 0..rows {
        let cells: Vec<char> = match editor.line(top + row) {
            Ok(line) => {
                drawn += 1;
                expand_tabs(line.chars(), tab).chars().collect()
            }
            Err(_) => Vec::new(),
        };
        for x in 0..width {
            let ch = cells.get(left + x).copied().unwrap_or(' ');
            canvas.put(x, row, fg, bg, ch);
        }
    }
    drawn
}

/// Repaint the visible occurrences of `needle` in the given colors.
/// Call after [`draw_lines`]. Returns the number of matches touched.
pub fn highlight_matches<C: Canvas>(
    editor: &Editor,
    canvas: &mut C,
    needle: &str,
    fg: C::Color,
    bg: C::Color,
) -> usize {
    let (width, height) = canvas.size();
    let rows = height.min(editor.viewport().height);
    let top = editor.cursor().top_line();
    let left = editor.cursor().left_col();
    let tab = editor.options().tab_width;

    let matches = find_all(editor.doc(), needle, top, top + rows);
    for m in &matches {
        let Ok(line) = editor.line(m.start.line) else {
            continue;
        };
        let cells: Vec<char> = expand_tabs(line.chars(), tab).chars().collect();
        let start = data_to_visual(line.chars(), m.start.col, tab);
        let end = data_to_visual(line.chars(), m.start.col + m.len, tab);
        let y = m.start.line - top;
        for vx in start.max(left)..end.min(left + width) {
            let ch = cells.get(vx).copied().unwrap_or(' ');
            canvas.put(vx - left, y, fg, bg, ch);
        }
    }
    matches.len()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::options::Options;
    use crate::position::Position;
    use crate::view::Viewport;
    use pretty_assertions::assert_eq;

    /// Cells as `(char, color)`.
    struct Grid {
        width: usize,
        height: usize,
        cells: Vec<(char, u8)>,
    }

    impl Grid {
        fn new(width: usize, height: usize) -> Self {
            Self {
                width,
                height,
                cells: vec![('?', 9); width * height],
            }
        }

        fn row(&self, y: usize) -> String {
            self.cells[y * self.width..(y + 1) * self.width]
                .iter()
                .map(|c| c.0)
                .collect()
        }

        fn colors(&self, y: usize) -> Vec<u8> {
            self.cells[y * self.width..(y + 1) * self.width]
                .iter()
                .map(|c| c.1)
                .collect()
        }
    }

    impl Canvas for Grid {
        type Color = u8;

        fn size(&self) -> (usize, usize) {
            (self.width, self.height)
        }

        fn put(&mut self, x: usize, y: usize, fg: u8, _bg: u8, ch: char) {
            if x < self.width && y < self.height {
                self.cells[y * self.width + x] = (ch, fg);
            }
        }
    }

    fn editor(lines: &[&str], width: usize, height: usize) -> Editor {
        let mut ed = Editor::new(Document::from_lines(lines), Options::default());
        ed.set_viewport(Viewport::new(width, height));
        ed
    }

    #[test]
    fn draws_and_pads_rows() {
        let ed = editor(&["ab\tc", "x"], 8, 4);
        let mut grid = Grid::new(8, 4);
        assert_eq!(draw_lines(&ed, &mut grid, 1, 0), 2);
        assert_eq!(grid.row(0), "ab  c   ");
        assert_eq!(grid.row(1), "x       ");
        assert_eq!(grid.row(2), "        ");
        assert_eq!(grid.row(3), "        ");
    }

    #[test]
    fn clips_long_lines() {
        let ed = editor(&["0123456789"], 4, 1);
        let mut grid = Grid::new(4, 1);
        draw_lines(&ed, &mut grid, 1, 0);
        assert_eq!(grid.row(0), "0123");
    }

    #[test]
    fn applies_scroll_offsets() {
        let mut ed = editor(&["zero", "one", "two", "0123456789"], 4, 2);
        ed.set_position(Position::new(3, 9)).unwrap();
        assert_eq!(ed.cursor().top_line(), 2);
        assert_eq!(ed.cursor().left_col(), 6);

        let mut grid = Grid::new(4, 2);
        draw_lines(&ed, &mut grid, 1, 0);
        assert_eq!(grid.row(0), "    ");
        assert_eq!(grid.row(1), "6789");
    }

    #[test]
    fn only_viewport_rows_are_drawn() {
        let ed = editor(&["a", "b", "c"], 3, 1);
        let mut grid = Grid::new(3, 3);
        assert_eq!(draw_lines(&ed, &mut grid, 1, 0), 1);
        assert_eq!(grid.row(0), "a  ");
        assert_eq!(grid.row(1), "???");
    }

    #[test]
    fn highlights_matches_after_tabs() {
        let ed = editor(&["\tfoo bar foo", "foo"], 16, 2);
        let mut grid = Grid::new(16, 2);
        draw_lines(&ed, &mut grid, 1, 0);
        assert_eq!(highlight_matches(&ed, &mut grid, "foo", 7, 0), 3);
        assert_eq!(grid.row(0), "    foo bar foo ");
        assert_eq!(
            grid.colors(0),
            vec![1, 1, 1, 1, 7, 7, 7, 1, 1, 1, 1, 1, 7, 7, 7, 1]
        );
        assert_eq!(&grid.colors(1)[..4], &[7, 7, 7, 1]);
    }

    #[test]
    fn empty_needle_highlights_nothing() {
        let ed = editor(&["abc"], 3, 1);
        let mut grid = Grid::new(3, 1);
        draw_lines(&ed, &mut grid, 1, 0);
        assert_eq!(highlight_matches(&ed, &mut grid, "", 7, 0), 0);
        assert_eq!(grid.colors(0), vec![1, 1, 1]);
    }
}
