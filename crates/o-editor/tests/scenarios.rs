//! End-to-end editing scenarios, driven through `Session` with key scripts.

use std::fs;

use o_editor::document::Document;
use o_editor::keys::ScriptKeys;
use o_editor::options::Options;
use o_editor::position::{Position, ScreenPos};
use o_editor::session::{Action, Session};
use o_editor::view::{Viewport, data_to_visual};
use pretty_assertions::assert_eq;

fn session(lines: &[&str]) -> Session {
    Session::new(Document::from_lines(lines), Options::default())
}

fn play(s: &mut Session, script: &str) -> Action {
    s.run(&mut ScriptKeys::parse(script))
}

fn lines(s: &Session) -> Vec<String> {
    s.editor().doc().to_lines()
}

#[test]
fn enter_after_open_paren_indents() {
    let mut s = session(&["foo(", ""]);
    play(&mut s, "ctrl-e enter");
    assert_eq!(lines(&s), vec!["foo(", "\t", ""]);
    assert_eq!(s.editor().position(), Position::new(1, 1));
}

#[test]
fn closing_brace_dedents() {
    let mut s = session(&["\t\t"]);
    play(&mut s, "ctrl-e }");
    assert_eq!(lines(&s), vec!["\t}"]);
    assert_eq!(s.editor().position(), Position::new(0, 2));
}

#[test]
fn typing_a_function_body() {
    let mut s = session(&[""]);
    play(&mut s, "fn space main() space { enter x; enter }");
    assert_eq!(lines(&s), vec!["fn main() {", "\tx;", "}"]);
}

#[test]
fn enter_at_bottom_row_scrolls_the_view() {
    let numbers: Vec<String> = (0..10).map(|i| i.to_string()).collect();
    let mut s = Session::new(Document::from_lines(&numbers), Options::default());
    s.resize(Viewport::new(20, 3));
    play(&mut s, "down down ctrl-e enter");
    assert_eq!(s.editor().position(), Position::new(3, 0));
    assert_eq!(s.editor().line(3).unwrap(), "");
    assert_eq!(s.editor().cursor().top_line(), 1);
    assert_eq!(s.editor().screen_cursor(), Some(ScreenPos::new(0, 2)));
}

#[test]
fn sort_block_leaves_other_blocks() {
    let mut s = session(&["b", "a", "c", "", "z"]);
    play(&mut s, "down");
    assert!(s.sort_block().unwrap());
    assert_eq!(lines(&s), vec!["a", "b", "c", "", "z"]);
}

#[test]
fn search_miss_never_wraps() {
    let mut s = session(&["needle", "hay", "hay"]);
    play(&mut s, "down ctrl-f needle enter");
    assert_eq!(s.status(), Some("Not found (no wraparound)"));
    assert_eq!(s.editor().position().line, 1);
}

#[test]
fn tab_maps_to_screen_column() {
    assert_eq!(data_to_visual("ab\tcd".chars(), 3, 4), 4);

    let mut s = session(&["ab\tcd"]);
    play(&mut s, "right right right");
    let screen = s.editor().screen_cursor().unwrap();
    assert_eq!((screen.x, screen.y), (4, 0));
}

#[test]
fn undo_restores_content_and_position() {
    let mut s = session(&["one", "two"]);
    play(&mut s, "down right");
    let before = s.editor().cursor().clone();
    play(&mut s, "X enter ctrl-k backspace backspace");
    assert_ne!(lines(&s), vec!["one", "two"]);

    while !s.undo().is_empty() {
        play(&mut s, "ctrl-z");
    }
    assert_eq!(lines(&s), vec!["one", "two"]);
    assert_eq!(s.editor().cursor(), &before);
    assert!(!s.editor().doc().is_changed());
    play(&mut s, "ctrl-z");
    assert_eq!(s.status(), Some("Nothing more to undo"));
}

#[test]
fn cursor_stays_valid_through_a_long_session() {
    let mut s = session(&["fn main() {", "\tprintln!();", "}", ""]);
    s.resize(Viewport::new(10, 3));
    let script = "ctrl-e enter x enter } down down ctrl-k up backspace backspace \
                  ctrl-x ctrl-v ctrl-n ctrl-p tab ( enter ) left left ctrl-d \
                  ctrl-a ctrl-a ctrl-e ctrl-e up up up up enter enter";
    for token in script.split_whitespace() {
        play(&mut s, token);
        assert!(s.editor().is_consistent(), "after {token}");
        let pos = s.editor().position();
        let len = s.editor().line(pos.line).unwrap().chars().count();
        assert!(pos.col <= len, "after {token}");
        let screen = s.editor().screen_cursor().unwrap();
        assert!(screen.x < 10 && screen.y < 3, "after {token}: {screen:?}");
    }
}

#[test]
fn save_round_trip_is_bit_exact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed.txt");
    let original = "tabs\there  \r\ncr only\r\n\u{2028}sep\n\n  last";
    fs::write(&path, original).unwrap();

    let doc = Document::load(&path).unwrap();
    let mut opts = Options::default();
    opts.trim_on_save = false;
    let mut s = Session::new(doc, opts);
    play(&mut s, "ctrl-s");
    assert_eq!(s.status(), Some(format!("Saved {}", path.display()).as_str()));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn save_trims_only_spaces_and_tabs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trim.txt");
    fs::write(&path, "a  \nb\t\r\nc\n").unwrap();

    let mut s = Session::new(Document::load(&path).unwrap(), Options::default());
    play(&mut s, "ctrl-s");
    assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\t\r\nc\n");
    // The buffer itself keeps its whitespace.
    assert_eq!(lines(&s), vec!["a  ", "b\t\r", "c"]);
}

#[test]
fn new_file_gets_a_trailing_newline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.txt");
    let mut s = Session::new(Document::load_or_new(&path).unwrap(), Options::default());
    play(&mut s, "hi ctrl-s");
    assert_eq!(fs::read_to_string(&path).unwrap(), "hi\n");
}

#[test]
fn quit_stops_the_script() {
    let mut s = session(&[""]);
    assert_eq!(play(&mut s, "a ctrl-q b"), Action::Quit);
    assert_eq!(lines(&s), vec!["a"]);
}
