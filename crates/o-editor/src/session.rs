//! Interactive session: the key map, prompts, clipboard and status line.
//!
//! A [`Session`] owns the [`Editor`] and its [`UndoStack`] and turns one
//! [`Key`] at a time into editor commands. It takes an undo snapshot
//! before every key that mutates the document, so each such key is one
//! undo step.
//!
//! Two keys open a prompt that captures the following keys until Enter or
//! Escape: Ctrl-F collects a search term, Ctrl-L collects a line number.
//!
//! Errors never escape [`Session::handle`]. They become the status
//! message, and the session carries on.
//!
//! # Key map
//!
//! | Key            | Command                                          |
//! |----------------|--------------------------------------------------|
//! | printable char | type it (with smart dedent for `}` `]` `)`)      |
//! | Enter          | trim, then open a line or split                  |
//! | Backspace      | delete left, join up, or drop an empty line      |
//! | Tab            | insert one indent unit                           |
//! | arrows         | move, wrapping across line ends                  |
//! | Ctrl-A / Ctrl-E| home toggle / end, then end of the next line     |
//! | Ctrl-N / Ctrl-P| scroll down / up by `scrollspeed`                |
//! | Ctrl-D / Ctrl-K| delete char / delete to end of line              |
//! | Ctrl-X/C/V     | cut / copy / paste the whole line                |
//! | Ctrl-B / Ctrl-J| set bookmark / jump to it                        |
//! | Ctrl-U, Ctrl-Z | undo                                             |
//! | Ctrl-F         | search forward, no wraparound                    |
//! | Ctrl-L         | go to line number                                |
//! | Ctrl-S         | save                                             |
//! | Ctrl-G         | toggle the position/word-count status            |
//! | Ctrl-H         | help                                             |
//! | Escape         | clear the search term and redraw                 |
//! | Ctrl-Q         | quit                                             |

use std::ops::Range;
use std::path::{Path, PathBuf};

use bitflags::bitflags;
use tracing::{debug, warn};

use crate::block;
use crate::document::Document;
use crate::editor::Editor;
use crate::error::{EditError, Result};
use crate::filter::{self, FilterCommand};
use crate::keys::{Key, KeySource};
use crate::options::Options;
use crate::position::Position;
use crate::resize;
use crate::search::SearchState;
use crate::undo::UndoStack;
use crate::view::Viewport;

/// Program name and version, as shown by Ctrl-H.
pub const VERSION: &str = concat!("o-edit ", env!("CARGO_PKG_VERSION"));

bitflags! {
    /// What a front end should repaint after a key.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Redraw: u8 {
        /// The text area changed.
        const TEXT   = 0b01;
        /// Only the cursor moved.
        const CURSOR = 0b10;
    }
}

/// What the caller should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// A prompt capturing keys on the status line.
#[derive(Debug, Clone)]
enum Prompt {
    Search(SearchState),
    GoToLine(String),
}

/// One editing session over one document.
#[derive(Debug)]
pub struct Session {
    editor: Editor,
    undo: UndoStack,
    /// Last search term, pre-filled by the next Ctrl-F.
    search_term: String,
    /// One-line clipboard for Ctrl-X / Ctrl-C / Ctrl-V.
    clipboard: String,
    bookmark: Option<Position>,
    status: Option<String>,
    status_mode: bool,
    redraw: Redraw,
    prompt: Option<Prompt>,
}

impl Session {
    /// A session over `doc`. The undo capacity comes from
    /// `options.undo_capacity`.
    #[must_use]
    pub fn new(doc: Document, options: Options) -> Self {
        Self {
            editor: Editor::new(doc, options),
            undo: UndoStack::new(options.undo_capacity),
            search_term: String::new(),
            clipboard: String::new(),
            bookmark: None,
            status: None,
            status_mode: false,
            redraw: Redraw::all(),
            prompt: None,
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn editor(&self) -> &Editor {
        &self.editor
    }

    #[inline]
    #[must_use]
    pub const fn undo(&self) -> &UndoStack {
        &self.undo
    }

    /// The message for the status line, if any.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Take the status message, leaving none.
    pub fn take_status(&mut self) -> Option<String> {
        self.status.take()
    }

    /// Last search term, used for highlighting and to pre-fill Ctrl-F.
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    #[must_use]
    pub fn clipboard(&self) -> &str {
        &self.clipboard
    }

    #[inline]
    #[must_use]
    pub const fn bookmark(&self) -> Option<Position> {
        self.bookmark
    }

    /// True while Ctrl-F or Ctrl-L is collecting keys.
    #[inline]
    #[must_use]
    pub const fn in_prompt(&self) -> bool {
        self.prompt.is_some()
    }

    /// What needs repainting since the last call. Clears the flags.
    pub fn take_redraw(&mut self) -> Redraw {
        std::mem::take(&mut self.redraw)
    }

    /// Resize the text area.
    pub fn resize(&mut self, viewport: Viewport) {
        self.editor.set_viewport(viewport);
        self.redraw |= Redraw::all();
    }

    // -- Event loop ---------------------------------------------------------

    /// Feed keys from `keys` until Ctrl-Q or the end of input. A pending
    /// terminal resize is turned into a full redraw between keys.
    pub fn run(&mut self, keys: &mut dyn KeySource) -> Action {
        loop {
            if resize::take() {
                self.redraw |= Redraw::all();
            }
            let Some(key) = keys.next_key() else {
                return Action::Continue;
            };
            if self.handle(key) == Action::Quit {
                return Action::Quit;
            }
        }
    }

    /// Apply one key.
    pub fn handle(&mut self, key: Key) -> Action {
        if let Some(prompt) = self.prompt.take() {
            self.handle_prompt(prompt, key);
        } else if self.handle_key(key) == Action::Quit {
            return Action::Quit;
        }
        if self.status_mode && self.prompt.is_none() {
            self.status = Some(self.position_report());
        }
        Action::Continue
    }

    fn handle_key(&mut self, key: Key) -> Action {
        let result = match key {
            Key::Ctrl('q') => return Action::Quit,

            // -- Mutating keys: one undo step each --------------------------
            Key::Char(ch) => self.edit(|ed| ed.type_rune(ch)),
            Key::Enter => self.edit(|ed| ed.enter().map(|_| ())),
            Key::Backspace => self.edit(Editor::backspace),
            Key::Tab => self.edit(Editor::insert_tab),
            Key::Ctrl('d') => self.edit_nonempty(|ed| ed.delete().map(|_| ())),
            Key::Ctrl('k') => self.edit_nonempty(Editor::delete_rest_of_line),
            Key::Ctrl('x') => {
                self.undo.snapshot(&self.editor);
                self.redraw |= Redraw::all();
                self.editor.cut_line().map(|line| self.clipboard = line)
            }
            Key::Ctrl('v') => {
                let line = self.clipboard.clone();
                self.edit(|ed| ed.paste_line(&line))
            }

            // -- Movement ---------------------------------------------------
            Key::Left => self.motion(|ed| {
                ed.move_left(true);
            }),
            Key::Right => self.motion(|ed| {
                ed.move_right(true);
            }),
            Key::Up => self.motion(|ed| {
                ed.move_up();
            }),
            Key::Down => self.motion(|ed| {
                ed.move_down();
            }),
            Key::Ctrl('a') => self.motion(Editor::home),
            Key::Ctrl('e') => self.motion(Editor::end_or_next),
            Key::Ctrl('n') => self.scroll(Editor::page_down),
            Key::Ctrl('p') => self.scroll(Editor::page_up),
            Key::Ctrl('b') => {
                self.bookmark = Some(self.editor.position());
                Ok(())
            }
            Key::Ctrl('j') => match self.bookmark {
                Some(pos) => self.motion(|ed| ed.jump_to(pos)),
                None => {
                    self.status = Some("No bookmark".into());
                    Ok(())
                }
            },

            // -- Everything else --------------------------------------------
            Key::Ctrl('c') => {
                self.clipboard = self.editor.copy_line();
                Ok(())
            }
            Key::Ctrl('u' | 'z') => self.undo_step(),
            Key::Ctrl('s') => self.save(),
            Key::Ctrl('f') => {
                let origin = self.editor.position();
                let state = SearchState::new(self.search_term.clone(), origin);
                self.show_search_prompt(&state);
                self.prompt = Some(Prompt::Search(state));
                Ok(())
            }
            Key::Ctrl('l') => {
                self.status = Some("Go to line number:".into());
                self.prompt = Some(Prompt::GoToLine(String::new()));
                Ok(())
            }
            Key::Ctrl('g') => {
                self.status_mode = !self.status_mode;
                if !self.status_mode {
                    self.status = None;
                }
                Ok(())
            }
            Key::Ctrl('h') => {
                self.status = Some(format!("[{VERSION}] ctrl-s to save, ctrl-q to quit"));
                Ok(())
            }
            Key::Escape => {
                self.search_term.clear();
                self.status = None;
                self.redraw |= Redraw::all();
                Ok(())
            }
            Key::Ctrl(_) => Ok(()),
        };
        if let Err(err) = result {
            self.report(&err);
        }
        Action::Continue
    }

    // -- Prompts ------------------------------------------------------------

    fn handle_prompt(&mut self, prompt: Prompt, key: Key) {
        match prompt {
            Prompt::Search(mut state) => match key {
                Key::Enter => self.finish_search(&state),
                Key::Escape | Key::Ctrl('q') => {
                    self.search_term.clear();
                    self.status = None;
                    self.redraw |= Redraw::TEXT;
                }
                Key::Backspace => {
                    state.pop();
                    self.search_term = state.needle().to_string();
                    self.show_search_prompt(&state);
                    self.prompt = Some(Prompt::Search(state));
                }
                Key::Char(ch) => {
                    state.push(ch);
                    self.search_term = state.needle().to_string();
                    self.show_search_prompt(&state);
                    self.prompt = Some(Prompt::Search(state));
                }
                _ => self.prompt = Some(Prompt::Search(state)),
            },
            Prompt::GoToLine(mut digits) => match key {
                Key::Enter => {
                    self.status = None;
                    if let Ok(number) = digits.parse::<usize>() {
                        self.go_to_line(number);
                    }
                }
                Key::Escape | Key::Ctrl('q') => self.status = None,
                Key::Backspace => {
                    digits.pop();
                    self.status = Some(format!("Go to line number: {digits}"));
                    self.prompt = Some(Prompt::GoToLine(digits));
                }
                _ => {
                    if let Some(d) = key.digit() {
                        digits.push(d);
                        self.status = Some(format!("Go to line number: {digits}"));
                    }
                    self.prompt = Some(Prompt::GoToLine(digits));
                }
            },
        }
    }

    fn show_search_prompt(&mut self, state: &SearchState) {
        self.status = Some(if state.needle().is_empty() {
            "Search:".to_string()
        } else {
            format!("Search: {}", state.needle())
        });
    }

    fn finish_search(&mut self, state: &SearchState) {
        self.status = None;
        if state.needle().is_empty() {
            return;
        }
        match state.next(&mut self.editor) {
            Ok(pos) => debug!(needle = state.needle(), %pos, "search hit"),
            Err(err) => self.report(&err),
        }
        self.redraw |= Redraw::all();
    }

    // -- Commands -----------------------------------------------------------

    /// Undo the last mutating key.
    ///
    /// # Errors
    ///
    /// [`EditError::EmptyHistory`] when there is nothing to undo.
    pub fn undo_step(&mut self) -> Result<()> {
        self.undo.restore(&mut self.editor)?;
        self.redraw |= Redraw::all();
        Ok(())
    }

    /// Save to the document's path, trimming trailing blanks when
    /// `trimsave` is on. Sets "Saved FILE" as the status.
    ///
    /// # Errors
    ///
    /// Whatever [`Document::save`] reports.
    pub fn save(&mut self) -> Result<()> {
        let trim = self.editor.options().trim_on_save;
        self.editor.doc_mut().save(trim)?;
        let name = self
            .editor
            .doc()
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.status = Some(format!("Saved {name}"));
        Ok(())
    }

    /// Go to a 1-based line number, clamped to the document. Returns the
    /// 0-based line reached.
    pub fn go_to_line(&mut self, number: usize) -> usize {
        self.redraw |= Redraw::all();
        self.editor.go_to_line_number(number)
    }

    /// Sort the block under the cursor, as one undo step. An already
    /// sorted block leaves no undo entry.
    ///
    /// # Errors
    ///
    /// Only if the cursor was already invalid.
    pub fn sort_block(&mut self) -> Result<bool> {
        let before = self.editor.clone();
        let pos = self.editor.position();
        let sorted = block::sort_block(&mut self.editor, pos)?;
        if sorted {
            self.undo.snapshot(&before);
            self.redraw |= Redraw::all();
        }
        Ok(sorted)
    }

    /// Sort the words on the cursor line, as one undo step. A line whose
    /// words are already in order leaves no undo entry.
    ///
    /// # Errors
    ///
    /// Only if the cursor was already invalid.
    pub fn sort_words(&mut self) -> Result<()> {
        let before = self.editor.clone();
        let y = self.editor.position().line;
        block::sort_line_tokens(&mut self.editor, y)?;
        if self.editor.line(y)? != before.line(y)? {
            self.undo.snapshot(&before);
            self.redraw |= Redraw::all();
        }
        Ok(())
    }

    /// Insert the file `name` at the cursor, as one undo step. A relative
    /// `name` is taken from the directory of the edited file. Returns the
    /// number of lines inserted.
    ///
    /// # Errors
    ///
    /// [`EditError::NoFileName`] for an empty name, otherwise the load
    /// errors for the file. Either way the document is untouched and the
    /// error is also set as the status.
    pub fn insert_file(&mut self, name: &str) -> Result<usize> {
        let name = name.trim();
        let result = if name.is_empty() {
            Err(EditError::NoFileName)
        } else {
            let path = self.resolve(name);
            let before = self.editor.clone();
            self.editor.insert_file(&path).inspect(|&lines| {
                debug!(path = %path.display(), lines, "inserted file");
                self.undo.snapshot(&before);
                self.redraw |= Redraw::all();
            })
        };
        if let Err(err) = &result {
            self.report(err);
        }
        result
    }

    /// Type today's date (`YYYY-MM-DD`, local time) at the cursor, as one
    /// undo step.
    ///
    /// # Errors
    ///
    /// Only if the cursor was already invalid.
    pub fn insert_date(&mut self) -> Result<()> {
        let date = chrono::Local::now().format("%Y-%m-%d").to_string();
        self.edit(|ed| ed.insert_text(&date))
    }

    /// Pipe the block at the bookmark (or under the cursor, without a
    /// bookmark) through `cmd`. On failure the document is untouched and
    /// the error is also set as the status.
    ///
    /// # Errors
    ///
    /// Whatever [`filter::apply`] reports.
    pub fn run_filter(&mut self, cmd: &FilterCommand) -> Result<Range<usize>> {
        let anchor = self.bookmark.unwrap_or_else(|| self.editor.position());
        match filter::apply(&mut self.editor, &mut self.undo, anchor, cmd) {
            Ok(range) => {
                self.redraw |= Redraw::all();
                Ok(range)
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }

    /// `file: line L/N, col C, W words` for the position status.
    #[must_use]
    pub fn position_report(&self) -> String {
        let doc = self.editor.doc();
        let name = doc
            .path()
            .map_or_else(|| "[new]".to_string(), |p| p.display().to_string());
        let pos = self.editor.position();
        format!(
            "{name}: line {}/{}, col {}, {} words",
            pos.line + 1,
            doc.line_count(),
            pos.col + 1,
            self.editor.word_count()
        )
    }

    // -- Internals ----------------------------------------------------------

    fn resolve(&self, name: &str) -> PathBuf {
        let dir = self
            .editor
            .doc()
            .path()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new(""));
        dir.join(name)
    }

    /// Snapshot, then run a mutating editor command.
    fn edit(&mut self, f: impl FnOnce(&mut Editor) -> Result<()>) -> Result<()> {
        self.undo.snapshot(&self.editor);
        self.redraw |= Redraw::all();
        f(&mut self.editor)
    }

    /// Like [`edit`](Self::edit), but an empty document only reports
    /// "Empty".
    fn edit_nonempty(&mut self, f: impl FnOnce(&mut Editor) -> Result<()>) -> Result<()> {
        if self.editor.doc().is_empty() {
            self.status = Some("Empty".into());
            return Ok(());
        }
        self.edit(f)
    }

    #[allow(clippy::unnecessary_wraps)]
    fn motion(&mut self, f: impl FnOnce(&mut Editor)) -> Result<()> {
        f(&mut self.editor);
        self.redraw |= Redraw::CURSOR;
        Ok(())
    }

    #[allow(clippy::unnecessary_wraps)]
    fn scroll(&mut self, f: impl FnOnce(&mut Editor) -> bool) -> Result<()> {
        if f(&mut self.editor) {
            self.redraw |= Redraw::TEXT;
        }
        self.redraw |= Redraw::CURSOR;
        Ok(())
    }

    fn report(&mut self, err: &EditError) {
        if err.is_fault() {
            warn!(%err, "editing command failed");
        }
        self.status = Some(err.to_string());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
