//! Undo history, a fixed-capacity ring of whole-editor snapshots.
//!
//! The caller takes a [`snapshot`](UndoStack::snapshot) before every
//! mutating command and calls [`restore`](UndoStack::restore) to undo. Each
//! entry holds the full document, the cursor with its scroll state, and the
//! changed flag as they were at capture time, so restoring is exact rather
//! than a replay of inverse edits.
//!
//! Snapshots are cheap: a [`Document`] clone shares the rope's tree and
//! copies only the nodes later edits touch, and it never aliases the live
//! document.
//!
//! ```text
//!  capacity 4, five pushes (a..e), `a` evicted:
//!
//!  slots: [ e | b | c | d ]
//!               ^head (next write)   len = 4
//!  pop order: e, d, c, b
//! ```
//!
//! There is no redo.

use tracing::trace;

use crate::cursor::Cursor;
use crate::document::Document;
use crate::editor::Editor;
use crate::error::{EditError, Result};

/// Snapshots kept by default.
pub const DEFAULT_CAPACITY: usize = 8192;

/// One captured editor state.
#[derive(Debug, Clone)]
pub struct UndoEntry {
    doc: Document,
    cursor: Cursor,
    changed: bool,
}

impl UndoEntry {
    fn capture(editor: &Editor) -> Self {
        Self {
            doc: editor.doc().clone(),
            cursor: editor.cursor().clone(),
            changed: editor.doc().is_changed(),
        }
    }

    /// The captured document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.doc
    }

    /// The captured cursor.
    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }
}

/// Bounded LIFO of [`UndoEntry`] values. Pushing onto a full stack silently
/// drops the oldest entry.
#[derive(Debug)]
pub struct UndoStack {
    slots: Vec<Option<UndoEntry>>,
    /// Index the next push writes to.
    head: usize,
    len: usize,
    capacity: usize,
}

impl UndoStack {
    /// A stack holding at most `capacity` entries (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            head: 0,
            len: 0,
            capacity: capacity.max(1),
        }
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record the current editor state.
    pub fn snapshot(&mut self, editor: &Editor) {
        self.push(UndoEntry::capture(editor));
    }

    /// Put the most recent snapshot back into `editor` and drop it.
    ///
    /// # Errors
    ///
    /// [`EditError::EmptyHistory`] when there is nothing to undo. The editor
    /// is left untouched.
    pub fn restore(&mut self, editor: &mut Editor) -> Result<()> {
        let entry = self.pop().ok_or(EditError::EmptyHistory)?;
        let UndoEntry {
            mut doc,
            cursor,
            changed,
        } = entry;
        doc.set_changed(changed);
        editor.restore_state(doc, cursor);
        Ok(())
    }

    /// The entry `restore` would apply next.
    #[must_use]
    pub fn peek(&self) -> Option<&UndoEntry> {
        if self.len == 0 {
            return None;
        }
        self.slots.get(self.prev_slot()).and_then(Option::as_ref)
    }

    /// Forget every snapshot.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = 0;
        self.len = 0;
    }

    fn push(&mut self, entry: UndoEntry) {
        // Slots are allocated lazily; until the ring wraps, head == slots.len().
        if self.head == self.slots.len() {
            self.slots.push(Some(entry));
        } else {
            self.slots[self.head] = Some(entry);
        }
        self.head = (self.head + 1) % self.capacity;
        if self.len == self.capacity {
            trace!(capacity = self.capacity, "undo ring full, dropped oldest snapshot");
        } else {
            self.len += 1;
        }
        trace!(len = self.len, "undo snapshot");
    }

    fn pop(&mut self) -> Option<UndoEntry> {
        if self.len == 0 {
            return None;
        }
        self.head = self.prev_slot();
        self.len -= 1;
        trace!(len = self.len, "undo restore");
        self.slots[self.head].take()
    }

    /// Slot just behind `head`, wrapping to the end of the ring.
    const fn prev_slot(&self) -> usize {
        match self.head.checked_sub(1) {
            Some(idx) => idx,
            None => self.capacity - 1,
        }
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
