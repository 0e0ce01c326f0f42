//! Error type shared by every editing operation.
//!
//! Nothing in the core is fatal. Each failure maps to one [`EditError`]
//! variant and the session turns it into a status-line message. The
//! `Display` strings are the messages the user sees.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Result alias used throughout the crate.
pub type Result<T, E = EditError> = std::result::Result<T, E>;

/// Everything that can go wrong while editing.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// A line index outside `0..len`.
    #[error("line {line} out of range (document has {len} lines)")]
    LineOutOfRange { line: usize, len: usize },

    /// A column outside `0..=len` on an existing line.
    #[error("column {col} out of range on line {line} (line has {len} chars)")]
    ColumnOutOfRange { line: usize, col: usize, len: usize },

    /// A forward search ran off the end of the document.
    #[error("Not found (no wraparound)")]
    NotFound,

    /// Undo was requested with an empty history.
    #[error("Nothing more to undo")]
    EmptyHistory,

    #[error("{}: no such file", path.display())]
    FileNotFound { path: PathBuf },

    /// Save was requested for a document that was never bound to a path.
    #[error("No file name")]
    NoFileName,

    #[error("{}: is a directory", path.display())]
    IsDirectory { path: PathBuf },

    #[error("{}: permission denied", path.display())]
    PermissionDenied { path: PathBuf },

    #[error(transparent)]
    Io(#[from] io::Error),

    /// The external filter did not finish in time and was killed.
    #[error("command timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The external filter could not run or exited with a failure status.
    #[error("{command}: {message}")]
    FilterFailed { command: String, message: String },

    /// The external filter succeeded but printed nothing.
    #[error("no output")]
    EmptyOutput,
}

impl EditError {
    /// True for index errors. These mean a caller broke a coordinate
    /// invariant, as opposed to an expected outcome like a search miss.
    #[must_use]
    pub const fn is_fault(&self) -> bool {
        matches!(
            self,
            Self::LineOutOfRange { .. } | Self::ColumnOutOfRange { .. }
        )
    }

    /// Map an `io::Error` raised while opening `path` to the precise variant.
    pub(crate) fn from_open(err: io::Error, path: PathBuf) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::FileNotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            io::ErrorKind::IsADirectory => Self::IsDirectory { path },
            _ => Self::Io(err),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
