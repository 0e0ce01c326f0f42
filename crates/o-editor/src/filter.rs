//! External filter commands over the current block.
//!
//! The block text is piped through a subprocess and, if the command
//! succeeds in time with some output, the block is replaced by that output.
//!
//! Three background threads do the blocking I/O: one writes the block to
//! the child's stdin, two drain stdout and stderr into a single channel.
//! The calling thread waits on that channel with `recv_timeout` against a
//! fixed deadline, so a command that hangs, whether it stops reading input
//! or never exits, is killed when the deadline passes. The document is
//! only touched after a confirmed, successful, non-empty result, and a
//! fresh undo snapshot is taken right before.

use std::fmt;
use std::io::{Read, Write};
use std::ops::Range;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::editor::Editor;
use crate::error::{EditError, Result};
use crate::position::Position;
use crate::undo::UndoStack;

/// Read size for the output pipes.
const READ_BUF_SIZE: usize = 4096;

/// How often to check for exit once both output pipes have closed.
const EXIT_POLL: Duration = Duration::from_millis(5);

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCommand {
    program: String,
    args: Vec<String>,
}

/// A piece of output from one of the child's pipes.
enum Chunk {
    Data(Vec<u8>),
    Eof,
}

impl FilterCommand {
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Split a command line on whitespace. Returns `None` for a blank line.
    /// There is no quoting; wrap complex pipelines in `sh -c` yourself.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self::new(program, words.collect()))
    }

    /// Run the command with `input` on stdin and return its combined
    /// stdout and stderr.
    ///
    /// # Errors
    ///
    /// - [`EditError::FilterFailed`] if the program cannot start or exits
    ///   with a failure status
    /// - [`EditError::Timeout`] if it has not finished within `timeout`;
    ///   the child is killed
    /// - [`EditError::EmptyOutput`] if it succeeds without printing anything
    pub fn run(&self, input: &str, timeout: Duration) -> Result<String> {
        let deadline = Instant::now() + timeout;
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.failed(e.to_string()))?;
        debug!(command = %self, pid = child.id(), "filter started");

        let (tx, rx) = mpsc::channel();
        if let Err(e) = spawn_io_threads(&mut child, input.to_string(), &tx) {
            kill(&mut child);
            return Err(e.into());
        }
        drop(tx);

        let mut output = Vec::new();
        let mut open_pipes = 2;
        while open_pipes > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(Chunk::Data(bytes)) => output.extend_from_slice(&bytes),
                Ok(Chunk::Eof) => open_pipes -= 1,
                Err(RecvTimeoutError::Timeout) => return Err(self.timed_out(&mut child, timeout)),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                return Err(self.timed_out(&mut child, timeout));
            }
            thread::sleep(EXIT_POLL);
        };

        if !status.success() {
            warn!(command = %self, %status, "filter failed");
            return Err(self.failed(status.to_string()));
        }
        if output.is_empty() {
            return Err(EditError::EmptyOutput);
        }
        debug!(command = %self, bytes = output.len(), "filter finished");
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    fn failed(&self, message: String) -> EditError {
        EditError::FilterFailed {
            command: self.to_string(),
            message,
        }
    }

    fn timed_out(&self, child: &mut Child, timeout: Duration) -> EditError {
        warn!(command = %self, ?timeout, "filter timed out, killing it");
        kill(child);
        EditError::Timeout(timeout)
    }
}

impl fmt::Display for FilterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Pipe the block around `anchor` through `cmd` and replace the block with
/// the output. Snapshots `undo` just before replacing. Returns the line
/// range of the new block.
///
/// # Errors
///
/// Anything [`FilterCommand::run`] reports, or an out-of-range anchor. On
/// error the editor and the undo stack are unchanged.
pub fn apply(
    editor: &mut Editor,
    undo: &mut UndoStack,
    anchor: Position,
    cmd: &FilterCommand,
) -> Result<Range<usize>> {
    let input = editor.block_text(anchor.line)?;
    let output = cmd.run(&input, editor.options().filter_timeout)?;
    undo.snapshot(editor);
    editor.replace_block(anchor, &output)
}

// -- I/O threads -------------------------------------------------------------

fn spawn_io_threads(child: &mut Child, input: String, tx: &Sender<Chunk>) -> std::io::Result<()> {
    if let Some(mut stdin) = child.stdin.take() {
        thread::Builder::new()
            .name("filter-stdin".into())
            .spawn(move || {
                // A child that exits without reading gives EPIPE; that is fine.
                let _ = stdin.write_all(input.as_bytes());
            })?;
    }
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    spawn_reader("filter-stdout", stdout, tx.clone())?;
    spawn_reader("filter-stderr", stderr, tx.clone())?;
    Ok(())
}

fn spawn_reader<R: Read + Send + 'static>(
    name: &str,
    pipe: Option<R>,
    tx: Sender<Chunk>,
) -> std::io::Result<()> {
    thread::Builder::new().name(name.into()).spawn(move || {
        if let Some(mut pipe) = pipe {
            let mut buf = [0u8; READ_BUF_SIZE];
            loop {
                match pipe.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if tx.send(Chunk::Data(buf[..n].to_vec())).is_err() {
                            return;
                        }
                    }
                }
            }
        }
        let _ = tx.send(Chunk::Eof);
    })?;
    Ok(())
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
