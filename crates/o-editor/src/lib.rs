//! # o-editor: editing core for o-edit
//!
//! This crate holds everything between a key press and the bytes on disk:
//!
//! - **[`document`]**: `Document`, lines in a rope, bit-exact load and save
//! - **[`position`]**: `Position` (line, col) and `ScreenPos` (x, y)
//! - **[`view`]**: tab expansion and the data/screen column mapping
//! - **[`cursor`]**: cursor movement, sticky column, and scrolling
//! - **[`editor`]**: line editing: Enter, Backspace, smart indent and dedent
//! - **[`undo`]**: bounded ring of whole-editor snapshots
//! - **[`search`]**: forward literal search without wraparound
//! - **[`block`]** and **[`filter`]**: sorting and external commands over a
//!   block of lines
//! - **[`session`]**: the key map, prompts and status line
//!
//! Terminal I/O lives outside: a front end feeds [`keys::Key`] values into a
//! [`session::Session`] and paints through [`render::Canvas`].

pub mod block;
pub mod cursor;
pub mod document;
pub mod editor;
pub mod error;
pub mod filter;
pub mod keys;
pub mod options;
pub mod position;
pub mod render;
pub mod resize;
pub mod search;
pub mod session;
pub mod undo;
pub mod view;
