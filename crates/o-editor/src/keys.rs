//! Abstract key events and where they come from.
//!
//! The session never talks to a terminal. It pulls [`Key`] values from a
//! [`KeySource`], which a terminal front end, a test, or a key script can
//! implement. [`ScriptKeys`] is the script implementation: one token per
//! entry, parsed with [`Key::parse`].
//!
//! # Token syntax
//!
//! | Token                          | Key                     |
//! |--------------------------------|-------------------------|
//! | `a`, `}`, `é` (one char)       | `Char`                  |
//! | `space`                        | `Char(' ')`             |
//! | `enter`, `return`              | `Enter`                 |
//! | `tab`, `backspace`, `bs`       | `Tab`, `Backspace`      |
//! | `esc`, `escape`                | `Escape`                |
//! | `up`, `down`, `left`, `right`  | arrows                  |
//! | `ctrl-x`, `c-x`, `^x`          | `Ctrl('x')`             |
//!
//! Names are case-insensitive. [`ScriptKeys`] types any other token
//! literally, one `Char` per char, so `hello` expands to five keys.

use std::collections::VecDeque;
use std::fmt;

/// One key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// A control chord, stored as the lowercase letter (`Ctrl('s')`).
    Ctrl(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    /// Parse one script token. Returns `None` for an empty token or an
    /// unknown name of more than one char.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        let first = chars.next()?;
        if chars.next().is_none() {
            return Some(Self::Char(first));
        }

        let lower = token.to_ascii_lowercase();
        if let Some(rest) = lower
            .strip_prefix("ctrl-")
            .or_else(|| lower.strip_prefix("c-"))
            .or_else(|| lower.strip_prefix('^'))
        {
            let mut rest = rest.chars();
            return match (rest.next(), rest.next()) {
                (Some(ch), None) if ch.is_ascii_alphabetic() => Some(Self::Ctrl(ch)),
                _ => None,
            };
        }

        Some(match lower.as_str() {
            "space" => Self::Char(' '),
            "enter" | "return" => Self::Enter,
            "tab" => Self::Tab,
            "backspace" | "bs" => Self::Backspace,
            "esc" | "escape" => Self::Escape,
            "up" => Self::Up,
            "down" => Self::Down,
            "left" => Self::Left,
            "right" => Self::Right,
            _ => return None,
        })
    }

    /// The control chord for `ch`, if `ch` is a letter.
    #[must_use]
    pub fn ctrl(ch: char) -> Option<Self> {
        ch.is_ascii_alphabetic()
            .then_some(Self::Ctrl(ch.to_ascii_lowercase()))
    }

    /// The decimal digit this key types, if any.
    #[must_use]
    pub const fn digit(self) -> Option<char> {
        match self {
            Self::Char(ch) if ch.is_ascii_digit() => Some(ch),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(' ') => f.write_str("space"),
            Self::Char(ch) => write!(f, "{ch}"),
            Self::Ctrl(ch) => write!(f, "ctrl-{ch}"),
            Self::Enter => f.write_str("enter"),
            Self::Tab => f.write_str("tab"),
            Self::Backspace => f.write_str("backspace"),
            Self::Escape => f.write_str("esc"),
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

// ---------------------------------------------------------------------------
// Key sources
// ---------------------------------------------------------------------------

/// Blocking "read the next key" primitive.
pub trait KeySource {
    /// The next key, or `None` when input is exhausted.
    fn next_key(&mut self) -> Option<Key>;
}

/// Keys from a prepared script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptKeys {
    queue: VecDeque<Key>,
}

impl ScriptKeys {
    /// Build from tokens. Tokens that are not key names are typed
    /// literally; empty tokens are skipped.
    #[must_use]
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut script = Self::default();
        for token in tokens {
            script.push_token(token.as_ref());
        }
        script
    }

    /// Build from whitespace-separated tokens, as in `"a b enter ctrl-s"`.
    #[must_use]
    pub fn parse(script: &str) -> Self {
        Self::from_tokens(script.split_whitespace())
    }

    /// Append one token.
    pub fn push_token(&mut self, token: &str) {
        match Key::parse(token) {
            Some(key) => self.queue.push_back(key),
            None => self.queue.extend(token.chars().map(Key::Char)),
        }
    }

    pub fn push(&mut self, key: Key) {
        self.queue.push_back(key);
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl KeySource for ScriptKeys {
    fn next_key(&mut self) -> Option<Key> {
        self.queue.pop_front()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
