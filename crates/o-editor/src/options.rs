//! Editor options and the `:set`-style syntax used to change them.
//!
//! [`Options`] is a plain `Copy` value built once at startup (from defaults
//! plus any `--set` arguments) and handed to the [`Editor`](crate::editor::Editor).
//! Nothing reads options from global state.
//!
//! # Supported syntax
//!
//! | Syntax          | Effect                        |
//! |-----------------|-------------------------------|
//! | `option`        | Enable boolean / show numeric |
//! | `nooption`      | Disable boolean               |
//! | `option!`       | Toggle boolean                |
//! | `option?`       | Query current value           |
//! | `option=N`      | Assign numeric value          |
//! | *(empty)*       | Show changed options          |
//! | `all`           | Show all options              |
//!
//! # Option names
//!
//! | Full name       | Abbrev | Type    | Default | Range          |
//! |-----------------|--------|---------|---------|----------------|
//! | `tabstop`       | `ts`   | integer | 4       | 1..=64         |
//! | `expandtab`     | `et`   | bool    | false   |                |
//! | `scrollspeed`   | `ss`   | integer | 10      | 1..=10000      |
//! | `trimsave`      | `tw`   | bool    | true    |                |
//! | `filtertimeout` | `ft`   | seconds | 10      | 1..=3600       |
//! | `undolevels`    | `ul`   | integer | 8192    | 1..=1000000    |

use std::time::Duration;

use crate::undo::DEFAULT_CAPACITY;

/// A parsed `:set` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `option`: enable a boolean option.
    On(String),

    /// `nooption`: disable a boolean option.
    Off(String),

    /// `option!`: toggle a boolean option.
    Toggle(String),

    /// `option?`: query the current value.
    Query(String),

    /// `option=value`: assign a value.
    Assign(String, String),

    /// No arguments: show options that differ from their defaults.
    ShowChanged,

    /// `all`: show all options.
    ShowAll,
}

/// Why a directive could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    #[error("unknown option: {0}")]
    Unknown(String),

    #[error("not a boolean option: {0}")]
    NotBoolean(String),

    #[error("not a numeric option: {0}")]
    NotNumeric(String),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Full name for an option name or abbreviation.
#[must_use]
pub fn canonical(name: &str) -> Option<&'static str> {
    Some(match name {
        "tabstop" | "ts" => "tabstop",
        "expandtab" | "et" => "expandtab",
        "scrollspeed" | "ss" => "scrollspeed",
        "trimsave" | "tw" => "trimsave",
        "filtertimeout" | "ft" => "filtertimeout",
        "undolevels" | "ul" => "undolevels",
        _ => return None,
    })
}

/// Returns `true` if `name` is a known boolean option (full name or abbreviation).
#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    matches!(canonical(name), Some("expandtab" | "trimsave"))
}

/// Returns `true` if `name` is a known numeric option (full name or abbreviation).
#[must_use]
pub fn is_numeric_option(name: &str) -> bool {
    matches!(
        canonical(name),
        Some("tabstop" | "scrollspeed" | "filtertimeout" | "undolevels")
    )
}

/// Parse a whitespace-separated argument string into directives. An empty
/// string produces [`SetDirective::ShowChanged`].
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return vec![SetDirective::ShowChanged];
    }
    trimmed.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single argument into a directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if arg == "all" {
        return SetDirective::ShowAll;
    }
    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }
    if let Some(name) = arg.strip_suffix('?') {
        return SetDirective::Query(name.to_string());
    }
    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }
    // Only strip "no" when the rest is a boolean option name.
    if let Some(name) = arg.strip_prefix("no") {
        if is_bool_option(name) {
            return SetDirective::Off(name.to_string());
        }
    }
    if is_numeric_option(arg) {
        return SetDirective::Query(arg.to_string());
    }
    SetDirective::On(arg.to_string())
}

/// `name` when true, `noname` when false.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// The option table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Cells per tab stop. Only affects screen coordinates.
    pub tab_width: usize,
    /// Indent with `tab_width` spaces instead of `\t`.
    pub expand_tab: bool,
    /// Lines moved by page up/down.
    pub scroll_speed: usize,
    /// Drop trailing whitespace from the written file on save.
    pub trim_on_save: bool,
    /// Wall-clock limit for external filter commands.
    pub filter_timeout: Duration,
    /// Number of undo snapshots kept.
    pub undo_capacity: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tab_width: 4,
            expand_tab: false,
            scroll_speed: 10,
            trim_on_save: true,
            filter_timeout: Duration::from_secs(10),
            undo_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Options {
    /// Defaults with every directive in `args` applied in order.
    ///
    /// # Errors
    ///
    /// The first directive that fails to apply.
    pub fn from_set(args: &str) -> Result<Self, OptionError> {
        let mut opts = Self::default();
        for directive in parse_set(args) {
            opts.apply(&directive)?;
        }
        Ok(opts)
    }

    /// The string one level of smart indent inserts.
    #[must_use]
    pub fn indent_unit(&self) -> String {
        if self.expand_tab {
            " ".repeat(self.tab_width.max(1))
        } else {
            "\t".to_string()
        }
    }

    /// Apply one directive. Queries and show directives return the text to
    /// display; assignments return `None`.
    ///
    /// # Errors
    ///
    /// Unknown names, type mismatches and unparsable or zero values.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>, OptionError> {
        match directive {
            SetDirective::On(name) => self.set_bool(name, |_| true).map(|()| None),
            SetDirective::Off(name) => self.set_bool(name, |_| false).map(|()| None),
            SetDirective::Toggle(name) => self.set_bool(name, |v| !v).map(|()| None),
            SetDirective::Query(name) => {
                let full = canonical(name).ok_or_else(|| OptionError::Unknown(name.clone()))?;
                Ok(Some(self.show(full)))
            }
            SetDirective::Assign(name, value) => self.assign(name, value).map(|()| None),
            SetDirective::ShowChanged => {
                let defaults = Self::default();
                let changed: Vec<String> = NAMES
                    .iter()
                    .filter(|n| self.show(n) != defaults.show(n))
                    .map(|n| self.show(n))
                    .collect();
                Ok(Some(changed.join("  ")))
            }
            SetDirective::ShowAll => {
                let all: Vec<String> = NAMES.iter().map(|n| self.show(n)).collect();
                Ok(Some(all.join("  ")))
            }
        }
    }

    fn set_bool(&mut self, name: &str, f: impl FnOnce(bool) -> bool) -> Result<(), OptionError> {
        match canonical(name) {
            Some("expandtab") => self.expand_tab = f(self.expand_tab),
            Some("trimsave") => self.trim_on_save = f(self.trim_on_save),
            Some(_) => return Err(OptionError::NotBoolean(name.to_string())),
            None => return Err(OptionError::Unknown(name.to_string())),
        }
        Ok(())
    }

    fn assign(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        let full = canonical(name).ok_or_else(|| OptionError::Unknown(name.to_string()))?;
        if !is_numeric_option(full) {
            return Err(OptionError::NotNumeric(name.to_string()));
        }
        let n = value
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=max_value(full)).contains(n))
            .ok_or_else(|| OptionError::InvalidValue {
                name: full.to_string(),
                value: value.to_string(),
            })?;
        match full {
            "tabstop" => self.tab_width = n,
            "scrollspeed" => self.scroll_speed = n,
            "filtertimeout" => self.filter_timeout = Duration::from_secs(u64::try_from(n).unwrap_or(u64::MAX)),
            _ => self.undo_capacity = n,
        }
        Ok(())
    }

    fn show(&self, full: &str) -> String {
        match full {
            "tabstop" => format!("tabstop={}", self.tab_width),
            "expandtab" => format_bool("expandtab", self.expand_tab),
            "scrollspeed" => format!("scrollspeed={}", self.scroll_speed),
            "trimsave" => format_bool("trimsave", self.trim_on_save),
            "filtertimeout" => format!("filtertimeout={}", self.filter_timeout.as_secs()),
            _ => format!("undolevels={}", self.undo_capacity),
        }
    }
}

/// Largest value a numeric option accepts.
fn max_value(full: &str) -> usize {
    match full {
        "tabstop" => 64,
        "scrollspeed" => 10_000,
        "filtertimeout" => 3600,
        _ => 1_000_000,
    }
}

const NAMES: [&str; 6] = [
    "tabstop",
    "expandtab",
    "scrollspeed",
    "trimsave",
    "filtertimeout",
    "undolevels",
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
