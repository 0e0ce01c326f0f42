// SPDX-License-Identifier: MIT
//
// o-edit: a small text editor core, driven by key scripts.
//
// The binary loads (or creates) one file and feeds it key tokens read from
// stdin, one line at a time, through an o-editor `Session`. Status messages
// go to stderr. There is no terminal UI here; a front end would feed the
// same session from raw keyboard input instead.
//
//   stdin line → Step → ScriptKeys → Session::run → editor/undo/document
//                     ↘ filter / sort commands ↗
//
// Script lines:
//
//   a b enter ctrl-s     key tokens, see `o_editor::keys`
//   !sort -r             pipe the bookmarked (or current) block through a command
//   :sort                sort the block under the cursor
//   :sortwords           sort the words on the cursor line
//   :insertfile NAME     insert a file at the cursor
//   :insertdate          type today's date at the cursor

use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;

use o_editor::document::Document;
use o_editor::filter::FilterCommand;
use o_editor::keys::ScriptKeys;
use o_editor::options::Options;
use o_editor::resize;
use o_editor::session::{Action, Session, VERSION};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
usage: o-edit [--set OPTIONS] FILE [LINE]
       o-edit [--set OPTIONS] FILE:LINE
       o-edit [--set OPTIONS] FILE +LINE

Reads key tokens from stdin, one script line at a time, and applies them
to FILE. Tokens are whitespace-separated: single characters, `space`,
`enter`, `tab`, `backspace`, `esc`, arrows, and `ctrl-X` chords. Any other
word is typed literally.

  !CMD ARGS     filter the current block through CMD
  :sort         sort the current block
  :sortwords    sort the words on the current line
  :insertfile NAME
                insert NAME (relative to FILE's directory) at the cursor
  :insertdate   type today's date (YYYY-MM-DD) at the cursor

options (for --set, `:set` syntax):
  tabstop=N (ts)   expandtab (et)   scrollspeed=N (ss)
  trimsave (tw)    filtertimeout=N (ft)   undolevels=N (ul)

environment:
  O_LOG         log filter for stderr, e.g. `debug` (default `warn`)";

// ─── Command line ───────────────────────────────────────────────────────────

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
enum Invocation {
    Edit(Args),
    Help,
    Version,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    file: PathBuf,
    line: Option<usize>,
    set: Vec<String>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Invocation, String> {
    let mut parsed = Args::default();
    let mut file = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if let Some(value) = arg.strip_prefix("--set=") {
            parsed.set.push(value.to_string());
            continue;
        }
        if let Some(number) = arg.strip_prefix('+') {
            parsed.line = Some(parse_line_number(number)?);
            continue;
        }
        match arg.as_str() {
            "-h" | "--help" => return Ok(Invocation::Help),
            "-V" | "--version" => return Ok(Invocation::Version),
            "--set" => {
                let value = args.next().ok_or("--set needs a value")?;
                parsed.set.push(value);
            }
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(format!("unknown option: {arg}"));
            }
            _ if file.is_none() => {
                let (path, line) = split_file_line(&arg);
                file = Some(path);
                if line.is_some() {
                    parsed.line = line;
                }
            }
            _ => parsed.line = Some(parse_line_number(&arg)?),
        }
    }

    parsed.file = file.ok_or("missing FILE")?;
    Ok(Invocation::Edit(parsed))
}

fn parse_line_number(s: &str) -> Result<usize, String> {
    s.parse().map_err(|_| format!("not a line number: {s}"))
}

/// `name:42` → (`name`, 42). Anything else is a plain path.
fn split_file_line(arg: &str) -> (PathBuf, Option<usize>) {
    match arg.rsplit_once(':') {
        Some((path, line)) if !path.is_empty() => match line.parse() {
            Ok(n) => (PathBuf::from(path), Some(n)),
            Err(_) => (PathBuf::from(arg), None),
        },
        _ => (PathBuf::from(arg), None),
    }
}

// ─── Script ─────────────────────────────────────────────────────────────────

/// One line of the stdin script.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Keys(ScriptKeys),
    Filter(FilterCommand),
    SortBlock,
    SortWords,
    InsertFile(String),
    InsertDate,
}

fn parse_step(line: &str) -> Option<Step> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if let Some(cmd) = line.strip_prefix('!') {
        return FilterCommand::parse(cmd).map(Step::Filter);
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    Some(match word {
        ":sort" => Step::SortBlock,
        ":sortwords" => Step::SortWords,
        ":insertfile" => Step::InsertFile(rest.trim().to_string()),
        ":insertdate" => Step::InsertDate,
        _ => Step::Keys(ScriptKeys::parse(line)),
    })
}

/// Apply one step. Returns `Action::Quit` once the script pressed Ctrl-Q.
fn apply(session: &mut Session, step: Step) -> Action {
    match step {
        Step::Keys(mut keys) => return session.run(&mut keys),
        Step::Filter(cmd) => {
            if let Ok(range) = session.run_filter(&cmd) {
                debug!(command = %cmd, lines = ?range, "filtered block");
            }
        }
        Step::SortBlock => {
            if let Err(e) = session.sort_block() {
                eprintln!("o-edit: {e}");
            }
        }
        Step::SortWords => {
            if let Err(e) = session.sort_words() {
                eprintln!("o-edit: {e}");
            }
        }
        // Failures land in the status line, which the caller prints.
        Step::InsertFile(name) => {
            let _ = session.insert_file(&name);
        }
        Step::InsertDate => {
            if let Err(e) = session.insert_date() {
                eprintln!("o-edit: {e}");
            }
        }
    }
    Action::Continue
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("O_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    init_logging();

    let args = match parse_args(env::args().skip(1)) {
        Ok(Invocation::Edit(args)) => args,
        Ok(Invocation::Help) => {
            println!("{USAGE}");
            return;
        }
        Ok(Invocation::Version) => {
            println!("{VERSION}");
            return;
        }
        Err(e) => {
            eprintln!("o-edit: {e}\n\n{USAGE}");
            process::exit(2);
        }
    };

    let options = Options::from_set(&args.set.join(" ")).unwrap_or_else(|e| {
        eprintln!("o-edit: {e}");
        process::exit(2);
    });

    let doc = Document::load_or_new(&args.file).unwrap_or_else(|e| {
        eprintln!("o-edit: {e}");
        process::exit(1);
    });

    let mut session = Session::new(doc, options);
    resize::install_handler();
    if let Some(n) = args.line {
        session.go_to_line(n);
    }

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("o-edit: stdin: {e}");
                break;
            }
        };
        let action = parse_step(&line).map_or(Action::Continue, |step| apply(&mut session, step));
        if let Some(msg) = session.take_status() {
            eprintln!("{msg}");
        }
        if action == Action::Quit {
            break;
        }
    }

    if session.editor().doc().is_changed() {
        warn!(file = %args.file.display(), "quitting with unsaved changes");
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
