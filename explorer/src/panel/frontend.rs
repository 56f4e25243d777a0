//! Line-oriented front-end
//!
//! Each stdin line is one command. Words are split the way a shell would for
//! simple cases: whitespace separates, single and double quotes group, and a
//! backslash escapes the next character outside single quotes.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;

use thiserror::Error;
use tokio::sync::mpsc;

use super::{Action, PanelEvent};

pub const HELP: &str = "\
commands:
  open <path>              open a file in the editor
  mkdir <entry> <name>     create a folder next to <entry>
  touch <entry> <name>     create a file next to <entry>
  rename <entry> <name>    rename <entry> in place
  copy <path>...           remember paths for paste
  paste <entry>            copy remembered paths next to <entry>
  ls [entry]               list a directory
  toggle | hide            show or hide the panel
  status                   show panel state
  quit | exit              stop the panel

The panel also stops when stdin reaches EOF, so keep a terminal attached
(stdin from /dev/null exits right after startup).";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}. Type help for available commands.")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("{0} takes no arguments")]
    NoArguments(String),

    #[error("unterminated quote")]
    UnterminatedQuote,
}

/// Split a line into words, honouring quotes and backslash escapes.
pub fn split_words(line: &str) -> Result<Vec<String>, CommandError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(ch) => current.push(ch),
                        None => return Err(CommandError::UnterminatedQuote),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(ch @ ('"' | '\\')) => current.push(ch),
                            Some(ch) => {
                                current.push('\\');
                                current.push(ch);
                            }
                            None => return Err(CommandError::UnterminatedQuote),
                        },
                        Some(ch) => current.push(ch),
                        None => return Err(CommandError::UnterminatedQuote),
                    }
                }
            }
            '\\' => {
                in_word = true;
                if let Some(ch) = chars.next() {
                    current.push(ch);
                }
            }
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<PanelEvent>, CommandError> {
    let words = split_words(line)?;
    let Some((name, args)) = words.split_first() else {
        return Ok(None);
    };

    let event = match (name.as_str(), args) {
        ("open" | "o", [path]) => PanelEvent::Command(Action::Open(path.into())),
        ("open" | "o", _) => return Err(CommandError::Usage("open <path>")),

        ("mkdir", [entry, new]) => PanelEvent::Command(Action::NewFolder {
            entry: entry.into(),
            name: new.clone(),
        }),
        ("mkdir", _) => return Err(CommandError::Usage("mkdir <entry> <name>")),

        ("touch", [entry, new]) => PanelEvent::Command(Action::NewFile {
            entry: entry.into(),
            name: new.clone(),
        }),
        ("touch", _) => return Err(CommandError::Usage("touch <entry> <name>")),

        ("rename" | "mv", [entry, new]) => PanelEvent::Command(Action::Rename {
            entry: entry.into(),
            name: new.clone(),
        }),
        ("rename" | "mv", _) => return Err(CommandError::Usage("rename <entry> <new-name>")),

        ("copy" | "cp", []) => return Err(CommandError::Usage("copy <path>...")),
        ("copy" | "cp", paths) => {
            PanelEvent::Command(Action::Copy(paths.iter().map(PathBuf::from).collect()))
        }

        ("paste", [entry]) => PanelEvent::Command(Action::Paste(entry.into())),
        ("paste", []) => PanelEvent::Command(Action::Paste(".".into())),
        ("paste", _) => return Err(CommandError::Usage("paste <entry>")),

        ("ls", []) => PanelEvent::Command(Action::List(None)),
        ("ls", [entry]) => PanelEvent::Command(Action::List(Some(entry.into()))),
        ("ls", _) => return Err(CommandError::Usage("ls [entry]")),

        ("toggle", []) => PanelEvent::Toggle,
        ("hide", []) => PanelEvent::Hide,
        ("status", []) => PanelEvent::Command(Action::Status),
        ("help" | "?", _) => PanelEvent::Command(Action::Help),
        ("quit" | "exit" | "q", []) => PanelEvent::Shutdown,

        (other @ ("toggle" | "hide" | "status" | "quit" | "exit" | "q"), _) => {
            return Err(CommandError::NoArguments(other.to_string()))
        }

        (other, _) => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(event))
}

/// Read commands from stdin until EOF, then ask the controller to stop.
///
/// Runs on a plain thread: a blocking stdin read inside the runtime would
/// keep it from shutting down while the user is idle.
pub fn spawn_stdin_reader(events: mpsc::Sender<PanelEvent>) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            let mut lines = io::stdin().lock().lines();
            loop {
                let event = match lines.next() {
                    Some(Ok(line)) => match parse_line(&line) {
                        Ok(Some(event)) => event,
                        Ok(None) => continue,
                        Err(e) => PanelEvent::Rejected(e.to_string()),
                    },
                    None => {
                        tracing::debug!("stdin closed");
                        PanelEvent::Shutdown
                    }
                    Some(Err(e)) => {
                        tracing::error!("Failed to read stdin: {}", e);
                        PanelEvent::Shutdown
                    }
                };
                let stop = event == PanelEvent::Shutdown;
                if events.blocking_send(event).is_err() || stop {
                    break;
                }
            }
        })
}
