//! Panel controller and its text front-end
//!
//! The controller is the only owner of panel state. Everything that wants to
//! change that state (the control listener, the stdin reader, signal
//! handlers) sends a [`PanelEvent`] over one mpsc queue, the same way a GUI
//! toolkit would post work onto its event thread.

mod controller;
mod frontend;

use std::path::PathBuf;

pub use controller::PanelController;
pub use frontend::{parse_line, spawn_stdin_reader, split_words, CommandError, HELP};

/// Depth of the controller queue
pub const EVENT_QUEUE_DEPTH: usize = 32;

/// Work items for the controller loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// Flip visibility (control channel)
    Toggle,
    /// Hide the panel if shown
    Hide,
    /// A user action from the front-end
    Command(Action),
    /// Input the front-end could not parse
    Rejected(String),
    /// Stop the loop
    Shutdown,
}

/// Menu actions; `entry` paths are relative to the panel root unless absolute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Open(PathBuf),
    NewFolder { entry: PathBuf, name: String },
    NewFile { entry: PathBuf, name: String },
    Rename { entry: PathBuf, name: String },
    Copy(Vec<PathBuf>),
    Paste(PathBuf),
    List(Option<PathBuf>),
    Status,
    Help,
}

/// Forward every `toggle` datagram to the controller queue.
///
/// Ends when the queue closes or the socket fails.
pub async fn forward_toggles(
    listener: crate::control::ControlListener,
    events: tokio::sync::mpsc::Sender<PanelEvent>,
) {
    loop {
        if let Err(e) = listener.next_toggle().await {
            tracing::error!("Control endpoint {} failed: {}", listener.path().display(), e);
            break;
        }
        if events.send(PanelEvent::Toggle).await.is_err() {
            break;
        }
    }
}
