//! Editor bridge
//!
//! Talks to an already-running Vim (or Neovim through `nvr`) addressed by
//! its `--servername`. Nothing is cached between calls: every request spawns
//! the editor binary in client mode, waits for it to exit and reads stdout.
//!
//! ```text
//! ┌──────────────┐  vim --servername S --remote-expr getcwd()  ┌──────────┐
//! │    panel     │ ──────────────────────────────────────────→ │  editor  │
//! │  controller  │  vim --servername S --remote-send :edit ..  │    S     │
//! └──────────────┘ ──────────────────────────────────────────→ └──────────┘
//! ```

mod keys;
mod remote;

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::ExplorerResult;

pub use keys::{edit_keys, fnameescape};
pub use remote::RemoteEditor;

/// Which editor client binary speaks the remote protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorFlavor {
    #[default]
    Vim,
    /// Neovim through neovim-remote (`nvr`), which mirrors Vim's flags
    Neovim,
}

impl fmt::Display for EditorFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorFlavor::Vim => write!(f, "vim"),
            EditorFlavor::Neovim => write!(f, "neovim"),
        }
    }
}

/// Remote-control operations the panel needs from the editor
#[async_trait]
pub trait EditorRemote: Send + Sync {
    /// Name of the editor instance being driven
    fn server_name(&self) -> &str;

    /// Ask the editor for its current working directory
    async fn get_working_directory(&self) -> ExplorerResult<PathBuf>;

    /// Ask the editor to edit `path`. The reply is not inspected.
    async fn open_path(&self, path: &Path) -> ExplorerResult<()>;
}
