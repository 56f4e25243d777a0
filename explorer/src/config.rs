//! Configuration loading (config.toml)
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! Search order:
//! 1. `--config <path>` (must exist)
//! 2. `~/.config/vgexplorer/config.toml` (optional)

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::editor::EditorFlavor;
use crate::error::{ExplorerError, ExplorerResult};

// ============================================================================
// Configuration Types
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub panel: PanelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Binary used for the Vim flavor
    #[serde(default = "default_vim")]
    pub vim: String,

    /// Binary used for the Neovim flavor (neovim-remote)
    #[serde(default = "default_neovim")]
    pub neovim: String,

    /// Upper bound on a single remote call
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_vim() -> String {
    "vim".to_string()
}

fn default_neovim() -> String {
    "nvr".to_string()
}

fn default_timeout() -> u64 {
    5
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            vim: default_vim(),
            neovim: default_neovim(),
            timeout_secs: default_timeout(),
        }
    }
}

impl EditorConfig {
    /// Resolve the binary for a flavor, expanding `~` and `$VARS`.
    pub fn command_for(&self, flavor: EditorFlavor) -> String {
        let raw = match flavor {
            EditorFlavor::Vim => &self.vim,
            EditorFlavor::Neovim => &self.neovim,
        };
        shellexpand::full(raw)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| raw.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PanelConfig {
    /// List dotfiles in `ls` output
    #[serde(default)]
    pub show_hidden: bool,
}

// ============================================================================
// Loading
// ============================================================================

impl Config {
    /// Default location: `<config_dir>/vgexplorer/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("vgexplorer").join("config.toml"))
    }

    /// Load config. An explicit path must exist; the default path is optional.
    pub fn load(explicit: Option<&Path>) -> ExplorerResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from_path(path: &Path) -> ExplorerResult<Self> {
        tracing::debug!("Loading config from: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            ExplorerError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
            .map_err(|e| ExplorerError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
