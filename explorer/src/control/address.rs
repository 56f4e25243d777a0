use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ExplorerError, ExplorerResult};

/// Fixed prefix of every control endpoint. External tools that want to
/// toggle a panel must build the same path.
pub const SOCKET_PREFIX: &str = "/tmp/vgexplorer-";

/// `sun_path` holds 108 bytes including the terminating NUL on Linux
const SUN_PATH_MAX: usize = 107;

/// Address of a panel's control endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlAddress {
    path: PathBuf,
}

impl ControlAddress {
    /// The address a panel for `server_name` listens on
    pub fn for_server(server_name: &str) -> ExplorerResult<Self> {
        Self::with_prefix(SOCKET_PREFIX, server_name)
    }

    /// Same derivation rule under a different prefix
    pub fn with_prefix(prefix: &str, server_name: &str) -> ExplorerResult<Self> {
        if server_name.is_empty()
            || server_name.contains('/')
            || server_name.contains('\0')
        {
            return Err(ExplorerError::InvalidServerName(server_name.to_string()));
        }

        let path = format!("{}{}", prefix, server_name);
        if path.len() > SUN_PATH_MAX {
            return Err(ExplorerError::InvalidServerName(server_name.to_string()));
        }

        Ok(Self {
            path: PathBuf::from(path),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ControlAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
