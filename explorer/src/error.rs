//! Error types shared by every vgexplorer module

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    /// The editor did not answer, answered with an error, or timed out.
    #[error("Editor '{server}' is unreachable: {reason}")]
    EditorUnreachable { server: String, reason: String },

    /// No instance is listening on the control endpoint for this name.
    #[error("No running instance at {address}: {source}")]
    NoRunningInstance {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Destination path '{}' already exists, skipping", .0.display())]
    DestinationExists(PathBuf),

    #[error("Invalid name '{0}': names cannot contain '/' or be empty, '.' or '..'")]
    InvalidName(String),

    #[error("Invalid server name '{0}'")]
    InvalidServerName(String),

    #[error("No such file or directory: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExplorerError {
    pub(crate) fn unreachable(server: &str, reason: impl Into<String>) -> Self {
        Self::EditorUnreachable {
            server: server.to_string(),
            reason: reason.into(),
        }
    }
}

pub type ExplorerResult<T> = Result<T, ExplorerError>;
