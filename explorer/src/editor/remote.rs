//! Editor client invocations with timeout enforcement

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::keys::edit_keys;
use super::{EditorFlavor, EditorRemote};
use crate::config::EditorConfig;
use crate::error::{ExplorerError, ExplorerResult};

/// Maximum stderr excerpt carried into an error message
const MAX_STDERR_EXCERPT: usize = 200;

/// Drives a named editor instance through its client binary
#[derive(Debug, Clone)]
pub struct RemoteEditor {
    command: String,
    server_name: String,
    timeout: Duration,
    flavor: EditorFlavor,
}

impl RemoteEditor {
    pub fn new(command: impl Into<String>, server_name: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            server_name: server_name.into(),
            timeout,
            flavor: EditorFlavor::Vim,
        }
    }

    pub fn with_flavor(mut self, flavor: EditorFlavor) -> Self {
        self.flavor = flavor;
        self
    }

    /// Build from config for the chosen flavor
    pub fn from_config(config: &EditorConfig, flavor: EditorFlavor, server_name: &str) -> Self {
        Self::new(config.command_for(flavor), server_name, config.timeout()).with_flavor(flavor)
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Run `<command> --servername <name> <args...>` and wait for it.
    ///
    /// Spawn errors, timeouts and non-zero exits all collapse into
    /// `EditorUnreachable`. The child is killed when the timeout drops it.
    async fn invoke(&self, args: &[&str]) -> ExplorerResult<Output> {
        let mut cmd = Command::new(&self.command);
        // nvr starts a fresh nvim for an unknown server unless told not to
        if self.flavor == EditorFlavor::Neovim {
            cmd.arg("--nostart");
        }
        cmd.arg("--servername")
            .arg(&self.server_name)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(
            "Invoking {} --servername {} {:?}",
            self.command,
            self.server_name,
            args
        );

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(ExplorerError::unreachable(
                    &self.server_name,
                    format!("failed to run '{}': {}", self.command, e),
                ))
            }
            Err(_elapsed) => {
                return Err(ExplorerError::unreachable(
                    &self.server_name,
                    format!("no reply within {}s", self.timeout.as_secs_f32()),
                ))
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let excerpt: String = stderr.trim().chars().take(MAX_STDERR_EXCERPT).collect();
            let reason = if excerpt.is_empty() {
                format!("{} exited with {}", self.command, output.status)
            } else {
                format!("{} exited with {}: {}", self.command, output.status, excerpt)
            };
            return Err(ExplorerError::unreachable(&self.server_name, reason));
        }

        Ok(output)
    }
}

#[async_trait]
impl EditorRemote for RemoteEditor {
    fn server_name(&self) -> &str {
        &self.server_name
    }

    async fn get_working_directory(&self) -> ExplorerResult<PathBuf> {
        let output = self.invoke(&["--remote-expr", "getcwd()"]).await?;

        let text = String::from_utf8(output.stdout).map_err(|_| {
            ExplorerError::unreachable(&self.server_name, "reply is not valid UTF-8")
        })?;
        let cwd = text.trim();
        if cwd.is_empty() {
            return Err(ExplorerError::unreachable(&self.server_name, "empty reply"));
        }

        tracing::info!("Editor '{}' working directory: {}", self.server_name, cwd);
        Ok(PathBuf::from(cwd))
    }

    async fn open_path(&self, path: &Path) -> ExplorerResult<()> {
        let keys = edit_keys(path);
        self.invoke(&["--remote-send", &keys]).await?;
        tracing::info!("Opened {} in '{}'", path.display(), self.server_name);
        Ok(())
    }
}
