//! Server side of the control channel

use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use tokio::net::UnixDatagram;

use super::address::ControlAddress;
use super::protocol::{ControlMessage, MAX_DATAGRAM};
use crate::error::ExplorerResult;

/// Bound control endpoint.
///
/// Dropping the listener removes the socket file, but only while the file
/// is still the one this listener created. A newer panel that rebound the
/// same name keeps its endpoint.
pub struct ControlListener {
    socket: UnixDatagram,
    path: PathBuf,
    /// (dev, ino) of the socket file right after bind
    identity: Option<(u64, u64)>,
}

impl ControlListener {
    /// Bind the endpoint, unlinking whatever already sits at the address.
    ///
    /// There is no liveness check on the previous owner: a stale file from a
    /// crashed run and a live panel's socket are both replaced.
    pub fn bind(address: &ControlAddress) -> ExplorerResult<Self> {
        let path = address.path();

        match std::fs::symlink_metadata(path) {
            Ok(_) => {
                tracing::warn!(
                    "Removing existing control endpoint {} (stale or owned by another panel)",
                    path.display()
                );
                std::fs::remove_file(path)?;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let socket = UnixDatagram::bind(path)?;
        let identity = file_identity(path);

        tracing::info!("Control endpoint listening on {}", path.display());

        Ok(Self {
            socket,
            path: path.to_path_buf(),
            identity,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait for the next datagram and decode it.
    ///
    /// Returns `None` for payloads that are not a known message.
    pub async fn recv(&self) -> io::Result<Option<ControlMessage>> {
        let mut buf = [0u8; MAX_DATAGRAM];
        let n = self.socket.recv(&mut buf).await?;
        let message = ControlMessage::decode(&buf[..n]);
        if message.is_none() {
            tracing::debug!(
                "Ignoring control payload: {:?}",
                String::from_utf8_lossy(&buf[..n])
            );
        }
        Ok(message)
    }

    /// Wait until a `toggle` datagram arrives, skipping anything else.
    pub async fn next_toggle(&self) -> io::Result<()> {
        loop {
            if let Some(ControlMessage::Toggle) = self.recv().await? {
                tracing::debug!("Toggle received on {}", self.path.display());
                return Ok(());
            }
        }
    }

    fn still_owns_endpoint(&self) -> bool {
        match (self.identity, file_identity(&self.path)) {
            (Some(ours), Some(current)) => ours == current,
            _ => false,
        }
    }
}

impl Drop for ControlListener {
    fn drop(&mut self) {
        if self.still_owns_endpoint() {
            match std::fs::remove_file(&self.path) {
                Ok(()) => tracing::debug!("Removed control endpoint {}", self.path.display()),
                Err(e) => tracing::warn!(
                    "Failed to remove control endpoint {}: {}",
                    self.path.display(),
                    e
                ),
            }
        } else {
            tracing::debug!(
                "Control endpoint {} was replaced, leaving it in place",
                self.path.display()
            );
        }
    }
}

fn file_identity(path: &Path) -> Option<(u64, u64)> {
    std::fs::symlink_metadata(path)
        .ok()
        .map(|m| (m.dev(), m.ino()))
}
