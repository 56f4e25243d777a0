//! Client side of the control channel (`--toggle`)

use tokio::net::UnixDatagram;

use super::address::ControlAddress;
use super::protocol::ControlMessage;
use crate::error::{ExplorerError, ExplorerResult};

/// Send `toggle` to the panel bound at `address`.
///
/// Success means the datagram was handed to the kernel, not that the panel
/// acted on it. No reply is expected.
pub async fn send_toggle(address: &ControlAddress) -> ExplorerResult<()> {
    let no_instance = |source: std::io::Error| ExplorerError::NoRunningInstance {
        address: address.to_string(),
        source,
    };

    let socket = UnixDatagram::unbound()?;
    socket.connect(address.path()).map_err(no_instance)?;
    socket
        .send(ControlMessage::Toggle.encode())
        .await
        .map_err(no_instance)?;

    tracing::info!("Sent toggle to {}", address);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ControlListener;
    use std::time::Duration;

    #[tokio::test]
    async fn test_no_listener_is_no_running_instance() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = format!("{}/vgx-", dir.path().display());
        let addr = ControlAddress::with_prefix(&prefix, "absent").unwrap();

        let err = send_toggle(&addr).await.unwrap_err();
        assert!(matches!(err, ExplorerError::NoRunningInstance { .. }));
        assert!(!addr.path().exists());
    }

    #[tokio::test]
    async fn test_dead_socket_file_is_no_running_instance() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = format!("{}/vgx-", dir.path().display());
        let addr = ControlAddress::with_prefix(&prefix, "dead").unwrap();

        // A socket file whose owner is gone refuses connections
        let orphan = std::os::unix::net::UnixDatagram::bind(addr.path()).unwrap();
        drop(orphan);

        let err = send_toggle(&addr).await.unwrap_err();
        assert!(matches!(err, ExplorerError::NoRunningInstance { .. }));
    }

    #[tokio::test]
    async fn test_toggle_reaches_listener() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = format!("{}/vgx-", dir.path().display());
        let addr = ControlAddress::with_prefix(&prefix, "live").unwrap();
        let listener = ControlListener::bind(&addr).unwrap();

        send_toggle(&addr).await.unwrap();

        tokio::time::timeout(Duration::from_secs(2), listener.next_toggle())
            .await
            .expect("toggle not delivered")
            .unwrap();
    }
}
