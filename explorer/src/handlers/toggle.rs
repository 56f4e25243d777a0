//! `--toggle`: client mode

use anyhow::Result;

use crate::control::{send_toggle, ControlAddress};

/// Send one toggle to the panel serving `server_name` and return.
pub async fn run_toggle(server_name: &str) -> Result<()> {
    let address = ControlAddress::for_server(server_name)?;
    send_toggle(&address).await?;
    Ok(())
}
