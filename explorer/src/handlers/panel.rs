//! Panel mode: the long-running instance

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;

use crate::config::Config;
use crate::control::{ControlAddress, ControlListener};
use crate::editor::{EditorFlavor, RemoteEditor};
use crate::panel::{forward_toggles, spawn_stdin_reader, PanelController, PanelEvent, EVENT_QUEUE_DEPTH};

/// Start the panel for `server_name` and run it until shutdown.
///
/// Fails before anything is bound if the editor cannot report its working
/// directory.
pub async fn run_panel(server_name: &str, flavor: EditorFlavor, config: &Config) -> Result<()> {
    let address = ControlAddress::for_server(server_name)?;
    let editor = Arc::new(RemoteEditor::from_config(&config.editor, flavor, server_name));
    tracing::info!(
        "Starting panel for {} server '{}' via {}",
        flavor,
        server_name,
        editor.command()
    );

    let controller = PanelController::start(editor, &config.panel, std::io::stdout())
        .await
        .with_context(|| format!("Cannot resolve the working directory of '{}'", server_name))?;
    tracing::info!("Panel root is {}", controller.root().display());

    let listener = ControlListener::bind(&address)
        .with_context(|| format!("Failed to bind control endpoint {}", address))?;

    let (tx, rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
    let forwarder = tokio::spawn(forward_toggles(listener, tx.clone()));
    let signals = tokio::spawn(shutdown_on_signal(tx.clone()));
    spawn_stdin_reader(tx).context("Failed to start stdin reader")?;

    controller.run(rx).await;

    // Dropping the listener removes the endpoint if it is still ours
    forwarder.abort();
    let _ = forwarder.await;
    signals.abort();

    tracing::info!("Panel for '{}' shut down", server_name);
    Ok(())
}

/// Turn Ctrl-C or SIGTERM into a `Shutdown` event.
async fn shutdown_on_signal(events: mpsc::Sender<PanelEvent>) {
    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        Err(e) => {
            tracing::warn!("Cannot listen for SIGTERM: {}", e);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
    tracing::info!("Shutdown signal received");
    let _ = events.send(PanelEvent::Shutdown).await;
}
