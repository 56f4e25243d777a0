//! Command handlers
//!
//! One function per run mode. Both return `anyhow::Result` so `main` can
//! print the error chain and exit non-zero.

pub mod panel;
pub mod toggle;

pub use panel::run_panel;
pub use toggle::run_toggle;
