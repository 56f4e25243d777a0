//! File explorer panel that follows a running Vim/Neovim instance
//!
//! The panel is rooted at the editor's working directory, opens files in
//! that editor over its remote-control protocol, and can be shown or hidden
//! from another process with `vgexplorer --toggle <server>`.

pub mod cli;
pub mod config;
pub mod control;
pub mod editor;
pub mod error;
pub mod fileops;
pub mod handlers;
pub mod logging;
pub mod panel;

pub use config::Config;
pub use error::{ExplorerError, ExplorerResult};
