//! Visibility control channel
//!
//! A running panel binds a Unix datagram socket whose path is derived from
//! the server name. A second invocation with `--toggle` sends it a single
//! `toggle` datagram and exits without waiting for a reply.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────┐   "toggle"    ┌─────────────────────┐  PanelEvent::Toggle  ┌────────────┐
//! │ vgexplorer --toggle│ ────────────→ │  ControlListener    │ ───────────────────→ │ controller │
//! │   (send_toggle)    │  /tmp/vgex..  │  (listener task)    │      mpsc queue      │   loop     │
//! └────────────────────┘               └─────────────────────┘                      └────────────┘
//! ```
//!
//! The server name is the only coordination token. Two panels started with
//! the same name fight over one address and the last one to bind wins.

mod address;
mod client;
mod listener;
mod protocol;

pub use address::{ControlAddress, SOCKET_PREFIX};
pub use client::send_toggle;
pub use listener::ControlListener;
pub use protocol::{ControlMessage, MAX_DATAGRAM};
