//! Wire format of the control channel: one bare UTF-8 word per datagram

/// Receive buffer size; anything longer is truncated and therefore ignored
pub const MAX_DATAGRAM: usize = 1024;

const TOGGLE: &str = "toggle";

/// A message understood by the listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    /// Flip panel visibility
    Toggle,
}

impl ControlMessage {
    pub fn encode(&self) -> &'static [u8] {
        match self {
            ControlMessage::Toggle => TOGGLE.as_bytes(),
        }
    }

    /// Exact match only: no trimming, no case folding.
    pub fn decode(payload: &[u8]) -> Option<Self> {
        match std::str::from_utf8(payload) {
            Ok(TOGGLE) => Some(ControlMessage::Toggle),
            _ => None,
        }
    }
}
