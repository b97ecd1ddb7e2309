//! Typed record channels over serial links.
//!
//! serialprims opens a serial port, keeps receiving in the background into a
//! bounded buffer, and lets callers drain whole fixed-size records without
//! blocking or send records synchronously.
//!
//! # Crate Structure
//!
//! - [`transport`] — Serial transport abstraction (physical ports, virtual links)
//! - [`channel`] — Bounded receive buffer, receiver thread, typed read/write

/// Re-export transport types.
pub mod transport {
    pub use serialprims_transport::*;
}

/// Re-export channel types.
pub mod channel {
    pub use serialprims_channel::*;
}

pub use serialprims_channel::{ChannelConfig, ChannelError, ReceiveError, Record, SerialChannel};
pub use serialprims_transport::{SerialConfig, SerialStream};
