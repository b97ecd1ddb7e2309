//! Serial transport abstraction.
//!
//! Provides a unified interface over byte-oriented serial links:
//! - Physical serial ports (via `serial2`), opened 8N1
//! - Virtual null-modem links backed by a Unix socket pair (Unix only)
//!
//! This is the lowest layer of serialprims. The channel layer only ever talks
//! to the [`Transport`] trait, so tests and alternative links plug in here.

pub mod config;
pub mod error;
pub mod stream;
pub mod traits;

pub use config::{SerialConfig, DEFAULT_BAUD_RATE};
pub use error::{Result, TransportError};
pub use stream::SerialStream;
pub use traits::Transport;
