use std::io::{Read, Write};
use std::time::Duration;

use crate::error::Result;

/// A byte-oriented duplex link the channel layer can drive.
///
/// The channel splits a transport into a read half (moved to the receiver
/// thread) and a write half (kept by callers) with [`Transport::try_clone`].
/// Reads must honour the configured read timeout by returning
/// `ErrorKind::TimedOut` or `ErrorKind::WouldBlock` so the receiver can
/// observe shutdown requests between reads.
pub trait Transport: Read + Write + Send + Sized + 'static {
    /// Create another handle to the same underlying link.
    fn try_clone(&self) -> Result<Self>;

    /// Bound how long a single read may block.
    fn set_read_timeout(&mut self, timeout: Duration) -> Result<()>;

    /// Bound how long a single write may block.
    fn set_write_timeout(&mut self, timeout: Duration) -> Result<()>;

    /// Close the link for all handles, unblocking pending reads where the
    /// platform allows it.
    fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}
