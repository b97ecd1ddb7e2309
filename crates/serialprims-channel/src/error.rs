use std::io::ErrorKind;

use serialprims_transport::TransportError;

/// Errors returned synchronously by channel operations.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The transport could not be opened or prepared; the channel never started.
    #[error("failed to open channel: {0}")]
    Open(#[from] TransportError),

    /// The receiver thread could not be spawned.
    #[error("failed to start receiver thread: {0}")]
    Spawn(std::io::Error),

    /// The transport rejected or failed a write.
    #[error("transport write failed: {0}")]
    Write(std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChannelError>;

/// Terminal failure recorded by the receiver thread.
///
/// Once recorded, the receiver stops for good and the error stays readable
/// through [`SerialChannel::error`](crate::SerialChannel::error).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReceiveError {
    /// The transport reported end-of-stream.
    #[error("transport closed")]
    Closed,

    /// The transport read failed.
    #[error("transport read failed: {message}")]
    Io {
        kind: ErrorKind,
        raw_os_error: Option<i32>,
        message: String,
    },
}

impl ReceiveError {
    /// The I/O error kind behind this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReceiveError::Closed => ErrorKind::UnexpectedEof,
            ReceiveError::Io { kind, .. } => *kind,
        }
    }
}

impl From<std::io::Error> for ReceiveError {
    fn from(err: std::io::Error) -> Self {
        ReceiveError::Io {
            kind: err.kind(),
            raw_os_error: err.raw_os_error(),
            message: err.to_string(),
        }
    }
}
