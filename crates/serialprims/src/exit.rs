use std::fmt;
use std::io;

use serialprims_channel::{ChannelError, ReceiveError};
use serialprims_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

fn code_for_kind(kind: io::ErrorKind) -> i32 {
    match kind {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof
        | io::ErrorKind::WriteZero => TRANSPORT_ERROR,
        _ => INTERNAL,
    }
}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    CliError::new(code_for_kind(err.kind()), format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Open { source, port } => {
            let code = match code_for_kind(source.kind()) {
                INTERNAL => TRANSPORT_ERROR,
                code => code,
            };
            CliError::new(code, format!("{context}: {port}: {source}"))
        }
        TransportError::Io(source) => io_error(context, source),
    }
}

pub fn channel_error(context: &str, err: ChannelError) -> CliError {
    match err {
        ChannelError::Open(err) => transport_error(context, err),
        ChannelError::Write(source) => io_error(context, source),
        ChannelError::Spawn(source) => CliError::new(INTERNAL, format!("{context}: {source}")),
    }
}

pub fn receive_error(context: &str, err: ReceiveError) -> CliError {
    CliError::new(code_for_kind(err.kind()), format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_port_is_a_transport_error() {
        let err = transport_error(
            "open failed",
            TransportError::Open {
                port: "/dev/ttyNOPE".to_string(),
                source: io::Error::from(io::ErrorKind::NotFound),
            },
        );
        assert_eq!(err.code, TRANSPORT_ERROR);
        assert!(err.message.contains("/dev/ttyNOPE"));
    }

    #[test]
    fn transport_io_maps_by_kind() {
        let err = transport_error(
            "receive failed",
            TransportError::from(io::Error::from(io::ErrorKind::BrokenPipe)),
        );
        assert_eq!(err.code, TRANSPORT_ERROR);
        assert!(err.message.starts_with("receive failed: "));
    }

    #[test]
    fn busy_port_permission_is_kept() {
        let err = channel_error(
            "open failed",
            ChannelError::Open(TransportError::Open {
                port: "COM3".to_string(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            }),
        );
        assert_eq!(err.code, PERMISSION_DENIED);
    }

    #[test]
    fn write_timeout_maps_to_timeout() {
        let err = channel_error(
            "send failed",
            ChannelError::Write(io::Error::from(io::ErrorKind::TimedOut)),
        );
        assert_eq!(err.code, TIMEOUT);
    }

    #[test]
    fn closed_link_maps_to_transport_error() {
        assert_eq!(
            receive_error("receive failed", ReceiveError::Closed).code,
            TRANSPORT_ERROR
        );
    }
}
