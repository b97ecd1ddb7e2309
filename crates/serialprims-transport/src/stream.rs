use std::io::{Read, Write};
use std::time::Duration;

use serial2::{CharSize, FlowControl, Parity, SerialPort, Settings, StopBits};
use tracing::{debug, info};

use crate::config::SerialConfig;
use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// A connected serial link — implements Read + Write.
///
/// Wraps either a physical port opened 8N1, or (on Unix) one end of a
/// virtual null-modem link.
pub struct SerialStream {
    inner: SerialStreamInner,
}

enum SerialStreamInner {
    Port(SerialPort),
    #[cfg(unix)]
    Virtual(std::os::unix::net::UnixStream),
}

impl SerialStream {
    /// Open a physical port with fixed 8N1 framing at the configured rate.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let baud_rate = config.baud_rate;
        let port = SerialPort::open(&config.port, move |mut settings: Settings| {
            settings.set_raw();
            settings.set_baud_rate(baud_rate)?;
            settings.set_char_size(CharSize::Bits8);
            settings.set_parity(Parity::None);
            settings.set_stop_bits(StopBits::One);
            settings.set_flow_control(FlowControl::None);
            Ok(settings)
        })
        .map_err(|source| TransportError::Open {
            port: config.port.clone(),
            source,
        })?;

        info!(port = %config.port, baud_rate, "opened serial port");
        Ok(Self {
            inner: SerialStreamInner::Port(port),
        })
    }

    /// Create a connected virtual null-modem link.
    ///
    /// Bytes written to one end are read from the other.
    #[cfg(unix)]
    pub fn pair() -> Result<(Self, Self)> {
        let (left, right) = std::os::unix::net::UnixStream::pair()?;
        debug!("created virtual serial link");
        Ok((
            Self {
                inner: SerialStreamInner::Virtual(left),
            },
            Self {
                inner: SerialStreamInner::Virtual(right),
            },
        ))
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        match &self.inner {
            SerialStreamInner::Port(_) => "serial-port",
            #[cfg(unix)]
            SerialStreamInner::Virtual(_) => "virtual-link",
        }
    }
}

impl Read for SerialStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            SerialStreamInner::Port(port) => port.read(buf),
            #[cfg(unix)]
            SerialStreamInner::Virtual(stream) => stream.read(buf),
        }
    }
}

impl Write for SerialStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            SerialStreamInner::Port(port) => port.write(buf),
            #[cfg(unix)]
            SerialStreamInner::Virtual(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            SerialStreamInner::Port(port) => port.flush(),
            #[cfg(unix)]
            SerialStreamInner::Virtual(stream) => stream.flush(),
        }
    }
}

impl Transport for SerialStream {
    fn try_clone(&self) -> Result<Self> {
        let inner = match &self.inner {
            SerialStreamInner::Port(port) => SerialStreamInner::Port(port.try_clone()?),
            #[cfg(unix)]
            SerialStreamInner::Virtual(stream) => SerialStreamInner::Virtual(stream.try_clone()?),
        };
        Ok(Self { inner })
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> Result<()> {
        match &mut self.inner {
            SerialStreamInner::Port(port) => port.set_read_timeout(timeout).map_err(Into::into),
            #[cfg(unix)]
            SerialStreamInner::Virtual(stream) => {
                stream.set_read_timeout(Some(timeout)).map_err(Into::into)
            }
        }
    }

    fn set_write_timeout(&mut self, timeout: Duration) -> Result<()> {
        match &mut self.inner {
            SerialStreamInner::Port(port) => port.set_write_timeout(timeout).map_err(Into::into),
            #[cfg(unix)]
            SerialStreamInner::Virtual(stream) => {
                stream.set_write_timeout(Some(timeout)).map_err(Into::into)
            }
        }
    }

    fn shutdown(&self) -> Result<()> {
        match &self.inner {
            // Ports have no cross-handle close; the reader observes shutdown at
            // its next read timeout.
            SerialStreamInner::Port(_) => Ok(()),
            #[cfg(unix)]
            SerialStreamInner::Virtual(stream) => {
                match stream.shutdown(std::net::Shutdown::Both) {
                    Ok(()) => Ok(()),
                    // Peer already gone.
                    Err(err) if err.kind() == std::io::ErrorKind::NotConnected => Ok(()),
                    Err(err) => Err(err.into()),
                }
            }
        }
    }
}

impl std::fmt::Debug for SerialStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialStream")
            .field("type", &self.transport_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn open_missing_port_fails_with_port_name() {
        let cfg = SerialConfig::new("/dev/serialprims-does-not-exist", 9600);
        let err = SerialStream::open(&cfg).unwrap_err();
        match err {
            TransportError::Open { port, .. } => {
                assert_eq!(port, "/dev/serialprims-does-not-exist")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    #[cfg(unix)]
    fn virtual_link_carries_bytes_both_ways() {
        let (mut left, mut right) = SerialStream::pair().unwrap();

        left.write_all(b"ping").unwrap();
        let mut buf = [0u8; 4];
        right.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ping");

        right.write_all(b"pong").unwrap();
        left.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"pong");
    }

    #[test]
    #[cfg(unix)]
    fn read_timeout_reports_would_block_or_timed_out() {
        let (mut left, _right) = SerialStream::pair().unwrap();
        left.set_read_timeout(Duration::from_millis(10)).unwrap();

        let mut buf = [0u8; 8];
        let err = left.read(&mut buf).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::WouldBlock | ErrorKind::TimedOut
        ));
    }

    #[test]
    #[cfg(unix)]
    fn shutdown_unblocks_clone_with_eof() {
        let (left, _right) = SerialStream::pair().unwrap();
        let mut reader = left.try_clone().unwrap();

        let handle = std::thread::spawn(move || {
            let mut buf = [0u8; 8];
            reader.read(&mut buf)
        });

        left.shutdown().unwrap();
        let read = handle.join().unwrap().unwrap();
        assert_eq!(read, 0);
    }

    #[test]
    #[cfg(unix)]
    fn debug_names_transport() {
        let (left, _right) = SerialStream::pair().unwrap();
        assert!(format!("{left:?}").contains("virtual-link"));
    }
}
