use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serialprims_transport::{SerialConfig, SerialStream, Transport};
use tracing::{debug, info};

use crate::error::{ChannelError, ReceiveError, Result};
use crate::receiver::{lock, Receiver, Shared};
use crate::record::{decode_records, decode_to_vec, record_size, Record};
use crate::writer::RecordWriter;

/// Default read timeout used by the receiver to poll for shutdown.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(20);

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Channel tuning that is not part of the port identity.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Read timeout for the receiver thread; bounds how long shutdown waits
    /// on transports that cannot be unblocked. Default: 20 ms.
    pub poll_interval: Duration,
    /// Write timeout applied to the transport. `None` keeps the transport's own.
    pub write_timeout: Option<Duration>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            write_timeout: None,
        }
    }
}

/// A typed record channel over a serial transport.
///
/// A dedicated thread keeps reading from the transport into a bounded
/// buffer. [`read`](Self::read) drains whole records without blocking on
/// I/O; [`write`](Self::write) sends records synchronously and never touches
/// the receive buffer. Dropping the channel stops and joins the thread and
/// closes the transport.
pub struct SerialChannel<T: Transport = SerialStream> {
    name: String,
    shared: Arc<Mutex<Shared>>,
    writer: Mutex<RecordWriter<T>>,
    receiver: Receiver,
}

impl SerialChannel<SerialStream> {
    /// Open a physical port (8N1) and start receiving.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        Self::open_with_config(config, ChannelConfig::default())
    }

    /// Open a physical port with explicit channel configuration.
    pub fn open_with_config(config: &SerialConfig, channel_config: ChannelConfig) -> Result<Self> {
        let stream = SerialStream::open(config)?;
        Self::with_transport(stream, config.port.clone(), channel_config)
    }
}

impl<T: Transport> SerialChannel<T> {
    /// Start a channel over an already-open transport.
    pub fn with_transport(
        mut transport: T,
        name: impl Into<String>,
        config: ChannelConfig,
    ) -> Result<Self> {
        let name = name.into();

        let mut reader = transport.try_clone()?;
        reader.set_read_timeout(config.poll_interval.max(MIN_POLL_INTERVAL))?;
        if let Some(timeout) = config.write_timeout {
            transport.set_write_timeout(timeout)?;
        }

        let shared = Arc::new(Mutex::new(Shared::default()));
        let receiver =
            Receiver::spawn(&name, reader, Arc::clone(&shared)).map_err(ChannelError::Spawn)?;

        info!(port = %name, "channel started");
        Ok(Self {
            name,
            shared,
            writer: Mutex::new(RecordWriter::new(transport)),
            receiver,
        })
    }

    /// Drain up to `out.len()` whole records into `out`.
    ///
    /// Returns the number of records written to the front of `out`. Returns 0
    /// at once when less than one record is buffered. Bytes of a trailing
    /// partial record stay buffered for the next call.
    pub fn read<R: Record>(&self, out: &mut [R]) -> usize {
        let size = record_size::<R>();
        if size == 0 || out.is_empty() {
            return 0;
        }

        let mut state = lock(&self.shared);
        let count = (state.buffer.len() / size).min(out.len());
        if count == 0 {
            return 0;
        }

        let bytes = state.buffer.drain(count * size);
        decode_records(&bytes, &mut out[..count])
    }

    /// Drain up to `max` whole records into a new vector.
    pub fn read_vec<R: Record>(&self, max: usize) -> Vec<R> {
        let size = record_size::<R>();
        if size == 0 || max == 0 {
            return Vec::new();
        }

        let bytes = {
            let mut state = lock(&self.shared);
            let count = (state.buffer.len() / size).min(max);
            state.buffer.drain(count * size)
        };
        decode_to_vec(&bytes)
    }

    /// Send `records` as one contiguous run (blocking).
    ///
    /// Concurrent writers are serialized; receiving continues meanwhile.
    pub fn write<R: Record>(&self, records: &[R]) -> Result<()> {
        self.writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .send(records)
    }

    /// The terminal receive error, if the receiver has stopped on one.
    pub fn error(&self) -> Option<ReceiveError> {
        lock(&self.shared).error.clone()
    }

    /// Number of bytes currently buffered.
    pub fn buffered_len(&self) -> usize {
        lock(&self.shared).buffer.len()
    }

    /// Total bytes discarded because the buffer was full.
    pub fn dropped_bytes(&self) -> u64 {
        lock(&self.shared).buffer.dropped_bytes()
    }

    /// Whether the receiver thread is still reading.
    pub fn is_receiving(&self) -> bool {
        self.receiver.is_running()
    }

    /// The identifier this channel was opened with.
    pub fn port_name(&self) -> &str {
        &self.name
    }

    /// Stop receiving and close the transport.
    pub fn close(self) {
        drop(self);
    }
}

impl<T: Transport> Drop for SerialChannel<T> {
    fn drop(&mut self) {
        self.receiver.request_stop();

        let writer = self.writer.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = writer.get_ref().shutdown() {
            debug!(port = %self.name, error = %err, "transport shutdown failed");
        }

        self.receiver.join();
        debug!(port = %self.name, "channel closed");
    }
}

impl<T: Transport> std::fmt::Debug for SerialChannel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialChannel")
            .field("port", &self.name)
            .field("receiving", &self.is_receiving())
            .finish()
    }
}
