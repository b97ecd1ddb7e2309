//! Typed, thread-safe record channel over a serial transport.
//!
//! A [`SerialChannel`] owns one background receiver thread that keeps reading
//! raw bytes into a bounded buffer:
//! - Buffer capacity is fixed at [`BUFFER_CAPACITY`] bytes
//! - Each read asks the transport for at most [`RECEIVE_CHUNK_SIZE`] bytes
//! - When the buffer is full, the tail of the incoming chunk is dropped;
//!   buffered bytes are never evicted
//!
//! Callers drain whole fixed-size [`Record`]s without blocking and write
//! records synchronously. There is no framing: a record boundary is simply
//! "size of the record since the front of the buffer".
//!
//! ```no_run
//! use serialprims_channel::SerialChannel;
//! use serialprims_transport::SerialConfig;
//!
//! let channel = SerialChannel::open(&SerialConfig::new("/dev/ttyUSB0", 115_200))?;
//! channel.write(&[0x01u8, 0x02])?;
//!
//! let mut samples = [0u32; 32];
//! let n = channel.read(&mut samples);
//! println!("{n} samples, error: {:?}", channel.error());
//! # Ok::<(), serialprims_channel::ChannelError>(())
//! ```

pub mod buffer;
pub mod channel;
pub mod error;
pub mod receiver;
pub mod record;
pub mod writer;

pub use buffer::{BoundedByteBuffer, BUFFER_CAPACITY};
pub use channel::{ChannelConfig, SerialChannel, DEFAULT_POLL_INTERVAL};
pub use error::{ChannelError, ReceiveError, Result};
pub use receiver::RECEIVE_CHUNK_SIZE;
pub use record::{decode_records, decode_to_vec, encode_records, record_size, Record};
pub use writer::RecordWriter;
