use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::error::{ChannelError, Result};
use crate::record::{encode_records, Record};

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Writes whole runs of records to any `Write` stream.
///
/// Each call serializes its records into one contiguous run and hands that
/// run to the stream in a single blocking operation.
pub struct RecordWriter<W> {
    inner: W,
    buf: BytesMut,
}

impl<W: Write> RecordWriter<W> {
    /// Create a new record writer.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Encode `records` and write them (blocking).
    ///
    /// An empty slice is a no-op.
    pub fn send<T: Record>(&mut self, records: &[T]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        self.buf.clear();
        encode_records(records, &mut self.buf);

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(ChannelError::Write(ErrorKind::WriteZero.into())),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ChannelError::Write(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ChannelError::Write(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> W {
        self.inner
    }
}
