use bytes::{Bytes, BytesMut};

/// Fixed capacity of a channel's receive buffer, in bytes.
pub const BUFFER_CAPACITY: usize = 512;

/// Fixed-capacity FIFO byte queue.
///
/// Overflow keeps what is already buffered: an append that does not fit keeps
/// the front of the incoming bytes and drops the rest. Not synchronized on its
/// own; the channel keeps it behind its shared lock.
#[derive(Debug)]
pub struct BoundedByteBuffer {
    bytes: BytesMut,
    dropped: u64,
}

impl BoundedByteBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            bytes: BytesMut::with_capacity(BUFFER_CAPACITY),
            dropped: 0,
        }
    }

    /// Append as much of `incoming` as fits and return how many bytes were dropped.
    pub fn append(&mut self, incoming: &[u8]) -> usize {
        let room = BUFFER_CAPACITY.saturating_sub(self.bytes.len());
        let keep = room.min(incoming.len());
        self.bytes.extend_from_slice(&incoming[..keep]);

        let dropped = incoming.len() - keep;
        self.dropped = self.dropped.saturating_add(dropped as u64);
        dropped
    }

    /// Remove and return up to `max` bytes from the front.
    pub fn drain(&mut self, max: usize) -> Bytes {
        let n = max.min(self.bytes.len());
        self.bytes.split_to(n).freeze()
    }

    /// Number of buffered bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Total bytes discarded by overflow since creation.
    pub fn dropped_bytes(&self) -> u64 {
        self.dropped
    }
}

impl Default for BoundedByteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(start: u8, len: usize) -> Vec<u8> {
        (0..len).map(|i| start.wrapping_add(i as u8)).collect()
    }

    #[test]
    fn length_never_exceeds_capacity() {
        let mut buf = BoundedByteBuffer::new();
        for len in [0usize, 1, 127, 128, 300, 5, 128, 1000, 3] {
            buf.append(&pattern(0, len));
            assert!(buf.len() <= BUFFER_CAPACITY);
        }
        assert_eq!(buf.len(), BUFFER_CAPACITY);
    }

    #[test]
    fn overflow_keeps_front_of_incoming_chunk() {
        let mut buf = BoundedByteBuffer::new();
        let existing = pattern(0, 500);
        buf.append(&existing);

        let incoming = pattern(100, 20);
        let dropped = buf.append(&incoming);

        assert_eq!(dropped, 8);
        assert_eq!(buf.len(), BUFFER_CAPACITY);
        assert_eq!(buf.dropped_bytes(), 8);

        let all = buf.drain(BUFFER_CAPACITY);
        assert_eq!(&all[..500], existing.as_slice());
        assert_eq!(&all[500..], &incoming[..12]);
    }

    #[test]
    fn full_buffer_drops_whole_chunk() {
        let mut buf = BoundedByteBuffer::new();
        for i in 0..4u8 {
            buf.append(&pattern(i, 128));
        }
        assert_eq!(buf.len(), BUFFER_CAPACITY);

        assert_eq!(buf.append(&pattern(9, 50)), 50);
        assert_eq!(buf.len(), BUFFER_CAPACITY);
        assert_eq!(buf.dropped_bytes(), 50);
    }

    #[test]
    fn drain_after_overflow_makes_room_again() {
        let mut buf = BoundedByteBuffer::new();
        buf.append(&pattern(0, BUFFER_CAPACITY));
        buf.drain(30);

        assert_eq!(buf.append(&pattern(0, 50)), 20);
        assert_eq!(buf.len(), BUFFER_CAPACITY);
    }

    #[test]
    fn drain_preserves_order_and_leaves_remainder() {
        let mut buf = BoundedByteBuffer::new();
        buf.append(b"abcdef");

        assert_eq!(buf.drain(4).as_ref(), b"abcd");
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.drain(10).as_ref(), b"ef");
        assert!(buf.is_empty());
    }

    #[test]
    fn drain_empty_returns_nothing() {
        let mut buf = BoundedByteBuffer::new();
        assert!(buf.drain(16).is_empty());
        assert_eq!(buf.drain(0).len(), 0);
    }
}
