//! Fixed-size records and their byte layout.
//!
//! A record travels as its native in-memory representation; a run of records
//! is those representations concatenated in order, with no header or padding
//! between them. Both ends of a link must agree on the type and endianness.

use bytes::{BufMut, BytesMut};
use zerocopy::{FromBytes, Immutable, IntoBytes};

/// A fixed-size element that can be sent and received over a channel.
///
/// Implemented for every type whose bytes can be viewed and rebuilt safely:
/// primitive integers and floats, arrays of them, and `#[repr(C)]` structs
/// deriving `FromBytes`, `IntoBytes` and `Immutable`.
///
/// ```
/// use serialprims_channel::Record;
/// use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
///
/// #[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
/// #[repr(C)]
/// struct Sample {
///     id: u16,
///     raw: u16,
///     value: f32,
/// }
///
/// fn assert_record<T: Record>() {}
/// assert_record::<Sample>();
/// ```
pub trait Record: FromBytes + IntoBytes + Immutable + Sized {}

impl<T: FromBytes + IntoBytes + Immutable> Record for T {}

/// Size of one record on the wire.
pub const fn record_size<T: Record>() -> usize {
    std::mem::size_of::<T>()
}

/// Append the native bytes of `records` to `dst`.
pub fn encode_records<T: Record>(records: &[T], dst: &mut BytesMut) {
    let bytes = records.as_bytes();
    dst.reserve(bytes.len());
    dst.put_slice(bytes);
}

/// Decode whole records from the front of `src` into `out`.
///
/// Returns how many records were written. A trailing partial record in `src`
/// is ignored, as is anything beyond `out.len()` records.
pub fn decode_records<T: Record>(src: &[u8], out: &mut [T]) -> usize {
    let size = record_size::<T>();
    if size == 0 {
        return 0;
    }

    let count = (src.len() / size).min(out.len());
    out[..count]
        .as_mut_bytes()
        .copy_from_slice(&src[..count * size]);
    count
}

/// Decode every whole record at the front of `src`.
pub fn decode_to_vec<T: Record>(src: &[u8]) -> Vec<T> {
    let size = record_size::<T>();
    if size == 0 {
        return Vec::new();
    }

    src.chunks_exact(size)
        .filter_map(|chunk| T::read_from_bytes(chunk).ok())
        .collect()
}
