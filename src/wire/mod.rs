// Bit-stream serialization of run lists.
//
// The codec here writes runs together with payload bytes read live from a
// caller buffer. It does not use `Package` payloads.
//
// # Modules
//
// - `bitstream`: `BitWriter` / `BitReader`, an in-memory bit stream
// - `codec`:     `write_diff` / `read_diff`
//
// Any transport that already owns a bit stream can implement `BitWrite` and
// `BitRead` and use the codec directly.

pub mod bitstream;
pub mod codec;

use crate::error::Result;

pub use bitstream::{BitReader, BitWriter};
pub use codec::{WIRE_RUN_OVERHEAD, read_diff, write_diff};

/// Write side of a bit-granular stream.
pub trait BitWrite {
    /// Append a single bit.
    fn write_bit(&mut self, bit: bool);

    /// Append a fixed-width 32-bit value (not byte-aligned).
    fn write_u32(&mut self, value: u32);

    /// Pad to the next byte boundary, then append `bytes` verbatim.
    fn write_aligned_bytes(&mut self, bytes: &[u8]);
}

/// Read side of a bit-granular stream. Must mirror [`BitWrite`] exactly.
pub trait BitRead {
    fn read_bit(&mut self) -> Result<bool>;

    fn read_u32(&mut self) -> Result<u32>;

    /// Skip to the next byte boundary, then fill `buf`.
    fn read_aligned_bytes(&mut self, buf: &mut [u8]) -> Result<()>;
}
