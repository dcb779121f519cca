// Error types for the run codec.
//
// Every fallible operation in the crate returns `DiffError`. The validator
// is the exception: it reports `Violation`s and never fails (see
// `run::validate`).

use thiserror::Error;

/// Errors returned by run computation, application, packaging and the
/// wire codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// A run reaches past the end of the buffer it is applied against.
    #[error("run {index} [{offset}, +{size}) is out of range for a {len}-byte buffer")]
    OutOfRangeRun {
        index: usize,
        offset: u32,
        size: u32,
        len: usize,
    },

    /// A run with `size == 0` appeared in decoded input.
    #[error("run {index} has zero size")]
    ZeroSizedRun { index: usize },

    /// A run starts before the previous run ended.
    #[error("run {index} overlaps or precedes the previous run")]
    OverlappingRuns { index: usize },

    /// `offset + size` does not fit in 32 bits.
    #[error("run offset {offset} + size {size} overflows")]
    OffsetOverflow { offset: u32, size: u32 },

    /// The two buffers being diffed differ in length.
    #[error("buffer length mismatch: {left} vs {right} bytes")]
    LengthMismatch { left: usize, right: usize },

    /// A buffer cannot be addressed with 32-bit run offsets.
    #[error("buffer of {len} bytes exceeds the 32-bit run address space")]
    BufferTooLarge { len: usize },

    /// A package payload does not match the sum of its run sizes.
    #[error("package payload is {actual} bytes, runs span {expected}")]
    PayloadMismatch { expected: u64, actual: u64 },

    /// Validation after computing runs reported violations.
    #[error("run validation failed with {violations} violation(s)")]
    ValidationFailed { violations: usize },

    /// Input ended before a complete value could be read.
    #[error("truncated input: needed {needed} more, {available} available")]
    Truncated { needed: usize, available: usize },
}

pub type Result<T, E = DiffError> = std::result::Result<T, E>;

impl From<DiffError> for std::io::Error {
    fn from(e: DiffError) -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e)
    }
}
