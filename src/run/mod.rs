// Changed-byte runs and run sequences.
//
// A `Run` is one contiguous `[offset, offset + size)` range of bytes that
// differ between two equal-length buffers. A `RunSequence` is the ordered,
// non-overlapping list of runs describing every change, plus the summary
// statistics carried alongside it on the wire.
//
// # Modules
//
// - `compute`:  scan two buffers and coalesce differences into runs
// - `validate`: check a run list for full coverage and no overlap
// - `apply`:    copy run ranges from a source buffer into a destination

pub mod apply;
pub mod compute;
pub mod validate;

use std::ops::Range;

use crate::error::{DiffError, Result};

pub use apply::apply;
pub use compute::compute;
pub use validate::{ValidationReport, Violation, validate, validate_report};

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// One contiguous changed byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Run {
    pub offset: u32,
    pub size: u32,
}

impl Run {
    #[inline]
    pub const fn new(offset: u32, size: u32) -> Self {
        Self { offset, size }
    }

    /// Exclusive end of the run, widened so it cannot overflow.
    #[inline]
    pub const fn end(&self) -> u64 {
        self.offset as u64 + self.size as u64
    }

    /// Byte range of the run if it lies within a buffer of `len` bytes.
    #[inline]
    pub fn range_within(&self, len: usize) -> Option<Range<usize>> {
        if self.end() > len as u64 {
            return None;
        }
        let start = self.offset as usize;
        Some(start..start + self.size as usize)
    }

    /// Like `range_within`, but reports the run's position on failure.
    pub(crate) fn checked_range(&self, index: usize, len: usize) -> Result<Range<usize>> {
        self.range_within(len).ok_or(DiffError::OutOfRangeRun {
            index,
            offset: self.offset,
            size: self.size,
            len,
        })
    }
}

// ---------------------------------------------------------------------------
// RunSequence
// ---------------------------------------------------------------------------

/// Ordered, non-overlapping runs plus their summary statistics.
///
/// Sequences are built once (by [`compute`] or by decoding) and are
/// read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSequence {
    runs: Vec<Run>,
    touched: u32,
}

impl RunSequence {
    /// An empty sequence (identical buffers).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sequence from decoded runs.
    ///
    /// Rejects zero-sized runs, runs whose end overflows 32 bits, and runs
    /// that do not start after the previous run ended.
    pub fn from_runs(runs: Vec<Run>) -> Result<Self> {
        let mut touched: u32 = 0;
        let mut prev_end: Option<u64> = None;
        for (index, run) in runs.iter().enumerate() {
            if run.size == 0 {
                return Err(DiffError::ZeroSizedRun { index });
            }
            if run.end() > u64::from(u32::MAX) {
                return Err(DiffError::OffsetOverflow {
                    offset: run.offset,
                    size: run.size,
                });
            }
            if prev_end.is_some_and(|end| u64::from(run.offset) < end) {
                return Err(DiffError::OverlappingRuns { index });
            }
            prev_end = Some(run.end());
            // Non-overlapping runs below u32::MAX cannot sum past it.
            touched += run.size;
        }
        Ok(Self { runs, touched })
    }

    /// Append a run produced by the computer, which guarantees ordering.
    #[inline]
    pub(crate) fn push(&mut self, run: Run) {
        debug_assert!(run.size > 0);
        debug_assert!(self.runs.last().is_none_or(|last| last.end() <= u64::from(run.offset)));
        self.touched += run.size;
        self.runs.push(run);
    }

    /// Number of runs.
    #[inline]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Sum of all run sizes.
    ///
    /// This counts every byte a run spans, including equal bytes absorbed
    /// by gap coalescing: it is the number of bytes that will be
    /// transmitted, not the number that actually changed.
    #[inline]
    pub fn touched_byte_count(&self) -> u32 {
        self.touched
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    #[inline]
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Run> {
        self.runs.iter()
    }

    pub fn into_runs(self) -> Vec<Run> {
        self.runs
    }

    /// Estimated transmission size: `per_run_overhead` bytes of framing per
    /// run plus every touched byte.
    pub fn transmit_cost(&self, per_run_overhead: u32) -> u64 {
        self.runs.len() as u64 * u64::from(per_run_overhead) + u64::from(self.touched)
    }
}

impl<'a> IntoIterator for &'a RunSequence {
    type Item = &'a Run;
    type IntoIter = std::slice::Iter<'a, Run>;

    fn into_iter(self) -> Self::IntoIter {
        self.runs.iter()
    }
}

/// Check that a buffer is addressable with 32-bit run offsets.
#[inline]
pub(crate) fn check_addressable(len: usize) -> Result<()> {
    if u32::try_from(len).is_err() {
        return Err(DiffError::BufferTooLarge { len });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
