// Run validation: independently check a run list against the two buffers
// it was computed from.
//
// Every differing byte must be covered by exactly one run, and no byte may
// be covered twice. Validation never stops at the first problem; each
// violation is logged and collected so a caller sees the full picture.

use log::error;
use thiserror::Error;

use super::Run;

/// A single problem found while validating a run list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("buffers differ in length: {left} vs {right} bytes")]
    LengthMismatch { left: usize, right: usize },

    #[error("run {run} has zero size")]
    ZeroSizedRun { run: usize },

    #[error("run {run} [{offset}, +{size}) reaches past the end of the buffer")]
    OutOfRangeRun { run: usize, offset: u32, size: u32 },

    #[error("byte {byte} is covered by 2 or more runs (run {run})")]
    OverlappingRuns { run: usize, byte: usize },

    #[error("byte {byte} differs but is not covered by any run")]
    UncoveredDiffByte { byte: usize },
}

/// Outcome of [`validate_report`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    #[inline]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    fn report(&mut self, violation: Violation) {
        error!("run validation: {violation}");
        self.violations.push(violation);
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ByteState {
    Unchanged,
    Changed,
    Covered,
}

/// Check `runs` against `a` and `b`; `true` if there were no violations.
pub fn validate(a: &[u8], b: &[u8], runs: &[Run]) -> bool {
    validate_report(a, b, runs).is_valid()
}

/// Check `runs` against `a` and `b`, collecting every violation.
///
/// `runs` is any run list, not only a checked [`RunSequence`](super::RunSequence),
/// so zero-sized and overlapping runs are reported here
/// rather than rejected up front.
pub fn validate_report(a: &[u8], b: &[u8], runs: &[Run]) -> ValidationReport {
    let mut report = ValidationReport::default();

    if a.len() != b.len() {
        report.report(Violation::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
        return report;
    }

    let mut state: Vec<ByteState> = a
        .iter()
        .zip(b)
        .map(|(x, y)| {
            if x == y {
                // Unchanged bytes still become Covered when a run spans them,
                // so a second run over equal data counts as an overlap.
                ByteState::Unchanged
            } else {
                ByteState::Changed
            }
        })
        .collect();

    for (index, run) in runs.iter().enumerate() {
        if run.size == 0 {
            report.report(Violation::ZeroSizedRun { run: index });
            continue;
        }
        let Some(range) = run.range_within(state.len()) else {
            report.report(Violation::OutOfRangeRun {
                run: index,
                offset: run.offset,
                size: run.size,
            });
            continue;
        };
        for byte in range {
            if state[byte] == ByteState::Covered {
                report.report(Violation::OverlappingRuns { run: index, byte });
            } else {
                state[byte] = ByteState::Covered;
            }
        }
    }

    for (byte, s) in state.iter().enumerate() {
        if *s == ByteState::Changed {
            report.report(Violation::UncoveredDiffByte { byte });
        }
    }

    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
