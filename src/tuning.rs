// Diff options and skip-threshold tuning.
//
// The skip threshold trades run count against payload size: a higher value
// absorbs more equal bytes into runs, which means fewer runs but more
// re-sent bytes. `sweep` measures that trade-off for a concrete pair of
// buffers.

use log::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{DiffError, Result};
use crate::run::{self, RunSequence};
use crate::wire::WIRE_RUN_OVERHEAD;

/// Skip threshold used when none is configured.
pub const DEFAULT_SKIP_THRESHOLD: u32 = 4;

/// Per-run framing cost of the package layout (offset + size).
pub const PACKAGE_RUN_OVERHEAD: u32 = 8;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for computing runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOptions {
    /// Maximum number of consecutive equal bytes a run may absorb.
    pub skip_threshold: u32,
    /// Validate computed runs before returning them.
    pub validate: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            skip_threshold: DEFAULT_SKIP_THRESHOLD,
            validate: cfg!(debug_assertions),
        }
    }
}

/// Compute runs from `a` to `b` with `opts`, validating them if requested.
pub fn diff_with_options(a: &[u8], b: &[u8], opts: &DiffOptions) -> Result<RunSequence> {
    let runs = run::compute(a, b, opts.skip_threshold)?;
    if opts.validate {
        let report = run::validate_report(a, b, runs.runs());
        if !report.is_valid() {
            return Err(DiffError::ValidationFailed {
                violations: report.violations().len(),
            });
        }
    }
    Ok(runs)
}

// ---------------------------------------------------------------------------
// Threshold sweep
// ---------------------------------------------------------------------------

/// Cost of diffing a buffer pair at one skip threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdStats {
    pub skip_threshold: u32,
    pub run_count: usize,
    pub touched_bytes: u32,
    /// Encoded package size (header included).
    pub package_cost: u64,
    /// Worst-case wire size in bytes.
    pub wire_cost: u64,
}

impl ThresholdStats {
    fn measure(skip_threshold: u32, runs: &RunSequence) -> Self {
        Self {
            skip_threshold,
            run_count: runs.run_count(),
            touched_bytes: runs.touched_byte_count(),
            package_cost: crate::package::HEADER_LEN as u64
                + runs.transmit_cost(PACKAGE_RUN_OVERHEAD),
            // Trailing stop bit rounds up to one byte.
            wire_cost: runs.transmit_cost(WIRE_RUN_OVERHEAD) + 1,
        }
    }
}

/// Compute stats for each threshold in `thresholds`, in order.
pub fn sweep(a: &[u8], b: &[u8], thresholds: &[u32]) -> Result<Vec<ThresholdStats>> {
    let measure = |&t: &u32| -> Result<ThresholdStats> {
        let runs = run::compute(a, b, t)?;
        let stats = ThresholdStats::measure(t, &runs);
        debug!(
            "threshold {t}: {} run(s), {} touched, package {} bytes",
            stats.run_count, stats.touched_bytes, stats.package_cost
        );
        Ok(stats)
    };

    #[cfg(feature = "parallel")]
    let stats = thresholds.par_iter().map(measure).collect();
    #[cfg(not(feature = "parallel"))]
    let stats = thresholds.iter().map(measure).collect();

    stats
}

/// Threshold with the smallest package cost; ties go to the lower threshold.
pub fn best_threshold(stats: &[ThresholdStats]) -> Option<ThresholdStats> {
    let best = stats
        .iter()
        .min_by_key(|s| (s.package_cost, s.skip_threshold))
        .copied();
    if let Some(best) = best {
        info!(
            "best skip threshold {} ({} bytes)",
            best.skip_threshold, best.package_cost
        );
    }
    best
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = DiffOptions::default();
        assert_eq!(opts.skip_threshold, DEFAULT_SKIP_THRESHOLD);
        assert_eq!(opts.validate, cfg!(debug_assertions));
    }

    #[test]
    fn diff_with_validation_succeeds_on_computed_runs() {
        let opts = DiffOptions {
            skip_threshold: 1,
            validate: true,
        };
        let runs = diff_with_options(&[1, 2, 3, 4], &[1, 9, 3, 9], &opts).unwrap();
        assert_eq!(runs.run_count(), 1);
    }

    #[test]
    fn diff_with_options_propagates_length_mismatch() {
        let err = diff_with_options(&[1], &[1, 2], &DiffOptions::default()).unwrap_err();
        assert!(matches!(err, DiffError::LengthMismatch { .. }));
    }

    #[test]
    fn sweep_reports_each_threshold_in_order() {
        let a = [10, 20, 30, 40, 50];
        let b = [10, 99, 30, 40, 51];
        let stats = sweep(&a, &b, &[0, 1, 2]).unwrap();
        let runs: Vec<_> = stats.iter().map(|s| (s.skip_threshold, s.run_count)).collect();
        assert_eq!(runs, vec![(0, 2), (1, 2), (2, 1)]);
        // Two runs of one byte each: header + 2 * 8 + 2.
        assert_eq!(stats[0].package_cost, 8 + 16 + 2);
        // One run of four bytes: header + 8 + 4.
        assert_eq!(stats[2].package_cost, 8 + 8 + 4);
    }

    #[test]
    fn best_threshold_prefers_lower_on_ties() {
        let a = [0u8; 8];
        let mut b = a;
        b[3] = 1;
        let stats = sweep(&a, &b, &[3, 0, 5]).unwrap();
        assert_eq!(best_threshold(&stats).unwrap().skip_threshold, 0);
        assert!(best_threshold(&[]).is_none());
    }
}
