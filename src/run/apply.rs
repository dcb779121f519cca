// Run application: copy each run's range from a source buffer into a
// destination buffer.

use log::{debug, warn};

use super::RunSequence;
use crate::error::Result;

/// Copy `source[run]` into `dest[run]` for every run, in order.
///
/// Fails on the first run that does not fit in `dest` (or in `source`).
/// Runs before the failing one stay applied, so on error `dest` is in an
/// indeterminate state and must be discarded.
pub fn apply(source: &[u8], dest: &mut [u8], runs: &RunSequence) -> Result<()> {
    for (index, run) in runs.iter().enumerate() {
        let range = run
            .checked_range(index, dest.len())
            .and_then(|range| run.checked_range(index, source.len()).map(|_| range))
            .inspect_err(|e| warn!("apply aborted: {e}"))?;
        dest[range.clone()].copy_from_slice(&source[range]);
    }
    debug!(
        "applied {} run(s), {} byte(s)",
        runs.run_count(),
        runs.touched_byte_count()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
