// Run computation: scan two equal-length buffers and coalesce differing
// bytes into runs.
//
// A run stays open across up to `skip_threshold` consecutive equal bytes.
// It closes on the next equal byte once that many have been absorbed, or at
// the end of the buffer. Equal bytes absorbed at the tail of a run that is
// closed this way are not part of the run: `batch_end` only advances on a
// differing byte.

use log::{debug, trace};

use super::{Run, RunSequence, check_addressable};
use crate::error::{DiffError, Result};

/// Compute the runs that turn `a` into `b`.
///
/// With `skip_threshold == 0` only strictly adjacent differing bytes merge.
/// Identical or empty buffers produce an empty sequence.
pub fn compute(a: &[u8], b: &[u8], skip_threshold: u32) -> Result<RunSequence> {
    if a.len() != b.len() {
        return Err(DiffError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    check_addressable(a.len())?;

    let mut runs = RunSequence::new();
    if a.is_empty() {
        return Ok(runs);
    }

    let byte_count = a.len();
    let mut in_batch = false;
    let mut batch_begin = 0usize;
    let mut batch_end = 0usize;
    let mut skip_size = 0u32;

    // One extra step at `i == byte_count` closes a trailing run.
    for i in 0..=byte_count {
        let at_end = i == byte_count;
        let equal = !at_end && a[i] == b[i];

        if in_batch {
            if at_end || (equal && skip_size == skip_threshold) {
                let run = Run::new(batch_begin as u32, (batch_end - batch_begin + 1) as u32);
                trace!("run: offset {}, size {}", run.offset, run.size);
                runs.push(run);
                in_batch = false;
            } else if equal {
                skip_size += 1;
            } else {
                skip_size = 0;
                batch_end = i;
            }
        }

        if !at_end && !in_batch && !equal {
            in_batch = true;
            batch_begin = i;
            batch_end = i;
            skip_size = 0;
        }
    }

    debug!(
        "computed {} run(s), {} touched byte(s) over {byte_count} bytes (skip threshold {skip_threshold})",
        runs.run_count(),
        runs.touched_byte_count()
    );

    Ok(runs)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const A: [u8; 5] = [10, 20, 30, 40, 50];

    #[test]
    fn identical_buffers_produce_no_runs() {
        let runs = compute(&A, &A, 3).unwrap();
        assert!(runs.is_empty());
        assert_eq!(runs.touched_byte_count(), 0);
    }

    #[test]
    fn empty_buffers_produce_no_runs() {
        let runs = compute(&[], &[], 0).unwrap();
        assert_eq!(runs.run_count(), 0);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = compute(&A, &A[..4], 0).unwrap_err();
        assert_eq!(err, DiffError::LengthMismatch { left: 5, right: 4 });
    }

    #[test]
    fn zero_threshold_splits_on_every_equal_byte() {
        let b = [10, 99, 98, 40, 51];
        let runs = compute(&A, &b, 0).unwrap();
        assert_eq!(runs.runs(), &[Run::new(1, 2), Run::new(4, 1)]);
        assert_eq!(runs.run_count(), 2);
        assert_eq!(runs.touched_byte_count(), 3);
    }

    #[test]
    fn gap_within_threshold_is_absorbed() {
        let b = [10, 99, 30, 40, 51];
        let runs = compute(&A, &b, 2).unwrap();
        assert_eq!(runs.runs(), &[Run::new(1, 4)]);
        assert_eq!(runs.touched_byte_count(), 4);
    }

    #[test]
    fn gap_beyond_threshold_splits() {
        let b = [10, 99, 30, 40, 51];
        let runs = compute(&A, &b, 1).unwrap();
        assert_eq!(runs.runs(), &[Run::new(1, 1), Run::new(4, 1)]);
    }

    #[test]
    fn trailing_equal_bytes_are_not_included() {
        // The run absorbs two equal bytes but closes before reaching a
        // differing byte, so it ends at the last difference.
        let a = [0u8; 8];
        let b = [1, 0, 0, 0, 0, 0, 0, 0];
        let runs = compute(&a, &b, 2).unwrap();
        assert_eq!(runs.runs(), &[Run::new(0, 1)]);
    }

    #[test]
    fn run_touching_buffer_end_is_closed() {
        let a = [0u8; 4];
        let b = [0, 0, 7, 7];
        let runs = compute(&a, &b, 0).unwrap();
        assert_eq!(runs.runs(), &[Run::new(2, 2)]);
    }

    #[test]
    fn fully_different_buffers_form_one_run() {
        let a = [0u8; 16];
        let b = [0xFFu8; 16];
        let runs = compute(&a, &b, 0).unwrap();
        assert_eq!(runs.runs(), &[Run::new(0, 16)]);
    }

    #[test]
    fn larger_threshold_never_increases_run_count() {
        let a: Vec<u8> = (0..200u32).map(|i| (i * 7 % 256) as u8).collect();
        let mut b = a.clone();
        for i in (0..b.len()).step_by(5) {
            b[i] ^= 0x5A;
        }
        let mut prev = usize::MAX;
        for t in 0..8 {
            let n = compute(&a, &b, t).unwrap().run_count();
            assert!(n <= prev, "threshold {t}: {n} > {prev}");
            prev = n;
        }
    }
}
