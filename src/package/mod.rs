// Self-contained diff packages.
//
// A `Package` bundles a run list with the bytes each run covers, copied out
// of the buffer the runs describe. It can be applied to a copy of the old
// buffer without access to the new one.
//
// The payload is the concatenation of every run's bytes in run order. It
// is not addressable by offset; it is replayed run by run.
//
// # Modules
//
// - `layout`: flat byte layout used to store and transport packages

pub mod layout;

use log::{debug, warn};

use crate::error::{DiffError, Result};
use crate::run::RunSequence;

pub use layout::HEADER_LEN;

/// A run list together with its payload bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    runs: RunSequence,
    payload: Vec<u8>,
}

impl Package {
    /// Copy every run's bytes out of `source` into a new package.
    ///
    /// All runs are checked against `source` before anything is copied.
    pub fn pack(source: &[u8], runs: RunSequence) -> Result<Self> {
        for (index, run) in runs.iter().enumerate() {
            run.checked_range(index, source.len())
                .inspect_err(|e| warn!("pack rejected: {e}"))?;
        }

        let mut payload = Vec::with_capacity(runs.touched_byte_count() as usize);
        for run in &runs {
            let start = run.offset as usize;
            payload.extend_from_slice(&source[start..start + run.size as usize]);
        }

        debug!(
            "packed {} run(s) into a {}-byte payload",
            runs.run_count(),
            payload.len()
        );
        Ok(Self { runs, payload })
    }

    /// Reassemble a package from decoded parts.
    pub fn from_parts(runs: RunSequence, payload: Vec<u8>) -> Result<Self> {
        let expected = u64::from(runs.touched_byte_count());
        let actual = payload.len() as u64;
        if expected != actual {
            return Err(DiffError::PayloadMismatch { expected, actual });
        }
        Ok(Self { runs, payload })
    }

    /// Write each run's payload slice into `dest`.
    ///
    /// Stops at the first run that does not fit in `dest`; earlier runs stay
    /// written, so on error `dest` must be discarded.
    pub fn unpack(&self, dest: &mut [u8]) -> Result<()> {
        let mut cursor = 0usize;
        for (index, run) in self.runs.iter().enumerate() {
            let range = run
                .checked_range(index, dest.len())
                .inspect_err(|e| warn!("unpack aborted: {e}"))?;
            let next = cursor + run.size as usize;
            dest[range].copy_from_slice(&self.payload[cursor..next]);
            cursor = next;
        }
        debug_assert_eq!(cursor, self.payload.len());
        Ok(())
    }

    #[inline]
    pub fn runs(&self) -> &RunSequence {
        &self.runs
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn into_parts(self) -> (RunSequence, Vec<u8>) {
        (self.runs, self.payload)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::{Run, compute};

    #[test]
    fn pack_concatenates_run_bytes_in_order() {
        let source = [0, 1, 2, 3, 4, 5, 6, 7];
        let runs = RunSequence::from_runs(vec![Run::new(1, 2), Run::new(6, 1)]).unwrap();
        let package = Package::pack(&source, runs).unwrap();
        assert_eq!(package.payload(), &[1, 2, 6]);
        assert_eq!(package.payload().len() as u32, package.runs().touched_byte_count());
    }

    #[test]
    fn unpack_reconstructs_target() {
        let a = [10, 20, 30, 40, 50];
        let b = [10, 99, 30, 40, 51];
        let package = Package::pack(&b, compute(&a, &b, 2).unwrap()).unwrap();
        let mut dest = a;
        package.unpack(&mut dest).unwrap();
        assert_eq!(dest, b);
    }

    #[test]
    fn pack_rejects_out_of_range_run() {
        let runs = RunSequence::from_runs(vec![Run::new(2, 4)]).unwrap();
        let err = Package::pack(&[0u8; 5], runs).unwrap_err();
        assert!(matches!(err, DiffError::OutOfRangeRun { index: 0, len: 5, .. }));
    }

    #[test]
    fn unpack_rejects_short_destination() {
        let runs = RunSequence::from_runs(vec![Run::new(0, 1), Run::new(8, 2)]).unwrap();
        let package = Package::pack(&[5u8; 10], runs).unwrap();
        let mut dest = [0u8; 9];
        let err = package.unpack(&mut dest).unwrap_err();
        assert!(matches!(err, DiffError::OutOfRangeRun { index: 1, len: 9, .. }));
        assert_eq!(dest[0], 5);
    }

    #[test]
    fn from_parts_checks_payload_length() {
        let runs = RunSequence::from_runs(vec![Run::new(0, 3)]).unwrap();
        let err = Package::from_parts(runs, vec![1, 2]).unwrap_err();
        assert_eq!(
            err,
            DiffError::PayloadMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn empty_package_is_a_no_op() {
        let package = Package::pack(&[1, 2, 3], RunSequence::new()).unwrap();
        assert!(package.is_empty());
        let mut dest = [0u8; 3];
        package.unpack(&mut dest).unwrap();
        assert_eq!(dest, [0; 3]);
    }
}
