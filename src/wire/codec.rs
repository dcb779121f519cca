// Wire codec for run lists with live payload bytes.
//
// Layout on the bit stream:
//
//   has_next: 1 bit
//   while has_next:
//       offset:   u32
//       size:     u32
//       bytes:    `size` bytes, byte-aligned
//       has_next: 1 bit
//
// An empty run list is exactly one `0` bit.

use log::{debug, warn};

use super::{BitRead, BitWrite};
use crate::error::Result;
use crate::run::{Run, RunSequence};

/// Worst-case framing cost of one run in bytes: continuation bit, two
/// 32-bit fields and up to seven alignment bits, rounded up.
pub const WIRE_RUN_OVERHEAD: u32 = 9;

/// Write `runs` to `stream`, taking each run's bytes from `buffer` as it
/// is now.
///
/// Every run is checked against `buffer` before the first bit is written.
pub fn write_diff<W: BitWrite + ?Sized>(
    stream: &mut W,
    runs: &RunSequence,
    buffer: &[u8],
) -> Result<()> {
    for (index, run) in runs.iter().enumerate() {
        run.checked_range(index, buffer.len())?;
    }

    for run in runs {
        let start = run.offset as usize;
        stream.write_bit(true);
        stream.write_u32(run.offset);
        stream.write_u32(run.size);
        stream.write_aligned_bytes(&buffer[start..start + run.size as usize]);
    }
    stream.write_bit(false);

    debug!(
        "wrote {} run(s), {} payload byte(s)",
        runs.run_count(),
        runs.touched_byte_count()
    );
    Ok(())
}

/// Read a run list and its payload from `stream` into `target`.
///
/// The whole message is decoded and checked before `target` is touched: a
/// run outside `target`, a malformed run list, or a truncated stream leaves
/// `target` unchanged. Returns the decoded runs.
pub fn read_diff<R: BitRead + ?Sized>(stream: &mut R, target: &mut [u8]) -> Result<RunSequence> {
    let (runs, staged) = read_staged(stream, target.len()).inspect_err(|e| {
        warn!("rejected diff message: {e}");
    })?;

    let mut cursor = 0usize;
    for run in &runs {
        let start = run.offset as usize;
        let size = run.size as usize;
        target[start..start + size].copy_from_slice(&staged[cursor..cursor + size]);
        cursor += size;
    }

    debug!(
        "read {} run(s), {} payload byte(s)",
        runs.run_count(),
        runs.touched_byte_count()
    );
    Ok(runs)
}

fn read_staged<R: BitRead + ?Sized>(
    stream: &mut R,
    target_len: usize,
) -> Result<(RunSequence, Vec<u8>)> {
    let mut runs = Vec::new();
    let mut staged = Vec::new();

    while stream.read_bit()? {
        let run = Run::new(stream.read_u32()?, stream.read_u32()?);
        // Bound the staging allocation by the target before reading bytes.
        run.checked_range(runs.len(), target_len)?;
        let start = staged.len();
        staged.resize(start + run.size as usize, 0);
        stream.read_aligned_bytes(&mut staged[start..])?;
        runs.push(run);
    }

    Ok((RunSequence::from_runs(runs)?, staged))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
