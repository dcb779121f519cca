// Flat byte layout for packages.
//
//   run_count           u32 LE
//   touched_byte_count  u32 LE
//   runs                run_count x { offset: u32 LE, size: u32 LE }
//   payload             touched_byte_count bytes
//
// The layout is byte-aligned and carries no magic or checksum; framing and
// integrity belong to the transport that moves it.

use std::io::{self, Read, Write};

use super::Package;
use crate::error::{DiffError, Result};
use crate::run::{Run, RunSequence};

/// Size of the fixed `run_count` + `touched_byte_count` header.
pub const HEADER_LEN: usize = 8;

/// Size of one encoded run.
pub const RUN_LEN: usize = 8;

/// Upper bound on runs preallocated from an untrusted header.
const MAX_PREALLOC_RUNS: usize = 4096;

impl Package {
    /// Total encoded length of this package.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.runs.run_count() * RUN_LEN + self.payload.len()
    }

    /// Write the package layout to `w`.
    pub fn encode<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let run_count = u32::try_from(self.runs.run_count())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many runs"))?;
        w.write_all(&run_count.to_le_bytes())?;
        w.write_all(&self.runs.touched_byte_count().to_le_bytes())?;
        for run in &self.runs {
            w.write_all(&run.offset.to_le_bytes())?;
            w.write_all(&run.size.to_le_bytes())?;
        }
        w.write_all(&self.payload)
    }

    /// Encode into a new byte vector.
    ///
    /// Fails only when the run count does not fit the u32 header field.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode(&mut out)?;
        Ok(out)
    }

    /// Read a package layout from `r`.
    ///
    /// Malformed input (bad run order, payload length disagreeing with the
    /// header, or a short stream) is reported as `InvalidData` /
    /// `UnexpectedEof`.
    pub fn decode<R: Read>(r: &mut R) -> io::Result<Self> {
        let run_count = read_u32(r)? as usize;
        let touched = read_u32(r)?;

        let mut runs = Vec::with_capacity(run_count.min(MAX_PREALLOC_RUNS));
        for _ in 0..run_count {
            let offset = read_u32(r)?;
            let size = read_u32(r)?;
            runs.push(Run::new(offset, size));
        }
        let runs = RunSequence::from_runs(runs)?;
        if runs.touched_byte_count() != touched {
            return Err(DiffError::PayloadMismatch {
                expected: u64::from(touched),
                actual: u64::from(runs.touched_byte_count()),
            }
            .into());
        }

        let mut payload = Vec::with_capacity((touched as usize).min(1 << 20));
        r.take(u64::from(touched)).read_to_end(&mut payload)?;
        if payload.len() != touched as usize {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "package payload truncated",
            ));
        }

        Ok(Package::from_parts(runs, payload)?)
    }

    /// Decode a package occupying exactly `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(DiffError::Truncated {
                needed: HEADER_LEN,
                available: data.len(),
            });
        }
        let run_count = le_u32(&data[0..4]) as usize;
        let touched = le_u32(&data[4..8]);

        let table_len = run_count
            .checked_mul(RUN_LEN)
            .ok_or(DiffError::Truncated {
                needed: usize::MAX,
                available: data.len(),
            })?;
        let rest = &data[HEADER_LEN..];
        if rest.len() < table_len {
            return Err(DiffError::Truncated {
                needed: table_len,
                available: rest.len(),
            });
        }
        let (table, payload) = rest.split_at(table_len);

        let runs: Vec<Run> = table
            .chunks_exact(RUN_LEN)
            .map(|c| Run::new(le_u32(&c[0..4]), le_u32(&c[4..8])))
            .collect();
        let runs = RunSequence::from_runs(runs)?;

        if runs.touched_byte_count() != touched {
            return Err(DiffError::PayloadMismatch {
                expected: u64::from(touched),
                actual: u64::from(runs.touched_byte_count()),
            });
        }
        Package::from_parts(runs, payload.to_vec())
    }
}

#[inline]
fn le_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn read_u32<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
