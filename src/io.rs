// File-level helpers for package diffs.
//
// Provides `diff_files()` and `patch_file()` convenience functions that
// read whole buffers from disk, run the codec, and write packages with
// buffered I/O. Optionally computes SHA-256 checksums (feature-gated behind
// `file-io`).

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

#[cfg(feature = "file-io")]
use sha2::Digest;

use log::debug;
use thiserror::Error;

use crate::error::DiffError;
use crate::package::Package;
use crate::run::{self, ValidationReport};
use crate::tuning::{self, DiffOptions};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `diff_files()`.
#[derive(Debug, Clone)]
pub struct DiffStats {
    /// Size of each input file in bytes.
    pub buffer_size: u64,
    /// Number of runs in the package.
    pub run_count: usize,
    /// Payload bytes carried by the package.
    pub touched_bytes: u32,
    /// Package file size in bytes.
    pub package_size: u64,
    /// SHA-256 of the new file (if `file-io` feature is enabled).
    pub new_sha256: Option<[u8; 32]>,
}

/// Statistics returned by `patch_file()`.
#[derive(Debug, Clone)]
pub struct PatchStats {
    /// Base file size in bytes.
    pub base_size: u64,
    /// Package file size in bytes.
    pub package_size: u64,
    /// Number of runs applied.
    pub run_count: usize,
    /// SHA-256 of the reconstructed output (if `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file operations.
#[derive(Debug, Error)]
pub enum IoError {
    /// File open, read, or write failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Codec failure (bad runs, mismatched sizes, malformed package).
    #[error("diff error: {0}")]
    Diff(#[from] DiffError),
}

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

// ---------------------------------------------------------------------------
// diff_files
// ---------------------------------------------------------------------------

/// Diff two equal-length files and write the package that turns `old_path`
/// into `new_path` to `package_path`.
pub fn diff_files(
    old_path: &Path,
    new_path: &Path,
    package_path: &Path,
    opts: &DiffOptions,
) -> Result<DiffStats, IoError> {
    let old = std::fs::read(old_path)?;
    let new = std::fs::read(new_path)?;

    let runs = tuning::diff_with_options(&old, &new, opts)?;
    let package = Package::pack(&new, runs)?;

    let mut writer = BufWriter::with_capacity(BUF_SIZE, File::create(package_path)?);
    package.encode(&mut writer)?;
    writer.flush()?;

    #[cfg(feature = "file-io")]
    let new_sha256 = Some(sha256(&new));
    #[cfg(not(feature = "file-io"))]
    let new_sha256: Option<[u8; 32]> = None;

    debug!(
        "diff {} -> {}: {} run(s)",
        old_path.display(),
        new_path.display(),
        package.runs().run_count()
    );

    Ok(DiffStats {
        buffer_size: new.len() as u64,
        run_count: package.runs().run_count(),
        touched_bytes: package.runs().touched_byte_count(),
        package_size: package.encoded_len() as u64,
        new_sha256,
    })
}

// ---------------------------------------------------------------------------
// patch_file
// ---------------------------------------------------------------------------

/// Apply the package at `package_path` to `base_path`, writing the result to
/// `output_path`.
///
/// Nothing is written if the package does not fit the base file.
pub fn patch_file(
    base_path: &Path,
    package_path: &Path,
    output_path: &Path,
) -> Result<PatchStats, IoError> {
    let mut buffer = std::fs::read(base_path)?;
    let base_size = buffer.len() as u64;

    let (package, package_size) = read_package(package_path)?;
    package.unpack(&mut buffer)?;

    let mut writer = BufWriter::with_capacity(BUF_SIZE, File::create(output_path)?);
    writer.write_all(&buffer)?;
    writer.flush()?;

    #[cfg(feature = "file-io")]
    let output_sha256 = Some(sha256(&buffer));
    #[cfg(not(feature = "file-io"))]
    let output_sha256: Option<[u8; 32]> = None;

    Ok(PatchStats {
        base_size,
        package_size,
        run_count: package.runs().run_count(),
        output_sha256,
    })
}

// ---------------------------------------------------------------------------
// Package inspection
// ---------------------------------------------------------------------------

/// Read a package file, returning it with its size on disk.
pub fn read_package(path: &Path) -> Result<(Package, u64), IoError> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    let mut reader = BufReader::with_capacity(BUF_SIZE, file);
    let package = Package::decode(&mut reader)?;
    Ok((package, size))
}

/// Validate the runs of the package at `package_path` against two files.
pub fn validate_files(
    old_path: &Path,
    new_path: &Path,
    package_path: &Path,
) -> Result<ValidationReport, IoError> {
    let old = std::fs::read(old_path)?;
    let new = std::fs::read(new_path)?;
    let (package, _) = read_package(package_path)?;
    Ok(run::validate_report(&old, &new, package.runs().runs()))
}

#[cfg(feature = "file-io")]
fn sha256(data: &[u8]) -> [u8; 32] {
    sha2::Sha256::digest(data).into()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
