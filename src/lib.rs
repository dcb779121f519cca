//! Rundelta: run-length byte-buffer delta codec.
//!
//! Given two equal-length buffers, the crate computes the ranges that
//! changed (`run`), bundles them with their bytes into self-contained
//! packages (`package`), or streams them over a bit stream (`wire`).
//!
//! The crate provides:
//! - Run computation, validation and application (`run`)
//! - Self-contained packages and their byte layout (`package`)
//! - A bit-stream wire codec (`wire`)
//! - Options and skip-threshold sweeps (`tuning`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use rundelta::package::Package;
//! use rundelta::run;
//!
//! let old = [10u8, 20, 30, 40, 50];
//! let new = [10u8, 99, 98, 40, 51];
//!
//! let runs = run::compute(&old, &new, 0).unwrap();
//! assert!(run::validate(&old, &new, runs.runs()));
//!
//! let package = Package::pack(&new, runs).unwrap();
//! let mut state = old;
//! package.unpack(&mut state).unwrap();
//! assert_eq!(state, new);
//! ```

pub mod error;
pub mod io;
pub mod package;
pub mod run;
pub mod tuning;
pub mod wire;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::DiffError;
pub use package::Package;
pub use run::{Run, RunSequence};
pub use tuning::DiffOptions;
