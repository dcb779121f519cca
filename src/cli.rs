// Command-line front end for rundelta.
//
// Uses explicit subcommands and long-form options around the file helpers
// in `io`: diff two state files into a package, patch a base file with a
// package, validate, inspect, and sweep skip thresholds.

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::io::{self, IoError};
use crate::tuning::{self, DEFAULT_SKIP_THRESHOLD, DiffOptions, PACKAGE_RUN_OVERHEAD};
use crate::wire::WIRE_RUN_OVERHEAD;

const DEFAULT_MAX_THRESHOLD: u32 = 16;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Run-length byte-buffer delta codec.
#[derive(Parser, Debug)]
#[command(
    name = "rundelta",
    version,
    about = "Run-length delta packages for equal-length buffers",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Write the package that turns OLD into NEW.
    Diff(DiffArgs),
    /// Apply a package to BASE.
    Patch(PatchArgs),
    /// Check a package's runs against OLD and NEW.
    Validate(ValidateArgs),
    /// Compare package sizes across skip thresholds.
    Sweep(SweepArgs),
    /// Print the runs stored in a package.
    Inspect(InspectArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct DiffArgs {
    /// Original buffer.
    #[arg(value_hint = ValueHint::FilePath)]
    old: PathBuf,

    /// Updated buffer (same length as OLD).
    #[arg(value_hint = ValueHint::FilePath)]
    new: PathBuf,

    /// Package output file.
    #[arg(value_hint = ValueHint::FilePath)]
    package: PathBuf,

    /// Maximum equal bytes a run may absorb.
    #[arg(long, short = 't', default_value_t = DEFAULT_SKIP_THRESHOLD)]
    threshold: u32,

    /// Validate computed runs before writing.
    #[arg(long)]
    validate: bool,
}

#[derive(Args, Debug)]
struct PatchArgs {
    /// Buffer to patch.
    #[arg(value_hint = ValueHint::FilePath)]
    base: PathBuf,

    /// Package to apply.
    #[arg(value_hint = ValueHint::FilePath)]
    package: PathBuf,

    /// Patched output file.
    #[arg(value_hint = ValueHint::FilePath)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    #[arg(value_hint = ValueHint::FilePath)]
    old: PathBuf,

    #[arg(value_hint = ValueHint::FilePath)]
    new: PathBuf,

    #[arg(value_hint = ValueHint::FilePath)]
    package: PathBuf,
}

#[derive(Args, Debug)]
struct SweepArgs {
    #[arg(value_hint = ValueHint::FilePath)]
    old: PathBuf,

    #[arg(value_hint = ValueHint::FilePath)]
    new: PathBuf,

    /// Largest threshold to try (inclusive).
    #[arg(long = "max-threshold", default_value_t = DEFAULT_MAX_THRESHOLD)]
    max_threshold: u32,
}

#[derive(Args, Debug)]
struct InspectArgs {
    #[arg(value_hint = ValueHint::FilePath)]
    package: PathBuf,
}

// ---------------------------------------------------------------------------
// Resolved options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Diff {
        old: PathBuf,
        new: PathBuf,
        package: PathBuf,
        diff: DiffOptions,
    },
    Patch {
        base: PathBuf,
        package: PathBuf,
        output: PathBuf,
    },
    Validate {
        old: PathBuf,
        new: PathBuf,
        package: PathBuf,
    },
    Sweep {
        old: PathBuf,
        new: PathBuf,
        max_threshold: u32,
    },
    Inspect {
        package: PathBuf,
    },
    Config,
}

#[derive(Debug, Clone)]
struct Options {
    command: Command,
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
}

fn resolve_options(cli: Cli) -> Options {
    let command = match cli.command {
        Cmd::Diff(args) => Command::Diff {
            old: args.old,
            new: args.new,
            package: args.package,
            diff: DiffOptions {
                skip_threshold: args.threshold,
                validate: args.validate,
            },
        },
        Cmd::Patch(args) => Command::Patch {
            base: args.base,
            package: args.package,
            output: args.output,
        },
        Cmd::Validate(args) => Command::Validate {
            old: args.old,
            new: args.new,
            package: args.package,
        },
        Cmd::Sweep(args) => Command::Sweep {
            old: args.old,
            new: args.new,
            max_threshold: args.max_threshold,
        },
        Cmd::Inspect(args) => Command::Inspect {
            package: args.package,
        },
        Cmd::Config => Command::Config,
    };

    Options {
        command,
        force: cli.force,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        json_output: cli.json_output,
    }
}

fn log_filter(opts: &Options) -> &'static str {
    match (opts.quiet, opts.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        _ => "debug",
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("rundelta".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Refuse to clobber `path` unless `--force` was given.
fn check_output(path: &Path, opts: &Options) -> bool {
    if path.exists() && !opts.force {
        eprintln!(
            "rundelta: output file exists, use -f to overwrite: {}",
            path.display()
        );
        return false;
    }
    true
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => eprintln!("{s}"),
        Err(e) => eprintln!("rundelta: json error: {e}"),
    }
}

fn report_error(context: &str, e: &IoError) -> i32 {
    eprintln!("rundelta: {context}: {e}");
    1
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("rundelta version {version}");

    let file_io = cfg!(feature = "file-io") as u8;
    let parallel = cfg!(feature = "parallel") as u8;

    eprintln!("FILE_IO={file_io}");
    eprintln!("PARALLEL={parallel}");
    eprintln!("DEFAULT_SKIP_THRESHOLD={DEFAULT_SKIP_THRESHOLD}");
    eprintln!("PACKAGE_RUN_OVERHEAD={PACKAGE_RUN_OVERHEAD}");
    eprintln!("WIRE_RUN_OVERHEAD={WIRE_RUN_OVERHEAD}");

    0
}

fn cmd_diff(old: &Path, new: &Path, package: &Path, diff: &DiffOptions, opts: &Options) -> i32 {
    if !check_output(package, opts) {
        return 1;
    }
    let stats = match io::diff_files(old, new, package, diff) {
        Ok(stats) => stats,
        Err(e) => return report_error("diff", &e),
    };

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "rundelta: diff: buffer size: {}, runs: {}, touched: {}, package size: {}",
            stats.buffer_size, stats.run_count, stats.touched_bytes, stats.package_size
        );
    }
    if opts.json_output {
        print_json(&serde_json::json!({
            "command": "diff",
            "buffer_size": stats.buffer_size,
            "skip_threshold": diff.skip_threshold,
            "run_count": stats.run_count,
            "touched_bytes": stats.touched_bytes,
            "package_size": stats.package_size,
            "new_sha256": stats.new_sha256.map(|h| hex(&h)),
        }));
    }
    0
}

fn cmd_patch(base: &Path, package: &Path, output: &Path, opts: &Options) -> i32 {
    if !check_output(output, opts) {
        return 1;
    }
    let stats = match io::patch_file(base, package, output) {
        Ok(stats) => stats,
        Err(e) => return report_error("patch", &e),
    };

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "rundelta: patch: base size: {}, package size: {}, runs: {}",
            stats.base_size, stats.package_size, stats.run_count
        );
    }
    if opts.json_output {
        print_json(&serde_json::json!({
            "command": "patch",
            "base_size": stats.base_size,
            "package_size": stats.package_size,
            "run_count": stats.run_count,
            "output_sha256": stats.output_sha256.map(|h| hex(&h)),
        }));
    }
    0
}

fn cmd_validate(old: &Path, new: &Path, package: &Path, opts: &Options) -> i32 {
    let report = match io::validate_files(old, new, package) {
        Ok(report) => report,
        Err(e) => return report_error("validate", &e),
    };

    if opts.json_output {
        let violations: Vec<String> = report.violations().iter().map(|v| v.to_string()).collect();
        print_json(&serde_json::json!({
            "command": "validate",
            "valid": report.is_valid(),
            "violations": violations,
        }));
    } else if !opts.quiet {
        for v in report.violations() {
            eprintln!("rundelta: {v}");
        }
        if report.is_valid() {
            eprintln!("rundelta: package is valid");
        } else {
            eprintln!(
                "rundelta: {} violation(s) found",
                report.violations().len()
            );
        }
    }

    if report.is_valid() { 0 } else { 1 }
}

fn cmd_sweep(old: &Path, new: &Path, max_threshold: u32, opts: &Options) -> i32 {
    let (a, b) = match (std::fs::read(old), std::fs::read(new)) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(e), _) | (_, Err(e)) => return report_error("sweep", &IoError::Io(e)),
    };
    let thresholds: Vec<u32> = (0..=max_threshold).collect();
    let stats = match tuning::sweep(&a, &b, &thresholds) {
        Ok(stats) => stats,
        Err(e) => return report_error("sweep", &IoError::Diff(e)),
    };
    let best = tuning::best_threshold(&stats);

    if opts.json_output {
        let rows: Vec<serde_json::Value> = stats
            .iter()
            .map(|s| {
                serde_json::json!({
                    "skip_threshold": s.skip_threshold,
                    "run_count": s.run_count,
                    "touched_bytes": s.touched_bytes,
                    "package_cost": s.package_cost,
                    "wire_cost": s.wire_cost,
                })
            })
            .collect();
        print_json(&serde_json::json!({
            "command": "sweep",
            "buffer_size": a.len(),
            "thresholds": rows,
            "best": best.map(|s| s.skip_threshold),
        }));
        return 0;
    }

    println!("threshold      runs   touched   package      wire");
    for s in &stats {
        println!(
            "{:>9} {:>9} {:>9} {:>9} {:>9}",
            s.skip_threshold, s.run_count, s.touched_bytes, s.package_cost, s.wire_cost
        );
    }
    if let Some(best) = best {
        if !opts.quiet {
            eprintln!(
                "rundelta: best threshold: {} ({} bytes)",
                best.skip_threshold, best.package_cost
            );
        }
    }
    0
}

fn cmd_inspect(package: &Path, opts: &Options) -> i32 {
    let (package, size) = match io::read_package(package) {
        Ok(r) => r,
        Err(e) => return report_error("inspect", &e),
    };
    let runs = package.runs();

    if opts.json_output {
        let list: Vec<serde_json::Value> = runs
            .iter()
            .map(|r| serde_json::json!({ "offset": r.offset, "size": r.size }))
            .collect();
        print_json(&serde_json::json!({
            "command": "inspect",
            "package_size": size,
            "run_count": runs.run_count(),
            "touched_bytes": runs.touched_byte_count(),
            "runs": list,
        }));
        return 0;
    }

    println!("package size:  {size}");
    println!("run count:     {}", runs.run_count());
    println!("touched bytes: {}", runs.touched_byte_count());
    for (i, run) in runs.iter().enumerate() {
        println!("  {i:6}: offset {:09}, size {:09}", run.offset, run.size);
    }
    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let opts = resolve_options(cli);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(&opts)))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let exit_code = match &opts.command {
        Command::Diff {
            old,
            new,
            package,
            diff,
        } => cmd_diff(old, new, package, diff, &opts),
        Command::Patch {
            base,
            package,
            output,
        } => cmd_patch(base, package, output, &opts),
        Command::Validate { old, new, package } => cmd_validate(old, new, package, &opts),
        Command::Sweep {
            old,
            new,
            max_threshold,
        } => cmd_sweep(old, new, *max_threshold, &opts),
        Command::Inspect { package } => cmd_inspect(package, &opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
