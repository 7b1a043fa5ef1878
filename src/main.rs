//! linkdu - hard-link aware disk usage reporter.
//!
//! Usage:
//!   linkdu [PATH]            Report usage of every directory under PATH
//!   linkdu -a [PATH]         Also report files and symlinks
//!   linkdu -s [PATH]         Report PATH only
//!   linkdu --help            Show help

use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::Section;
use color_eyre::eyre::{Report, Result, WrapErr};
use tracing_subscriber::EnvFilter;

use linkdu_core::DEFAULT_MAX_PATH_LEN;
use linkdu_scan::{
    JsonReporter, LineReporter, Reporter, WalkConfig, WalkError, WalkStats, disk_usage,
};

#[derive(Parser)]
#[command(
    name = "linkdu",
    version,
    about = "Estimate file space usage, counting hard-linked files once",
    long_about = "linkdu walks PATH depth-first and prints the allocated size of every \
                  directory below it, in KiB, after all of its contents. Hard links to \
                  the same file are charged once; symbolic links are never followed."
)]
struct Cli {
    /// Path to measure (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Write counts for all files, not just directories
    #[arg(short, long)]
    all: bool,

    /// Display only a total for PATH
    #[arg(short, long, conflicts_with = "all")]
    summarize: bool,

    /// Print sizes in human readable units (e.g. 4 KiB, 1.5 MiB)
    #[arg(short = 'H', long)]
    human_readable: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Longest path, in bytes, the walk may compose before failing
    #[arg(long, default_value_t = DEFAULT_MAX_PATH_LEN)]
    max_path_len: usize,

    /// Print walk statistics to stderr when done
    #[arg(long)]
    stats: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = WalkConfig::builder()
        .root(cli.path.clone())
        .include_files(cli.all)
        .max_path_len(cli.max_path_len)
        .build()
        .wrap_err("Invalid arguments")?;

    let out = BufWriter::new(io::stdout().lock());
    match cli.format {
        OutputFormat::Text => {
            let mut reporter = LineReporter::new(out);
            if cli.human_readable {
                reporter = reporter.with_formatter(format_kib);
            }
            run(&cli, &config, reporter)
        }
        OutputFormat::Json => run(&cli, &config, JsonReporter::new(out)),
    }
}

/// Install a stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Walk and report, flushing whatever was emitted even if the walk fails.
fn run<R: Reporter>(cli: &Cli, config: &WalkConfig, mut reporter: R) -> Result<()> {
    let result = if cli.summarize {
        let mut root_only = RootOnly {
            root: &config.root,
            inner: &mut reporter,
        };
        disk_usage(config, &mut root_only)
    } else {
        disk_usage(config, &mut reporter)
    };
    let flushed = reporter.finish();

    let (total, stats) = result.map_err(|err| walk_failure(config, err))?;
    flushed.wrap_err("Cannot write output")?;

    tracing::info!(root = %config.root.display(), total, "walk complete");
    if cli.stats {
        print_stats(&stats);
    }

    Ok(())
}

/// Wrap a walk error for display, hinting at permissions when access was denied.
fn walk_failure(config: &WalkConfig, err: WalkError) -> Report {
    let denied = err.io_kind() == Some(io::ErrorKind::PermissionDenied);
    let failed_at = err.path().map(Path::to_path_buf);
    let report = Report::new(err).wrap_err(format!("Cannot measure {}", config.root.display()));

    match failed_at {
        Some(path) if denied => report.suggestion(format!(
            "Check read and search permissions on {}",
            path.display()
        )),
        _ => report,
    }
}

/// Forwards only the line for the walk root.
struct RootOnly<'a, R: Reporter + ?Sized> {
    root: &'a Path,
    inner: &'a mut R,
}

impl<R: Reporter + ?Sized> Reporter for RootOnly<'_, R> {
    fn report(&mut self, usage: u64, path: &Path) -> io::Result<()> {
        if path == self.root {
            self.inner.report(usage, path)
        } else {
            Ok(())
        }
    }
}

fn print_stats(stats: &WalkStats) {
    eprintln!();
    eprintln!("{}", "─".repeat(60));
    eprintln!(
        " {} entries: {} directories, {} files, {} symlinks",
        stats.total_items(),
        stats.dirs,
        stats.files,
        stats.symlinks
    );
    eprintln!(
        " {} hard links counted once, {} special files skipped",
        stats.hardlinks_deduplicated, stats.others_skipped
    );
    eprintln!(
        " {} total, depth {}, walked in {:.2}s",
        format_kib(stats.total_usage),
        stats.max_depth,
        stats.elapsed.as_secs_f64()
    );
    eprintln!("{}", "─".repeat(60));
}

/// Format a kilobyte count in human-readable form.
fn format_kib(kib: u64) -> String {
    humansize::format_size(kib.saturating_mul(1024), humansize::BINARY)
}
