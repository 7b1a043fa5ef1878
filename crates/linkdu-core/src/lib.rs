//! Core types and traits for linkdu.
//!
//! This crate provides the data structures shared by the walker and the
//! command line front end: stat'ed entries, walk configuration, errors,
//! statistics and the reporting sinks.

mod config;
mod entry;
mod error;
mod report;
mod stats;

pub use config::{DEFAULT_MAX_PATH_LEN, WalkConfig, WalkConfigBuilder};
pub use entry::{Entry, EntryKind, InodeInfo, blocks_to_kib};
pub use error::WalkError;
pub use report::{CollectReporter, JsonReporter, LineReporter, ReportLine, Reporter};
pub use stats::WalkStats;
