//! Disk usage walking engine for linkdu.
//!
//! This crate sums the allocated blocks of a file system subtree the way
//! `du` does, charging every hard-linked regular file exactly once.
//!
//! # Overview
//!
//! - **Depth-first walk** over an explicit stack of open directories, so
//!   deep trees cannot exhaust the call stack
//! - **Post-order reporting**: children are reported before the directory
//!   that contains them
//! - **Hardlink detection** through an [`InodeRegistry`] shared by the whole
//!   walk
//! - **Symlinks are never followed**; they are charged for their own blocks
//!
//! # Example
//!
//! ```rust,no_run
//! use linkdu_scan::{LineReporter, WalkConfig, disk_usage};
//!
//! let config = WalkConfig::new("/path/to/walk").with_include_files(true);
//! let mut reporter = LineReporter::new(std::io::stdout().lock());
//! let (total, stats) = disk_usage(&config, &mut reporter).unwrap();
//!
//! eprintln!("{total}K in {} files", stats.files);
//! ```

mod inode;
mod walker;

pub use inode::{INITIAL_CAPACITY, InodeRegistry};
pub use walker::{Walker, compose_path, disk_usage};

// Re-export core types for convenience
pub use linkdu_core::{
    CollectReporter, Entry, EntryKind, InodeInfo, JsonReporter, LineReporter, Reporter,
    WalkConfig, WalkError, WalkStats,
};
