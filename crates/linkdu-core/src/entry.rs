//! File system entry types.

use std::fs::{FileType, Metadata};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

use serde::{Deserialize, Serialize};

use crate::error::WalkError;

/// Inode information for hardlink detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InodeInfo {
    /// Inode number.
    pub inode: u64,
    /// Device ID.
    pub device: u64,
}

impl InodeInfo {
    /// Create new inode info.
    pub fn new(inode: u64, device: u64) -> Self {
        Self { inode, device }
    }
}

/// Type of file system entry, as seen without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Directory.
    Directory,
    /// Regular file.
    File,
    /// Symbolic link (never followed).
    Symlink,
    /// Other file types (sockets, devices, fifos).
    Other,
}

impl EntryKind {
    /// Classify an `lstat` file type.
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else if file_type.is_symlink() {
            EntryKind::Symlink
        } else {
            EntryKind::Other
        }
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File)
    }

    /// Check if this is a symlink.
    pub fn is_symlink(&self) -> bool {
        matches!(self, EntryKind::Symlink)
    }
}

/// A single stat'ed path.
///
/// Entries are ephemeral: one is built per visited path and dropped once
/// its usage has been accounted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Full path of the entry.
    pub path: PathBuf,
    /// Entry kind.
    pub kind: EntryKind,
    /// Allocated 512-byte blocks.
    pub blocks: u64,
    /// Number of hard links.
    pub nlink: u64,
    /// Inode identity.
    pub inode: InodeInfo,
}

impl Entry {
    /// Stat `path` without following a trailing symlink.
    pub fn lstat(path: impl Into<PathBuf>) -> Result<Self, WalkError> {
        let path = path.into();
        match std::fs::symlink_metadata(&path) {
            Ok(metadata) => Ok(Self::from_metadata(path, &metadata)),
            Err(source) => Err(WalkError::metadata(path, source)),
        }
    }

    /// Build an entry from already fetched metadata.
    pub fn from_metadata(path: impl Into<PathBuf>, metadata: &Metadata) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::from_file_type(metadata.file_type()),
            blocks: get_blocks(metadata),
            nlink: get_nlink(metadata),
            inode: InodeInfo::new(get_ino(metadata), get_dev(metadata)),
        }
    }

    /// Usage in kilobyte-equivalent units.
    pub fn usage(&self) -> u64 {
        blocks_to_kib(self.blocks)
    }

    /// Whether this entry takes part in hardlink deduplication.
    ///
    /// Only regular files with more than one link are tracked; symlinks are
    /// charged on every path even when their link count is higher.
    pub fn is_shared_file(&self) -> bool {
        self.kind.is_file() && self.nlink > 1
    }

    /// Path of the entry.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Convert 512-byte blocks to kilobyte-equivalent units, rounding down.
pub fn blocks_to_kib(blocks: u64) -> u64 {
    blocks / 2
}

// Cross-platform metadata helpers

/// Get the device ID from metadata.
#[cfg(unix)]
fn get_dev(metadata: &Metadata) -> u64 {
    metadata.dev()
}

#[cfg(not(unix))]
fn get_dev(_metadata: &Metadata) -> u64 {
    0
}

/// Get the inode number from metadata.
#[cfg(unix)]
fn get_ino(metadata: &Metadata) -> u64 {
    metadata.ino()
}

#[cfg(not(unix))]
fn get_ino(_metadata: &Metadata) -> u64 {
    0
}

/// Get the number of hard links from metadata.
#[cfg(unix)]
fn get_nlink(metadata: &Metadata) -> u64 {
    metadata.nlink()
}

#[cfg(not(unix))]
fn get_nlink(_metadata: &Metadata) -> u64 {
    1 // No inode identity to dedup against
}

/// Get the number of 512-byte blocks from metadata.
#[cfg(unix)]
fn get_blocks(metadata: &Metadata) -> u64 {
    metadata.blocks()
}

#[cfg(not(unix))]
fn get_blocks(metadata: &Metadata) -> u64 {
    metadata.len().div_ceil(512)
}
