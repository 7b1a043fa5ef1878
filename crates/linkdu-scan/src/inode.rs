//! Inode tracking for hardlink deduplication.

use std::collections::HashSet;

use linkdu_core::{InodeInfo, WalkError};

/// Capacity a fresh registry starts with.
pub const INITIAL_CAPACITY: usize = 16;

/// Tracks inodes already charged to a running total.
///
/// When a regular file has multiple hard links, only the first path that
/// reaches it is charged. The registry is insert-only and lives for a
/// single walk.
#[derive(Debug)]
pub struct InodeRegistry {
    seen: HashSet<InodeInfo>,
}

impl InodeRegistry {
    /// Create a registry with the default initial capacity.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Create a registry able to hold `capacity` inodes before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            seen: HashSet::with_capacity(capacity),
        }
    }

    /// Check if an inode has been charged.
    pub fn contains(&self, info: &InodeInfo) -> bool {
        self.seen.contains(info)
    }

    /// Record an inode as charged.
    ///
    /// Returns `Ok(true)` if the inode was new. When the registry is full its
    /// capacity is doubled first; failure to allocate is reported as
    /// [`WalkError::RegistryGrowth`] and leaves the registry unchanged.
    pub fn insert(&mut self, info: InodeInfo) -> Result<bool, WalkError> {
        let len = self.seen.len();
        if len >= self.seen.capacity() {
            let additional = self.seen.capacity().max(1);
            self.seen
                .try_reserve(additional)
                .map_err(|_| WalkError::RegistryGrowth {
                    requested: len.saturating_add(additional),
                })?;
        }
        Ok(self.seen.insert(info))
    }

    /// Number of unique inodes charged.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Check if no inodes have been charged.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Inodes the registry can hold before it must grow.
    pub fn capacity(&self) -> usize {
        self.seen.capacity()
    }
}

impl Default for InodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
