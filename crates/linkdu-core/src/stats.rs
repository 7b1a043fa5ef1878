//! Walk statistics.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::entry::EntryKind;

/// Counters gathered while walking a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkStats {
    /// Directories whose listing was opened.
    pub dirs: u64,
    /// Regular files charged.
    pub files: u64,
    /// Symbolic links charged.
    pub symlinks: u64,
    /// Sockets, devices and fifos charged. Only a walk root can land here.
    pub others: u64,
    /// Sockets, devices and fifos met inside a directory, which are never charged.
    pub others_skipped: u64,
    /// Hard links skipped because their inode was already charged.
    pub hardlinks_deduplicated: u64,
    /// Usage of the root, in kilobyte-equivalent units.
    pub total_usage: u64,
    /// Deepest directory level reached; the root is level 0.
    pub max_depth: u32,
    /// Wall time of the walk.
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

impl WalkStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry that was charged.
    pub fn record(&mut self, kind: EntryKind) {
        match kind {
            EntryKind::Directory => self.dirs += 1,
            EntryKind::File => self.files += 1,
            EntryKind::Symlink => self.symlinks += 1,
            EntryKind::Other => self.others += 1,
        }
    }

    /// Record a special file that was ignored inside a directory.
    pub fn record_skipped(&mut self) {
        self.others_skipped += 1;
    }

    /// Record a hard link whose inode was already charged.
    pub fn record_duplicate(&mut self) {
        self.hardlinks_deduplicated += 1;
    }

    /// Record that a directory at `depth` was entered.
    pub fn record_depth(&mut self, depth: u32) {
        self.max_depth = self.max_depth.max(depth);
    }

    /// Total entries charged.
    pub fn total_items(&self) -> u64 {
        self.dirs + self.files + self.symlinks + self.others
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
