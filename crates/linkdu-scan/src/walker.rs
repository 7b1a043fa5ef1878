//! Depth-first disk usage walker.

use std::ffi::OsStr;
use std::fs::ReadDir;
use std::path::{Path, PathBuf};
use std::time::Instant;

use linkdu_core::{Entry, EntryKind, Reporter, WalkConfig, WalkError, WalkStats};
use tracing::{debug, trace};

use crate::inode::InodeRegistry;

/// Sums allocated blocks below a path, charging hard-linked files once.
///
/// Directories are reported post-order: a directory's line is emitted only
/// after every entry beneath it has been accounted for.
#[derive(Debug)]
pub struct Walker {
    config: WalkConfig,
    stats: WalkStats,
}

/// An open directory whose listing is still being consumed.
struct Frame {
    path: PathBuf,
    listing: ReadDir,
    total: u64,
    depth: u32,
}

impl Walker {
    /// Create a walker for the given configuration.
    pub fn new(config: WalkConfig) -> Self {
        Self {
            config,
            stats: WalkStats::new(),
        }
    }

    /// Statistics accumulated by walks run so far.
    pub fn stats(&self) -> &WalkStats {
        &self.stats
    }

    /// Walk the configured root.
    pub fn walk<R>(&mut self, registry: &mut InodeRegistry, reporter: &mut R) -> Result<u64, WalkError>
    where
        R: Reporter + ?Sized,
    {
        let root = self.config.root.clone();
        self.walk_path(&root, registry, reporter)
    }

    /// Walk `path`, returning the usage of the subtree rooted there.
    ///
    /// On error nothing is returned for this subtree and no line is emitted
    /// for `path` or any directory still open above the failure. Lines for
    /// subtrees finished before the failure have already been reported.
    pub fn walk_path<R>(
        &mut self,
        path: &Path,
        registry: &mut InodeRegistry,
        reporter: &mut R,
    ) -> Result<u64, WalkError>
    where
        R: Reporter + ?Sized,
    {
        let start = Instant::now();

        let result = Entry::lstat(path).and_then(|entry| {
            if entry.kind.is_dir() {
                self.walk_dir(entry, registry, reporter)
            } else {
                self.walk_leaf(entry, registry, reporter)
            }
        });

        self.stats.elapsed += start.elapsed();
        match &result {
            Ok(total) => self.stats.total_usage = *total,
            Err(err) => debug!(root = %path.display(), error = %err, "walk aborted"),
        }
        result
    }

    /// A root that is not a directory. Any kind is charged and reported.
    fn walk_leaf<R>(
        &mut self,
        entry: Entry,
        registry: &mut InodeRegistry,
        reporter: &mut R,
    ) -> Result<u64, WalkError>
    where
        R: Reporter + ?Sized,
    {
        let Some(usage) = self.charge(&entry, registry)? else {
            return Ok(0);
        };
        if self.config.include_files {
            emit(reporter, usage, &entry.path)?;
        }
        Ok(usage)
    }

    fn walk_dir<R>(
        &mut self,
        root: Entry,
        registry: &mut InodeRegistry,
        reporter: &mut R,
    ) -> Result<u64, WalkError>
    where
        R: Reporter + ?Sized,
    {
        let mut stack = vec![self.open(root, 0)?];

        while let Some(frame) = stack.last_mut() {
            match frame.listing.next() {
                Some(Ok(dirent)) => {
                    let name = dirent.file_name();
                    if name == "." || name == ".." {
                        continue;
                    }

                    let path = compose_path(&frame.path, &name, self.config.max_path_len)?;
                    let entry = Entry::lstat(path)?;
                    trace!(path = %entry.path.display(), kind = ?entry.kind, blocks = entry.blocks, "entry");

                    match entry.kind {
                        EntryKind::Directory => {
                            let depth = frame.depth + 1;
                            let child = self.open(entry, depth)?;
                            stack.push(child);
                        }
                        EntryKind::File | EntryKind::Symlink => {
                            if let Some(usage) = self.charge(&entry, registry)? {
                                frame.total += usage;
                                if self.config.include_files {
                                    emit(reporter, usage, &entry.path)?;
                                }
                            }
                        }
                        EntryKind::Other => self.stats.record_skipped(),
                    }
                }
                Some(Err(source)) => return Err(WalkError::listing(&frame.path, source)),
                None => {
                    let total = frame.total;
                    let path = std::mem::take(&mut frame.path);
                    // Dropping the frame closes its listing.
                    stack.pop();

                    emit(reporter, total, &path)?;
                    match stack.last_mut() {
                        Some(parent) => parent.total += total,
                        None => return Ok(total),
                    }
                }
            }
        }

        // The loop only exits through the root frame's `None` arm.
        Ok(0)
    }

    /// Open a directory listing, charging the directory's own blocks.
    fn open(&mut self, entry: Entry, depth: u32) -> Result<Frame, WalkError> {
        debug!(path = %entry.path.display(), depth, "entering directory");
        let listing =
            std::fs::read_dir(&entry.path).map_err(|source| WalkError::listing(&entry.path, source))?;

        self.stats.record(EntryKind::Directory);
        self.stats.record_depth(depth);

        Ok(Frame {
            total: entry.usage(),
            path: entry.path,
            listing,
            depth,
        })
    }

    /// Usage to charge for a non-directory, or `None` if it is a hard link
    /// to an inode charged earlier in this walk.
    fn charge(&mut self, entry: &Entry, registry: &mut InodeRegistry) -> Result<Option<u64>, WalkError> {
        if entry.is_shared_file() {
            if registry.contains(&entry.inode) {
                debug!(path = %entry.path.display(), inode = entry.inode.inode, "hard link already counted");
                self.stats.record_duplicate();
                return Ok(None);
            }
            registry.insert(entry.inode)?;
        }
        self.stats.record(entry.kind);
        Ok(Some(entry.usage()))
    }
}

fn emit<R>(reporter: &mut R, usage: u64, path: &Path) -> Result<(), WalkError>
where
    R: Reporter + ?Sized,
{
    reporter
        .report(usage, path)
        .map_err(|source| WalkError::report(path, source))
}

/// Join `name` onto `parent`, failing if the result exceeds `max` bytes.
pub fn compose_path(parent: &Path, name: &OsStr, max: usize) -> Result<PathBuf, WalkError> {
    let path = parent.join(name);
    if path.as_os_str().len() > max {
        return Err(WalkError::PathComposition {
            parent: parent.to_path_buf(),
            name: name.to_os_string(),
            max,
        });
    }
    Ok(path)
}

/// Walk `config.root` with a fresh inode registry.
///
/// This is the usual entry point: one registry per top-level invocation,
/// dropped when the walk completes.
pub fn disk_usage<R>(config: &WalkConfig, reporter: &mut R) -> Result<(u64, WalkStats), WalkError>
where
    R: Reporter + ?Sized,
{
    let mut registry = InodeRegistry::new();
    let mut walker = Walker::new(config.clone());
    let total = walker.walk(&mut registry, reporter)?;
    Ok((total, walker.stats))
}
