//! Error types for walk operations.

use std::ffi::OsString;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a walk.
///
/// Every variant is fatal for the call that raised it and for all of its
/// ancestors. Lines already handed to the reporter are not retracted.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The path could not be stat'ed.
    #[error("cannot access {}: {source}", .path.display())]
    MetadataUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory could not be opened or read.
    #[error("cannot read directory {}: {source}", .path.display())]
    ListingUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Joining a directory and an entry name would exceed the maximum
    /// supported path length.
    #[error(
        "path too long: {}/{} exceeds {max} bytes",
        .parent.display(),
        .name.to_string_lossy()
    )]
    PathComposition {
        parent: PathBuf,
        name: OsString,
        max: usize,
    },

    /// The inode registry could not grow to hold another entry.
    #[error("cannot grow inode registry to {requested} entries")]
    RegistryGrowth { requested: usize },

    /// The reporter failed to emit a line.
    #[error("cannot report {}: {source}", .path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WalkError {
    /// Create a metadata error with path context.
    pub fn metadata(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::MetadataUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create a listing error with path context.
    pub fn listing(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ListingUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create a reporting error with path context.
    pub fn report(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Report {
            path: path.into(),
            source,
        }
    }

    /// The path the error is attached to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::MetadataUnavailable { path, .. }
            | Self::ListingUnavailable { path, .. }
            | Self::Report { path, .. } => Some(path),
            Self::PathComposition { parent, .. } => Some(parent),
            Self::RegistryGrowth { .. } => None,
        }
    }

    /// The underlying I/O error kind, for variants that wrap one.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::MetadataUnavailable { source, .. }
            | Self::ListingUnavailable { source, .. }
            | Self::Report { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_error_display() {
        let err = WalkError::metadata(
            "/missing",
            std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        );
        assert!(matches!(err, WalkError::MetadataUnavailable { .. }));
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
        assert!(err.to_string().contains("/missing"));
    }

    #[test]
    fn test_path_composition_display() {
        let err = WalkError::PathComposition {
            parent: PathBuf::from("/a"),
            name: OsString::from("b"),
            max: 4,
        };
        assert_eq!(err.to_string(), "path too long: /a/b exceeds 4 bytes");
        assert_eq!(err.path(), Some(std::path::Path::new("/a")));
    }

    #[test]
    fn test_registry_growth_has_no_path() {
        let err = WalkError::RegistryGrowth { requested: 32 };
        assert!(err.path().is_none());
        assert!(err.io_kind().is_none());
    }
}
