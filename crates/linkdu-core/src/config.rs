//! Walk configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Longest composed path the walker accepts by default, in bytes.
///
/// Matches `PATH_MAX` on Linux.
pub const DEFAULT_MAX_PATH_LEN: usize = 4096;

/// Configuration for a disk usage walk.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct WalkConfig {
    /// Root path to walk.
    pub root: PathBuf,

    /// Report non-directory entries individually, not just directories.
    #[builder(default = "false")]
    #[serde(default)]
    pub include_files: bool,

    /// Maximum length in bytes of a path composed during the walk.
    #[builder(default = "DEFAULT_MAX_PATH_LEN")]
    #[serde(default = "default_max_path_len")]
    pub max_path_len: usize,
}

fn default_max_path_len() -> usize {
    DEFAULT_MAX_PATH_LEN
}

impl WalkConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        if self.max_path_len == Some(0) {
            return Err("Maximum path length must be positive".to_string());
        }
        Ok(())
    }
}

impl WalkConfig {
    /// Create a new walk config builder.
    pub fn builder() -> WalkConfigBuilder {
        WalkConfigBuilder::default()
    }

    /// Create a config that walks `root` reporting directories only.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include_files: false,
            max_path_len: DEFAULT_MAX_PATH_LEN,
        }
    }

    /// Return a copy with `include_files` set.
    pub fn with_include_files(mut self, include_files: bool) -> Self {
        self.include_files = include_files;
        self
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = WalkConfig::builder()
            .root("/home/user")
            .include_files(true)
            .max_path_len(512usize)
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/home/user"));
        assert!(config.include_files);
        assert_eq!(config.max_path_len, 512);
    }

    #[test]
    fn test_config_simple() {
        let config = WalkConfig::new("/home/user");
        assert_eq!(config.root, PathBuf::from("/home/user"));
        assert!(!config.include_files);
        assert_eq!(config.max_path_len, DEFAULT_MAX_PATH_LEN);
    }

    #[test]
    fn test_builder_rejects_empty_root() {
        let err = WalkConfig::builder().root("").build().unwrap_err();
        assert!(err.to_string().contains("empty"));

        assert!(WalkConfig::builder().build().is_err());
    }

    #[test]
    fn test_builder_rejects_zero_path_len() {
        let result = WalkConfig::builder().root("/").max_path_len(0usize).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_serde_defaults() {
        let config: WalkConfig = serde_json::from_str(r#"{"root":"/srv"}"#).unwrap();
        assert_eq!(config, WalkConfig::new("/srv"));
    }
}
