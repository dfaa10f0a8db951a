//! Error types
//!
//! Every fallible library operation returns [`Error`]. The variants follow
//! the failure classes a caller needs to tell apart: bad input, a project
//! that is not ready, a refused removal, and environment (I/O) failures.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Library result alias
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid target: {name} (available: {available})")]
    InvalidTarget { name: String, available: String },

    #[error("invalid mode: {value} (must be 'public' or 'local')")]
    InvalidMode { value: String },

    #[error("{} not found. Run 'viberules init' first", .path.display())]
    NotInitialized { path: PathBuf },

    #[error("{} already exists. Use --force to reinitialize", .path.display())]
    AlreadyInitialized { path: PathBuf },

    #[error("refusing to remove {}: not a symlink", .path.display())]
    NotASymlink { path: PathBuf },

    #[error("target {name} not found")]
    TargetNotFound { name: String },

    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file too large: {size} bytes (max {max})")]
    ConfigTooLarge { size: u64, max: u64 },

    #[error("failed to parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[source] serde_yaml::Error),

    #[error("{action} failed for target '{target}': {source}")]
    Target {
        action: &'static str,
        target: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Windows is not supported. Please use macOS or Linux")]
    UnsupportedPlatform,
}

impl Error {
    pub(crate) fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        Error::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn for_target(self, action: &'static str, target: &str) -> Self {
        Error::Target {
            action,
            target: target.to_string(),
            source: Box::new(self),
        }
    }

    /// Whether this is the safe-remove refusal, possibly wrapped by a bulk operation.
    pub fn is_safety_refusal(&self) -> bool {
        match self {
            Error::NotASymlink { .. } => true,
            Error::Target { source, .. } => source.is_safety_refusal(),
            _ => false,
        }
    }
}
