//! Scanner module for concurrent directory traversal.
//!
//! This module provides functionality for:
//! - Bounded-pool directory walking with an explicit pending-directory queue
//! - Completion barriers for tracking outstanding traversal work
//! - The [`Entry`] messages handed off to the duplicate detector
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`barrier`]: Counted wait/notify primitive
//! - [`walker`]: Traversal worker pool and per-directory processing
//!
//! # Example
//!
//! ```no_run
//! use namedupe::scanner::{CompletionBarrier, Entry, ScanOptions, Walker, WalkerConfig};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let (tx, rx) = crossbeam_channel::bounded::<Entry>(0);
//! let consumer = std::thread::spawn(move || rx.iter().count());
//! let barrier = Arc::new(CompletionBarrier::new());
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default(), ScanOptions::default());
//! let pool = walker.spawn(tx, Arc::clone(&barrier)).unwrap();
//! barrier.wait();
//! let outcome = pool.finish();
//!
//! println!("{} directories walked", outcome.directories);
//! println!("{} entries delivered", consumer.join().unwrap());
//! ```

pub mod barrier;
pub mod walker;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// Re-export main types
pub use barrier::{BarrierGuard, CompletionBarrier};
pub use walker::{WalkOutcome, Walker, WalkerPool};

/// A message from a traversal worker to the duplicate detector.
///
/// Entries are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Directory-boundary marker: the worker is about to enumerate this
    /// directory. Only emitted when confirmation mode is enabled.
    Directory(PathBuf),
    /// A discovered non-directory entry.
    File {
        /// Directory that contains the file
        directory: PathBuf,
        /// Base name of the file
        name: OsString,
    },
}

impl Entry {
    /// Create a file entry.
    #[must_use]
    pub fn file(directory: impl Into<PathBuf>, name: impl Into<OsString>) -> Self {
        Self::File {
            directory: directory.into(),
            name: name.into(),
        }
    }

    /// Create a directory-boundary marker.
    #[must_use]
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::Directory(path.into())
    }

    /// Whether this entry is a directory-boundary marker.
    #[must_use]
    pub fn is_boundary(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    /// Directory this entry belongs to.
    #[must_use]
    pub fn directory_path(&self) -> &Path {
        match self {
            Self::Directory(path) => path,
            Self::File { directory, .. } => directory,
        }
    }

    /// Full path of the entry.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        match self {
            Self::Directory(path) => path.clone(),
            Self::File { directory, name } => directory.join(name),
        }
    }
}

/// Behavior flags for one scan.
///
/// Immutable for the lifetime of a scan and passed by value to every worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Ask the user before removing each duplicate.
    pub must_confirm_delete: bool,
    /// Remove duplicates (only meaningful together with confirmation or a
    /// real delete mode).
    pub remove_duplicates: bool,
}

impl ScanOptions {
    /// Create options from the two flags.
    #[must_use]
    pub fn new(must_confirm_delete: bool, remove_duplicates: bool) -> Self {
        Self {
            must_confirm_delete,
            remove_duplicates,
        }
    }

    /// Whether duplicates go through the interactive confirmation protocol.
    #[must_use]
    pub fn needs_confirmation(&self) -> bool {
        self.must_confirm_delete && self.remove_duplicates
    }
}

/// Configuration for directory walking.
///
/// Controls filtering, symlink handling, pool size and failure handling.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Number of traversal worker threads. Clamped to at least 1.
    pub workers: usize,

    /// Descend into symbolic links that point at directories.
    /// Warning: May cause infinite loops with symlink cycles.
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Glob patterns to ignore (gitignore-style).
    pub ignore_patterns: Vec<String>,

    /// What to do when a directory cannot be listed or an entry cannot be
    /// inspected.
    pub error_policy: ErrorPolicy,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            follow_symlinks: false,
            skip_hidden: false,
            ignore_patterns: Vec::new(),
            error_policy: ErrorPolicy::Abort,
        }
    }
}

impl WalkerConfig {
    /// Set the number of worker threads.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the failure policy.
    #[must_use]
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Enable or disable hidden-entry skipping.
    #[must_use]
    pub fn with_skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    /// Enable or disable symlink following.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Set gitignore-style patterns.
    #[must_use]
    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }
}

/// Default pool size: the machine's available parallelism.
#[must_use]
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// How traversal failures are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop the whole scan on the first failure and report only that error.
    #[default]
    Abort,
    /// Record the failed path and keep scanning.
    Continue,
}

impl std::fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::Continue => write!(f, "continue"),
        }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// A directory could not be listed.
    #[error("Cannot list directory {path}: {source}")]
    ReadDir {
        /// Directory that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A directory entry could not be inspected.
    #[error("Cannot stat {path}: {source}")]
    Stat {
        /// Entry that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A traversal worker thread could not be started.
    #[error("Failed to spawn traversal worker: {0}")]
    Spawn(#[source] std::io::Error),

    /// The detection queue closed while traversal was still delivering.
    #[error("Detection queue closed before traversal finished")]
    QueueClosed,
}

impl ScanError {
    /// Classify a `read_dir` failure.
    pub(crate) fn read_dir(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::ReadDir {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Classify a metadata failure on a single entry.
    pub(crate) fn stat(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Stat {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Path the error refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) => Some(p),
            Self::ReadDir { path, .. } | Self::Stat { path, .. } => Some(path),
            Self::Spawn(_) | Self::QueueClosed => None,
        }
    }
}
