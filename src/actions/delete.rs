//! Removal of duplicate files.
//!
//! # Overview
//!
//! This module provides the removal action the detector runs for each
//! duplicate it decides to remove:
//! - Simulated removal (default, notice only, nothing touches the disk)
//! - Move to system trash (recoverable)
//! - Permanent deletion
//!
//! # Safety
//!
//! Only the second and later occurrences of a name are ever passed here; the
//! first occurrence is always preserved. Real removals verify the file still
//! exists before acting.
//!
//! # Example
//!
//! ```no_run
//! use namedupe::actions::delete::{remove_duplicate, DeleteMode};
//! use std::path::Path;
//!
//! match remove_duplicate(Path::new("/path/to/duplicate.txt"), DeleteMode::Trash) {
//!     Ok(result) => println!("Removed: {}", result.path.display()),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a duplicate is removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Report the removal without touching the filesystem.
    #[default]
    Simulate,
    /// Move the file to the system trash.
    Trash,
    /// Delete the file permanently.
    Permanent,
}

impl DeleteMode {
    /// Whether this mode modifies the filesystem.
    #[must_use]
    pub fn is_destructive(self) -> bool {
        !matches!(self, Self::Simulate)
    }
}

impl std::fmt::Display for DeleteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simulate => write!(f, "simulate"),
            Self::Trash => write!(f, "trash"),
            Self::Permanent => write!(f, "permanent"),
        }
    }
}

/// Error type for removal operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0} - try running with elevated privileges")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// Permanent delete operation failed.
    #[error("permanent delete failed for {path}: {message}")]
    PermanentDeleteFailed { path: PathBuf, message: String },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::TrashFailed { path: p, .. }
            | Self::PermanentDeleteFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }

    fn from_io(path: &Path, e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: e,
            },
        }
    }
}

/// Result of a successful removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Path that was removed.
    pub path: PathBuf,
    /// How it was removed.
    pub mode: DeleteMode,
}

impl DeleteResult {
    /// Create a new delete result.
    #[must_use]
    pub fn new(path: PathBuf, mode: DeleteMode) -> Self {
        Self { path, mode }
    }
}

/// Run the removal action for one duplicate.
///
/// # Errors
///
/// Never fails for [`DeleteMode::Simulate`]. Otherwise see
/// [`delete_to_trash`] and [`permanent_delete`].
pub fn remove_duplicate(path: &Path, mode: DeleteMode) -> Result<DeleteResult, DeleteError> {
    match mode {
        DeleteMode::Simulate => Ok(simulate_delete(path)),
        DeleteMode::Trash => delete_to_trash(path),
        DeleteMode::Permanent => permanent_delete(path),
    }
}

/// Report a removal without performing it.
#[must_use]
pub fn simulate_delete(path: &Path) -> DeleteResult {
    log::info!("File {} removed (simulated)", path.display());
    DeleteResult::new(path.to_path_buf(), DeleteMode::Simulate)
}

/// Move a single file to the system trash.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if it can't be inspected
/// - `TrashFailed` if the trash operation fails
pub fn delete_to_trash(path: &Path) -> Result<DeleteResult, DeleteError> {
    fs::symlink_metadata(path).map_err(|e| DeleteError::from_io(path, e))?;

    trash::delete(path).map_err(|e| {
        log::error!("Trash operation failed for {}: {}", path.display(), e);
        DeleteError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::info!("File {} moved to trash", path.display());

    Ok(DeleteResult::new(path.to_path_buf(), DeleteMode::Trash))
}

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if it can't be inspected
/// - `PermanentDeleteFailed` if the delete operation fails
pub fn permanent_delete(path: &Path) -> Result<DeleteResult, DeleteError> {
    fs::symlink_metadata(path).map_err(|e| DeleteError::from_io(path, e))?;

    fs::remove_file(path).map_err(|e| {
        log::error!("Permanent delete failed for {}: {}", path.display(), e);
        DeleteError::PermanentDeleteFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::info!("File {} permanently deleted", path.display());

    Ok(DeleteResult::new(path.to_path_buf(), DeleteMode::Permanent))
}
