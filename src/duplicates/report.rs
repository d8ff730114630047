//! Scan results.
//!
//! The detector produces a [`DetectorReport`]; the finder combines it with
//! the traversal outcome into the [`ScanReport`] returned to callers.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::actions::DeleteMode;
use crate::scanner::{ScanError, ScanOptions};

/// What happened to one duplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The removal action ran (possibly simulated).
    Removed(DeleteMode),
    /// The user declined the removal.
    Skipped,
    /// A real removal was attempted and failed.
    Failed(String),
}

impl Resolution {
    /// Short machine-friendly label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Removed(DeleteMode::Simulate) => "simulated",
            Self::Removed(DeleteMode::Trash) => "trashed",
            Self::Removed(DeleteMode::Permanent) => "deleted",
            Self::Skipped => "skipped",
            Self::Failed(_) => "failed",
        }
    }
}

/// One duplicate occurrence, in detector arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateRecord {
    /// The duplicate occurrence
    pub path: PathBuf,
    /// Where the name was first seen
    pub first_seen: PathBuf,
    /// Outcome of the removal protocol
    pub resolution: Resolution,
}

/// Everything the detector observed during one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectorReport {
    /// File entries received
    pub files: usize,
    /// Directory-boundary markers received
    pub directory_markers: usize,
    /// Presence table size when the queue closed
    pub unique_names: usize,
    /// Duplicates in arrival order
    pub duplicates: Vec<DuplicateRecord>,
    /// Invalid confirmation answers across all prompts
    pub reprompts: usize,
}

impl DetectorReport {
    /// Number of duplicates whose removal action ran.
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.count(|r| matches!(r, Resolution::Removed(_)))
    }

    /// Number of duplicates the user declined.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(|r| matches!(r, Resolution::Skipped))
    }

    /// Number of failed real removals.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(|r| matches!(r, Resolution::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&Resolution) -> bool) -> usize {
        self.duplicates
            .iter()
            .filter(|d| pred(&d.resolution))
            .count()
    }
}

/// A path that could not be traversed under the continue policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedPath {
    /// Path involved, when known
    pub path: Option<PathBuf>,
    /// Error message
    pub error: String,
}

impl From<&ScanError> for FailedPath {
    fn from(err: &ScanError) -> Self {
        Self {
            path: err.path().map(Path::to_path_buf),
            error: err.to_string(),
        }
    }
}

/// Result of one complete scan.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Root directory scanned
    pub root: PathBuf,
    /// Options the scan ran with
    pub options: ScanOptions,
    /// Removal mode for approved duplicates
    pub delete_mode: DeleteMode,
    /// Directories successfully listed
    pub directories: usize,
    /// What the detector saw
    pub detection: DetectorReport,
    /// Traversal failures recorded under the continue policy
    pub failures: Vec<FailedPath>,
    /// Wall-clock start of the scan
    pub started_at: DateTime<Utc>,
    /// Total scan duration
    pub duration: Duration,
}

impl ScanReport {
    /// Number of files seen.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.detection.files
    }

    /// Number of distinct file names.
    #[must_use]
    pub fn unique_names(&self) -> usize {
        self.detection.unique_names
    }

    /// Duplicates in arrival order.
    #[must_use]
    pub fn duplicates(&self) -> &[DuplicateRecord] {
        &self.detection.duplicates
    }

    /// Number of duplicates found.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.detection.duplicates.len()
    }

    /// Whether any duplicates were found.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.detection.duplicates.is_empty()
    }

    /// Whether some paths could not be traversed.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}
