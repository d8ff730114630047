//! JSON output formatter for scan reports.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "root": "/home/user/docs",
//!   "duplicates": [
//!     {
//!       "path": "/home/user/docs/sub/a.txt",
//!       "first_seen": "/home/user/docs/a.txt",
//!       "resolution": "simulated",
//!       "error": null
//!     }
//!   ],
//!   "failures": [
//!     { "path": "/home/user/docs/locked", "error": "Permission denied: ..." }
//!   ],
//!   "summary": {
//!     "directories": 2,
//!     "total_files": 3,
//!     "unique_names": 2,
//!     "duplicates": 1,
//!     "removed": 1,
//!     "skipped": 0,
//!     "failed": 0,
//!     "reprompts": 0,
//!     "confirm": false,
//!     "remove": false,
//!     "delete_mode": "simulate",
//!     "started_at": "2024-05-01T12:00:00Z",
//!     "scan_duration_ms": 12,
//!     "exit_code": 0,
//!     "exit_code_name": "ND000"
//!   }
//! }
//! ```

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::actions::DeleteMode;
use crate::duplicates::{DuplicateRecord, FailedPath, Resolution, ScanReport};
use crate::error::ExitCode;

/// One duplicate occurrence.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicate {
    /// Path of the duplicate
    pub path: String,
    /// Path where the name was first seen
    pub first_seen: String,
    /// `simulated`, `trashed`, `deleted`, `skipped` or `failed`
    pub resolution: &'static str,
    /// Removal error, when the resolution is `failed`
    pub error: Option<String>,
}

impl From<&DuplicateRecord> for JsonDuplicate {
    fn from(record: &DuplicateRecord) -> Self {
        Self {
            path: record.path.to_string_lossy().into_owned(),
            first_seen: record.first_seen.to_string_lossy().into_owned(),
            resolution: record.resolution.label(),
            error: match &record.resolution {
                Resolution::Failed(msg) => Some(msg.clone()),
                _ => None,
            },
        }
    }
}

/// A path that could not be traversed.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFailure {
    /// Path involved, when known
    pub path: Option<String>,
    /// Error message
    pub error: String,
}

impl From<&FailedPath> for JsonFailure {
    fn from(failed: &FailedPath) -> Self {
        Self {
            path: failed
                .path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            error: failed.error.clone(),
        }
    }
}

/// Summary statistics.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Directories successfully listed
    pub directories: usize,
    /// Files seen
    pub total_files: usize,
    /// Distinct file names
    pub unique_names: usize,
    /// Duplicate occurrences
    pub duplicates: usize,
    /// Duplicates whose removal action ran
    pub removed: usize,
    /// Duplicates the user declined
    pub skipped: usize,
    /// Failed real removals
    pub failed: usize,
    /// Invalid confirmation answers
    pub reprompts: usize,
    /// Whether confirmation was requested
    pub confirm: bool,
    /// Whether removal was requested
    pub remove: bool,
    /// Removal mode
    pub delete_mode: DeleteMode,
    /// Scan start time
    pub started_at: DateTime<Utc>,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "ND000")
    pub exit_code_name: String,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Root directory scanned
    pub root: String,
    /// Duplicates in detection order
    pub duplicates: Vec<JsonDuplicate>,
    /// Traversal failures under the continue policy
    pub failures: Vec<JsonFailure>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the JSON view of a report.
    #[must_use]
    pub fn new(report: &ScanReport, exit_code: ExitCode) -> Self {
        let detection = &report.detection;
        Self {
            root: report.root.to_string_lossy().into_owned(),
            duplicates: report.duplicates().iter().map(JsonDuplicate::from).collect(),
            failures: report.failures.iter().map(JsonFailure::from).collect(),
            summary: JsonSummary {
                directories: report.directories,
                total_files: report.total_files(),
                unique_names: report.unique_names(),
                duplicates: report.duplicate_count(),
                removed: detection.removed_count(),
                skipped: detection.skipped_count(),
                failed: detection.failed_count(),
                reprompts: detection.reprompts,
                confirm: report.options.must_confirm_delete,
                remove: report.options.remove_duplicates,
                delete_mode: report.delete_mode,
                started_at: report.started_at,
                scan_duration_ms: u64::try_from(report.duration.as_millis()).unwrap_or(u64::MAX),
                exit_code: exit_code.as_i32(),
                exit_code_name: exit_code.code_prefix().to_string(),
            },
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
