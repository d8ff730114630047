//! The duplicate detector.
//!
//! # Overview
//!
//! A single [`Detector`] drains the detection queue on its own thread and is
//! the only owner of the [`PresenceTable`]. Every access to the table arrives
//! as a message, so no locking is involved. For each file entry:
//!
//! 1. An unseen name is recorded together with the path it was first seen at
//! 2. A seen name is a duplicate: it is reported, then either confirmed with
//!    the user (confirmation mode) or removed immediately
//!
//! Directory-boundary markers are logged and never touch the table.
//!
//! While a confirmation prompt is open the detector does not receive, so
//! every traversal worker blocks on its next hand-off. Duplicates are
//! therefore always confirmed in discovery order.
//!
//! # Example
//!
//! ```
//! use namedupe::duplicates::Detector;
//! use namedupe::scanner::{Entry, ScanOptions};
//!
//! let mut detector = Detector::new(ScanOptions::default());
//! detector.handle(Entry::file("/a", "x.txt"));
//! detector.handle(Entry::file("/b", "x.txt"));
//!
//! let report = detector.into_report();
//! assert_eq!(report.duplicates.len(), 1);
//! assert_eq!(report.unique_names, 1);
//! ```

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Receiver;

use super::confirm::{Confirmer, Decision, LinePrompt};
use super::report::{DetectorReport, DuplicateRecord, Resolution};
use crate::actions::{remove_duplicate, DeleteMode};
use crate::scanner::{BarrierGuard, CompletionBarrier, Entry, ScanOptions};

/// File names seen so far, keyed by base name only.
///
/// The marker stored for each name is the path of its first occurrence.
/// Later occurrences never overwrite it.
#[derive(Debug, Default)]
pub struct PresenceTable {
    seen: HashMap<OsString, PathBuf>,
}

impl PresenceTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an occurrence of `name` found at `path`.
    ///
    /// Returns the first-seen path when `name` is already present, `None`
    /// when this is the first occurrence.
    pub fn observe(&mut self, name: &OsStr, path: &Path) -> Option<PathBuf> {
        if let Some(first) = self.seen.get(name) {
            return Some(first.clone());
        }
        self.seen.insert(name.to_os_string(), path.to_path_buf());
        None
    }

    /// Whether `name` has been seen.
    #[must_use]
    pub fn contains(&self, name: &OsStr) -> bool {
        self.seen.contains_key(name)
    }

    /// Path where `name` was first seen.
    #[must_use]
    pub fn first_seen(&self, name: &OsStr) -> Option<&Path> {
        self.seen.get(name).map(PathBuf::as_path)
    }

    /// Number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Sequential consumer of the detection queue.
pub struct Detector {
    options: ScanOptions,
    delete_mode: DeleteMode,
    confirmer: Option<Box<dyn Confirmer>>,
    table: PresenceTable,
    report: DetectorReport,
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector")
            .field("options", &self.options)
            .field("delete_mode", &self.delete_mode)
            .field("confirmer", &self.confirmer.as_ref().map(|_| "<confirmer>"))
            .field("table", &self.table)
            .field("report", &self.report)
            .finish()
    }
}

impl Detector {
    /// Create a detector with an empty presence table.
    ///
    /// Removal is simulated until [`Detector::with_delete_mode`] says
    /// otherwise. In confirmation mode, standard input/output is used unless
    /// a confirmer is supplied.
    #[must_use]
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            delete_mode: DeleteMode::Simulate,
            confirmer: None,
            table: PresenceTable::new(),
            report: DetectorReport::default(),
        }
    }

    /// Set how approved duplicates are removed.
    ///
    /// Real removal only happens when `remove_duplicates` is set; otherwise
    /// the removal action is always simulated.
    #[must_use]
    pub fn with_delete_mode(mut self, mode: DeleteMode) -> Self {
        self.delete_mode = mode;
        self
    }

    /// Set the confirmer used in confirmation mode.
    #[must_use]
    pub fn with_confirmer(mut self, confirmer: Box<dyn Confirmer>) -> Self {
        self.confirmer = Some(confirmer);
        self
    }

    /// The presence table.
    #[must_use]
    pub fn presence(&self) -> &PresenceTable {
        &self.table
    }

    /// Process one entry.
    pub fn handle(&mut self, entry: Entry) {
        match entry {
            Entry::Directory(dir) => {
                self.report.directory_markers += 1;
                log::info!("Processing directory {}", dir.display());
            }
            Entry::File { directory, name } => {
                let path = directory.join(&name);
                self.report.files += 1;
                log::info!("Found file {}", path.display());

                if let Some(first_seen) = self.table.observe(&name, &path) {
                    log::info!("Duplicate found: {}", path.display());
                    let resolution = self.resolve(&path);
                    self.report.duplicates.push(DuplicateRecord {
                        path,
                        first_seen,
                        resolution,
                    });
                }
            }
        }
    }

    /// Drain `entries` until every sender is gone.
    pub fn run(mut self, entries: &Receiver<Entry>) -> DetectorReport {
        log::info!("Duplicate detection started");
        for entry in entries.iter() {
            self.handle(entry);
        }
        log::info!("Duplicate detection stopped");
        self.into_report()
    }

    /// Run on a dedicated thread registered on `barrier`.
    ///
    /// The barrier is incremented before this returns and decremented once
    /// the queue has closed and the loop has exited.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned; the barrier is left
    /// unchanged in that case.
    pub fn spawn(
        self,
        entries: Receiver<Entry>,
        barrier: Arc<CompletionBarrier>,
    ) -> io::Result<JoinHandle<DetectorReport>> {
        barrier.add(1);
        let guard = BarrierGuard::adopt(Arc::clone(&barrier));

        thread::Builder::new()
            .name("detector".to_string())
            .spawn(move || {
                let _guard = guard;
                self.run(&entries)
            })
            .map_err(|e| {
                // the closure (and the guard in it) is dropped on failure
                log::error!("Failed to spawn detector: {}", e);
                e
            })
    }

    /// Finish, returning what was observed.
    #[must_use]
    pub fn into_report(mut self) -> DetectorReport {
        self.report.unique_names = self.table.len();
        self.report
    }

    fn resolve(&mut self, path: &Path) -> Resolution {
        if !self.options.needs_confirmation() {
            return self.remove(path);
        }

        let confirmer = self
            .confirmer
            .get_or_insert_with(|| Box::new(LinePrompt::stdio()) as Box<dyn Confirmer>);
        let decision = match confirmer.confirm(path) {
            Ok(confirmation) => {
                self.report.reprompts += confirmation.reprompts;
                confirmation.decision
            }
            Err(e) => {
                log::warn!("Confirmation failed for {}: {}", path.display(), e);
                Decision::Skip
            }
        };

        match decision {
            Decision::Remove => self.remove(path),
            Decision::Skip => {
                log::info!("Skipped {}", path.display());
                Resolution::Skipped
            }
        }
    }

    fn remove(&self, path: &Path) -> Resolution {
        let mode = if self.options.remove_duplicates {
            self.delete_mode
        } else {
            DeleteMode::Simulate
        };

        match remove_duplicate(path, mode) {
            Ok(result) => Resolution::Removed(result.mode),
            Err(e) => {
                log::warn!("Failed to remove {}: {}", path.display(), e);
                Resolution::Failed(e.to_string())
            }
        }
    }
}
