//! Scan orchestration.
//!
//! # Overview
//!
//! [`DuplicateFinder`] runs exactly one full scan per call and returns only
//! once every worker has finished:
//!
//! 1. Create the zero-capacity detection queue and start the detector,
//!    registered on the detector barrier
//! 2. Start the traversal pool with the root registered on the traversal
//!    barrier
//! 3. Wait for the traversal barrier to reach zero
//! 4. Stop the pool, which drops the last queue sender and closes the queue
//! 5. Wait for the detector barrier to reach zero and collect its report
//!
//! Because the hand-off is synchronous nothing can be in flight when the
//! queue closes, so the detector sees every entry that was sent.
//!
//! # Example
//!
//! ```no_run
//! use namedupe::duplicates::{DuplicateFinder, FinderConfig};
//! use namedupe::scanner::ScanOptions;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_options(ScanOptions::new(false, false)));
//! let report = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! for dup in report.duplicates() {
//!     println!("{} (first seen at {})", dup.path.display(), dup.first_seen.display());
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use crossbeam_channel::bounded;

use super::confirm::Confirmer;
use super::detector::Detector;
use super::report::{FailedPath, ScanReport};
use crate::actions::DeleteMode;
use crate::scanner::{CompletionBarrier, Entry, ScanError, ScanOptions, Walker, WalkerConfig};

/// Configuration for the duplicate finder.
#[derive(Debug, Clone, Default)]
pub struct FinderConfig {
    /// Confirmation and removal flags.
    pub options: ScanOptions,
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// How approved duplicates are removed when `remove_duplicates` is set.
    pub delete_mode: DeleteMode,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
}

impl FinderConfig {
    /// Set the scan options.
    #[must_use]
    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the removal mode.
    #[must_use]
    pub fn with_delete_mode(mut self, mode: DeleteMode) -> Self {
        self.delete_mode = mode;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Errors that end a scan without a report.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A worker thread could not be started.
    #[error("Failed to start scan worker: {0}")]
    Spawn(#[source] std::io::Error),

    /// The detector thread panicked.
    #[error("Duplicate detector terminated abnormally")]
    DetectorPanicked,

    /// Traversal failed and the scan was aborted.
    #[error(transparent)]
    ScanError(#[from] ScanError),
}

/// Orchestrates one traversal/detection run per call.
#[derive(Debug, Default)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// The finder's configuration.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Scan `path`, prompting on standard input/output in confirmation mode.
    ///
    /// # Errors
    ///
    /// See [`DuplicateFinder::find_duplicates_with`].
    pub fn find_duplicates(&self, path: &Path) -> Result<ScanReport, FinderError> {
        self.run(path, None)
    }

    /// Scan `path`, asking `confirmer` before each removal in confirmation
    /// mode.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - The path does not exist or is not a directory
    /// - A worker thread cannot be started
    /// - Traversal fails under [`crate::scanner::ErrorPolicy::Abort`]
    /// - The scan is interrupted by shutdown signal
    pub fn find_duplicates_with(
        &self,
        path: &Path,
        confirmer: Box<dyn Confirmer>,
    ) -> Result<ScanReport, FinderError> {
        self.run(path, Some(confirmer))
    }

    fn run(&self, path: &Path, confirmer: Option<Box<dyn Confirmer>>) -> Result<ScanReport, FinderError> {
        if !path.exists() {
            return Err(FinderError::PathNotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(FinderError::NotADirectory(path.to_path_buf()));
        }
        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let start_time = Instant::now();
        let started_at = Utc::now();
        let options = self.config.options;
        log::info!("Scan started: {}", path.display());

        let (entry_tx, entry_rx) = bounded::<Entry>(0);

        let mut detector = Detector::new(options).with_delete_mode(self.config.delete_mode);
        if let Some(confirmer) = confirmer {
            detector = detector.with_confirmer(confirmer);
        }
        let detector_barrier = Arc::new(CompletionBarrier::new());
        let detector = detector
            .spawn(entry_rx, Arc::clone(&detector_barrier))
            .map_err(FinderError::Spawn)?;

        let mut walker = Walker::new(path, self.config.walker_config.clone(), options);
        if let Some(flag) = &self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }
        let traversal_barrier = Arc::new(CompletionBarrier::new());
        let pool = match walker.spawn(entry_tx, Arc::clone(&traversal_barrier)) {
            Ok(pool) => pool,
            Err(e) => {
                // every sender is gone, so the detector drains and exits
                detector_barrier.wait();
                let _ = detector.join();
                return Err(e.into());
            }
        };

        traversal_barrier.wait();
        log::debug!("Traversal finished, closing detection queue");
        let walk = pool.finish();

        detector_barrier.wait();
        let detection = detector.join().map_err(|_| FinderError::DetectorPanicked)?;

        let duration = start_time.elapsed();
        log::info!(
            "Scan stopped: {} directories, {} files, {} duplicates in {:.2?}",
            walk.directories,
            detection.files,
            detection.duplicates.len(),
            duration
        );

        if walk.interrupted {
            return Err(FinderError::Interrupted);
        }
        if let Some(err) = walk.aborted {
            return Err(err.into());
        }

        Ok(ScanReport {
            root: path.to_path_buf(),
            options,
            delete_mode: self.config.delete_mode,
            directories: walk.directories,
            detection,
            failures: walk.failures.iter().map(FailedPath::from).collect(),
            started_at,
            duration,
        })
    }
}
