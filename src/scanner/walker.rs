//! Traversal worker pool.
//!
//! # Overview
//!
//! The [`Walker`] fans directory traversal out over a bounded pool of
//! threads. Pending directories live in an unbounded queue; every queued
//! directory is registered on the shared traversal [`CompletionBarrier`]
//! before it is queued and deregistered after a worker has finished it, so the
//! barrier reaches zero exactly when the whole tree has been walked.
//!
//! For each directory a worker:
//! 1. Sends a directory-boundary [`Entry`] when confirmation mode is on,
//!    otherwise logs the directory locally
//! 2. Lists the directory in filesystem order
//! 3. Queues every subdirectory as new work without waiting for it
//! 4. Hands every other entry to the detection queue, blocking until the
//!    detector has taken it
//!
//! # Features
//!
//! - Bounded thread count regardless of tree shape
//! - Configurable symlink following
//! - Gitignore-style pattern matching via the `ignore` crate
//! - Hidden file filtering
//! - Abort-on-first-error or collect-and-continue failure handling
//! - Graceful shutdown via atomic flag

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use ignore::gitignore::{Gitignore, GitignoreBuilder};

use super::barrier::{BarrierGuard, CompletionBarrier};
use super::{Entry, ErrorPolicy, ScanError, ScanOptions, WalkerConfig};

/// A unit of work for the traversal pool.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DirTask {
    /// Walk one directory. Already registered on the traversal barrier.
    Walk(PathBuf),
    /// Exit the worker loop.
    Stop,
}

/// Result of a finished traversal.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Directories successfully listed
    pub directories: usize,
    /// Non-directory entries handed to the detector
    pub files: usize,
    /// Failures recorded under [`ErrorPolicy::Continue`]
    pub failures: Vec<ScanError>,
    /// First failure under [`ErrorPolicy::Abort`]
    pub aborted: Option<ScanError>,
    /// Whether traversal stopped because shutdown was requested
    pub interrupted: bool,
}

/// Directory walker for concurrent file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Scan options, copied into every worker
    options: ScanOptions,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig, options: ScanOptions) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            options,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, workers stop listing directories as
    /// soon as possible. Queued work is still drained so the traversal barrier
    /// reaches zero.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Start the worker pool and queue the root directory.
    ///
    /// The root is registered on `barrier` before this returns. The caller
    /// waits on `barrier`, then calls [`WalkerPool::finish`]; once the pool is
    /// finished every clone of `entries` has been dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Spawn`] if a worker thread cannot be started.
    pub fn spawn(
        self,
        entries: Sender<Entry>,
        barrier: Arc<CompletionBarrier>,
    ) -> Result<WalkerPool, ScanError> {
        let (task_tx, task_rx) = unbounded();
        let gitignore = self.build_gitignore();
        let worker_count = self.config.workers.max(1);

        let shared = Arc::new(Shared {
            root: self.root,
            config: self.config,
            options: self.options,
            gitignore,
            barrier: Arc::clone(&barrier),
            tasks: task_tx.clone(),
            stop: AtomicBool::new(false),
            shutdown_flag: self.shutdown_flag,
            first_error: Mutex::new(None),
            failures: Mutex::new(Vec::new()),
            directories: AtomicUsize::new(0),
            files: AtomicUsize::new(0),
        });

        let mut pool = WalkerPool {
            shared: Arc::clone(&shared),
            tasks: task_tx,
            handles: Vec::with_capacity(worker_count),
        };

        for id in 0..worker_count {
            let shared = Arc::clone(&shared);
            let tasks = task_rx.clone();
            let entries = entries.clone();
            let spawned = thread::Builder::new()
                .name(format!("traversal-{id}"))
                .spawn(move || worker_loop(id, &shared, &tasks, &entries));

            match spawned {
                Ok(handle) => pool.handles.push(handle),
                Err(e) => {
                    pool.finish();
                    return Err(ScanError::Spawn(e));
                }
            }
        }
        drop(entries);

        log::debug!("Spawned {} traversal workers", pool.handles.len());

        barrier.add(1);
        if pool
            .tasks
            .send(DirTask::Walk(shared.root.clone()))
            .is_err()
        {
            barrier.done();
        }

        Ok(pool)
    }

    /// Build gitignore matcher from config patterns and a root .gitignore file.
    fn build_gitignore(&self) -> Option<Gitignore> {
        if self.config.ignore_patterns.is_empty() {
            return None;
        }

        let mut builder = GitignoreBuilder::new(&self.root);
        for pattern in &self.config.ignore_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }

        match builder.build() {
            Ok(gitignore) if !gitignore.is_empty() => Some(gitignore),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Failed to build ignore patterns: {}", e);
                None
            }
        }
    }
}

/// Handle to a running traversal pool.
pub struct WalkerPool {
    shared: Arc<Shared>,
    tasks: Sender<DirTask>,
    handles: Vec<JoinHandle<()>>,
}

impl std::fmt::Debug for WalkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalkerPool")
            .field("root", &self.shared.root)
            .field("workers", &self.handles.len())
            .finish()
    }
}

impl WalkerPool {
    /// Stop every worker, join them and collect the outcome.
    ///
    /// Call this after the traversal barrier has reached zero; any directory
    /// still queued at that point would be skipped.
    pub fn finish(self) -> WalkOutcome {
        let Self {
            shared,
            tasks,
            handles,
        } = self;

        for _ in &handles {
            let _ = tasks.send(DirTask::Stop);
        }
        for handle in handles {
            if handle.join().is_err() {
                log::error!("Traversal worker panicked");
            }
        }
        drop(tasks);

        let failures = std::mem::take(
            &mut *shared
                .failures
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        let aborted = shared
            .first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        WalkOutcome {
            directories: shared.directories.load(Ordering::SeqCst),
            files: shared.files.load(Ordering::SeqCst),
            failures,
            aborted,
            interrupted: shared.is_shutdown_requested(),
        }
    }
}

/// State shared by every worker of one pool.
struct Shared {
    root: PathBuf,
    config: WalkerConfig,
    options: ScanOptions,
    gitignore: Option<Gitignore>,
    barrier: Arc<CompletionBarrier>,
    tasks: Sender<DirTask>,
    /// Set on the first failure under [`ErrorPolicy::Abort`]
    stop: AtomicBool,
    shutdown_flag: Option<Arc<AtomicBool>>,
    first_error: Mutex<Option<ScanError>>,
    failures: Mutex<Vec<ScanError>>,
    directories: AtomicUsize,
    files: AtomicUsize,
}

impl Shared {
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn should_stop(&self) -> bool {
        self.stop.load(Ordering::SeqCst) || self.is_shutdown_requested()
    }

    /// Record a failure according to the configured policy.
    fn record_failure(&self, err: ScanError) {
        match self.config.error_policy {
            ErrorPolicy::Abort => {
                log::error!("{}", err);
                let mut first = self
                    .first_error
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                if first.is_none() {
                    *first = Some(err);
                }
                self.stop.store(true, Ordering::SeqCst);
            }
            ErrorPolicy::Continue => {
                log::warn!("{}", err);
                self.failures
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(err);
            }
        }
    }

    /// Hand one entry to the detector, blocking until it is received.
    fn deliver(&self, entries: &Sender<Entry>, entry: Entry) -> bool {
        if entries.send(entry).is_err() {
            self.record_failure(ScanError::QueueClosed);
            self.stop.store(true, Ordering::SeqCst);
            return false;
        }
        true
    }

    /// Register and queue a subdirectory.
    fn schedule(&self, dir: PathBuf) {
        self.barrier.add(1);
        if self.tasks.send(DirTask::Walk(dir)).is_err() {
            self.barrier.done();
        }
    }

    /// Check hidden-name and ignore-pattern filters.
    fn is_filtered(&self, path: &Path, name: &str, is_dir: bool) -> bool {
        if self.config.skip_hidden && name.starts_with('.') {
            return true;
        }
        if let Some(gi) = &self.gitignore {
            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            let relative = relative.to_string_lossy();
            let normalized = if cfg!(windows) {
                relative.replace('\\', "/")
            } else {
                relative.into_owned()
            };
            return gi.matched(normalized, is_dir).is_ignore();
        }
        false
    }
}

fn worker_loop(id: usize, shared: &Shared, tasks: &Receiver<DirTask>, entries: &Sender<Entry>) {
    log::trace!("Traversal worker {} started", id);

    while let Ok(task) = tasks.recv() {
        let dir = match task {
            DirTask::Walk(dir) => dir,
            DirTask::Stop => break,
        };
        let _guard = BarrierGuard::adopt(Arc::clone(&shared.barrier));

        if shared.should_stop() {
            log::trace!("Worker {} skipping {} after stop", id, dir.display());
            continue;
        }
        process_directory(shared, &dir, entries);
    }

    log::trace!("Traversal worker {} exiting", id);
}

/// Walk the direct children of one directory.
fn process_directory(shared: &Shared, dir: &Path, entries: &Sender<Entry>) {
    if shared.options.must_confirm_delete {
        if !shared.deliver(entries, Entry::directory(dir)) {
            return;
        }
    } else {
        log::info!("Processing directory {}", dir.display());
    }

    let listing = match fs::read_dir(dir) {
        Ok(listing) => listing,
        Err(e) => {
            shared.record_failure(ScanError::read_dir(dir, e));
            return;
        }
    };
    shared.directories.fetch_add(1, Ordering::SeqCst);

    for item in listing {
        if shared.should_stop() {
            return;
        }

        let item = match item {
            Ok(item) => item,
            Err(e) => {
                shared.record_failure(ScanError::read_dir(dir, e));
                continue;
            }
        };
        let path = item.path();
        let name = item.file_name();

        let is_dir = if shared.config.follow_symlinks {
            fs::metadata(&path).map(|m| m.is_dir())
        } else {
            item.file_type().map(|t| t.is_dir())
        };
        let is_dir = match is_dir {
            Ok(is_dir) => is_dir,
            Err(e) => {
                shared.record_failure(ScanError::stat(&path, e));
                continue;
            }
        };

        if shared.is_filtered(&path, &name.to_string_lossy(), is_dir) {
            log::trace!("Filtered {}", path.display());
            continue;
        }

        if is_dir {
            shared.schedule(path);
        } else {
            if !shared.deliver(entries, Entry::file(dir, name)) {
                return;
            }
            shared.files.fetch_add(1, Ordering::SeqCst);
        }
    }
}
