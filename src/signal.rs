//! Signal handling for graceful shutdown.
//!
//! The first Ctrl+C sets a shared [`AtomicBool`]; traversal workers stop
//! taking new directories and the scan ends with
//! [`FinderError::Interrupted`](crate::duplicates::FinderError::Interrupted).
//! A second Ctrl+C exits immediately, which matters when the detector is
//! blocked waiting for a confirmation answer.
//!
//! ```rust,no_run
//! use namedupe::duplicates::FinderConfig;
//! use namedupe::signal::install_handler;
//!
//! let handler = install_handler().expect("Failed to install signal handler");
//! let config = FinderConfig::default().with_shutdown_flag(handler.flag());
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::error::ExitCode;

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Shared shutdown flag.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a handler with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether Ctrl+C was pressed or [`request_shutdown`](Self::request_shutdown) was called.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Request a shutdown.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// The flag to hand to [`FinderConfig`](crate::duplicates::FinderConfig).
    #[must_use]
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Clear the flag so the handler can be reused.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

/// Install the process-wide Ctrl+C handler.
///
/// Later calls return the already installed handler with its flag cleared, so
/// several scans in one process (tests, library callers) can each install it.
///
/// # Errors
///
/// Returns [`SignalError`] if the hook cannot be registered for a reason
/// other than another hook already being present.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let flag = handler.flag();

    let installed = ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            let _ = writeln!(std::io::stderr(), "\nInterrupted again. Exiting.");
            std::process::exit(ExitCode::Interrupted.as_i32());
        }
        let _ = writeln!(
            std::io::stderr(),
            "\nInterrupted. Stopping scan (press Ctrl+C again to exit now)..."
        );
        let _ = std::io::stderr().flush();
        log::info!("Shutdown signal received");
    });

    match installed {
        Ok(()) => {
            let _ = GLOBAL_HANDLER.set(handler.clone());
            Ok(handler)
        }
        Err(ctrlc::Error::MultipleHandlers) => {
            // Someone else owns the hook; fall back to a manual-only flag.
            log::debug!("Ctrl+C handler already registered, using unhooked handler");
            Ok(GLOBAL_HANDLER.get_or_init(ShutdownHandler::new).clone())
        }
        Err(e) => Err(e.into()),
    }
}
