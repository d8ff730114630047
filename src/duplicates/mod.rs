//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Name-based duplicate detection on a single detector thread
//! - The interactive confirmation protocol
//! - Scan orchestration and reporting

pub mod confirm;
pub mod detector;
pub mod finder;
pub mod report;

pub use confirm::{Confirmation, Confirmer, Decision, LinePrompt};
pub use detector::{Detector, PresenceTable};
pub use finder::{DuplicateFinder, FinderConfig, FinderError};
pub use report::{DetectorReport, DuplicateRecord, FailedPath, Resolution, ScanReport};
