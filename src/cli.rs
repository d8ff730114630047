//! Command-line interface definitions for NameDupe.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! The CLI follows standard conventions with global options (verbosity, color) and
//! subcommands for different operations.
//!
//! # Example
//!
//! ```bash
//! # List files whose names collide
//! namedupe scan ~/Documents
//!
//! # Ask before removing each duplicate (simulated unless --delete-mode is given)
//! namedupe scan ~/Documents --confirm --remove
//!
//! # Move approved duplicates to the trash
//! namedupe scan ~/Documents --confirm --remove --delete-mode trash
//!
//! # JSON report, keep going past unreadable directories
//! namedupe scan ~/Documents --output json --on-error continue
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::actions::DeleteMode;
use crate::scanner::ErrorPolicy;

/// Concurrent duplicate file-name finder.
///
/// NameDupe walks a directory tree on a pool of threads and reports every file
/// whose name was already seen elsewhere in the tree, optionally asking before
/// removing it.
#[derive(Debug, Parser)]
#[command(name = "namedupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for NameDupe.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory tree for duplicate file names
    Scan(ScanArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory path to scan
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Ask for confirmation before removing each duplicate
    #[arg(long)]
    pub confirm: bool,

    /// Remove duplicates (together with --confirm, each removal is prompted)
    #[arg(long)]
    pub remove: bool,

    /// How removals are carried out
    ///
    /// Only takes effect with --remove; otherwise removals are simulated.
    #[arg(long, value_enum, value_name = "MODE")]
    pub delete_mode: Option<DeleteModeArg>,

    /// Number of traversal threads (default: available parallelism)
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// What to do when a directory cannot be read
    #[arg(long, value_enum, value_name = "POLICY")]
    pub on_error: Option<ErrorPolicyArg>,

    /// Follow symbolic links to directories
    ///
    /// Warning: May cause infinite loops if symlinks form cycles.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Glob patterns to ignore (can be specified multiple times)
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Output format for the final report
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Text,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// CLI spelling of [`DeleteMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeleteModeArg {
    /// Only report removals
    Simulate,
    /// Move removed files to the system trash
    Trash,
    /// Delete removed files permanently
    Permanent,
}

impl From<DeleteModeArg> for DeleteMode {
    fn from(arg: DeleteModeArg) -> Self {
        match arg {
            DeleteModeArg::Simulate => DeleteMode::Simulate,
            DeleteModeArg::Trash => DeleteMode::Trash,
            DeleteModeArg::Permanent => DeleteMode::Permanent,
        }
    }
}

/// CLI spelling of [`ErrorPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ErrorPolicyArg {
    /// Stop the scan at the first unreadable directory
    Abort,
    /// Record unreadable directories and keep going
    Continue,
}

impl From<ErrorPolicyArg> for ErrorPolicy {
    fn from(arg: ErrorPolicyArg) -> Self {
        match arg {
            ErrorPolicyArg::Abort => ErrorPolicy::Abort,
            ErrorPolicyArg::Continue => ErrorPolicy::Continue,
        }
    }
}
