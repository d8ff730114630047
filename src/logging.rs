//! Logging infrastructure for NameDupe.
//!
//! Structured logging via the `log` facade and `env_logger` backend.
//! The level is chosen by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (error only) or `--verbose` (debug/trace)
//! 3. Default: info level
//!
//! At the default info level the log shows scan start and stop, every
//! directory and file processed, every duplicate and every removal outcome.
//! Use `--quiet` to see errors only.
//!
//! ```rust,no_run
//! use namedupe::logging::init_logging;
//!
//! init_logging(1, false); // -v
//! log::debug!("Effective configuration loaded");
//! ```

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize the logging subsystem based on CLI verbosity flags.
///
/// Must be called at most once per process; later calls are ignored.
///
/// # Arguments
///
/// * `verbose` - Verbosity count from CLI (0=normal, 1=debug, 2+=trace)
/// * `quiet` - If true, only show errors (overridden by RUST_LOG)
pub fn init_logging(verbose: u8, quiet: bool) {
    let use_env = env::var("RUST_LOG").is_ok();
    let mut builder = Builder::new();

    if use_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    configure_format(&mut builder, verbose);

    if builder.try_init().is_err() {
        return;
    }

    if use_env {
        log::debug!("Logging initialized from RUST_LOG: {:?}", env::var("RUST_LOG").ok());
    } else {
        log::debug!("Logging initialized at level: {:?}", determine_level(verbose, quiet));
    }
}

/// Determine the log level from CLI flags.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Log lines go to stderr so stdout stays clean for prompts and reports.
///
/// With `-v` or more, the emitting module and worker thread name are shown.
fn configure_format(builder: &mut Builder, verbose: u8) {
    builder.target(env_logger::Target::Stderr);
    builder.format(move |buf, record| {
        let level = record.level();
        let level_style = buf.default_level_style(level);

        if verbose >= 1 {
            let thread = std::thread::current();
            writeln!(
                buf,
                "{} {level_style}{:<5}{level_style:#} [{}] [{}] {}",
                buf.timestamp_millis(),
                level,
                thread.name().unwrap_or("main"),
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(
                buf,
                "{} {level_style}{:<5}{level_style:#} {}",
                buf.timestamp_seconds(),
                level,
                record.args()
            )
        }
    });
}
