//! NameDupe - Concurrent Duplicate File-Name Finder
//!
//! Walks a directory tree on a bounded pool of threads and reports every file
//! whose name was already seen somewhere else in the tree. Duplicates can be
//! removed after an interactive y/n confirmation, simulated by default.
//!
//! Matching is by base name only; file contents are never read.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;
pub mod signal;

use std::io::{self, BufRead, BufReader, IsTerminal, Write};

use anyhow::{Context, Result};

use crate::cli::{Cli, Commands, OutputFormat};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, LinePrompt};
use crate::error::ExitCode;
use crate::output::{JsonOutput, TextOutput};

/// Run the command described by `cli` and return the process exit code.
///
/// Confirmation prompts read standard input. They are written to standard
/// output, or to standard error with `--output json` so the report stays
/// parseable.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, the signal handler
/// cannot be installed, the scan fails, or the report cannot be written.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    run_with_io(
        cli,
        BufReader::new(io::stdin()),
        Box::new(io::stdout()),
        Box::new(io::stderr()),
        io::stdout(),
    )
}

/// [`run_app`] over explicit streams.
///
/// `prompt_out` receives confirmation prompts for the text report and
/// `prompt_err` receives them for the JSON report; the report itself goes to
/// `report_out`.
///
/// # Errors
///
/// See [`run_app`].
pub fn run_with_io<R, O>(
    cli: Cli,
    input: R,
    prompt_out: Box<dyn Write + Send>,
    prompt_err: Box<dyn Write + Send>,
    mut report_out: O,
) -> Result<ExitCode>
where
    R: BufRead + Send + 'static,
    O: Write,
{
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color || !io::stdout().is_terminal() {
        yansi::disable();
    }

    let Commands::Scan(args) = &cli.command;

    let mut config =
        Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_cli(args);
    log::debug!("Effective configuration: {:?}", config);

    let handler = signal::install_handler()?;
    let finder = DuplicateFinder::new(config.finder_config().with_shutdown_flag(handler.flag()));

    let prompt_sink = match args.output {
        OutputFormat::Text => prompt_out,
        OutputFormat::Json => prompt_err,
    };
    let prompt = LinePrompt::new(input, prompt_sink);

    let report = finder
        .find_duplicates_with(&args.path, Box::new(prompt))
        .with_context(|| format!("Scan of {} failed", args.path.display()))?;
    let exit_code = ExitCode::from_report(&report);

    match args.output {
        OutputFormat::Text => TextOutput::new(&report).write_to(&mut report_out)?,
        OutputFormat::Json => JsonOutput::new(&report, exit_code).write_to(&mut report_out, true)?,
    }
    report_out.flush()?;

    Ok(exit_code)
}
