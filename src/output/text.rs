//! Human-readable report.

use std::io::{self, Write};

use yansi::Paint;

use crate::duplicates::{Resolution, ScanReport};

/// Plain-text summary of a scan, colored when the terminal allows it.
#[derive(Debug)]
pub struct TextOutput<'a> {
    report: &'a ScanReport,
}

impl<'a> TextOutput<'a> {
    /// Wrap a report for printing.
    #[must_use]
    pub fn new(report: &'a ScanReport) -> Self {
        Self { report }
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let report = self.report;

        if report.has_duplicates() {
            writeln!(writer, "{}", "Duplicates:".bold())?;
            for dup in report.duplicates() {
                let outcome = match &dup.resolution {
                    Resolution::Removed(mode) if mode.is_destructive() => {
                        dup.resolution.label().red().to_string()
                    }
                    Resolution::Removed(_) => dup.resolution.label().yellow().to_string(),
                    Resolution::Skipped => dup.resolution.label().dim().to_string(),
                    Resolution::Failed(msg) => format!("{} ({msg})", "failed".red().bold()),
                };
                writeln!(
                    writer,
                    "  {}  [{}]\n    first seen: {}",
                    dup.path.display(),
                    outcome,
                    dup.first_seen.display().dim()
                )?;
            }
            writeln!(writer)?;
        }

        if report.is_partial() {
            writeln!(writer, "{}", "Could not scan:".yellow().bold())?;
            for failure in &report.failures {
                writeln!(writer, "  {}", failure.error)?;
            }
            writeln!(writer)?;
        }

        let detection = &report.detection;
        writeln!(writer, "{}", "Summary".bold())?;
        writeln!(writer, "  Root:          {}", report.root.display())?;
        writeln!(writer, "  Directories:   {}", report.directories)?;
        writeln!(writer, "  Files:         {}", report.total_files())?;
        writeln!(writer, "  Unique names:  {}", report.unique_names())?;

        let count = report.duplicate_count();
        if count == 0 {
            writeln!(writer, "  Duplicates:    {}", "none".green())?;
        } else {
            writeln!(writer, "  Duplicates:    {}", count.yellow().bold())?;
            writeln!(
                writer,
                "  Removed:       {} ({})",
                detection.removed_count(),
                report.delete_mode
            )?;
            if report.options.needs_confirmation() {
                writeln!(writer, "  Skipped:       {}", detection.skipped_count())?;
            }
            if detection.failed_count() > 0 {
                writeln!(writer, "  Failed:        {}", detection.failed_count().red())?;
            }
        }
        if !report.failures.is_empty() {
            writeln!(writer, "  Unreadable:    {}", report.failures.len().yellow())?;
        }
        writeln!(writer, "  Duration:      {:.2?}", report.duration)?;
        Ok(())
    }
}
