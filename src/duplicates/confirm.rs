//! Interactive confirmation protocol.
//!
//! Before a duplicate is removed in confirmation mode the detector asks a
//! [`Confirmer`]. The stock implementation, [`LinePrompt`], writes a prompt
//! naming the file and reads whole lines until it gets exactly `y` or `n`.
//! Anything else triggers a re-prompt and changes nothing.
//!
//! # Example
//!
//! ```
//! use namedupe::duplicates::{Confirmer, Decision, LinePrompt};
//! use std::io::Cursor;
//! use std::path::Path;
//!
//! let mut prompt = LinePrompt::new(Cursor::new("maybe\ny\n"), Vec::new());
//! let confirmation = prompt.confirm(Path::new("/tmp/a.txt")).unwrap();
//!
//! assert_eq!(confirmation.decision, Decision::Remove);
//! assert_eq!(confirmation.reprompts, 1);
//! ```

use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::path::Path;

/// The user's answer for one duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Go ahead with the removal action.
    Remove,
    /// Leave the file alone.
    Skip,
}

/// Outcome of one confirmation exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    /// Final decision
    pub decision: Decision,
    /// Number of invalid answers that were re-prompted
    pub reprompts: usize,
}

/// Source of removal approvals.
///
/// Only the detector calls this, strictly one duplicate at a time.
pub trait Confirmer: Send {
    /// Ask whether the duplicate at `path` should be removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be written or the answer cannot
    /// be read.
    fn confirm(&mut self, path: &Path) -> io::Result<Confirmation>;
}

/// Line-oriented y/n prompt over any reader/writer pair.
#[derive(Debug)]
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    /// Create a prompt reading answers from `input` and writing to `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the prompt, returning the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl LinePrompt<BufReader<Stdin>, Stdout> {
    /// Prompt on the process's standard input and output.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R, W> Confirmer for LinePrompt<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn confirm(&mut self, path: &Path) -> io::Result<Confirmation> {
        write!(self.output, "Remove duplicate file {}? (y/n): ", path.display())?;
        self.output.flush()?;

        let mut reprompts = 0;
        let mut line = Vec::new();
        loop {
            line.clear();
            if self.input.read_until(b'\n', &mut line)? == 0 {
                writeln!(self.output)?;
                log::warn!(
                    "Input closed while confirming {}, skipping",
                    path.display()
                );
                return Ok(Confirmation {
                    decision: Decision::Skip,
                    reprompts,
                });
            }

            match strip_line_ending(&line) {
                b"y" => {
                    return Ok(Confirmation {
                        decision: Decision::Remove,
                        reprompts,
                    })
                }
                b"n" => {
                    return Ok(Confirmation {
                        decision: Decision::Skip,
                        reprompts,
                    })
                }
                other => {
                    reprompts += 1;
                    log::debug!(
                        "Invalid confirmation answer {:?}, re-prompting",
                        String::from_utf8_lossy(other)
                    );
                    write!(self.output, "Invalid input. Please answer y or n: ")?;
                    self.output.flush()?;
                }
            }
        }
    }
}

/// Strip one trailing `\n` or `\r\n`, nothing else.
///
/// Works on raw bytes so that non-UTF-8 answers are just invalid answers.
fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
