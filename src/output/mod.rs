//! Output formatters for scan reports.
//!
//! - Text for people at a terminal
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use namedupe::duplicates::DuplicateFinder;
//! use namedupe::error::ExitCode;
//! use namedupe::output::JsonOutput;
//! use std::path::Path;
//!
//! let report = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//!
//! let output = JsonOutput::new(&report, ExitCode::from_report(&report));
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod text;

pub use json::JsonOutput;
pub use text::TextOutput;
