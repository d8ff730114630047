//! File actions module.
//!
//! The only action is removing a duplicate, in one of three modes:
//! - Simulated (default): a notice is logged, nothing is deleted
//! - Move to system trash (recoverable)
//! - Permanent deletion
//!
//! ```no_run
//! use namedupe::actions::{remove_duplicate, DeleteMode};
//! use std::path::Path;
//!
//! let result = remove_duplicate(Path::new("/path/to/duplicate.txt"), DeleteMode::Simulate);
//! ```

pub mod delete;

// Re-export commonly used types
pub use delete::{
    delete_to_trash, permanent_delete, remove_duplicate, simulate_delete, DeleteError,
    DeleteMode, DeleteResult,
};
