//! Storage layer for receipt-ledger
//!
//! Provides JSON file storage with atomic whole-document rewrites and
//! automatic directory creation.

pub mod expenses;
pub mod file_io;

pub use expenses::{ExpenseRepository, SCHEMA_VERSION};
pub use file_io::write_json_atomic;

use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

/// Main storage coordinator
pub struct Storage {
    paths: LedgerPaths,
    pub expenses: ExpenseRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        // Ensure directories exist
        paths.ensure_directories()?;

        Ok(Self {
            expenses: ExpenseRepository::new(paths.expenses_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }
}
