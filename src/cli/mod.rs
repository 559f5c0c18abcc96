//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer.

pub mod expense;
pub mod export;

pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportArgs};
