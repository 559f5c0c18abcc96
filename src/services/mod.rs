//! Business logic layer for receipt-ledger

pub mod expense;
pub mod images;

pub use expense::{CreateExpenseInput, ExpenseService, UpdateExpenseInput};
pub use images::ImageStore;
