//! Core data models for receipt-ledger

pub mod expense;
pub mod ids;
pub mod image;

pub use expense::Expense;
pub use ids::ExpenseId;
pub use image::ImageRef;
