//! Configuration module for receipt-ledger

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::Settings;
