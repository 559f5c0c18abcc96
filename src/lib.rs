//! receipt-ledger - Personal expense tracker with receipt images
//!
//! This library provides the core functionality for the receipt-ledger
//! application: durable CRUD over expense records, materialization of
//! transient image references into app-owned files, and a bulk export
//! pipeline that bundles all records and their images into a shareable
//! ZIP archive.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (expenses, image references, ids)
//! - `storage`: JSON file storage layer with schema migration
//! - `services`: Business logic layer (validation, image materialization)
//! - `export`: Export pipeline (CSV + images + README -> ZIP)
//! - `share`: Handing the archive to the platform share mechanism
//!
//! # Example
//!
//! ```rust,ignore
//! use receipt_ledger::config::paths::LedgerPaths;
//! use receipt_ledger::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let storage = Storage::new(paths)?;
//! let expenses = storage.expenses.load_all()?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod share;
pub mod storage;

pub use error::LedgerError;
