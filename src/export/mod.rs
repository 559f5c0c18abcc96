//! Export module for receipt-ledger
//!
//! Bundles the full expense collection plus its images into one shareable
//! ZIP archive: tabular summary, instructions file, and an `images/`
//! directory, assembled in an ephemeral staging tree.

pub mod archive;
pub mod csv;

pub use archive::{sanitize_filename, ExportOutcome, ExportPipeline};
pub use csv::{write_summary_csv, SummaryRow};
