//! Export CLI command
//!
//! Runs the export pipeline on a worker thread so the interactive path
//! stays responsive, then reports the result (and optionally hands the
//! archive to the platform share mechanism).

use clap::Args;

use crate::config::paths::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};
use crate::export::{ExportOutcome, ExportPipeline};
use crate::share::share_archive;

/// Arguments for the export command
#[derive(Args)]
pub struct ExportArgs {
    /// Hand the finished archive to the platform share mechanism
    #[arg(long)]
    pub share: bool,
}

/// Handle the export command
pub fn handle_export_command(paths: &LedgerPaths, args: ExportArgs) -> LedgerResult<()> {
    println!("Exporting expenses...");

    // Export may run long (file copies, compression); keep it off the
    // interactive path and marshal the result back for notification.
    let pipeline_paths = paths.clone();
    let worker = std::thread::spawn(move || ExportPipeline::new(pipeline_paths).run());
    let outcome = worker
        .join()
        .map_err(|_| LedgerError::Export("Export worker panicked".into()))??;

    match outcome {
        ExportOutcome::NothingToExport => {
            println!("No expenses to export.");
        }
        ExportOutcome::Archive(archive) => {
            println!("Export written to {}", archive.display());

            if args.share {
                // Share failure leaves the archive usable on disk
                match share_archive(&archive) {
                    Ok(()) => println!("Archive handed to the system share handler."),
                    Err(err) => eprintln!("Could not share the archive: {}", err),
                }
            }
        }
    }

    Ok(())
}
