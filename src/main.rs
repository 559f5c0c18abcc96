use anyhow::Result;
use clap::{Parser, Subcommand};

use receipt_ledger::cli::{handle_expense_command, handle_export_command, ExpenseCommands, ExportArgs};
use receipt_ledger::config::{paths::LedgerPaths, settings::Settings};
use receipt_ledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "receipts",
    version,
    about = "Personal expense tracker with receipt images",
    long_about = "receipt-ledger tracks personal expenses, each with a receipt \
                  photo and a bank-transfer screenshot, and exports everything \
                  as a single shareable ZIP archive."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Expense(ExpenseCommands),

    /// Export all expenses and images as a ZIP archive
    Export(ExportArgs),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(paths.clone())?;

    match cli.command {
        Commands::Expense(cmd) => {
            handle_expense_command(&storage, cmd)?;
        }
        Commands::Export(args) => {
            handle_export_command(&paths, args)?;
        }
        Commands::Config => {
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Expense store:    {}", paths.expenses_file().display());
            println!("Images directory: {}", paths.images_dir().display());
            println!("Exports:          {}", paths.exports_dir().display());
            println!("Date format:      {}", settings.date_format);
        }
    }

    Ok(())
}
