//! Expense CLI commands
//!
//! Implements the create/list/show/edit/delete flows over the service layer.

use clap::Subcommand;

use crate::display::{format_expense_details, format_expense_list};
use crate::error::{LedgerError, LedgerResult};
use crate::models::expense::parse_display_date;
use crate::models::{Expense, ImageRef};
use crate::services::{CreateExpenseInput, ExpenseService, UpdateExpenseInput};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// What the expense was for
        description: String,
        /// Where it happened
        #[arg(short, long)]
        location: String,
        /// Amount in US dollars (e.g. "4.50")
        #[arg(long)]
        us_amount: String,
        /// Amount in Australian dollars (e.g. "6.00")
        #[arg(long)]
        aus_amount: String,
        /// Expense date in day/month/year form (e.g. "3/5/2024")
        #[arg(short, long)]
        date: String,
        /// Receipt photo (path or picker URI)
        #[arg(long)]
        receipt: Option<String>,
        /// Bank-transfer screenshot (path or picker URI)
        #[arg(long)]
        screenshot: Option<String>,
    },
    /// List all expenses
    List,
    /// Show expense details
    Show {
        /// Expense id (full UUID or unique prefix)
        id: String,
    },
    /// Edit an expense; omitted fields are kept, including images
    Edit {
        /// Expense id (full UUID or unique prefix)
        id: String,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New location
        #[arg(short, long)]
        location: Option<String>,
        /// New US amount
        #[arg(long)]
        us_amount: Option<String>,
        /// New AUS amount
        #[arg(long)]
        aus_amount: Option<String>,
        /// New date in day/month/year form
        #[arg(short, long)]
        date: Option<String>,
        /// Replacement receipt photo
        #[arg(long)]
        receipt: Option<String>,
        /// Replacement screenshot
        #[arg(long)]
        screenshot: Option<String>,
    },
    /// Delete an expense
    Delete {
        /// Expense id (full UUID or unique prefix)
        id: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command(storage: &Storage, cmd: ExpenseCommands) -> LedgerResult<()> {
    let service = ExpenseService::new(storage);

    match cmd {
        ExpenseCommands::Add {
            description,
            location,
            us_amount,
            aus_amount,
            date,
            receipt,
            screenshot,
        } => {
            let input = CreateExpenseInput {
                description,
                location,
                us_amount: parse_amount(&us_amount, "US amount")?,
                aus_amount: parse_amount(&aus_amount, "AUS amount")?,
                date: parse_date(&date)?,
                receipt_image: receipt.map(ImageRef::transient),
                screenshot_image: screenshot.map(ImageRef::transient),
            };

            let expense = service.create(input)?;
            println!("Recorded expense: {}", expense.description);
            println!("  Location:   {}", expense.location);
            println!("  US Amount:  {:.2}", expense.us_amount);
            println!("  AUS Amount: {:.2}", expense.aus_amount);
            println!("  Date:       {}", expense.display_date());
            println!("  ID:         {}", expense.id);
        }

        ExpenseCommands::List => {
            let expenses = list_or_warn(&service)?;
            print!("{}", format_expense_list(&expenses));
        }

        ExpenseCommands::Show { id } => {
            let expense = resolve(&service, &id)?;
            print!("{}", format_expense_details(&expense));
        }

        ExpenseCommands::Edit {
            id,
            description,
            location,
            us_amount,
            aus_amount,
            date,
            receipt,
            screenshot,
        } => {
            let expense = resolve(&service, &id)?;

            let input = UpdateExpenseInput {
                description,
                location,
                us_amount: us_amount
                    .map(|v| parse_amount(&v, "US amount"))
                    .transpose()?,
                aus_amount: aus_amount
                    .map(|v| parse_amount(&v, "AUS amount"))
                    .transpose()?,
                date: date.map(|v| parse_date(&v)).transpose()?,
                receipt_image: receipt.map(ImageRef::transient),
                screenshot_image: screenshot.map(ImageRef::transient),
            };

            match service.update(expense.id, input)? {
                Some(updated) => {
                    println!("Updated expense {}", updated.id.short());
                    print!("{}", format_expense_details(&updated));
                }
                None => println!("No expense found with id {}", id),
            }
        }

        ExpenseCommands::Delete { id } => {
            let expense = resolve(&service, &id)?;
            if service.delete(expense.id)? {
                println!("Deleted expense {} ({})", expense.id.short(), expense.description);
            } else {
                println!("No expense found with id {}", id);
            }
        }
    }

    Ok(())
}

/// Load the collection, downgrading a corrupt store to a warning plus an
/// empty list so the user sees the problem instead of a silent reset
fn list_or_warn(service: &ExpenseService) -> LedgerResult<Vec<Expense>> {
    match service.list() {
        Err(err) if err.is_corrupt() => {
            eprintln!("Warning: {}", err);
            eprintln!("Showing an empty ledger; the file on disk was left untouched.");
            Ok(Vec::new())
        }
        other => other,
    }
}

/// Resolve a user-supplied id (full UUID or unique prefix) to an expense
fn resolve(service: &ExpenseService, id: &str) -> LedgerResult<Expense> {
    let expenses = service.list()?;
    let mut matches = expenses
        .into_iter()
        .filter(|e| e.id.to_string().starts_with(id));

    match (matches.next(), matches.next()) {
        (Some(expense), None) => Ok(expense),
        (Some(_), Some(_)) => Err(LedgerError::Validation(format!(
            "Expense id prefix '{}' is ambiguous",
            id
        ))),
        (None, _) => Err(LedgerError::expense_not_found(id)),
    }
}

fn parse_amount(raw: &str, label: &str) -> LedgerResult<f64> {
    let amount: f64 = raw.trim().parse().map_err(|_| {
        LedgerError::Validation(format!("Invalid {}: '{}'. Use a number like '4.50'", label, raw))
    })?;
    if !amount.is_finite() {
        return Err(LedgerError::Validation(format!(
            "Invalid {}: '{}' is not a finite number",
            label, raw
        )));
    }
    Ok(amount)
}

fn parse_date(raw: &str) -> LedgerResult<chrono::NaiveDate> {
    parse_display_date(raw).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Invalid date: '{}'. Use day/month/year, e.g. '3/5/2024'",
            raw
        ))
    })
}
