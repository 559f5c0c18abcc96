//! Expense display formatting
//!
//! Provides utilities for formatting expense records for terminal display.

use crate::models::{Expense, ImageRef};

/// Format a single expense for display (list row)
pub fn format_expense_row(expense: &Expense) -> String {
    let receipt_icon = image_icon(expense.receipt_image.as_ref());
    let screenshot_icon = image_icon(expense.screenshot_image.as_ref());

    format!(
        "{} {:10} {:24} {:16} {:>10} {:>10}  {}{}",
        expense.id.short(),
        expense.display_date(),
        truncate(&expense.description, 24),
        truncate(&expense.location, 16),
        format!("{:.2}", expense.us_amount),
        format!("{:.2}", expense.aus_amount),
        receipt_icon,
        screenshot_icon
    )
}

/// Format a list of expenses
pub fn format_expense_list(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return "No expenses recorded.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:8} {:10} {:24} {:16} {:>10} {:>10}  {}\n",
        "ID", "Date", "Description", "Location", "USD", "AUD", "Img"
    ));
    output.push_str(&"-".repeat(88));
    output.push('\n');

    for expense in expenses {
        output.push_str(&format_expense_row(expense));
        output.push('\n');
    }

    output
}

/// Format expense details for display
pub fn format_expense_details(expense: &Expense) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:     {}\n", expense.id));
    output.push_str(&format!("Description: {}\n", expense.description));
    output.push_str(&format!("Location:    {}\n", expense.location));
    output.push_str(&format!("US Amount:   {:.2}\n", expense.us_amount));
    output.push_str(&format!("AUS Amount:  {:.2}\n", expense.aus_amount));
    output.push_str(&format!("Date:        {}\n", expense.display_date()));

    output.push_str(&format!(
        "Receipt:     {}\n",
        image_detail(expense.receipt_image.as_ref())
    ));
    output.push_str(&format!(
        "Screenshot:  {}\n",
        image_detail(expense.screenshot_image.as_ref())
    ));

    output.push_str(&format!(
        "Created:     {}\n",
        expense.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

fn image_icon(image: Option<&ImageRef>) -> &'static str {
    match image {
        Some(image) if image.is_stable() => "●",
        Some(_) => "○",
        None => "·",
    }
}

fn image_detail(image: Option<&ImageRef>) -> String {
    match image {
        Some(ImageRef::Stable { path }) => path.display().to_string(),
        Some(ImageRef::Transient { uri }) => format!("{} (not yet saved)", uri),
        None => "(none)".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
