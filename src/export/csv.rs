//! CSV summary writer for the export pipeline
//!
//! Produces the `expenses.csv` file bundled into every export archive:
//! one header row, one row per expense, image cells holding the relative
//! path of the copied image inside the archive (or an empty string when
//! the image was omitted).

use std::io::Write;

use crate::error::LedgerResult;
use crate::models::Expense;

/// One row of the tabular summary
#[derive(Debug, Clone)]
pub struct SummaryRow {
    pub expense: Expense,
    /// Relative path (`images/<filename>`) of the copied receipt, if any
    pub receipt_ref: Option<String>,
    /// Relative path of the copied screenshot, if any
    pub screenshot_ref: Option<String>,
}

/// Write the tabular summary.
///
/// Quoting is handled by the csv crate: fields containing the separator
/// or a double quote are enclosed and internal quotes doubled, so the
/// output is recoverable by any standard CSV parser.
pub fn write_summary_csv<W: Write>(writer: W, rows: &[SummaryRow]) -> LedgerResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record([
        "ID",
        "Description",
        "Location",
        "US Amount",
        "AUS Amount",
        "Date",
        "Receipt Image",
        "Screenshot Image",
    ])?;

    for row in rows {
        let expense = &row.expense;
        csv_writer.write_record([
            expense.id.to_string(),
            expense.description.clone(),
            expense.location.clone(),
            expense.us_amount.to_string(),
            expense.aus_amount.to_string(),
            expense.display_date(),
            row.receipt_ref.clone().unwrap_or_default(),
            row.screenshot_ref.clone().unwrap_or_default(),
        ])?;
    }

    csv_writer.flush().map_err(crate::error::LedgerError::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_row(description: &str) -> SummaryRow {
        SummaryRow {
            expense: Expense::new(
                description,
                "Sydney",
                4.5,
                6.0,
                NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
            ),
            receipt_ref: Some("images/receipt.jpg".to_string()),
            screenshot_ref: None,
        }
    }

    fn render(rows: &[SummaryRow]) -> String {
        let mut buffer = Vec::new();
        write_summary_csv(&mut buffer, rows).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_header_and_row_count() {
        let output = render(&[sample_row("Coffee"), sample_row("Taxi")]);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "ID,Description,Location,US Amount,AUS Amount,Date,Receipt Image,Screenshot Image"
        );
    }

    #[test]
    fn test_quoting_round_trips() {
        let output = render(&[sample_row(r#"Taxi, "fast""#)]);
        assert!(output.contains(r#""Taxi, ""fast""""#));

        // Recoverable by a standard CSV parser
        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[1], r#"Taxi, "fast""#);
    }

    #[test]
    fn test_missing_image_cell_is_empty() {
        let mut row = sample_row("Coffee");
        row.receipt_ref = None;
        let output = render(&[row]);

        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[6], "");
        assert_eq!(&record[7], "");
    }

    #[test]
    fn test_date_cell_uses_display_format() {
        let output = render(&[sample_row("Coffee")]);
        assert!(output.contains("3/5/2024"));
    }
}
