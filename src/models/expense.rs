//! Expense record model
//!
//! Represents a single user-entered expense with its two associated images
//! (receipt photo and bank-transfer screenshot).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

use super::ids::ExpenseId;
use super::image::ImageRef;

/// Display/storage format for expense dates: day/month/year, not zero-padded
pub const DATE_DISPLAY_FORMAT: &str = "%-d/%-m/%Y";

/// Parse a date in the stored `day/month/year` display form
pub fn parse_display_date(s: &str) -> Option<NaiveDate> {
    // chrono accepts non-padded day and month with %d/%m when parsing
    NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y").ok()
}

/// Format a date in the stored `day/month/year` display form
pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DATE_DISPLAY_FORMAT).to_string()
}

/// Serde codec keeping the on-disk date as the display string
mod display_date {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_display_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_display_date(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid expense date: {}", s)))
    }
}

/// A single expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Unique identifier, assigned once at creation
    pub id: ExpenseId,

    /// Free-text label, required non-empty
    pub description: String,

    /// Where the expense happened, required non-empty
    pub location: String,

    /// Amount in US dollars
    pub us_amount: f64,

    /// Amount in Australian dollars
    pub aus_amount: f64,

    /// Expense date, stored as a `day/month/year` display string
    #[serde(with = "display_date")]
    pub date: NaiveDate,

    /// Receipt photo, if attached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_image: Option<ImageRef>,

    /// Bank-transfer screenshot, if attached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_image: Option<ImageRef>,

    /// When the record was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense with a fresh id
    pub fn new(
        description: impl Into<String>,
        location: impl Into<String>,
        us_amount: f64,
        aus_amount: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            description: description.into(),
            location: location.into(),
            us_amount,
            aus_amount,
            date,
            receipt_image: None,
            screenshot_image: None,
            created_at: Utc::now(),
        }
    }

    /// Validate invariants before the record reaches the store
    pub fn validate(&self) -> LedgerResult<()> {
        if self.description.trim().is_empty() {
            return Err(LedgerError::Validation("Description is required".into()));
        }
        if self.location.trim().is_empty() {
            return Err(LedgerError::Validation("Location is required".into()));
        }
        if !self.us_amount.is_finite() {
            return Err(LedgerError::Validation(
                "US amount must be a finite number".into(),
            ));
        }
        if !self.aus_amount.is_finite() {
            return Err(LedgerError::Validation(
                "AUS amount must be a finite number".into(),
            ));
        }
        Ok(())
    }

    /// The expense date in its stored display form
    pub fn display_date(&self) -> String {
        format_display_date(self.date)
    }
}
