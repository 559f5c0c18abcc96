//! Expense repository for JSON storage
//!
//! Manages loading and saving the full expense collection to expenses.json.
//! The store is the single source of truth: every mutation rewrites the
//! whole document atomically, so a load immediately after any successful
//! operation reflects it.
//!
//! Two un-versioned legacy document shapes (bare JSON arrays) predate the
//! versioned envelope and are migrated on load:
//!
//! - v1: single `amount` field, no `location`
//! - v2: `location` plus dual-currency amounts, image fields as bare strings
//!   (the second amount may appear under the misspelled key `ausAumount`)

use std::path::PathBuf;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::models::expense::parse_display_date;
use crate::models::{Expense, ExpenseId, ImageRef};

use super::file_io::{read_value, write_json_atomic};

/// Current backing document schema version
pub const SCHEMA_VERSION: u32 = 3;

/// Versioned backing document
#[derive(Debug, Serialize, Deserialize)]
struct ExpenseDocument {
    schema_version: u32,
    expenses: Vec<Expense>,
}

/// A record in either of the legacy un-versioned array formats
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyExpense {
    id: String,
    description: String,
    #[serde(default)]
    location: String,
    /// v1 single amount
    #[serde(default)]
    amount: Option<f64>,
    /// v2 US amount
    #[serde(default)]
    us_amount: Option<f64>,
    /// v2 AUS amount, accepting the misspelled key the original data carried
    #[serde(default, alias = "ausAumount")]
    aus_amount: Option<f64>,
    date: String,
    #[serde(default)]
    receipt_image_path: Option<String>,
    #[serde(default)]
    screenshot_image_path: Option<String>,
}

impl LegacyExpense {
    /// Migrate a legacy record into the current shape.
    ///
    /// v1 records map their single `amount` to `usAmount` with a zero
    /// `ausAmount` and an empty location. Legacy image strings are
    /// classified as transient or stable by URI scheme.
    fn migrate(self) -> Result<Expense, String> {
        let date = parse_display_date(&self.date)
            .ok_or_else(|| format!("unparseable legacy date: {}", self.date))?;

        let (us_amount, aus_amount) = match (self.us_amount, self.amount) {
            (Some(us), _) => (us, self.aus_amount.unwrap_or(0.0)),
            (None, Some(amount)) => (amount, 0.0),
            (None, None) => return Err(format!("legacy record {} has no amount", self.id)),
        };

        // Legacy ids are UUID strings; anything else gets a fresh id
        let id = ExpenseId::from_str(&self.id).unwrap_or_default();

        Ok(Expense {
            id,
            description: self.description,
            location: self.location,
            us_amount,
            aus_amount,
            date,
            receipt_image: self.receipt_image_path.as_deref().and_then(ImageRef::from_legacy),
            screenshot_image: self
                .screenshot_image_path
                .as_deref()
                .and_then(ImageRef::from_legacy),
            created_at: Utc::now(),
        })
    }
}

/// Repository for expense persistence
///
/// Stateless over its backing path: each operation reads and/or rewrites
/// the whole document. At most one writer (the foreground flow) is active
/// at a time, so no locking beyond the atomic rewrite is needed.
pub struct ExpenseRepository {
    path: PathBuf,
}

impl ExpenseRepository {
    /// Create a repository over the given backing file path
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path to the backing document
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the full collection.
    ///
    /// An absent file is an empty collection, not an error. A malformed
    /// file surfaces as `LedgerError::Corrupt` so the caller can warn the
    /// user instead of silently discarding prior data.
    pub fn load_all(&self) -> LedgerResult<Vec<Expense>> {
        let Some(value) = read_value(&self.path)? else {
            return Ok(Vec::new());
        };

        match value {
            serde_json::Value::Array(items) => {
                // Legacy un-versioned document
                let mut expenses = Vec::with_capacity(items.len());
                for item in items {
                    let legacy: LegacyExpense =
                        serde_json::from_value(item).map_err(|e| self.corrupt(e.to_string()))?;
                    let expense = legacy.migrate().map_err(|e| self.corrupt(e))?;
                    expenses.push(expense);
                }
                Ok(expenses)
            }
            serde_json::Value::Object(ref map) => {
                let version = map
                    .get("schema_version")
                    .and_then(serde_json::Value::as_u64)
                    .ok_or_else(|| self.corrupt("missing schema_version".into()))?
                    as u32;

                if version > SCHEMA_VERSION {
                    return Err(LedgerError::UnsupportedSchema {
                        found: version,
                        supported: SCHEMA_VERSION,
                    });
                }

                let document: ExpenseDocument =
                    serde_json::from_value(value).map_err(|e| self.corrupt(e.to_string()))?;
                Ok(document.expenses)
            }
            _ => Err(self.corrupt("expected a JSON array or object".into())),
        }
    }

    /// Overwrite the backing document with the given collection
    pub fn save_all(&self, expenses: &[Expense]) -> LedgerResult<()> {
        let document = ExpenseDocument {
            schema_version: SCHEMA_VERSION,
            expenses: expenses.to_vec(),
        };
        write_json_atomic(&self.path, &document)
    }

    /// Append a record to the collection
    pub fn append(&self, expense: Expense) -> LedgerResult<()> {
        let mut expenses = self.load_all()?;
        expenses.push(expense);
        self.save_all(&expenses)
    }

    /// Replace the entry with a matching id in place.
    ///
    /// Returns `false` and leaves the collection unchanged if no entry
    /// matches; unknown ids are a no-op, not an error and not an insert.
    pub fn update(&self, expense: &Expense) -> LedgerResult<bool> {
        let mut expenses = self.load_all()?;

        let Some(existing) = expenses.iter_mut().find(|e| e.id == expense.id) else {
            return Ok(false);
        };

        *existing = expense.clone();
        self.save_all(&expenses)?;
        Ok(true)
    }

    /// Remove every entry with the matching id.
    ///
    /// Tolerant of duplicate ids even though ids are expected unique.
    /// Returns whether anything was removed; an unknown id is a no-op.
    pub fn remove(&self, id: ExpenseId) -> LedgerResult<bool> {
        let mut expenses = self.load_all()?;
        let before = expenses.len();
        expenses.retain(|e| e.id != id);

        if expenses.len() == before {
            return Ok(false);
        }

        self.save_all(&expenses)?;
        Ok(true)
    }

    /// Find a record by id
    pub fn find(&self, id: ExpenseId) -> LedgerResult<Option<Expense>> {
        Ok(self.load_all()?.into_iter().find(|e| e.id == id))
    }

    fn corrupt(&self, detail: String) -> LedgerError {
        LedgerError::Corrupt {
            path: self.path.clone(),
            detail,
        }
    }
}
