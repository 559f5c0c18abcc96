//! Expense service
//!
//! Business logic for expense management: input validation, id assignment,
//! and materialization of transient image references before anything
//! reaches the store.

use chrono::NaiveDate;

use crate::error::LedgerResult;
use crate::models::{Expense, ExpenseId, ImageRef};
use crate::storage::Storage;

use super::images::ImageStore;

/// Input for creating a new expense
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    pub description: String,
    pub location: String,
    pub us_amount: f64,
    pub aus_amount: f64,
    pub date: NaiveDate,
    pub receipt_image: Option<ImageRef>,
    pub screenshot_image: Option<ImageRef>,
}

/// Input for editing an existing expense
///
/// `None` fields are left as they are. In particular, an image field that
/// is `None` keeps the stored reference: a stable path is never silently
/// reverted by an unrelated edit.
#[derive(Debug, Clone, Default)]
pub struct UpdateExpenseInput {
    pub description: Option<String>,
    pub location: Option<String>,
    pub us_amount: Option<f64>,
    pub aus_amount: Option<f64>,
    pub date: Option<NaiveDate>,
    pub receipt_image: Option<ImageRef>,
    pub screenshot_image: Option<ImageRef>,
}

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
    images: ImageStore,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(storage: &'a Storage) -> Self {
        let images = ImageStore::new(storage.paths().images_dir());
        Self { storage, images }
    }

    /// Create a new expense record.
    ///
    /// Validates the input, materializes any transient image references
    /// into app-owned files, and appends the record to the store.
    pub fn create(&self, input: CreateExpenseInput) -> LedgerResult<Expense> {
        let mut expense = Expense::new(
            input.description,
            input.location,
            input.us_amount,
            input.aus_amount,
            input.date,
        );
        expense.validate()?;

        expense.receipt_image = input
            .receipt_image
            .map(|image| self.materialize(image, expense.id, "receipt"));
        expense.screenshot_image = input
            .screenshot_image
            .map(|image| self.materialize(image, expense.id, "screenshot"));

        self.storage.expenses.append(expense.clone())?;
        Ok(expense)
    }

    /// List all expenses
    pub fn list(&self) -> LedgerResult<Vec<Expense>> {
        self.storage.expenses.load_all()
    }

    /// Find an expense by id
    pub fn find(&self, id: ExpenseId) -> LedgerResult<Option<Expense>> {
        self.storage.expenses.find(id)
    }

    /// Apply a partial edit to an existing expense.
    ///
    /// Returns the updated record, or `None` when no record matches the id
    /// (the collection is left unchanged; unknown ids are not an error).
    pub fn update(&self, id: ExpenseId, input: UpdateExpenseInput) -> LedgerResult<Option<Expense>> {
        let Some(mut expense) = self.storage.expenses.find(id)? else {
            return Ok(None);
        };

        if let Some(description) = input.description {
            expense.description = description;
        }
        if let Some(location) = input.location {
            expense.location = location;
        }
        if let Some(us_amount) = input.us_amount {
            expense.us_amount = us_amount;
        }
        if let Some(aus_amount) = input.aus_amount {
            expense.aus_amount = aus_amount;
        }
        if let Some(date) = input.date {
            expense.date = date;
        }
        if let Some(image) = input.receipt_image {
            expense.receipt_image = Some(self.materialize(image, expense.id, "receipt"));
        }
        if let Some(image) = input.screenshot_image {
            expense.screenshot_image = Some(self.materialize(image, expense.id, "screenshot"));
        }

        expense.validate()?;
        self.storage.expenses.update(&expense)?;
        Ok(Some(expense))
    }

    /// Delete an expense by id.
    ///
    /// Returns whether a record was removed; an unknown id is a no-op.
    pub fn delete(&self, id: ExpenseId) -> LedgerResult<bool> {
        self.storage.expenses.remove(id)
    }

    fn materialize(&self, image: ImageRef, id: ExpenseId, role: &str) -> ImageRef {
        let extension = image_extension(&image);
        let file_name = format!("{}_{}{}", role, id, extension);
        self.images.materialize(image, &file_name)
    }
}

/// File extension for a materialized copy, defaulting to `.jpg`
fn image_extension(image: &ImageRef) -> String {
    let raw = image.display_ref();
    match raw.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && !ext.contains('/') => format!(".{}", ext),
        _ => ".jpg".to_string(),
    }
}
