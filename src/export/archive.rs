//! Export pipeline
//!
//! Transforms the full expense collection plus its images into a single
//! portable ZIP archive: a staging tree is assembled (`expenses.csv`,
//! `README.txt`, `images/`), compressed with the staging root as the
//! archive root, and then deleted. The archive is the only durable output.
//!
//! Images are copied by value into the archive because it must be portable
//! to a context without access to the app's private storage.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::config::paths::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, ImageRef};
use crate::storage::ExpenseRepository;

use super::csv::{write_summary_csv, SummaryRow};

/// Result of running the export pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Archive produced at the given path
    Archive(PathBuf),
    /// The collection was empty; no archive was produced
    NothingToExport,
}

/// Assembles and compresses the export archive
pub struct ExportPipeline {
    paths: LedgerPaths,
}

impl ExportPipeline {
    /// Create an export pipeline over the app paths
    pub fn new(paths: LedgerPaths) -> Self {
        Self { paths }
    }

    /// Run the full pipeline.
    ///
    /// On any failure the staging tree is removed and no partial archive
    /// is left behind.
    pub fn run(&self) -> LedgerResult<ExportOutcome> {
        let repository = ExpenseRepository::new(self.paths.expenses_file());
        let expenses = repository.load_all()?;
        if expenses.is_empty() {
            return Ok(ExportOutcome::NothingToExport);
        }

        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let staging_dir = self.paths.exports_dir().join(format!("staging_{}", timestamp));
        let archive_path = self
            .paths
            .exports_dir()
            .join(format!("expenses_export_{}.zip", timestamp));

        let result = self.build_archive(&expenses, &staging_dir, &archive_path);

        // The staging tree is ephemeral either way
        let _ = fs::remove_dir_all(&staging_dir);

        if result.is_err() {
            let _ = fs::remove_file(&archive_path);
        }

        result.map(|()| ExportOutcome::Archive(archive_path))
    }

    fn build_archive(
        &self,
        expenses: &[Expense],
        staging_dir: &Path,
        archive_path: &Path,
    ) -> LedgerResult<()> {
        let images_dir = staging_dir.join("images");
        if staging_dir.exists() {
            fs::remove_dir_all(staging_dir)
                .map_err(|e| LedgerError::Export(format!("Failed to reset staging tree: {}", e)))?;
        }
        fs::create_dir_all(&images_dir)
            .map_err(|e| LedgerError::Export(format!("Failed to create staging tree: {}", e)))?;

        let mut rows = Vec::with_capacity(expenses.len());
        for expense in expenses {
            let receipt_ref =
                copy_image_into_staging(expense.receipt_image.as_ref(), &images_dir, expense, "receipt");
            let screenshot_ref = copy_image_into_staging(
                expense.screenshot_image.as_ref(),
                &images_dir,
                expense,
                "screenshot",
            );
            rows.push(SummaryRow {
                expense: expense.clone(),
                receipt_ref,
                screenshot_ref,
            });
        }

        let csv_file = File::create(staging_dir.join("expenses.csv"))
            .map_err(|e| LedgerError::Export(format!("Failed to create expenses.csv: {}", e)))?;
        write_summary_csv(csv_file, &rows)?;

        write_readme(&staging_dir.join("README.txt"))?;

        package_staging_as_zip(staging_dir, archive_path)?;
        Ok(())
    }
}

/// Copy one record image into the staging `images/` directory.
///
/// Only stable, still-existing source files are copied; a missing source,
/// an absent reference, or a still-transient reference leaves the cell
/// blank. Omission is not a fatal error.
fn copy_image_into_staging(
    image: Option<&ImageRef>,
    images_dir: &Path,
    expense: &Expense,
    role: &str,
) -> Option<String> {
    let source = image?.as_stable_path()?;
    if !source.exists() {
        return None;
    }

    let extension = source
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_else(|| ".jpg".to_string());

    let date_tag = Local::now().format("%Y%m%d").to_string();
    let file_name = format!(
        "{}_{}_{}{}",
        sanitize_filename(&expense.description),
        role,
        date_tag,
        extension
    );

    fs::copy(source, images_dir.join(&file_name)).ok()?;
    Some(format!("images/{}", file_name))
}

/// Sanitize a description for use in a filename.
///
/// Each character of `\ / : * ? " < > |` becomes an underscore, each run
/// of whitespace collapses to a single underscore, and the result is
/// truncated to 50 characters.
pub fn sanitize_filename(input: &str) -> String {
    const INVALID: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

    let mut sanitized = String::with_capacity(input.len());
    let mut in_whitespace = false;
    for c in input.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                sanitized.push('_');
            }
            in_whitespace = true;
        } else {
            in_whitespace = false;
            sanitized.push(if INVALID.contains(&c) { '_' } else { c });
        }
    }

    sanitized.chars().take(50).collect()
}

/// Write the plain-text instructions file describing the archive
fn write_readme(path: &Path) -> LedgerResult<()> {
    let mut file = File::create(path)
        .map_err(|e| LedgerError::Export(format!("Failed to create README.txt: {}", e)))?;

    writeln!(file, "Expense Tracker Export")?;
    writeln!(file, "======================")?;
    writeln!(file)?;
    writeln!(file, "This ZIP file contains:")?;
    writeln!(file, "- expenses.csv: A CSV file containing all expense data")?;
    writeln!(
        file,
        "- images/: A directory containing all receipt and screenshot images"
    )?;
    writeln!(file)?;
    writeln!(
        file,
        "The CSV file contains references to the image files in the 'images' directory."
    )?;
    writeln!(
        file,
        "You can open the CSV file with any spreadsheet software like Microsoft Excel or Google Sheets."
    )?;
    writeln!(file)?;
    writeln!(
        file,
        "Generated on: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;

    Ok(())
}

/// Compress the staging tree into a single archive, preserving relative
/// subpaths with the staging root as the archive root.
fn package_staging_as_zip(staging_dir: &Path, archive_path: &Path) -> LedgerResult<()> {
    use std::io::Read;
    use zip::write::SimpleFileOptions;

    let file = File::create(archive_path)
        .map_err(|e| LedgerError::Export(format!("Failed to create archive: {}", e)))?;
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut entries = Vec::new();
    collect_entries(staging_dir, staging_dir, &mut entries)?;
    entries.sort();

    for relative_path in &entries {
        let full_path = staging_dir.join(relative_path);
        if full_path.is_dir() {
            zip.add_directory(format!("{}/", relative_path), options)?;
        } else {
            zip.start_file(relative_path.clone(), options)?;
            let mut f = File::open(&full_path)?;
            let mut buf = Vec::new();
            f.read_to_end(&mut buf)?;
            zip.write_all(&buf)?;
        }
    }

    zip.finish()?;
    Ok(())
}

/// Collect relative entry paths under `dir`, depth first
fn collect_entries(root: &Path, dir: &Path, entries: &mut Vec<String>) -> LedgerResult<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let relative = path
            .strip_prefix(root)
            .map_err(|e| LedgerError::Export(e.to_string()))?
            .to_string_lossy()
            .replace('\\', "/");
        entries.push(relative);
        if path.is_dir() {
            collect_entries(root, &path, entries)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageRef;
    use crate::storage::Storage;
    use chrono::NaiveDate;
    use std::io::Read;
    use tempfile::TempDir;

    fn create_test_env() -> (TempDir, LedgerPaths) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        (temp_dir, paths)
    }

    fn sample_expense(description: &str) -> Expense {
        Expense::new(
            description,
            "Sydney",
            4.5,
            6.0,
            NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
        )
    }

    fn archive_entries(archive_path: &Path) -> Vec<String> {
        let file = File::open(archive_path).unwrap();
        let mut zip = zip::ZipArchive::new(file).unwrap();
        (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect()
    }

    fn read_archive_file(archive_path: &Path, name: &str) -> String {
        let file = File::open(archive_path).unwrap();
        let mut zip = zip::ZipArchive::new(file).unwrap();
        let mut entry = zip.by_name(name).unwrap();
        let mut contents = String::new();
        entry.read_to_string(&mut contents).unwrap();
        contents
    }

    #[test]
    fn test_empty_collection_produces_no_archive() {
        let (_temp_dir, paths) = create_test_env();

        let outcome = ExportPipeline::new(paths.clone()).run().unwrap();
        assert_eq!(outcome, ExportOutcome::NothingToExport);

        let produced: Vec<_> = fs::read_dir(paths.exports_dir()).unwrap().collect();
        assert!(produced.is_empty());
    }

    #[test]
    fn test_export_bundles_rows_and_images() {
        let (temp_dir, paths) = create_test_env();
        let storage = Storage::new(paths.clone()).unwrap();

        let receipt_source = temp_dir.path().join("receipt_source.jpg");
        fs::write(&receipt_source, b"jpeg bytes").unwrap();

        let mut with_image = sample_expense("Coffee");
        with_image.receipt_image = Some(ImageRef::stable(&receipt_source));
        storage.expenses.append(with_image).unwrap();
        storage.expenses.append(sample_expense("Taxi")).unwrap();

        let outcome = ExportPipeline::new(paths.clone()).run().unwrap();
        let ExportOutcome::Archive(archive_path) = outcome else {
            panic!("expected an archive");
        };
        assert!(archive_path.exists());

        let entries = archive_entries(&archive_path);
        assert!(entries.contains(&"expenses.csv".to_string()));
        assert!(entries.contains(&"README.txt".to_string()));
        // Exactly one image copied: the one whose source exists
        let image_entries: Vec<_> = entries
            .iter()
            .filter(|e| e.starts_with("images/") && !e.ends_with('/'))
            .collect();
        assert_eq!(image_entries.len(), 1);
        assert!(image_entries[0].contains("Coffee_receipt_"));

        // One CSV row per record
        let csv = read_archive_file(&archive_path, "expenses.csv");
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn test_missing_image_source_leaves_blank_cell() {
        let (_temp_dir, paths) = create_test_env();
        let storage = Storage::new(paths.clone()).unwrap();

        let mut expense = sample_expense("Coffee");
        expense.receipt_image = Some(ImageRef::stable("/nonexistent/receipt.jpg"));
        storage.expenses.append(expense).unwrap();

        let outcome = ExportPipeline::new(paths.clone()).run().unwrap();
        let ExportOutcome::Archive(archive_path) = outcome else {
            panic!("expected an archive");
        };

        let csv = read_archive_file(&archive_path, "expenses.csv");
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[6], "");
    }

    #[test]
    fn test_staging_tree_is_deleted() {
        let (_temp_dir, paths) = create_test_env();
        let storage = Storage::new(paths.clone()).unwrap();
        storage.expenses.append(sample_expense("Coffee")).unwrap();

        ExportPipeline::new(paths.clone()).run().unwrap();

        let leftovers: Vec<_> = fs::read_dir(paths.exports_dir())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.is_dir())
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_readme_describes_contents() {
        let (_temp_dir, paths) = create_test_env();
        let storage = Storage::new(paths.clone()).unwrap();
        storage.expenses.append(sample_expense("Coffee")).unwrap();

        let ExportOutcome::Archive(archive_path) =
            ExportPipeline::new(paths.clone()).run().unwrap()
        else {
            panic!("expected an archive");
        };

        let readme = read_archive_file(&archive_path, "README.txt");
        assert!(readme.contains("expenses.csv"));
        assert!(readme.contains("images/"));
        assert!(readme.contains("Generated on:"));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Coffee shop"), "Coffee_shop");
        assert_eq!(sanitize_filename("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize_filename("tabs\t\tand  spaces"), "tabs_and_spaces");
        assert_eq!(sanitize_filename(r#"what?"why"<ok>|"#), "what__why__ok__");

        let long = "x".repeat(80);
        assert_eq!(sanitize_filename(&long).chars().count(), 50);
    }
}
