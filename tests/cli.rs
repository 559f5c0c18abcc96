//! End-to-end CLI tests
//!
//! Each test runs the binary against its own temporary data directory via
//! the RECEIPT_LEDGER_DATA_DIR override.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn receipts(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("receipts").unwrap();
    cmd.env("RECEIPT_LEDGER_DATA_DIR", data_dir.path());
    cmd
}

fn add_coffee(data_dir: &TempDir) -> String {
    let output = receipts(data_dir)
        .args([
            "add",
            "Coffee",
            "--location",
            "Sydney",
            "--us-amount",
            "4.50",
            "--aus-amount",
            "6.00",
            "--date",
            "3/5/2024",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    stdout
        .lines()
        .find_map(|line| line.trim().strip_prefix("ID:"))
        .expect("add output should include the new id")
        .trim()
        .to_string()
}

#[test]
fn add_then_list_shows_expense() {
    let data_dir = TempDir::new().unwrap();
    add_coffee(&data_dir);

    receipts(&data_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Coffee"))
        .stdout(predicate::str::contains("Sydney"))
        .stdout(predicate::str::contains("3/5/2024"));
}

#[test]
fn list_empty_store() {
    let data_dir = TempDir::new().unwrap();

    receipts(&data_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No expenses recorded."));
}

#[test]
fn add_rejects_invalid_amount() {
    let data_dir = TempDir::new().unwrap();

    receipts(&data_dir)
        .args([
            "add",
            "Coffee",
            "--location",
            "Sydney",
            "--us-amount",
            "not-a-number",
            "--aus-amount",
            "6.00",
            "--date",
            "3/5/2024",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid US amount"));

    receipts(&data_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No expenses recorded."));
}

#[test]
fn add_rejects_invalid_date() {
    let data_dir = TempDir::new().unwrap();

    receipts(&data_dir)
        .args([
            "add",
            "Coffee",
            "--location",
            "Sydney",
            "--us-amount",
            "4.50",
            "--aus-amount",
            "6.00",
            "--date",
            "2024-05-03",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn show_and_delete_by_id_prefix() {
    let data_dir = TempDir::new().unwrap();
    let id = add_coffee(&data_dir);
    let prefix = &id[..8];

    receipts(&data_dir)
        .args(["show", prefix])
        .assert()
        .success()
        .stdout(predicate::str::contains("Description: Coffee"));

    receipts(&data_dir)
        .args(["delete", prefix])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted expense"));

    receipts(&data_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No expenses recorded."));
}

#[test]
fn delete_unknown_id_reports_not_found() {
    let data_dir = TempDir::new().unwrap();
    add_coffee(&data_dir);

    receipts(&data_dir)
        .args(["delete", "ffffffff-ffff-ffff-ffff-ffffffffffff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expense not found"));

    receipts(&data_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Coffee"));
}

#[test]
fn edit_replaces_fields_and_keeps_others() {
    let data_dir = TempDir::new().unwrap();
    let id = add_coffee(&data_dir);

    receipts(&data_dir)
        .args(["edit", &id[..8], "--description", "Espresso"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Description: Espresso"))
        .stdout(predicate::str::contains("Location:    Sydney"));
}

#[test]
fn export_empty_store_produces_no_archive() {
    let data_dir = TempDir::new().unwrap();

    receipts(&data_dir)
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::contains("No expenses to export."));

    let exports = data_dir.path().join("exports");
    let produced = fs::read_dir(&exports)
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(produced, 0);
}

#[test]
fn export_produces_archive_with_image() {
    let data_dir = TempDir::new().unwrap();

    let receipt = data_dir.path().join("capture.jpg");
    fs::write(&receipt, b"jpeg bytes").unwrap();

    receipts(&data_dir)
        .args([
            "add",
            "Coffee",
            "--location",
            "Sydney",
            "--us-amount",
            "4.50",
            "--aus-amount",
            "6.00",
            "--date",
            "3/5/2024",
            "--receipt",
            receipt.to_str().unwrap(),
        ])
        .assert()
        .success();

    receipts(&data_dir)
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::contains("Export written to"));

    let exports = data_dir.path().join("exports");
    let archives: Vec<_> = fs::read_dir(&exports)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().map(|e| e == "zip").unwrap_or(false))
        .collect();
    assert_eq!(archives.len(), 1);

    // No staging tree left behind
    let dirs: Vec<_> = fs::read_dir(&exports)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.is_dir())
        .collect();
    assert!(dirs.is_empty());
}

#[test]
fn corrupt_store_warns_on_list() {
    let data_dir = TempDir::new().unwrap();

    let store = data_dir.path().join("data");
    fs::create_dir_all(&store).unwrap();
    fs::write(store.join("expenses.json"), "{{{ not json").unwrap();

    receipts(&data_dir)
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("corrupt"))
        .stdout(predicate::str::contains("No expenses recorded."));
}
