//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing:
//! - Test environment setup with temporary directories
//! - Command builders with the data directory and role pre-set
//! - Shortcuts for stocking books and making loans

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test environment with isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the shelf data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    ///
    /// The data directory path is not created; the first command does that.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("shelf-data");

        Self { temp_dir, data_dir }
    }

    /// Get a bare command builder without pre-configured flags.
    ///
    /// Ambient `SHELF_*` variables are cleared so the host environment
    /// cannot leak into the test.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("shelf").expect("Failed to find shelf binary");
        for var in [
            "SHELF_DATA_DIR",
            "SHELF_ROLE",
            "SHELF_BUSY_TIMEOUT",
            "SHELF_DISABLE_AUTOINIT",
            "SHELF_OUTPUT_FORMAT",
            "SHELF_BORROWING_CAP",
            "SHELF_DEFAULT_COPIES",
            "SHELF_OVERDUE_AFTER_DAYS",
            "SHELF_SWEEP_INTERVAL_SECONDS",
            "SHELF_MAXIMUM_LOCK_WAIT_SECONDS",
            "SHELF_LOG_MODE",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Get a command builder with the data directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// A command run as a librarian.
    pub fn librarian(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("--role").arg("librarian");
        cmd
    }

    /// A command run as a senior librarian.
    pub fn senior(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("--role").arg("senior-librarian");
        cmd
    }

    /// Path to the database file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("shelf.db")
    }

    /// Data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Add `copies` of `title`.
    ///
    /// # Panics
    /// Panics if the add-book command fails.
    pub fn add_book(&self, title: &str, copies: u32) {
        self.senior()
            .args(["add-book", title, "--author", "Test Author", "--copies"])
            .arg(copies.to_string())
            .assert()
            .success();
    }

    /// Loan `title` to `borrower` and return the reservation id.
    ///
    /// # Panics
    /// Panics if the loan command fails or doesn't print an id.
    pub fn loan(&self, borrower: &str, title: &str) -> i64 {
        let output = self
            .librarian()
            .args(["loan", borrower, title])
            .output()
            .expect("Failed to run loan command");

        assert!(
            output.status.success(),
            "Loan failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        let stdout = String::from_utf8(output.stdout).expect("Invalid UTF-8 in output");
        stdout
            .trim()
            .parse()
            .expect("Output is not a reservation id")
    }

    /// Run `list <subject> --format json` and parse the result.
    pub fn list_json(&self, subject: &str) -> Vec<serde_json::Value> {
        let output = self
            .command()
            .args(["list", subject, "--format", "json"])
            .output()
            .expect("Failed to run list command");
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).expect("list output is not JSON")
    }

    /// Returns `(available, loaned)` for `title` read from `list books`.
    pub fn counters(&self, title: &str) -> (u64, u64) {
        let books = self.list_json("books");
        let book = books
            .iter()
            .find(|b| b["title"] == title)
            .unwrap_or_else(|| panic!("'{title}' not listed"));
        (
            book["available"].as_u64().unwrap(),
            book["loaned"].as_u64().unwrap(),
        )
    }
}
