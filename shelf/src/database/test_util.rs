//! Shared test utilities for database unit tests.

use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};
use crate::{NewBook, Title};

/// Creates a temporary test database that will be cleaned up automatically.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Keep the directory alive for the lifetime of the test process
    std::mem::forget(dir);

    db
}

/// A single-copy "Dune".
///
/// # Panics
///
/// Never in practice; the title is a valid literal.
#[must_use]
pub fn dune() -> NewBook {
    NewBook::new(Title::new("Dune").unwrap(), "Frank Herbert")
}
