//! Common test utilities for integration tests.

use std::path::PathBuf;

use shelf::database::{Database, DatabaseConfig};
use shelf::{Book, LoanKey, NewBook, Store, Title};
use tempfile::TempDir;

/// A database file in its own temporary directory.
///
/// The directory lives as long as the fixture.
#[allow(dead_code)]
pub struct TestLibrary {
    pub dir: TempDir,
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestLibrary {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelf.db");
        // Create the schema up front so later opens never race on it
        Database::open(DatabaseConfig::new(&path)).unwrap();
        Self { dir, path }
    }

    /// Opens another connection to the shared file.
    pub fn open(&self) -> Database {
        Database::open(DatabaseConfig::new(&self.path)).unwrap()
    }

    /// Adds `copies` of `title`.
    pub fn stock(&self, title: &str, copies: u32) -> Book {
        let mut db = self.open();
        shelf::add_book(&mut db, book(title).with_copies(copies)).unwrap()
    }
}

#[allow(dead_code)]
pub fn book(title: &str) -> NewBook {
    NewBook::new(Title::new(title).unwrap(), "Test Author")
}

#[allow(dead_code)]
pub fn key(borrower: &str, title: &str) -> LoanKey {
    LoanKey::parse(borrower, title).unwrap()
}

/// Returns `(available, loaned, reservation rows)` for `title`.
#[allow(dead_code)]
pub fn counters<S: Store>(store: &S, title: &str) -> (u32, u32, u32) {
    let title = Title::new(title).unwrap();
    store
        .read(|ops| {
            let availability = ops.availability(&title)?;
            Ok((
                availability.available,
                availability.loaned,
                ops.count_for_title(&title)?,
            ))
        })
        .unwrap()
}
