//! `SQLite` storage for books and reservations.
//!
//! [`Database`] owns one connection. The [`InventoryStore`] and
//! [`ReservationStore`] traits are implemented directly on
//! [`rusqlite::Connection`], so the same SQL runs against a plain
//! connection and against the open transaction handed out by
//! [`Store::transaction`].
//!
//! Each thread that loans or returns books should open its own
//! `Database` on the shared file; `SQLite` serializes the writers.
//!
//! # Examples
//!
//! ```no_run
//! use shelf::database::{Database, DatabaseConfig};
//! use shelf::{LoanKey, LoanPolicy, NewBook, Title};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/shelf.db")).unwrap();
//! shelf::add_book(&mut db, NewBook::new(Title::new("Dune").unwrap(), "Frank Herbert")).unwrap();
//!
//! let key = LoanKey::parse("alice", "Dune").unwrap();
//! let reservation = shelf::loan(&mut db, &LoanPolicy::default(), key).unwrap();
//! println!("loaned at {:?}", reservation.created_at());
//! ```
//!
//! [`InventoryStore`]: crate::store::InventoryStore
//! [`ReservationStore`]: crate::store::ReservationStore
//! [`Store::transaction`]: crate::store::Store::transaction

// Allow timestamp casts - we're converting between i64 (SQLite) and u64 (SystemTime)
#![allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]

use std::time::{Duration, SystemTime};

use crate::error::{Error, Result};

mod config;
mod connection;
mod inventory;
pub mod migrations;
mod reservations;
mod schema;
mod transaction;

#[cfg(test)]
pub(crate) mod test_util;

// Re-export public API
pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATA_DIR_ENV,
};
pub use connection::Database;

// Re-export migration functions for advanced use cases
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};

/// File name of the database inside the data directory.
pub const DATABASE_FILE: &str = "shelf.db";

/// Converts a `SystemTime` to Unix epoch seconds for database storage.
///
/// # Errors
///
/// Returns an error if the time is before the Unix epoch.
pub(crate) fn systemtime_to_unix_secs(time: SystemTime) -> Result<i64> {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| Error::Validation {
            field: "timestamp".into(),
            message: format!("Invalid timestamp: {e}"),
        })
        .map(|d| d.as_secs() as i64)
}

/// Converts Unix epoch seconds from the database to a `SystemTime`.
pub(crate) fn unix_secs_to_systemtime(secs: i64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs.max(0) as u64)
}
