//! Scoped read and write access to a [`Database`].

use rusqlite::TransactionBehavior;

use crate::error::Result;
use crate::store::{LibraryOps, Store};

use super::connection::Database;

impl Store for Database {
    fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn LibraryOps) -> Result<T>,
    {
        let seconds = self.config.busy_timeout_secs();
        f(&self.conn).map_err(|e| e.into_lock_timeout(seconds))
    }

    /// Runs `f` inside an IMMEDIATE transaction.
    ///
    /// The write lock is taken up front, so two writers never both pass
    /// their checks against the same snapshot. Returning early drops the
    /// transaction, which rolls it back.
    fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn LibraryOps) -> Result<T>,
    {
        let seconds = self.config.busy_timeout_secs();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| crate::Error::from(e).into_lock_timeout(seconds))?;

        let value = f(&*tx).map_err(|e| e.into_lock_timeout(seconds))?;

        tx.commit()
            .map_err(|e| crate::Error::from(e).into_lock_timeout(seconds))?;
        Ok(value)
    }
}
