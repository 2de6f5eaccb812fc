//! Storage traits the engines are written against.
//!
//! [`InventoryStore`] and [`ReservationStore`] describe the two tables.
//! [`Store`] hands out scoped access to both: a read-only view, or a
//! transaction that commits when the closure returns `Ok` and rolls back
//! on every `Err`.
//!
//! Two implementations ship with the crate: the `SQLite`-backed
//! [`Database`](crate::Database) and the in-process
//! [`MemoryStore`](crate::MemoryStore).

use std::time::{Duration, SystemTime};

use crate::book::{Availability, Book, NewBook, Title};
use crate::error::Result;
use crate::reservation::{Borrower, LoanKey, Reservation};

/// Access to book records and their copy counters.
pub trait InventoryStore {
    /// Adds a book with `copies` available and none loaned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BookAlreadyExists`](crate::Error::BookAlreadyExists)
    /// if the title is already catalogued.
    fn insert_book(&self, book: &NewBook, created_at: SystemTime) -> Result<Book>;

    /// Looks up a book by title.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get_book(&self, title: &Title) -> Result<Option<Book>>;

    /// All books, ordered by title.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_books(&self) -> Result<Vec<Book>>;

    /// Current counters for `title`; zeros when the title is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn availability(&self, title: &Title) -> Result<Availability> {
        Ok(self
            .get_book(title)?
            .map(|book| book.availability())
            .unwrap_or_default())
    }

    /// Moves one copy from available to loaned.
    ///
    /// Returns `false` without changing anything when no copy is available
    /// or the title is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn decrement_available(&self, title: &Title) -> Result<bool>;

    /// Moves one copy from loaned back to available.
    ///
    /// Returns `false` without changing anything when no copy is on loan
    /// or the title is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn increment_available(&self, title: &Title) -> Result<bool>;
}

/// Which reservations to list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationFilter {
    /// Only reservations held by this borrower.
    pub borrower: Option<Borrower>,
    /// Only reservations of this title.
    pub title: Option<Title>,
}

impl ReservationFilter {
    /// Matches every reservation.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts to one borrower.
    #[must_use]
    pub fn borrower(mut self, borrower: Borrower) -> Self {
        self.borrower = Some(borrower);
        self
    }

    /// Restricts to one title.
    #[must_use]
    pub fn title(mut self, title: Title) -> Self {
        self.title = Some(title);
        self
    }

    /// Whether `reservation` passes this filter.
    #[must_use]
    pub fn matches(&self, reservation: &Reservation) -> bool {
        self.borrower
            .as_ref()
            .map_or(true, |b| reservation.borrower() == b)
            && self.title.as_ref().map_or(true, |t| reservation.title() == t)
    }
}

/// Access to active reservation rows.
pub trait ReservationStore {
    /// Number of reservations held by `borrower`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn count_active(&self, borrower: &Borrower) -> Result<u32>;

    /// Number of reservations of `title`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn count_for_title(&self, title: &Title) -> Result<u32>;

    /// Records a new reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn create_reservation(&self, key: &LoanKey, created_at: SystemTime) -> Result<Reservation>;

    /// Removes the oldest reservation matching `key`.
    ///
    /// Returns `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn delete_reservation(&self, key: &LoanKey) -> Result<bool>;

    /// Reservations passing `filter`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_reservations(&self, filter: &ReservationFilter) -> Result<Vec<Reservation>>;

    /// Reservations created strictly before `now - threshold`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_overdue(&self, threshold: Duration, now: SystemTime) -> Result<Vec<Reservation>>;
}

/// Both tables behind one handle.
pub trait LibraryOps: InventoryStore + ReservationStore {}

impl<T: InventoryStore + ReservationStore + ?Sized> LibraryOps for T {}

/// A store the engines can run against.
pub trait Store {
    /// Runs `f` against a read-only view.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by `f` or raised by the store.
    fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn LibraryOps) -> Result<T>;

    /// Runs `f` inside a write transaction.
    ///
    /// All changes made by `f` become visible together when it returns
    /// `Ok`; none of them do when it returns `Err`.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by `f`. Returns
    /// [`Error::LockTimeout`](crate::Error::LockTimeout) if the write lock
    /// could not be taken in time.
    fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn LibraryOps) -> Result<T>;
}

/// Shorthand for a day, the unit overdue thresholds are configured in.
pub const DAY: Duration = Duration::from_secs(86_400);
