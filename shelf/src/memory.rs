//! An in-process store with the same semantics as the `SQLite` one.
//!
//! Handles are cheap to clone and share one state. A transaction works on
//! a private copy of the state and publishes it only on `Ok`, while holding
//! the state's mutex, so transactions from different threads serialize the
//! same way `SQLite` writers do.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

use crate::book::{Book, NewBook, Title};
use crate::error::{Error, Result};
use crate::reservation::{Borrower, LoanKey, Reservation};
use crate::store::{InventoryStore, LibraryOps, ReservationFilter, ReservationStore, Store};

#[derive(Debug, Clone, Default)]
struct State {
    books: BTreeMap<Title, Book>,
    reservations: Vec<Reservation>,
    next_id: i64,
}

/// A shared, mutex-guarded store kept entirely in memory.
///
/// # Examples
///
/// ```
/// use shelf::{LoanKey, LoanPolicy, MemoryStore, NewBook, Title};
///
/// let mut store = MemoryStore::new();
/// shelf::add_book(&mut store, NewBook::new(Title::new("Dune").unwrap(), "Frank Herbert")).unwrap();
///
/// let key = LoanKey::parse("alice", "Dune").unwrap();
/// shelf::loan(&mut store, &LoanPolicy::default(), key).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| Error::DatabaseCorruption {
            details: "in-memory store lock poisoned".into(),
        })
    }
}

impl Store for MemoryStore {
    fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn LibraryOps) -> Result<T>,
    {
        let snapshot = self.lock()?.clone();
        f(&MemoryTx::new(snapshot))
    }

    fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn LibraryOps) -> Result<T>,
    {
        let mut guard = self.lock()?;
        let tx = MemoryTx::new(guard.clone());
        let value = f(&tx)?;
        *guard = tx.state.into_inner();
        Ok(value)
    }
}

/// Working copy handed to closures.
struct MemoryTx {
    state: RefCell<State>,
}

impl MemoryTx {
    fn new(state: State) -> Self {
        Self {
            state: RefCell::new(state),
        }
    }
}

impl InventoryStore for MemoryTx {
    fn insert_book(&self, book: &NewBook, created_at: SystemTime) -> Result<Book> {
        let mut state = self.state.borrow_mut();
        if state.books.contains_key(&book.title) {
            return Err(Error::BookAlreadyExists {
                title: book.title.to_string(),
            });
        }

        let record = Book {
            title: book.title.clone(),
            author: book.author.clone(),
            num_available: book.copies,
            num_loaned: 0,
            added_by: book.added_by.clone(),
            created_at,
        };
        state.books.insert(book.title.clone(), record.clone());
        Ok(record)
    }

    fn get_book(&self, title: &Title) -> Result<Option<Book>> {
        Ok(self.state.borrow().books.get(title).cloned())
    }

    fn list_books(&self) -> Result<Vec<Book>> {
        Ok(self.state.borrow().books.values().cloned().collect())
    }

    fn decrement_available(&self, title: &Title) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        match state.books.get_mut(title) {
            Some(book) if book.num_available > 0 => {
                book.num_available -= 1;
                book.num_loaned += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn increment_available(&self, title: &Title) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        match state.books.get_mut(title) {
            Some(book) if book.num_loaned > 0 => {
                book.num_loaned -= 1;
                book.num_available += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

fn count_matching(state: &State, filter: &ReservationFilter) -> u32 {
    let n = state
        .reservations
        .iter()
        .filter(|r| filter.matches(r))
        .count();
    u32::try_from(n).unwrap_or(u32::MAX)
}

impl ReservationStore for MemoryTx {
    fn count_active(&self, borrower: &Borrower) -> Result<u32> {
        let filter = ReservationFilter::all().borrower(borrower.clone());
        Ok(count_matching(&self.state.borrow(), &filter))
    }

    fn count_for_title(&self, title: &Title) -> Result<u32> {
        let filter = ReservationFilter::all().title(title.clone());
        Ok(count_matching(&self.state.borrow(), &filter))
    }

    fn create_reservation(&self, key: &LoanKey, created_at: SystemTime) -> Result<Reservation> {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let reservation = Reservation::new(state.next_id, key.clone(), created_at);
        state.reservations.push(reservation.clone());
        Ok(reservation)
    }

    fn delete_reservation(&self, key: &LoanKey) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        let oldest = state
            .reservations
            .iter()
            .enumerate()
            .filter(|(_, r)| r.key() == key)
            .min_by_key(|(_, r)| (r.created_at(), r.id()))
            .map(|(index, _)| index);

        match oldest {
            Some(index) => {
                state.reservations.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn list_reservations(&self, filter: &ReservationFilter) -> Result<Vec<Reservation>> {
        let mut matching: Vec<Reservation> = self
            .state
            .borrow()
            .reservations
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matching.sort_by_key(|r| (r.created_at(), r.id()));
        Ok(matching)
    }

    fn list_overdue(&self, threshold: Duration, now: SystemTime) -> Result<Vec<Reservation>> {
        let cutoff = now.checked_sub(threshold).unwrap_or(SystemTime::UNIX_EPOCH);
        let mut overdue: Vec<Reservation> = self
            .state
            .borrow()
            .reservations
            .iter()
            .filter(|r| r.created_at() < cutoff)
            .cloned()
            .collect();
        overdue.sort_by_key(|r| (r.created_at(), r.id()));
        Ok(overdue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DAY;

    fn dune() -> NewBook {
        NewBook::new(Title::new("Dune").unwrap(), "Frank Herbert")
    }

    #[test]
    fn test_transaction_publishes_on_ok() {
        let mut store = MemoryStore::new();
        store
            .transaction(|ops| ops.insert_book(&dune(), SystemTime::now()))
            .unwrap();

        let books = store.read(|ops| ops.list_books()).unwrap();
        assert_eq!(books.len(), 1);
    }

    #[test]
    fn test_transaction_discards_on_err() {
        let mut store = MemoryStore::new();
        let result: Result<()> = store.transaction(|ops| {
            ops.insert_book(&dune(), SystemTime::now())?;
            Err(Error::NotFound {
                resource: "abort".into(),
            })
        });
        assert!(result.is_err());
        assert!(store.read(|ops| ops.list_books()).unwrap().is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let mut a = MemoryStore::new();
        let b = a.clone();
        a.transaction(|ops| ops.insert_book(&dune(), SystemTime::now()))
            .unwrap();
        assert_eq!(b.read(|ops| ops.list_books()).unwrap().len(), 1);
    }

    #[test]
    fn test_counters_and_rows() {
        let mut store = MemoryStore::new();
        let key = LoanKey::parse("alice", "Dune").unwrap();
        store
            .transaction(|ops| {
                ops.insert_book(&dune().with_copies(2), SystemTime::now())?;
                assert!(ops.decrement_available(&key.title)?);
                assert!(ops.decrement_available(&key.title)?);
                assert!(!ops.decrement_available(&key.title)?);
                assert!(ops.increment_available(&key.title)?);
                Ok(())
            })
            .unwrap();

        let availability = store.read(|ops| ops.availability(&key.title)).unwrap();
        assert_eq!(availability.available, 1);
        assert_eq!(availability.loaned, 1);
    }

    #[test]
    fn test_delete_oldest_and_overdue_order() {
        let mut store = MemoryStore::new();
        let now = SystemTime::UNIX_EPOCH + DAY * 100;
        let key = LoanKey::parse("carol", "Foundation").unwrap();

        store
            .transaction(|ops| {
                ops.create_reservation(&key, now - DAY * 3)?;
                ops.create_reservation(&key, now - DAY * 10)?;
                Ok(())
            })
            .unwrap();

        let overdue = store.read(|ops| ops.list_overdue(DAY * 7, now)).unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].created_at(), now - DAY * 10);

        store
            .transaction(|ops| ops.delete_reservation(&key))
            .unwrap();
        let remaining = store
            .read(|ops| ops.list_reservations(&ReservationFilter::all()))
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].created_at(), now - DAY * 3);
    }
}
