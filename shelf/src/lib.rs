#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # shelf
//!
//! A library for tracking book inventory, loans and returns.
//!
//! Books carry two counters, copies on the shelf and copies on loan, and
//! every loan is backed by one reservation row. Loans and returns move a
//! copy between the counters and create or retire the matching row in a
//! single transaction, so the counters and rows never disagree even with
//! many writers on the same database.
//!
//! ## Core Types
//!
//! - [`Book`], [`Title`] and [`NewBook`]: the catalogue
//! - [`Reservation`], [`Borrower`] and [`LoanKey`]: active loans
//! - [`Store`]: scoped read and write access, implemented by
//!   [`Database`] and [`MemoryStore`]
//! - [`loan`], [`return_copy`] and [`add_book`]: the operations
//! - [`sweeper::Sweeper`]: background overdue reporting
//! - [`Role`] and [`authorize`]: the staff permission check
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use shelf::{Error, LoanKey, LoanPolicy, MemoryStore, NewBook, Title};
//!
//! let mut store = MemoryStore::new();
//! shelf::add_book(&mut store, NewBook::new(Title::new("Dune").unwrap(), "Frank Herbert")).unwrap();
//!
//! let alice = LoanKey::parse("alice", "Dune").unwrap();
//! shelf::loan(&mut store, &LoanPolicy::default(), alice.clone()).unwrap();
//!
//! // The only copy is out
//! let bob = LoanKey::parse("bob", "Dune").unwrap();
//! let err = shelf::loan(&mut store, &LoanPolicy::default(), bob).unwrap_err();
//! assert!(matches!(err, Error::NoCopiesAvailable { loaned: 1, .. }));
//!
//! shelf::return_copy(&mut store, alice).unwrap();
//! ```

pub mod book;
pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod memory;
pub mod operations;
pub mod output;
pub mod reservation;
pub mod role;
pub mod store;
pub mod sweeper;

// Re-export key types at crate root for convenience
pub use book::{Availability, Book, NewBook, Title, ValidationError};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, ConfigBuilder, OutputFormat};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, ErrorClass, Result};
pub use logging::{init_logger, resolve_log_level, LogLevel, Logger};
pub use memory::MemoryStore;
pub use operations::{
    add_book, loan, return_copy, ExecutionResult, LoanPolicy, OperationPlan, PlanAction,
    PlanExecutor,
};
pub use reservation::{Borrower, LoanKey, Reservation};
pub use role::{authorize, Permission, Role};
pub use store::{InventoryStore, LibraryOps, ReservationFilter, ReservationStore, Store, DAY};
pub use sweeper::{
    CollectingNotifier, LogNotifier, Notifier, Schedule, SweepReport, SweepState, Sweeper,
    SweeperHandle, SweeperStats,
};
