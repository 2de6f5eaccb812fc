//! Library operations using the plan-execute pattern.
//!
//! Every write is split into two phases:
//! 1. **Planning**: checks the request against a read snapshot and builds
//!    an [`OperationPlan`]
//! 2. **Execution**: [`PlanExecutor`] applies the plan in one transaction,
//!    re-checking whatever the snapshot may have got wrong
//!
//! The free functions [`loan`], [`return_copy`] and [`add_book`] run both
//! phases back to back.
//!
//! # Examples
//!
//! ```
//! use shelf::operations::{LoanOptions, LoanPlan, PlanExecutor};
//! use shelf::{LoanKey, LoanPolicy, MemoryStore, NewBook, Title};
//!
//! let mut store = MemoryStore::new();
//! shelf::add_book(&mut store, NewBook::new(Title::new("Dune").unwrap(), "Frank Herbert")).unwrap();
//!
//! let key = LoanKey::parse("alice", "Dune").unwrap();
//! let plan = LoanPlan::new(LoanOptions::new(key), &LoanPolicy::default())
//!     .build_plan(&store)
//!     .unwrap();
//!
//! let result = PlanExecutor::new(&mut store).execute(&plan).unwrap();
//! assert_eq!(result.reservations.len(), 1);
//! ```

pub mod add_book;
pub mod executor;
pub mod init;
pub mod loan;
pub mod plan;
pub mod return_copy;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use add_book::{add_book, AddBookOptions, AddBookPlan};
pub use executor::{ExecutionResult, PlanExecutor};
pub use init::{init_database, InitOptions, InitResult};
pub use loan::{loan, LoanOptions, LoanPlan, LoanPolicy, DEFAULT_BORROWING_CAP};
pub use plan::{OperationPlan, PlanAction};
pub use return_copy::{return_copy, ReturnOptions, ReturnPlan};
