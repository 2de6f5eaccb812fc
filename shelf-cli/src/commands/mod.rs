//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `init`: Create the data directory, database and config file
//! - `add_book`: Catalogue a book (SeniorLibrarian only)
//! - `loan`: Loan a copy to a borrower
//! - `return_cmd`: Return a borrowed copy
//! - `list`: List books or reservations
//! - `overdue`: Run one overdue sweep and print the result
//! - `sweep`: Run the sweeper on a schedule

pub mod add_book;
pub mod init;
pub mod list;
pub mod loan;
pub mod overdue;
pub mod return_cmd;
pub mod sweep;

pub use add_book::AddBookCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use loan::LoanCommand;
pub use overdue::OverdueCommand;
pub use return_cmd::ReturnCommand;
pub use sweep::SweepCommand;
