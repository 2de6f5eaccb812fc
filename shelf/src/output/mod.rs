//! Rendering books and reservations for display.
//!
//! Each [`OutputFormat`] has a formatter that turns a slice of records
//! into a string: an aligned table for people, JSON or CSV for scripts.

mod formatters;

use std::time::SystemTime;

use crate::book::Book;
use crate::reservation::Reservation;
use crate::Result;

pub use crate::config::OutputFormat;
pub use formatters::{
    format_timestamp, BookRow, CsvFormatter, JsonFormatter, ReservationRow, TableFormatter,
};

/// Renders records in one output format.
pub trait OutputFormatter {
    /// Renders the catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Output`](crate::Error::Output) if serialization fails.
    fn format_books(&self, books: &[Book]) -> Result<String>;

    /// Renders reservations, with ages measured at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Output`](crate::Error::Output) if serialization fails.
    fn format_reservations(&self, reservations: &[Reservation], now: SystemTime)
        -> Result<String>;
}

impl OutputFormat {
    /// The formatter for this format.
    #[must_use]
    pub fn create_formatter(self) -> Box<dyn OutputFormatter> {
        match self {
            Self::Table => Box::new(TableFormatter),
            Self::Json => Box::new(JsonFormatter),
            Self::Csv => Box::new(CsvFormatter),
        }
    }
}
