//! Output formatter implementations.

use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::book::Book;
use crate::reservation::Reservation;
use crate::store::DAY;
use crate::{Error, Result};

use super::OutputFormatter;

/// Formats a timestamp for the table view.
#[must_use]
pub fn format_timestamp(ts: SystemTime) -> String {
    let dt: DateTime<Utc> = ts.into();
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn rfc3339(ts: SystemTime) -> String {
    let dt: DateTime<Utc> = ts.into();
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// One book as serialized by the JSON and CSV formatters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookRow {
    /// Title.
    pub title: String,
    /// Author.
    pub author: String,
    /// Copies on the shelf.
    pub available: u32,
    /// Copies on loan.
    pub loaned: u32,
    /// Copies owned.
    pub total: u32,
    /// Librarian who added the book.
    pub added_by: Option<String>,
    /// RFC 3339 creation time.
    pub created_at: String,
}

impl From<&Book> for BookRow {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.to_string(),
            author: book.author.clone(),
            available: book.num_available,
            loaned: book.num_loaned,
            total: book.total_copies(),
            added_by: book.added_by.clone(),
            created_at: rfc3339(book.created_at),
        }
    }
}

/// One reservation as serialized by the JSON and CSV formatters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationRow {
    /// Row id.
    pub id: i64,
    /// Who holds the copy.
    pub borrower: String,
    /// Title on loan.
    pub title: String,
    /// RFC 3339 loan time.
    pub created_at: String,
    /// Whole days on loan.
    pub age_days: u64,
}

impl ReservationRow {
    /// Builds a row, measuring the age at `now`.
    #[must_use]
    pub fn new(reservation: &Reservation, now: SystemTime) -> Self {
        Self {
            id: reservation.id(),
            borrower: reservation.borrower().to_string(),
            title: reservation.title().to_string(),
            created_at: rfc3339(reservation.created_at()),
            age_days: reservation.age(now).as_secs() / DAY.as_secs(),
        }
    }
}

const BOOK_HEADERS: [&str; 6] = ["TITLE", "AUTHOR", "AVAILABLE", "LOANED", "ADDED BY", "CREATED"];
const RESERVATION_HEADERS: [&str; 5] = ["ID", "BORROWER", "TITLE", "LOANED AT", "DAYS"];

/// Formatter for a human-readable, column-aligned table.
pub struct TableFormatter;

impl TableFormatter {
    fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut lines = vec![pad_line(headers.iter().copied(), &widths)];
        for row in rows {
            lines.push(pad_line(row.iter().map(String::as_str), &widths));
        }
        lines.join("\n")
    }
}

fn pad_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

impl OutputFormatter for TableFormatter {
    fn format_books(&self, books: &[Book]) -> Result<String> {
        if books.is_empty() {
            return Ok("No books catalogued.".to_string());
        }

        let rows: Vec<Vec<String>> = books
            .iter()
            .map(|book| {
                vec![
                    book.title.to_string(),
                    book.author.clone(),
                    book.num_available.to_string(),
                    book.num_loaned.to_string(),
                    book.added_by.clone().unwrap_or_else(|| "-".into()),
                    format_timestamp(book.created_at),
                ]
            })
            .collect();
        Ok(Self::render(&BOOK_HEADERS, &rows))
    }

    fn format_reservations(
        &self,
        reservations: &[Reservation],
        now: SystemTime,
    ) -> Result<String> {
        if reservations.is_empty() {
            return Ok("No active reservations.".to_string());
        }

        let rows: Vec<Vec<String>> = reservations
            .iter()
            .map(|r| {
                let row = ReservationRow::new(r, now);
                vec![
                    row.id.to_string(),
                    row.borrower,
                    row.title,
                    format_timestamp(r.created_at()),
                    row.age_days.to_string(),
                ]
            })
            .collect();
        Ok(Self::render(&RESERVATION_HEADERS, &rows))
    }
}

/// Formatter for pretty-printed JSON arrays.
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_books(&self, books: &[Book]) -> Result<String> {
        let rows: Vec<BookRow> = books.iter().map(BookRow::from).collect();
        Ok(serde_json::to_string_pretty(&rows)?)
    }

    fn format_reservations(
        &self,
        reservations: &[Reservation],
        now: SystemTime,
    ) -> Result<String> {
        let rows: Vec<ReservationRow> = reservations
            .iter()
            .map(|r| ReservationRow::new(r, now))
            .collect();
        Ok(serde_json::to_string_pretty(&rows)?)
    }
}

/// Formatter for CSV with a header row.
pub struct CsvFormatter;

impl CsvFormatter {
    fn render<T: Serialize>(rows: &[T], headers: &[&str]) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        // Written by hand so an empty list still gets a header
        writer.write_record(headers)?;
        for row in rows {
            writer.serialize(row)?;
        }

        let bytes = writer.into_inner().map_err(|e| Error::Output {
            details: e.to_string(),
        })?;
        String::from_utf8(bytes).map_err(|e| Error::Output {
            details: e.to_string(),
        })
    }
}

impl OutputFormatter for CsvFormatter {
    fn format_books(&self, books: &[Book]) -> Result<String> {
        let rows: Vec<BookRow> = books.iter().map(BookRow::from).collect();
        Self::render(
            &rows,
            &["title", "author", "available", "loaned", "total", "added_by", "created_at"],
        )
    }

    fn format_reservations(
        &self,
        reservations: &[Reservation],
        now: SystemTime,
    ) -> Result<String> {
        let rows: Vec<ReservationRow> = reservations
            .iter()
            .map(|r| ReservationRow::new(r, now))
            .collect();
        Self::render(&rows, &["id", "borrower", "title", "created_at", "age_days"])
    }
}
