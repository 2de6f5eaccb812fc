//! Active reservation rows in `SQLite`.

use std::time::{Duration, SystemTime};

use rusqlite::{params, Connection, ToSql};

use crate::book::Title;
use crate::error::Result;
use crate::reservation::{Borrower, LoanKey, Reservation};
use crate::store::{ReservationFilter, ReservationStore};

use super::{systemtime_to_unix_secs, unix_secs_to_systemtime};

const COUNT_BY_BORROWER: &str = "SELECT COUNT(*) FROM reservations WHERE borrower = ?";

const COUNT_BY_TITLE: &str = "SELECT COUNT(*) FROM reservations WHERE title = ?";

const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations (borrower, title, created_at)
    VALUES (?, ?, ?)
";

// Oldest matching row goes first
const DELETE_ONE_RESERVATION: &str = r"
    DELETE FROM reservations
    WHERE id = (
        SELECT id FROM reservations
        WHERE borrower = ? AND title = ?
        ORDER BY created_at, id
        LIMIT 1
    )
";

const SELECT_RESERVATIONS: &str = r"
    SELECT id, borrower, title, created_at
    FROM reservations
    WHERE (?1 IS NULL OR borrower = ?1) AND (?2 IS NULL OR title = ?2)
    ORDER BY created_at, id
";

const SELECT_OVERDUE: &str = r"
    SELECT id, borrower, title, created_at
    FROM reservations
    WHERE created_at < ?
    ORDER BY created_at, id
";

/// Deserializes a reservation from a row.
///
/// Expects: id, borrower, title, `created_at`
fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let id: i64 = row.get(0)?;
    let borrower: String = row.get(1)?;
    let title: String = row.get(2)?;
    let created_secs: i64 = row.get(3)?;

    let key = LoanKey::parse(borrower, title)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e)))?;

    Ok(Reservation::new(id, key, unix_secs_to_systemtime(created_secs)))
}

fn count(conn: &Connection, sql: &str, value: &dyn ToSql) -> Result<u32> {
    Ok(conn.query_row(sql, [value], |row| row.get(0))?)
}

impl ReservationStore for Connection {
    fn count_active(&self, borrower: &Borrower) -> Result<u32> {
        count(self, COUNT_BY_BORROWER, &borrower.as_str())
    }

    fn count_for_title(&self, title: &Title) -> Result<u32> {
        count(self, COUNT_BY_TITLE, &title.as_str())
    }

    fn create_reservation(&self, key: &LoanKey, created_at: SystemTime) -> Result<Reservation> {
        let created_secs = systemtime_to_unix_secs(created_at)?;
        self.execute(
            INSERT_RESERVATION,
            params![key.borrower.as_str(), key.title.as_str(), created_secs],
        )?;

        Ok(Reservation::new(
            self.last_insert_rowid(),
            key.clone(),
            unix_secs_to_systemtime(created_secs),
        ))
    }

    fn delete_reservation(&self, key: &LoanKey) -> Result<bool> {
        let deleted = self.execute(
            DELETE_ONE_RESERVATION,
            params![key.borrower.as_str(), key.title.as_str()],
        )?;
        Ok(deleted == 1)
    }

    fn list_reservations(&self, filter: &ReservationFilter) -> Result<Vec<Reservation>> {
        let mut stmt = self.prepare(SELECT_RESERVATIONS)?;
        let reservations = stmt
            .query_map(
                params![
                    filter.borrower.as_ref().map(Borrower::as_str),
                    filter.title.as_ref().map(Title::as_str)
                ],
                row_to_reservation,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reservations)
    }

    fn list_overdue(&self, threshold: Duration, now: SystemTime) -> Result<Vec<Reservation>> {
        let cutoff = now.checked_sub(threshold).unwrap_or(SystemTime::UNIX_EPOCH);
        let cutoff_secs = systemtime_to_unix_secs(cutoff)?;

        let mut stmt = self.prepare(SELECT_OVERDUE)?;
        let reservations = stmt
            .query_map([cutoff_secs], row_to_reservation)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reservations)
    }
}
