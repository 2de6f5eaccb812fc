//! Book records and copy counters in `SQLite`.

use std::time::SystemTime;

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use crate::book::{Book, NewBook, Title};
use crate::error::{Error, Result};
use crate::store::InventoryStore;

use super::{systemtime_to_unix_secs, unix_secs_to_systemtime};

const INSERT_BOOK: &str = r"
    INSERT INTO books (title, author, num_available, num_loaned, added_by, created_at)
    VALUES (?, ?, ?, 0, ?, ?)
";

const SELECT_BOOK: &str = r"
    SELECT title, author, num_available, num_loaned, added_by, created_at
    FROM books
    WHERE title = ?
";

const LIST_BOOKS: &str = r"
    SELECT title, author, num_available, num_loaned, added_by, created_at
    FROM books
    ORDER BY title
";

const DECREMENT_AVAILABLE: &str = r"
    UPDATE books
    SET num_available = num_available - 1, num_loaned = num_loaned + 1
    WHERE title = ? AND num_available > 0
";

const INCREMENT_AVAILABLE: &str = r"
    UPDATE books
    SET num_available = num_available + 1, num_loaned = num_loaned - 1
    WHERE title = ? AND num_loaned > 0
";

/// Deserializes a book from a row.
///
/// Expects: title, author, `num_available`, `num_loaned`, `added_by`, `created_at`
fn row_to_book(row: &rusqlite::Row<'_>) -> rusqlite::Result<Book> {
    let title: String = row.get(0)?;
    let title = Title::new(title)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))?;

    Ok(Book {
        title,
        author: row.get(1)?,
        num_available: row.get(2)?,
        num_loaned: row.get(3)?,
        added_by: row.get(4)?,
        created_at: unix_secs_to_systemtime(row.get(5)?),
    })
}

impl InventoryStore for Connection {
    fn insert_book(&self, book: &NewBook, created_at: SystemTime) -> Result<Book> {
        let created_secs = systemtime_to_unix_secs(created_at)?;

        let inserted = self.execute(
            INSERT_BOOK,
            params![
                book.title.as_str(),
                book.author,
                book.copies,
                book.added_by,
                created_secs
            ],
        );

        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(failure, _))
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                return Err(Error::BookAlreadyExists {
                    title: book.title.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Book {
            title: book.title.clone(),
            author: book.author.clone(),
            num_available: book.copies,
            num_loaned: 0,
            added_by: book.added_by.clone(),
            created_at: unix_secs_to_systemtime(created_secs),
        })
    }

    fn get_book(&self, title: &Title) -> Result<Option<Book>> {
        Ok(self
            .query_row(SELECT_BOOK, [title.as_str()], row_to_book)
            .optional()?)
    }

    fn list_books(&self) -> Result<Vec<Book>> {
        let mut stmt = self.prepare(LIST_BOOKS)?;
        let books = stmt
            .query_map([], row_to_book)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(books)
    }

    fn decrement_available(&self, title: &Title) -> Result<bool> {
        let changed = self.execute(DECREMENT_AVAILABLE, [title.as_str()])?;
        Ok(changed == 1)
    }

    fn increment_available(&self, title: &Title) -> Result<bool> {
        let changed = self.execute(INCREMENT_AVAILABLE, [title.as_str()])?;
        Ok(changed == 1)
    }
}
