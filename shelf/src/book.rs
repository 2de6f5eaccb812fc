//! Catalogue types: titles, books, and copy counters.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// The unique name of a catalogued book.
///
/// Titles are trimmed on construction and must not be empty.
///
/// # Examples
///
/// ```
/// use shelf::Title;
///
/// let title = Title::new("  Dune ").unwrap();
/// assert_eq!(title.as_str(), "Dune");
/// assert!(Title::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    /// Creates a title from any string, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is empty after trimming.
    pub fn new(title: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = title.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError {
                field: "title".into(),
                message: "title must be non-empty after trimming whitespace".into(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the title text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Title {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Title> for String {
    fn from(title: Title) -> Self {
        title.0
    }
}

/// A catalogued book and its copy counters.
///
/// `num_available + num_loaned` is the number of physical copies the
/// library owns; it is fixed when the book is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// The book's unique title.
    pub title: Title,
    /// Display-only author name.
    pub author: String,
    /// Copies on the shelf right now.
    pub num_available: u32,
    /// Copies currently out on loan.
    pub num_loaned: u32,
    /// Librarian who added the book, if recorded.
    pub added_by: Option<String>,
    /// When the book was catalogued.
    pub created_at: SystemTime,
}

impl Book {
    /// Total copies owned.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelf::{Book, Title};
    /// use std::time::SystemTime;
    ///
    /// let book = Book {
    ///     title: Title::new("Dune").unwrap(),
    ///     author: "Herbert".into(),
    ///     num_available: 2,
    ///     num_loaned: 1,
    ///     added_by: None,
    ///     created_at: SystemTime::now(),
    /// };
    /// assert_eq!(book.total_copies(), 3);
    /// ```
    #[must_use]
    pub const fn total_copies(&self) -> u32 {
        self.num_available + self.num_loaned
    }

    /// The book's current counters.
    #[must_use]
    pub const fn availability(&self) -> Availability {
        Availability {
            available: self.num_available,
            loaned: self.num_loaned,
        }
    }
}

/// A request to catalogue a new book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    /// The title to add.
    pub title: Title,
    /// Author name.
    pub author: String,
    /// Number of copies placed on the shelf.
    pub copies: u32,
    /// Librarian adding the book.
    pub added_by: Option<String>,
}

impl NewBook {
    /// Default number of copies for a new book.
    pub const DEFAULT_COPIES: u32 = 1;

    /// Creates a request for a single copy.
    ///
    /// The author is trimmed; an empty author is allowed.
    #[must_use]
    pub fn new(title: Title, author: impl AsRef<str>) -> Self {
        Self {
            title,
            author: author.as_ref().trim().to_string(),
            copies: Self::DEFAULT_COPIES,
            added_by: None,
        }
    }

    /// Sets the number of copies.
    #[must_use]
    pub const fn with_copies(mut self, copies: u32) -> Self {
        self.copies = copies;
        self
    }

    /// Records who added the book.
    #[must_use]
    pub fn added_by(mut self, librarian: Option<String>) -> Self {
        self.added_by = librarian
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        self
    }
}

/// Copy counters for a title.
///
/// Unknown titles read as all zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Copies on the shelf.
    pub available: u32,
    /// Copies out on loan.
    pub loaned: u32,
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}
