//! Reservation types for tracking books out on loan.
//!
//! A reservation is one copy of one title held by one borrower. The
//! (borrower, title) pair is not unique: a borrower holding two copies of
//! the same title has two reservations, told apart by their row id.

use std::fmt;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::book::{Title, ValidationError};

/// The user a copy is loaned to.
///
/// # Examples
///
/// ```
/// use shelf::Borrower;
///
/// let borrower = Borrower::new(" alice ").unwrap();
/// assert_eq!(borrower.as_str(), "alice");
/// assert!(Borrower::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Borrower(String);

impl Borrower {
    /// Creates a borrower name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty after trimming.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError {
                field: "borrower".into(),
                message: "borrower must be non-empty after trimming whitespace".into(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the borrower's name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Borrower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Borrower {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Borrower> for String {
    fn from(borrower: Borrower) -> Self {
        borrower.0
    }
}

/// The (borrower, title) pair a loan or return acts on.
///
/// # Examples
///
/// ```
/// use shelf::LoanKey;
///
/// let key = LoanKey::parse("alice", "Dune").unwrap();
/// assert_eq!(key.to_string(), "alice:Dune");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanKey {
    /// Who holds the copy.
    pub borrower: Borrower,
    /// Which title.
    pub title: Title,
}

impl LoanKey {
    /// Creates a key from validated parts.
    #[must_use]
    pub const fn new(borrower: Borrower, title: Title) -> Self {
        Self { borrower, title }
    }

    /// Validates raw strings into a key.
    ///
    /// # Errors
    ///
    /// Returns an error if either part is empty after trimming.
    pub fn parse(borrower: impl AsRef<str>, title: impl AsRef<str>) -> Result<Self, ValidationError> {
        Ok(Self {
            borrower: Borrower::new(borrower)?,
            title: Title::new(title)?,
        })
    }
}

impl fmt::Display for LoanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.borrower, self.title)
    }
}

/// One active loan of one copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: i64,
    key: LoanKey,
    created_at: SystemTime,
}

impl Reservation {
    /// Assembles a reservation as stored.
    #[must_use]
    pub const fn new(id: i64, key: LoanKey, created_at: SystemTime) -> Self {
        Self {
            id,
            key,
            created_at,
        }
    }

    /// Store-assigned row id.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// The (borrower, title) pair.
    #[must_use]
    pub const fn key(&self) -> &LoanKey {
        &self.key
    }

    /// Who holds the copy.
    #[must_use]
    pub const fn borrower(&self) -> &Borrower {
        &self.key.borrower
    }

    /// The title on loan.
    #[must_use]
    pub const fn title(&self) -> &Title {
        &self.key.title
    }

    /// When the loan was made.
    #[must_use]
    pub const fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// How long the copy has been out as of `now`.
    ///
    /// Zero if `now` precedes the creation time.
    #[must_use]
    pub fn age(&self, now: SystemTime) -> Duration {
        now.duration_since(self.created_at).unwrap_or(Duration::ZERO)
    }

    /// Whether the copy has been out for strictly longer than `threshold`.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelf::{LoanKey, Reservation};
    /// use std::time::{Duration, SystemTime};
    ///
    /// const DAY: Duration = Duration::from_secs(86_400);
    /// let now = SystemTime::now();
    /// let key = LoanKey::parse("carol", "Foundation").unwrap();
    /// let reservation = Reservation::new(1, key, now - DAY * 10);
    ///
    /// assert!(reservation.is_overdue(DAY * 7, now));
    /// assert!(!reservation.is_overdue(DAY * 10, now));
    /// ```
    #[must_use]
    pub fn is_overdue(&self, threshold: Duration, now: SystemTime) -> bool {
        self.age(now) > threshold
    }
}
