//! Error types for the shelf library.
//!
//! Every fallible operation in the crate returns [`Result`], whose error
//! side is the single [`Error`] enum below. Callers that need to decide
//! whether to retry, report a policy violation, or abort can ask an error
//! for its [`ErrorClass`].

use std::path::PathBuf;

use thiserror::Error;

use crate::role::{Permission, Role};

/// Result type alias for operations that may fail with a shelf error.
///
/// # Examples
///
/// ```
/// use shelf::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(4)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the shelf library.
#[derive(Debug, Error)]
pub enum Error {
    /// The borrower already holds the maximum number of active reservations.
    #[error("too many books currently reserved: {current} active (limit {cap})")]
    TooManyReservations {
        /// Active reservations held by the borrower.
        current: u32,
        /// The borrowing cap in force.
        cap: u32,
    },

    /// Every copy of the title is out on loan, or the title is not stocked.
    #[error("no copies of '{title}' available: {loaned} currently on loan")]
    NoCopiesAvailable {
        /// The requested title.
        title: String,
        /// Copies of the title currently on loan.
        loaned: u32,
    },

    /// A return was attempted for a (borrower, title) pair with no active reservation.
    #[error("no active reservation of '{title}' held by '{borrower}'")]
    NoMatchingReservation {
        /// The borrower named in the return.
        borrower: String,
        /// The title named in the return.
        title: String,
    },

    /// A book with the same title is already catalogued.
    #[error("book already exists: '{title}'")]
    BookAlreadyExists {
        /// The duplicate title.
        title: String,
    },

    /// Copy counters disagree with the reservation rows.
    #[error("inventory inconsistent for '{title}': {details}")]
    InventoryInconsistent {
        /// The affected title.
        title: String,
        /// What was found to be out of step.
        details: String,
    },

    /// The caller's role does not grant the requested permission.
    #[error("{} may not {permission}", role.map_or_else(|| "an anonymous caller".to_string(), |r| format!("a {r}")))]
    Unauthorized {
        /// The role presented, if any.
        role: Option<Role>,
        /// The permission that was required.
        permission: Permission,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// A database lock timeout occurred.
    #[error("database lock timeout after {seconds}s")]
    LockTimeout {
        /// The number of seconds waited before timing out.
        seconds: u64,
    },

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: u32,
        /// The schema version found in the database.
        found: u32,
    },

    /// Rendering output failed.
    #[error("output error: {details}")]
    Output {
        /// What went wrong while rendering.
        details: String,
    },
}

/// Broad classification of an [`Error`].
///
/// # Examples
///
/// ```
/// use shelf::{Error, ErrorClass};
///
/// let err = Error::LockTimeout { seconds: 5 };
/// assert_eq!(err.class(), ErrorClass::Transient);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// A lending rule rejected the request. Retrying will not help.
    PolicyViolation,
    /// A named resource does not exist.
    NotFound,
    /// Lock contention; the caller may retry.
    Transient,
    /// Everything else: storage, I/O, configuration, corrupted state.
    Fault,
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::TooManyReservations { .. }
            | Self::NoCopiesAvailable { .. }
            | Self::NoMatchingReservation { .. }
            | Self::BookAlreadyExists { .. }
            | Self::Unauthorized { .. } => ErrorClass::PolicyViolation,
            Self::NotFound { .. } | Self::DataDirectoryNotFound { .. } => ErrorClass::NotFound,
            Self::LockTimeout { .. } => ErrorClass::Transient,
            Self::InventoryInconsistent { .. }
            | Self::Database(_)
            | Self::Configuration(_)
            | Self::Io(_)
            | Self::Validation { .. }
            | Self::DatabaseCorruption { .. }
            | Self::UnsupportedSchemaVersion { .. }
            | Self::Output { .. } => ErrorClass::Fault,
        }
    }

    /// Check if the error is a lending policy violation.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelf::Error;
    ///
    /// let err = Error::TooManyReservations { current: 4, cap: 4 };
    /// assert!(err.is_policy_violation());
    /// ```
    #[must_use]
    pub fn is_policy_violation(&self) -> bool {
        self.class() == ErrorClass::PolicyViolation
    }

    /// Check if retrying the operation could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.class() == ErrorClass::Transient
    }

    /// Convert a busy/locked `SQLite` failure into [`Error::LockTimeout`].
    ///
    /// Any other error is returned unchanged.
    #[must_use]
    pub(crate) fn into_lock_timeout(self, seconds: u64) -> Self {
        match self {
            Self::Database(rusqlite::Error::SqliteFailure(ref failure, _))
                if matches!(
                    failure.code,
                    rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
                ) =>
            {
                Self::LockTimeout { seconds }
            }
            other => other,
        }
    }
}

impl From<crate::book::ValidationError> for Error {
    fn from(err: crate::book::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Output {
            details: err.to_string(),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::Output {
            details: err.to_string(),
        }
    }
}
