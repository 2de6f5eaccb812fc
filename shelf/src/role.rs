//! Staff roles and the permissions they carry.
//!
//! The loan and return engines perform no authorization themselves; the
//! calling layer checks a caller's role here before invoking them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A staff role.
///
/// # Examples
///
/// ```
/// use shelf::{Permission, Role};
///
/// assert!(Role::Librarian.allows(Permission::Lend));
/// assert!(!Role::Librarian.allows(Permission::AddBooks));
/// assert!(Role::SeniorLibrarian.allows(Permission::AddBooks));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// May loan and return books.
    Librarian,
    /// May also add books to the catalogue.
    SeniorLibrarian,
}

/// An action gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Loan or return a copy.
    Lend,
    /// Catalogue a new book.
    AddBooks,
}

impl Role {
    /// Whether this role grants `permission`.
    #[must_use]
    pub const fn allows(self, permission: Permission) -> bool {
        match (self, permission) {
            (Self::Librarian | Self::SeniorLibrarian, Permission::Lend)
            | (Self::SeniorLibrarian, Permission::AddBooks) => true,
            (Self::Librarian, Permission::AddBooks) => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Librarian => write!(f, "Librarian"),
            Self::SeniorLibrarian => write!(f, "SeniorLibrarian"),
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lend => write!(f, "lend books"),
            Self::AddBooks => write!(f, "add books"),
        }
    }
}

/// Checks that `role` grants `permission`.
///
/// # Errors
///
/// Returns [`Error::Unauthorized`] if no role was presented or the role
/// lacks the permission.
///
/// # Examples
///
/// ```
/// use shelf::{authorize, Permission, Role};
///
/// assert_eq!(authorize(Some(Role::Librarian), Permission::Lend).unwrap(), Role::Librarian);
/// assert!(authorize(None, Permission::Lend).is_err());
/// ```
pub fn authorize(role: Option<Role>, permission: Permission) -> Result<Role> {
    match role {
        Some(role) if role.allows(permission) => Ok(role),
        _ => Err(Error::Unauthorized { role, permission }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_matrix() {
        assert!(Role::Librarian.allows(Permission::Lend));
        assert!(!Role::Librarian.allows(Permission::AddBooks));
        assert!(Role::SeniorLibrarian.allows(Permission::Lend));
        assert!(Role::SeniorLibrarian.allows(Permission::AddBooks));
    }

    #[test]
    fn test_role_value_names() {
        use clap::ValueEnum;

        assert_eq!(Role::from_str("librarian", false).unwrap(), Role::Librarian);
        assert_eq!(
            Role::from_str("Senior-Librarian", true).unwrap(),
            Role::SeniorLibrarian
        );
        assert!(Role::from_str("patron", true).is_err());
    }

    #[test]
    fn test_role_serde_kebab() {
        let json = serde_json::to_string(&Role::SeniorLibrarian).unwrap();
        assert_eq!(json, "\"senior-librarian\"");
    }

    #[test]
    fn test_authorize_rejects_missing_role() {
        let err = authorize(None, Permission::Lend).unwrap_err();
        assert!(matches!(
            err,
            Error::Unauthorized {
                role: None,
                permission: Permission::Lend
            }
        ));
    }

    #[test]
    fn test_authorize_rejects_librarian_adding_books() {
        let err = authorize(Some(Role::Librarian), Permission::AddBooks).unwrap_err();
        assert!(err.is_policy_violation());
    }
}
