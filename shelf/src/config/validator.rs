//! Configuration validation.

use crate::config::schema::{Config, LoanConfig, SweeperConfig};
use crate::error::{Error, Result};

/// Validates a merged configuration.
///
/// # Examples
///
/// ```
/// use shelf::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates every field that is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first offending key.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref loans) = config.loans {
            Self::validate_loans(loans)?;
        }

        if let Some(ref sweeper) = config.sweeper {
            Self::validate_sweeper(sweeper)?;
        }

        if let Some(timeout) = config.maximum_lock_wait_seconds {
            Self::require_positive("maximum_lock_wait_seconds", timeout)?;
        }

        Ok(())
    }

    fn validate_loans(loans: &LoanConfig) -> Result<()> {
        if let Some(cap) = loans.borrowing_cap {
            Self::require_positive("loans.borrowing_cap", u64::from(cap))?;
        }
        if let Some(copies) = loans.default_copies {
            Self::require_positive("loans.default_copies", u64::from(copies))?;
        }
        Ok(())
    }

    fn validate_sweeper(sweeper: &SweeperConfig) -> Result<()> {
        if let Some(days) = sweeper.overdue_after_days {
            Self::require_positive("sweeper.overdue_after_days", days)?;
            // Larger values overflow a Duration in seconds
            if days > u64::from(u32::MAX) {
                return Err(Error::Validation {
                    field: "sweeper.overdue_after_days".into(),
                    message: format!("Must not exceed {}", u32::MAX),
                });
            }
        }
        if let Some(seconds) = sweeper.interval_seconds {
            Self::require_positive("sweeper.interval_seconds", seconds)?;
        }
        Ok(())
    }

    fn require_positive(field: &str, value: u64) -> Result<()> {
        if value == 0 {
            return Err(Error::Validation {
                field: field.into(),
                message: "Must be greater than 0".into(),
            });
        }
        Ok(())
    }
}
