//! Configuration schema definitions.
//!
//! Every field is optional so that partial files and environment overrides
//! can be layered; the accessors on [`Config`] fill in the defaults.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::operations::loan::{LoanPolicy, DEFAULT_BORROWING_CAP};
use crate::store::DAY;

/// Default overdue threshold in days.
pub const DEFAULT_OVERDUE_AFTER_DAYS: u64 = 7;

/// Default pause between sweeper cycles, in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 86_400;

/// Default maximum lock wait, in seconds.
pub const DEFAULT_LOCK_WAIT_SECONDS: u64 = 5;

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use shelf::config::{Config, LoanConfig};
///
/// let config = Config {
///     loans: Some(LoanConfig {
///         borrowing_cap: Some(2),
///         default_copies: None,
///     }),
///     ..Default::default()
/// };
/// assert_eq!(config.loan_policy().borrowing_cap, 2);
/// assert_eq!(config.default_copies(), 1);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Lending rules.
    pub loans: Option<LoanConfig>,

    /// Overdue sweep settings.
    pub sweeper: Option<SweeperConfig>,

    /// Disable automatic database initialization.
    pub disable_autoinit: Option<bool>,

    /// Maximum time to wait for database lock acquisition (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Output format for list commands.
    pub output_format: Option<OutputFormat>,
}

impl Config {
    /// The lending policy these settings describe.
    #[must_use]
    pub fn loan_policy(&self) -> LoanPolicy {
        LoanPolicy::with_cap(
            self.loans
                .as_ref()
                .and_then(|l| l.borrowing_cap)
                .unwrap_or(DEFAULT_BORROWING_CAP),
        )
    }

    /// Copies shelved by add-book when none are specified.
    #[must_use]
    pub fn default_copies(&self) -> u32 {
        self.loans
            .as_ref()
            .and_then(|l| l.default_copies)
            .unwrap_or(crate::book::NewBook::DEFAULT_COPIES)
    }

    /// How old a reservation must be before the sweeper reports it.
    #[must_use]
    pub fn overdue_threshold(&self) -> Duration {
        let days = self
            .sweeper
            .as_ref()
            .and_then(|s| s.overdue_after_days)
            .unwrap_or(DEFAULT_OVERDUE_AFTER_DAYS);
        DAY.saturating_mul(u32::try_from(days).unwrap_or(u32::MAX))
    }

    /// Pause between sweeper cycles.
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(
            self.sweeper
                .as_ref()
                .and_then(|s| s.interval_seconds)
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECONDS),
        )
    }

    /// Database busy timeout.
    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_secs(
            self.maximum_lock_wait_seconds
                .unwrap_or(DEFAULT_LOCK_WAIT_SECONDS),
        )
    }

    /// Whether commands other than `init` may create the database.
    #[must_use]
    pub fn autoinit(&self) -> bool {
        !self.disable_autoinit.unwrap_or(false)
    }
}

/// Lending settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoanConfig {
    /// Maximum active reservations per borrower.
    pub borrowing_cap: Option<u32>,

    /// Copies shelved by add-book when none are specified.
    pub default_copies: Option<u32>,
}

/// Overdue sweep settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SweeperConfig {
    /// Reservations older than this many days are overdue.
    pub overdue_after_days: Option<u64>,

    /// Seconds between sweeper cycles.
    pub interval_seconds: Option<u64>,
}

/// Output format for list commands.
///
/// # Examples
///
/// ```
/// use shelf::config::OutputFormat;
///
/// let format = OutputFormat::Json;
/// assert_eq!(format.to_string(), "json");
/// ```
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output format.
    Json,
    /// CSV output format.
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}
