//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::{Config, LoanConfig, SweeperConfig};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use shelf::config::{Config, ConfigMerger};
///
/// let low = Config { maximum_lock_wait_seconds: Some(5), ..Default::default() };
/// let high = Config { maximum_lock_wait_seconds: Some(30), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.maximum_lock_wait_seconds, Some(30));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merges sources given from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merges `source` into `target`; every field set in `source` wins.
    ///
    /// Nested sections merge field by field.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }

        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }

        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }

        if let Some(ref source_loans) = source.loans {
            target.loans = Some(match &target.loans {
                Some(target_loans) => Self::merge_loans(target_loans, source_loans),
                None => source_loans.clone(),
            });
        }

        if let Some(ref source_sweeper) = source.sweeper {
            target.sweeper = Some(match &target.sweeper {
                Some(target_sweeper) => Self::merge_sweeper(target_sweeper, source_sweeper),
                None => source_sweeper.clone(),
            });
        }
    }

    fn merge_loans(target: &LoanConfig, source: &LoanConfig) -> LoanConfig {
        LoanConfig {
            borrowing_cap: source.borrowing_cap.or(target.borrowing_cap),
            default_copies: source.default_copies.or(target.default_copies),
        }
    }

    fn merge_sweeper(target: &SweeperConfig, source: &SweeperConfig) -> SweeperConfig {
        SweeperConfig {
            overdue_after_days: source.overdue_after_days.or(target.overdue_after_days),
            interval_seconds: source.interval_seconds.or(target.interval_seconds),
        }
    }
}
