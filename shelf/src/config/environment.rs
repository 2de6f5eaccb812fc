//! `SHELF_*` environment variable overrides.

use std::env;
use std::str::FromStr;

use crate::config::schema::{Config, OutputFormat};
use crate::error::{Error, Result};

/// Overrides `loans.borrowing_cap`.
pub const BORROWING_CAP_ENV: &str = "SHELF_BORROWING_CAP";
/// Overrides `loans.default_copies`.
pub const DEFAULT_COPIES_ENV: &str = "SHELF_DEFAULT_COPIES";
/// Overrides `sweeper.overdue_after_days`.
pub const OVERDUE_AFTER_DAYS_ENV: &str = "SHELF_OVERDUE_AFTER_DAYS";
/// Overrides `sweeper.interval_seconds`.
pub const SWEEP_INTERVAL_ENV: &str = "SHELF_SWEEP_INTERVAL_SECONDS";
/// Overrides `maximum_lock_wait_seconds`.
pub const LOCK_WAIT_ENV: &str = "SHELF_MAXIMUM_LOCK_WAIT_SECONDS";
/// Overrides `disable_autoinit`.
pub const DISABLE_AUTOINIT_ENV: &str = "SHELF_DISABLE_AUTOINIT";
/// Overrides `output_format`.
pub const OUTPUT_FORMAT_ENV: &str = "SHELF_OUTPUT_FORMAT";

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use shelf::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Applies every `SHELF_*` variable that is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the variable if a value cannot
    /// be parsed.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Some(cap) = Self::parse_var::<u32>(BORROWING_CAP_ENV)? {
            config.loans.get_or_insert_with(Default::default).borrowing_cap = Some(cap);
        }

        if let Some(copies) = Self::parse_var::<u32>(DEFAULT_COPIES_ENV)? {
            config.loans.get_or_insert_with(Default::default).default_copies = Some(copies);
        }

        if let Some(days) = Self::parse_var::<u64>(OVERDUE_AFTER_DAYS_ENV)? {
            config
                .sweeper
                .get_or_insert_with(Default::default)
                .overdue_after_days = Some(days);
        }

        if let Some(seconds) = Self::parse_var::<u64>(SWEEP_INTERVAL_ENV)? {
            config
                .sweeper
                .get_or_insert_with(Default::default)
                .interval_seconds = Some(seconds);
        }

        if let Some(seconds) = Self::parse_var::<u64>(LOCK_WAIT_ENV)? {
            config.maximum_lock_wait_seconds = Some(seconds);
        }

        if let Ok(val) = env::var(DISABLE_AUTOINIT_ENV) {
            config.disable_autoinit = Some(Self::parse_bool(DISABLE_AUTOINIT_ENV, &val)?);
        }

        if let Ok(val) = env::var(OUTPUT_FORMAT_ENV) {
            config.output_format = Some(Self::parse_format(&val)?);
        }

        Ok(())
    }

    fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>> {
        match env::var(name) {
            Ok(val) => val.trim().parse().map(Some).map_err(|_| Error::Validation {
                field: name.into(),
                message: format!("Must be a non-negative integer, got '{val}'"),
            }),
            Err(_) => Ok(None),
        }
    }

    /// Accepts true/1/yes/on and false/0/no/off, case-insensitively.
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }

    fn parse_format(s: &str) -> Result<OutputFormat> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(Error::Validation {
                field: OUTPUT_FORMAT_ENV.into(),
                message: format!("Invalid output format: '{s}' (expected table/json/csv)"),
            }),
        }
    }
}
