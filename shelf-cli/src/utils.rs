//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including data directory resolution, configuration loading, database
//! management and the role check.

use crate::error::CliError;
use shelf::database::DATABASE_FILE;
use shelf::{
    Config, ConfigBuilder, Database, DatabaseConfig, LoanKey, OperationPlan, Permission, Role,
};
use std::path::PathBuf;
use std::time::Duration;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u64>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,

    /// Role of the staff member running the command.
    pub role: Option<Role>,
}

/// Resolve the data directory: `--data-dir`, then `$SHELF_DATA_DIR`, then `~/.shelf`.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match global.data_dir {
        Some(ref dir) => Ok(dir.clone()),
        None => shelf::database::resolve_data_dir().map_err(|e| CliError::Config(e.to_string())),
    }
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Environment variables
/// 2. `config.yaml` in the data directory
/// 3. Built-in defaults
///
/// Global flags such as `--busy-timeout` are applied on top by the callers
/// that use them.
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;

    ConfigBuilder::new()
        .with_data_dir(&data_dir)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

fn database_config(global: &GlobalOptions, config: &Config) -> Result<DatabaseConfig, CliError> {
    let db_path = resolve_data_dir(global)?.join(DATABASE_FILE);
    let timeout = global
        .busy_timeout
        .map_or_else(|| config.busy_timeout(), Duration::from_secs);

    Ok(DatabaseConfig::new(db_path).with_busy_timeout(timeout))
}

fn open_with(db_config: DatabaseConfig) -> Result<Database, CliError> {
    Database::open(db_config).map_err(|e| match e {
        shelf::Error::NotFound { .. } => CliError::NoDataDirectory,
        e => CliError::from(e),
    })
}

/// Open database with configuration.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is
/// disabled by flag or configuration.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    let mut db_config = database_config(global, config)?;
    if global.disable_autoinit || !config.autoinit() {
        db_config = db_config.without_auto_create();
    }
    open_with(db_config)
}

/// Open an existing database read-only, for commands that never write.
///
/// A missing database is created first, subject to the same auto-init
/// rules as [`open_database`], so reports on a fresh data directory work.
pub fn open_database_read_only(
    global: &GlobalOptions,
    config: &Config,
) -> Result<Database, CliError> {
    let db_config = database_config(global, config)?;
    if !db_config.path.exists() {
        drop(open_database(global, config)?);
    }
    open_with(db_config.read_only())
}

/// Check that the `--role` given grants `permission`.
pub fn require_role(global: &GlobalOptions, permission: Permission) -> Result<Role, CliError> {
    shelf::authorize(global.role, permission).map_err(CliError::from)
}

/// Build a loan key from command-line arguments.
pub fn parse_key(borrower: &str, title: &str) -> Result<LoanKey, CliError> {
    LoanKey::parse(borrower, title).map_err(|e| CliError::InvalidArguments(e.to_string()))
}

/// Print a plan's actions and warnings to stderr for `--dry-run`.
pub fn print_dry_run(plan: &OperationPlan) {
    eprintln!("Dry run - would perform the following actions:");
    for (i, action) in plan.actions.iter().enumerate() {
        eprintln!("  {}. {}", i + 1, action.description());
    }
    print_warnings(&plan.warnings);
}

/// Print warnings to stderr.
pub fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("Warning: {warning}");
    }
}
