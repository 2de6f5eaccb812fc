//! Data directory initialization.
//!
//! Creates the data directory and an empty `shelf.db`, and optionally a
//! commented `config.yaml` listing every setting with its default.

use std::fs;
use std::path::PathBuf;

use crate::config::CONFIG_FILE;
use crate::database::{Database, DatabaseConfig, DATABASE_FILE};
use crate::error::{Error, Result};

/// Options for initialization.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Data directory to initialize.
    pub data_dir: PathBuf,
    /// Replace an existing database.
    pub overwrite: bool,
    /// Write a default configuration file.
    pub create_config: bool,
}

impl InitOptions {
    /// Creates new initialization options.
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            overwrite: false,
            create_config: false,
        }
    }

    /// Sets whether to overwrite an existing database.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether to create a default configuration file.
    #[must_use]
    pub fn with_create_config(mut self, create_config: bool) -> Self {
        self.create_config = create_config;
        self
    }
}

/// Result of initialization.
#[derive(Debug)]
pub struct InitResult {
    /// Whether the data directory was created.
    pub data_dir_created: bool,
    /// Whether the database was created or recreated.
    pub database_created: bool,
    /// Whether a configuration file was created.
    pub config_created: bool,
    /// Path to the data directory.
    pub data_dir: PathBuf,
}

const DEFAULT_CONFIG_TEMPLATE: &str = r"# shelf configuration
# Uncomment a setting to override its default.

# loans:
#   borrowing_cap: 4      # active reservations allowed per borrower
#   default_copies: 1     # copies shelved by add-book when --copies is omitted

# sweeper:
#   overdue_after_days: 7
#   interval_seconds: 86400

# Maximum lock wait time in seconds (default: 5)
# maximum_lock_wait_seconds: 5

# Default format for `shelf list` (table, json or csv)
# output_format: table
";

/// Initializes the data directory and database.
///
/// # Errors
///
/// Returns an error if:
/// - The data directory cannot be created
/// - The database cannot be initialized
/// - The configuration file cannot be written
/// - Overwrite is false and the database already exists
///
/// # Examples
///
/// ```no_run
/// use shelf::operations::{init_database, InitOptions};
/// use std::path::PathBuf;
///
/// let options = InitOptions::new(PathBuf::from("/tmp/shelf-test")).with_create_config(true);
/// let result = init_database(&options).unwrap();
/// println!("Database created: {}", result.database_created);
/// ```
pub fn init_database(options: &InitOptions) -> Result<InitResult> {
    let mut result = InitResult {
        data_dir_created: false,
        database_created: false,
        config_created: false,
        data_dir: options.data_dir.clone(),
    };

    if !options.data_dir.exists() {
        fs::create_dir_all(&options.data_dir)?;
        result.data_dir_created = true;
    }

    let db_path = options.data_dir.join(DATABASE_FILE);
    if db_path.exists() {
        if !options.overwrite {
            return Err(Error::Validation {
                field: "database".into(),
                message: format!(
                    "Database already exists at {}. Use --overwrite to replace it.",
                    db_path.display()
                ),
            });
        }
        fs::remove_file(&db_path)?;
        // WAL side files belong to the old database
        for suffix in ["-wal", "-shm"] {
            let side = options.data_dir.join(format!("{DATABASE_FILE}{suffix}"));
            if side.exists() {
                fs::remove_file(side)?;
            }
        }
    }

    Database::open(DatabaseConfig::new(&db_path))?.verify_integrity()?;
    result.database_created = true;
    log::info!("initialized database at {}", db_path.display());

    if options.create_config {
        let config_path = options.data_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
            result.config_created = true;
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use tempfile::TempDir;

    #[test]
    fn test_init_fresh_directory() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("shelf");

        let result = init_database(&InitOptions::new(data_dir.clone())).unwrap();

        assert!(result.data_dir_created);
        assert!(result.database_created);
        assert!(!result.config_created);
        assert!(data_dir.join(DATABASE_FILE).exists());
    }

    #[test]
    fn test_init_with_config() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("shelf");

        let options = InitOptions::new(data_dir.clone()).with_create_config(true);
        let result = init_database(&options).unwrap();
        assert!(result.config_created);

        let content = fs::read_to_string(data_dir.join(CONFIG_FILE)).unwrap();
        assert!(content.contains("borrowing_cap"));
        assert!(content
            .lines()
            .all(|line| line.trim().is_empty() || line.starts_with('#')));
    }

    #[test]
    fn test_init_fails_without_overwrite() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("shelf");
        init_database(&InitOptions::new(data_dir.clone())).unwrap();

        match init_database(&InitOptions::new(data_dir)) {
            Err(Error::Validation { field, message }) => {
                assert_eq!(field, "database");
                assert!(message.contains("--overwrite"));
            }
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_init_with_overwrite_empties_database() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("shelf");
        init_database(&InitOptions::new(data_dir.clone())).unwrap();

        {
            let mut db = Database::open(DatabaseConfig::new(data_dir.join(DATABASE_FILE))).unwrap();
            crate::add_book(&mut db, crate::database::test_util::dune()).unwrap();
        }

        let options = InitOptions::new(data_dir.clone()).with_overwrite(true);
        let result = init_database(&options).unwrap();
        assert!(!result.data_dir_created);

        let db = Database::open(DatabaseConfig::new(data_dir.join(DATABASE_FILE))).unwrap();
        let books = db.read(|ops| ops.list_books()).unwrap();
        assert!(books.is_empty());
    }

    #[test]
    fn test_init_config_not_overwritten() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("shelf");
        fs::create_dir_all(&data_dir).unwrap();
        let config_path = data_dir.join(CONFIG_FILE);
        fs::write(&config_path, "loans:\n  borrowing_cap: 2\n").unwrap();

        let options = InitOptions::new(data_dir).with_create_config(true);
        let result = init_database(&options).unwrap();
        assert!(!result.config_created);
        assert_eq!(
            fs::read_to_string(&config_path).unwrap(),
            "loans:\n  borrowing_cap: 2\n"
        );
    }
}
