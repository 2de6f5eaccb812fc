//! Configuration system.
//!
//! Settings are layered from several sources, highest precedence first:
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`SHELF_*`)
//! 3. `<data_dir>/config.yaml`
//! 4. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use shelf::config::ConfigBuilder;
//! use std::path::Path;
//!
//! let config = ConfigBuilder::new()
//!     .with_data_dir(Path::new("/var/lib/shelf"))
//!     .build()
//!     .unwrap();
//!
//! println!("borrowing cap: {}", config.loan_policy().borrowing_cap);
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource, CONFIG_FILE};
pub use merger::ConfigMerger;
pub use schema::{Config, LoanConfig, OutputFormat, SweeperConfig};
pub use validator::ConfigValidator;
