//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::Config;
use crate::error::Result;

/// File name of the configuration file inside the data directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// A parsed configuration file with its precedence level.
///
/// Lower precedence values are overridden by higher ones.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path to the configuration file.
    pub path: PathBuf,
    /// Precedence level (higher values take priority).
    pub precedence: u8,
    /// Parsed configuration.
    pub config: Config,
}

/// Loads configuration files.
///
/// # Examples
///
/// ```no_run
/// use shelf::config::ConfigLoader;
/// use std::path::Path;
///
/// let sources = ConfigLoader::load_all(Some(Path::new("/tmp/shelf"))).unwrap();
/// println!("Found {} configuration sources", sources.len());
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads every configuration file that exists.
    ///
    /// Currently that is only `<data_dir>/config.yaml`, where `data_dir`
    /// defaults to [`resolve_data_dir`](crate::database::resolve_data_dir).
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be read or parsed.
    pub fn load_all(data_dir: Option<&Path>) -> Result<Vec<ConfigSource>> {
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => crate::database::resolve_data_dir()?,
        };

        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let config = Self::load_file(&path)?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(vec![ConfigSource {
            path,
            precedence: 1,
            config,
        }])
    }

    /// Loads and parses one YAML configuration file.
    ///
    /// A file holding only comments and blank lines yields the default
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the file cannot be read,
    /// or [`Error::Configuration`](crate::Error::Configuration) if the YAML
    /// is invalid or contains unknown keys.
    pub fn load_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parses configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`](crate::Error::Configuration) on
    /// invalid YAML or unknown keys.
    pub fn parse(contents: &str) -> Result<Config> {
        let has_content = contents
            .lines()
            .map(str::trim)
            .any(|line| !line.is_empty() && !line.starts_with('#'));
        if !has_content {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }
}
