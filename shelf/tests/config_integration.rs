//! Configuration layering across file, environment and overrides.

use std::env;
use std::fs;
use std::time::Duration;

use serial_test::serial;
use shelf::config::environment::{BORROWING_CAP_ENV, LOCK_WAIT_ENV, OUTPUT_FORMAT_ENV};
use shelf::config::{Config, ConfigBuilder, SweeperConfig, CONFIG_FILE};
use shelf::{Error, OutputFormat, DAY};
use tempfile::TempDir;

struct EnvGuard(&'static [&'static str]);

impl EnvGuard {
    fn set(vars: &'static [&'static str], values: &[&str]) -> Self {
        for (var, value) in vars.iter().zip(values) {
            env::set_var(var, value);
        }
        Self(vars)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in self.0 {
            env::remove_var(var);
        }
    }
}

fn data_dir_with(contents: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE), contents).unwrap();
    dir
}

#[test]
#[serial]
fn file_values_apply_over_defaults() {
    let dir = data_dir_with(
        "loans:\n  borrowing_cap: 6\nsweeper:\n  overdue_after_days: 14\noutput_format: json\n",
    );

    let config = ConfigBuilder::new().with_data_dir(dir.path()).build().unwrap();

    assert_eq!(config.loan_policy().borrowing_cap, 6);
    assert_eq!(config.default_copies(), 1);
    assert_eq!(config.overdue_threshold(), DAY * 14);
    assert_eq!(config.output_format, Some(OutputFormat::Json));
}

#[test]
#[serial]
fn environment_beats_file_and_overrides_beat_environment() {
    let dir = data_dir_with("loans:\n  borrowing_cap: 6\nmaximum_lock_wait_seconds: 2\n");
    let _guard = EnvGuard::set(
        &[BORROWING_CAP_ENV, LOCK_WAIT_ENV, OUTPUT_FORMAT_ENV],
        &["3", "9", "csv"],
    );

    let config = ConfigBuilder::new()
        .with_data_dir(dir.path())
        .with_config(Config {
            maximum_lock_wait_seconds: Some(30),
            ..Default::default()
        })
        .build()
        .unwrap();

    assert_eq!(config.loan_policy().borrowing_cap, 3);
    assert_eq!(config.busy_timeout(), Duration::from_secs(30));
    assert_eq!(config.output_format, Some(OutputFormat::Csv));
}

#[test]
#[serial]
fn missing_file_means_defaults() {
    let dir = TempDir::new().unwrap();

    let config = ConfigBuilder::new().with_data_dir(dir.path()).build().unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.loan_policy().borrowing_cap, 4);
    assert_eq!(config.overdue_threshold(), DAY * 7);
    assert!(config.autoinit());
}

#[test]
#[serial]
fn unknown_key_is_rejected() {
    let dir = data_dir_with("loans:\n  borrowing_limit: 6\n");

    let err = ConfigBuilder::new()
        .with_data_dir(dir.path())
        .build()
        .unwrap_err();

    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
#[serial]
fn zero_interval_fails_validation() {
    let err = ConfigBuilder::new()
        .skip_files()
        .skip_env()
        .with_config(Config {
            sweeper: Some(SweeperConfig {
                overdue_after_days: None,
                interval_seconds: Some(0),
            }),
            ..Default::default()
        })
        .build()
        .unwrap_err();

    assert!(matches!(err, Error::Validation { ref field, .. } if field == "sweeper.interval_seconds"));
}

#[test]
#[serial]
fn malformed_environment_value_is_an_error() {
    let _guard = EnvGuard::set(&[BORROWING_CAP_ENV], &["many"]);

    let err = ConfigBuilder::new().skip_files().build().unwrap_err();

    assert!(matches!(err, Error::Validation { .. }));
}
