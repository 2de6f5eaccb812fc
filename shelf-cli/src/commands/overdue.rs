//! Overdue command implementation.
//!
//! Runs a single sweep cycle and prints the overdue reservations it found.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database_read_only, GlobalOptions};
use clap::Args;
use shelf::output::OutputFormat;
use shelf::{CollectingNotifier, Sweeper, DAY};
use std::io::Write;

/// Report reservations older than the overdue threshold.
#[derive(Args)]
pub struct OverdueCommand {
    /// Overdue threshold in days (default: sweeper.overdue_after_days, normally 7)
    #[arg(long, value_name = "DAYS", value_parser = clap::value_parser!(u32).range(1..))]
    pub days: Option<u32>,

    /// Output format (default: output_format from config, else table)
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,
}

impl OverdueCommand {
    /// Execute the overdue command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let threshold = self
            .days
            .map_or_else(|| config.overdue_threshold(), |days| DAY * days);
        let format = self.format.or(config.output_format).unwrap_or_default();

        let db = open_database_read_only(global, &config)?;
        let notifier = CollectingNotifier::new();
        let mut sweeper = Sweeper::new(db, notifier.clone(), threshold);
        let report = sweeper.run_cycle().map_err(CliError::from)?;
        let overdue = notifier.drain();

        let rendered = format
            .create_formatter()
            .format_reservations(&overdue, report.checked_at)
            .map_err(CliError::from)?;

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{}", rendered.trim_end())?;

        if global.verbose {
            eprintln!(
                "{} reservation(s) older than {} day(s)",
                overdue.len(),
                threshold.as_secs() / DAY.as_secs()
            );
        }

        Ok(())
    }
}
