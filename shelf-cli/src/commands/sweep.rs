//! Sweep command implementation.
//!
//! Runs the overdue sweeper in the foreground. Every overdue reservation
//! found is logged as a warning. Without `--cycles` the command runs until
//! it is killed.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database_read_only, GlobalOptions};
use clap::Args;
use shelf::sweeper::Schedule;
use shelf::{LogNotifier, Sweeper, DAY};
use std::time::Duration;

/// Run the overdue sweeper on an interval.
#[derive(Args)]
pub struct SweepCommand {
    /// Seconds between cycles (default: sweeper.interval_seconds, normally 86400)
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Stop after this many cycles
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub cycles: Option<u64>,

    /// Overdue threshold in days (default: sweeper.overdue_after_days, normally 7)
    #[arg(long, value_name = "DAYS", value_parser = clap::value_parser!(u32).range(1..))]
    pub days: Option<u32>,
}

impl SweepCommand {
    /// Execute the sweep command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let threshold = self
            .days
            .map_or_else(|| config.overdue_threshold(), |days| DAY * days);
        let interval = self
            .interval
            .map_or_else(|| config.sweep_interval(), Duration::from_secs);

        let db = open_database_read_only(global, &config)?;

        let mut schedule = Schedule::every(interval).starting_immediately();
        if let Some(cycles) = self.cycles {
            schedule = schedule.limited_to(cycles);
        }

        if !global.quiet {
            eprintln!(
                "Sweeping every {}s for reservations older than {} day(s)",
                interval.as_secs(),
                threshold.as_secs() / DAY.as_secs()
            );
        }

        let stats = Sweeper::new(db, LogNotifier, threshold)
            .spawn(schedule)
            .join();

        if !global.quiet {
            eprintln!(
                "Completed {} cycle(s), {} failed, {} overdue report(s)",
                stats.cycles, stats.failed_cycles, stats.reported
            );
        }

        Ok(())
    }
}
