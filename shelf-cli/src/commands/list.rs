//! List command implementation.
//!
//! This module implements the `list` command, which displays the catalogue
//! or the active reservations as a table, JSON or CSV.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database_read_only, GlobalOptions};
use clap::{Args, ValueEnum};
use shelf::output::OutputFormat;
use shelf::{Borrower, ReservationFilter, Store, Title};
use std::io::Write;
use std::time::SystemTime;

/// What to list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ListSubject {
    /// Catalogued books with their copy counts
    #[default]
    Books,
    /// Active reservations, oldest first
    Reservations,
}

/// List books or active reservations.
#[derive(Args)]
pub struct ListCommand {
    /// What to list
    #[arg(value_enum, default_value_t = ListSubject::Books)]
    pub subject: ListSubject,

    /// Output format (default: output_format from config, else table)
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,

    /// Only reservations held by this borrower
    #[arg(long, value_name = "BORROWER")]
    pub borrower: Option<String>,

    /// Only reservations of this title
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if self.subject == ListSubject::Books && (self.borrower.is_some() || self.title.is_some())
        {
            return Err(CliError::InvalidArguments(
                "--borrower and --title only apply to `list reservations`".to_string(),
            ));
        }

        let config = load_configuration(global)?;
        let format = self
            .format
            .or(config.output_format)
            .unwrap_or_default();
        let db = open_database_read_only(global, &config)?;
        let formatter = format.create_formatter();

        let rendered = match self.subject {
            ListSubject::Books => {
                let books = db.read(|ops| ops.list_books()).map_err(CliError::from)?;
                formatter.format_books(&books)
            }
            ListSubject::Reservations => {
                let filter = self.filter()?;
                let reservations = db
                    .read(|ops| ops.list_reservations(&filter))
                    .map_err(CliError::from)?;
                formatter.format_reservations(&reservations, SystemTime::now())
            }
        }
        .map_err(CliError::from)?;

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        write!(handle, "{rendered}")?;
        if !rendered.ends_with('\n') {
            writeln!(handle)?;
        }

        Ok(())
    }

    fn filter(&self) -> Result<ReservationFilter, CliError> {
        let mut filter = ReservationFilter::all();
        if let Some(ref borrower) = self.borrower {
            let borrower =
                Borrower::new(borrower).map_err(|e| CliError::InvalidArguments(e.to_string()))?;
            filter = filter.borrower(borrower);
        }
        if let Some(ref title) = self.title {
            let title =
                Title::new(title).map_err(|e| CliError::InvalidArguments(e.to_string()))?;
            filter = filter.title(title);
        }
        Ok(filter)
    }
}
