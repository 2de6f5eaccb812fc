//! Return command implementation.
//!
//! This module implements the `return` command, which retires the oldest
//! reservation a borrower holds for a title and puts the copy back on the
//! shelf.

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database, parse_key, print_dry_run, print_warnings, require_role,
    GlobalOptions,
};
use clap::Args;
use shelf::operations::{ReturnOptions, ReturnPlan};
use shelf::{Permission, PlanExecutor};

/// Return a borrowed copy.
#[derive(Args)]
pub struct ReturnCommand {
    /// Borrower's name
    #[arg(value_name = "BORROWER")]
    pub borrower: String,

    /// Title of the book
    #[arg(value_name = "TITLE")]
    pub title: String,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl ReturnCommand {
    /// Execute the return command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        require_role(global, Permission::Lend)?;
        let key = parse_key(&self.borrower, &self.title)?;

        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let plan = ReturnPlan::new(ReturnOptions::new(key.clone()))
            .build_plan(&db)
            .map_err(CliError::from)?;

        if self.dry_run {
            if !global.quiet {
                print_dry_run(&plan);
            }
            return Ok(());
        }

        // Fails with NoMatchingReservation when the plan warned about no loan
        let result = PlanExecutor::new(&mut db)
            .execute(&plan)
            .map_err(CliError::from)?;

        if !global.quiet {
            eprintln!("Returned '{}' from {}", key.title, key.borrower);
            print_warnings(&result.warnings);
        }

        Ok(())
    }
}
