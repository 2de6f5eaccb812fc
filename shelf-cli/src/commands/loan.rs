//! Loan command implementation.
//!
//! Loans one copy of a title to a borrower. On success the new
//! reservation's id is printed to stdout.

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database, parse_key, print_dry_run, print_warnings, require_role,
    GlobalOptions,
};
use clap::Args;
use shelf::operations::{LoanOptions, LoanPlan};
use shelf::{Permission, PlanExecutor};

/// Loan a copy of a book.
#[derive(Args)]
pub struct LoanCommand {
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

impl LoanCommand {
    /// Execute the loan command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        require_role(global, Permission::Lend)?;
        let key = parse_key(&self.borrower, &self.title)?;

        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let plan = LoanPlan::new(LoanOptions::new(key), &config.loan_policy())
            .build_plan(&db)
            .map_err(CliError::from)?;

        if self.dry_run {
            if !global.quiet {
                print_dry_run(&plan);
            }
            return Ok(());
        }

        // The executor re-checks the cap and availability in its transaction
        let result = PlanExecutor::new(&mut db)
            .execute(&plan)
            .map_err(CliError::from)?;

        if let Some(reservation) = result.reservation() {
            println!("{}", reservation.id());
            if !global.quiet {
                eprintln!(
                    "Loaned '{}' to {}",
                    reservation.title(),
                    reservation.borrower()
                );
            }
        }
        if !global.quiet {
            print_warnings(&result.warnings);
        }

        Ok(())
    }
}
