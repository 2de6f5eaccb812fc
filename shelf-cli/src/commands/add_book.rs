//! Add-book command implementation.
//!
//! Catalogues a new title. Only a senior librarian may do this.

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database, print_dry_run, print_warnings, require_role,
    GlobalOptions,
};
use clap::Args;
use shelf::operations::{AddBookOptions, AddBookPlan};
use shelf::{NewBook, Permission, PlanExecutor, Title};

/// Add a book to the catalogue.
#[derive(Args)]
pub struct AddBookCommand {
    /// Title of the book
    #[arg(value_name = "TITLE")]
    pub title: String,

    /// Author of the book
    #[arg(long, value_name = "AUTHOR", default_value = "")]
    pub author: String,

    /// Number of copies to shelve (default: loans.default_copies, normally 1)
    #[arg(long, value_name = "N")]
    pub copies: Option<u32>,

    /// Name of the librarian adding the book
    #[arg(long, value_name = "NAME")]
    pub added_by: Option<String>,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl AddBookCommand {
    /// Execute the add-book command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        require_role(global, Permission::AddBooks)?;

        let title =
            Title::new(&self.title).map_err(|e| CliError::InvalidArguments(e.to_string()))?;

        let config = load_configuration(global)?;
        let copies = self.copies.unwrap_or_else(|| config.default_copies());
        if copies == 0 {
            return Err(CliError::InvalidArguments(
                "--copies must be at least 1".to_string(),
            ));
        }

        let book = NewBook::new(title, self.author.trim())
            .with_copies(copies)
            .added_by(self.added_by);

        let mut db = open_database(global, &config)?;

        let plan = AddBookPlan::new(AddBookOptions::new(book))
            .build_plan(&db)
            .map_err(CliError::from)?;

        if self.dry_run {
            if !global.quiet {
                print_dry_run(&plan);
            }
            return Ok(());
        }

        let result = PlanExecutor::new(&mut db)
            .execute(&plan)
            .map_err(CliError::from)?;

        if !global.quiet {
            if let Some(book) = result.book() {
                eprintln!(
                    "Added '{}' with {} cop{}",
                    book.title,
                    book.num_available,
                    if book.num_available == 1 { "y" } else { "ies" }
                );
            }
            print_warnings(&result.warnings);
        }

        Ok(())
    }
}
