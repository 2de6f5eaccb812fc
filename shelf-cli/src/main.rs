//! Main entry point for the shelf CLI.
//!
//! This is the command-line interface for the shelf loan/return engine.
//! It provides commands for running a library counter:
//! - `add-book`: Catalogue a book
//! - `loan`: Loan a copy to a borrower
//! - `return`: Return a borrowed copy
//! - `list`: List books or active reservations
//! - `overdue` / `sweep`: Report overdue reservations

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let _level = shelf::init_logger(cli.verbose, cli.quiet);

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        disable_autoinit: cli.disable_autoinit,
        role: cli.role,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::AddBook(cmd) => cmd.execute(&global),
        cli::Command::Loan(cmd) => cmd.execute(&global),
        cli::Command::Return(cmd) => cmd.execute(&global),
        cli::Command::List(cmd) => cmd.execute(&global),
        cli::Command::Overdue(cmd) => cmd.execute(&global),
        cli::Command::Sweep(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
