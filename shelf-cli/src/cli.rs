//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    AddBookCommand, InitCommand, ListCommand, LoanCommand, OverdueCommand, ReturnCommand,
    SweepCommand,
};
use clap::{Parser, Subcommand};
use shelf::Role;
use std::path::PathBuf;

/// Command-line tool for tracking library loans and returns.
#[derive(Parser)]
#[command(name = "shelf")]
#[command(version, about = "Track library inventory, loans and returns", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "SHELF_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "SHELF_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u64>,

    /// Disable automatic database initialization
    #[arg(long, global = true, env = "SHELF_DISABLE_AUTOINIT")]
    pub disable_autoinit: bool,

    /// Role of the staff member running the command
    #[arg(long, value_enum, value_name = "ROLE", global = true, env = "SHELF_ROLE")]
    pub role: Option<Role>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and database
    Init(InitCommand),

    /// Add a book to the catalogue
    AddBook(AddBookCommand),

    /// Loan a copy of a book to a borrower
    Loan(LoanCommand),

    /// Return a borrowed copy
    Return(ReturnCommand),

    /// List books or active reservations
    List(ListCommand),

    /// Report reservations older than the overdue threshold
    Overdue(OverdueCommand),

    /// Run the overdue sweeper on an interval
    Sweep(SweepCommand),
}
