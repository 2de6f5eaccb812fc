//! Build script for shelf-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("shelf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Track library inventory, loans and returns")
        .long_about(
            "Command-line tool for loaning and returning library books while keeping \
             copy counts and per-borrower limits consistent",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("SHELF_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the default busy timeout (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("SHELF_BUSY_TIMEOUT"),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic database initialization")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .env("SHELF_DISABLE_AUTOINIT"),
        )
        .arg(
            Arg::new("role")
                .long("role")
                .help("Role of the staff member running the command")
                .value_name("ROLE")
                .value_parser(["librarian", "senior-librarian"])
                .global(true)
                .env("SHELF_ROLE"),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Initialize the data directory and database")
                .long_about("Create the shelf data directory, database and optional config file"),
            Command::new("add-book")
                .about("Add a book to the catalogue")
                .long_about("Catalogue a new title with its copies on the shelf (senior librarians only)"),
            Command::new("loan")
                .about("Loan a copy of a book to a borrower")
                .long_about("Move one copy of a title from the shelf to a borrower, within the borrowing cap"),
            Command::new("return")
                .about("Return a borrowed copy")
                .long_about("Retire the borrower's oldest reservation of a title and restock the copy"),
            Command::new("list")
                .about("List books or active reservations")
                .long_about("Display the catalogue or active reservations as a table, JSON or CSV"),
            Command::new("overdue")
                .about("Report reservations older than the overdue threshold")
                .long_about("Run one overdue sweep and print the reservations it found"),
            Command::new("sweep")
                .about("Run the overdue sweeper on an interval")
                .long_about("Run overdue sweeps in the foreground, logging each overdue reservation"),
        ])
}

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("failed to create man directory");

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer).expect("failed to render man page");

    fs::write(man_dir.join("shelf.1"), buffer).expect("failed to write man page");

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
