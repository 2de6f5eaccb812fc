//! Library exports for shelf-cli.
//!
//! This module exports the CLI structure so benches and documentation
//! tooling can reach it.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::Cli;
