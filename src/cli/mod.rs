//! Command-line interface.
//!
//! Argument parsing with clap plus the command dispatch that loads
//! configuration, initializes logging, and runs the selected subcommand.

pub mod executor;
pub mod parser;

pub use executor::execute_command;
pub use parser::{Cli, Commands};
