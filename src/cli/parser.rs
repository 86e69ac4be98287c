//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// Include shadow-rs generated build information
use shadow_rs::shadow;
shadow!(build);

/// A GraphQL identity and profile service
#[derive(Parser, Debug)]
#[command(name = "gatehouse")]
#[command(about = "GraphQL identity and profile service")]
#[command(long_about = "
Gatehouse authenticates users through third-party OAuth providers, issues
JWT session tokens, and serves user profiles over a GraphQL API.

EXAMPLES:
    # Start the server with the layered config/ directory
    gatehouse serve

    # Start server on a custom host and port
    gatehouse serve --host 0.0.0.0 --port 8080

    # Use a single configuration file
    gatehouse --config /etc/gatehouse/production.toml serve

    # Run pending database migrations and exit
    gatehouse migrate
")]
#[command(version = build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Use a single TOML file instead of the layered config/ directory.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server (default)
    Serve {
        /// Host address to bind to
        #[arg(long, value_name = "ADDRESS")]
        host: Option<String>,

        /// Port number to listen on
        #[arg(long, value_name = "PORT")]
        port: Option<u16>,
    },

    /// Run pending database migrations and exit
    Migrate,
}
