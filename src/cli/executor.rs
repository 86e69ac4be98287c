//! Command executor for dispatching CLI commands
//!
//! This module loads configuration, applies CLI overrides, and dispatches
//! to the selected subcommand.

use super::parser::{Cli, Commands};
use crate::config::{ConfigLoader, Settings};
use crate::db::run_pending_migrations;
use crate::logger::init_logger;
use crate::server::Server;

/// Load settings, honoring a `--config` file when given.
pub fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::with_config_file(path),
        None => ConfigLoader::new()?,
    };
    Ok(loader.load()?)
}

/// Apply CLI overrides on top of the loaded settings.
fn apply_overrides(cli: &Cli, settings: &mut Settings) {
    if let Some(Commands::Serve { host, port }) = &cli.command {
        if let Some(host) = host {
            settings.server.host = host.clone();
        }
        if let Some(port) = port {
            settings.server.port = *port;
        }
    }

    if cli.verbose {
        settings.logger.level = "debug".to_string();
    } else if cli.quiet {
        settings.logger.level = "error".to_string();
    }
}

/// Execute the parsed CLI command.
pub async fn execute_command(cli: Cli) -> anyhow::Result<()> {
    let mut settings = load_settings(&cli)?;
    apply_overrides(&cli, &mut settings);

    init_logger(&settings.logger)?;

    match cli.command {
        Some(Commands::Migrate) => {
            tracing::info!("Running pending database migrations...");
            run_pending_migrations(&settings.database).await?;
            tracing::info!("Database migrations complete");
            Ok(())
        }
        Some(Commands::Serve { .. }) | None => Server::new(settings).run().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn serve_overrides_host_and_port() {
        let cli = Cli::parse_from(["gatehouse", "serve", "--host", "0.0.0.0", "--port", "9000"]);
        let mut settings = Settings::default();
        apply_overrides(&cli, &mut settings);

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 9000);
    }

    #[test]
    fn verbose_raises_log_level() {
        let cli = Cli::parse_from(["gatehouse", "--verbose", "serve"]);
        let mut settings = Settings::default();
        apply_overrides(&cli, &mut settings);

        assert_eq!(settings.logger.level, "debug");
    }

    #[test]
    fn quiet_lowers_log_level() {
        let cli = Cli::parse_from(["gatehouse", "--quiet"]);
        let mut settings = Settings::default();
        apply_overrides(&cli, &mut settings);

        assert_eq!(settings.logger.level, "error");
    }
}
