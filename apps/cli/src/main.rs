mod commands;
mod config;
mod runner;

use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use captable_storage_sqlite::open_scenario_repository;
use commands::Cli;
use config::Config;

fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so the printed table stays clean on stdout.
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?.with_overrides(cli.db, cli.scenario);
    init_tracing(&config.log_format);

    let repository = open_scenario_repository(&config.db_path)?;
    tracing::debug!(
        "Using scenario '{}' in {}",
        config.scenario,
        config.db_path
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    runner::run(cli.command, &config, &repository, &mut out)
}
