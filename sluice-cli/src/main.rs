//! `sluice` -- command-line front end for grok matching and event transformation

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);

    // `config validate` reports load failures itself, so logging falls back to defaults
    let loaded = commands::load_config(&cli.config).await;
    let mut general = loaded
        .as_ref()
        .map(|config| config.general.clone())
        .unwrap_or_default();
    if let Some(level) = &cli.log_level {
        general.log_level = level.clone();
    }
    logging::init_tracing(&general).map_err(|e| CliError::Config(e.to_string()))?;
    sluice_core::metrics::describe_all();

    tracing::debug!(config = %cli.config.display(), "sluice starting");

    match cli.command {
        Commands::Grok(args) => commands::grok::execute(args, &loaded?, &writer).await,
        Commands::Patterns(args) => commands::patterns::execute(args, &loaded?, &writer).await,
        Commands::Run(args) => commands::run::execute(args, loaded?).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}
