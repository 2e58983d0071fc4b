//! firemerge CLI - Command-line interface
//!
//! Loads configuration, optionally downloads feeds, merges detections and
//! writes the ranked fires.

mod cli;
mod commands;
mod config_loader;
mod errors;
mod output;
mod output_types;
mod progress;

use clap::Parser;
use cli::Cli;
use output::OutputWriter;

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();
    let output = OutputWriter::new(cli.json);

    if let Err(e) = commands::run::execute(cli, &output) {
        errors::from_anyhow(e).display();
        std::process::exit(1);
    }
}
