//! Terminal front end for the survey form.
//!
//! # Responsibility
//! - Drive the same core use-cases the mobile UI calls.
//! - Keep storage/export locations configurable by flag or environment.

mod cli;

use anyhow::Result;
use clap::Parser;
use encuesta_core::init_logging_from_config;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config();

    // Logging is best-effort; the form stays usable without it.
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("warning: logging disabled: {err}");
    }

    let mut stdout = std::io::stdout().lock();
    cli::run(cli.command, &config, &mut stdout)
}
