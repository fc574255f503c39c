//! `crm` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, resolve configuration, dispatch one command.

use clap::Parser;

mod cli;
mod commands;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    commands::run_command(cli)
}
