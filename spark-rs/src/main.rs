//! spark-rs: preset inspection and headless spark simulation

mod cli;
mod commands;
mod utils;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use log::LevelFilter;
use std::io;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Presets { command } => commands::presets::execute(command),
        Commands::Simulate(args) => commands::simulate::execute(args),
        Commands::Completions { shell } => {
            write_completions(shell);
            Ok(())
        }
    }
}

/// `RUST_LOG` sets the baseline; `-v`/`-q` override it for the engine's
/// per-frame `trace!` output and the CLI's own messages alike
fn init_logging(verbose: u8, quiet: bool) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match (verbose, quiet) {
        (0, true) => log::set_max_level(LevelFilter::Error),
        (0, false) => {}
        (1, _) => log::set_max_level(LevelFilter::Info),
        (2, _) => log::set_max_level(LevelFilter::Debug),
        _ => log::set_max_level(LevelFilter::Trace),
    }
}

fn write_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
