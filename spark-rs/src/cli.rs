//! Root CLI structure for spark-rs

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "spark-rs")]
#[command(about = "Inspect spark presets and run headless spark simulations", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Built-in preset operations
    Presets {
        #[command(subcommand)]
        command: crate::commands::presets::PresetCommands,
    },

    /// Run bursts of sparks without a renderer and report per-frame stats
    Simulate(crate::commands::simulate::SimulateArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
