use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "depgraph")]
#[command(about = "Order and run executions by their declared dependencies")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the order the manifest's executions would run in
    Order {
        /// Path to the JSON manifest
        manifest: PathBuf,
        /// Print JSON instead of one key per line
        #[arg(long)]
        json: bool,
    },

    /// List every circular dependency in the manifest
    Cycles {
        /// Path to the JSON manifest
        manifest: PathBuf,
        /// Print JSON instead of one chain per line
        #[arg(long)]
        json: bool,
    },

    /// Run each execution's command in dependency order
    Run {
        /// Path to the JSON manifest
        manifest: PathBuf,
        /// Print the collected results as JSON
        #[arg(long)]
        json: bool,
        /// Shell used to run commands, invoked as `<shell> -c <command>`
        #[arg(long, default_value = "sh")]
        shell: String,
    },
}
