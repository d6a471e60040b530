use clap::Parser;
use depgraph::cli::{Cli, Commands};
use depgraph::cli_handlers;
use std::process;

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Order { manifest, json } => cli_handlers::handle_order(&manifest, json),
        Commands::Cycles { manifest, json } => cli_handlers::handle_cycles(&manifest, json),
        Commands::Run {
            manifest,
            json,
            shell,
        } => cli_handlers::handle_run(&manifest, json, &shell).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
