use crate::engine::DependencyExecutionEngine;
use crate::manifest::Manifest;
use crate::shell::ShellExecution;
use crate::sorter;
use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Handle the order command
pub fn handle_order(manifest: &Path, json: bool) -> Result<()> {
    let manifest = Manifest::load(manifest)?;
    let order = sorter::sort(&manifest.executions)?;

    if json {
        println!("{}", json!({ "order": order }));
    } else {
        for key in &order {
            println!("{key}");
        }
    }

    Ok(())
}

/// Handle the cycles command
pub fn handle_cycles(manifest: &Path, json: bool) -> Result<()> {
    let manifest = Manifest::load(manifest)?;
    let graph = sorter::build_graph(&manifest.executions)?;
    let cycles = graph.cycles();

    if json {
        let cycles: Vec<&[String]> = cycles.iter().map(|cycle| cycle.nodes()).collect();
        println!("{}", json!({ "cycles": cycles }));
    } else if cycles.is_empty() {
        println!("No circular dependencies found");
    } else {
        for cycle in &cycles {
            println!("{cycle}");
        }
    }

    Ok(())
}

/// Handle the run command
pub async fn handle_run(manifest: &Path, json: bool, shell: &str) -> Result<()> {
    let manifest = Manifest::load(manifest)?;
    let executions: Vec<ShellExecution> = manifest
        .executions
        .into_iter()
        .map(|entry| ShellExecution::new(entry, shell))
        .collect();

    let cancellation = CancellationToken::new();
    let on_interrupt = cancellation.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling running command");
            on_interrupt.cancel();
        }
    });

    let outcome = DependencyExecutionEngine::new()
        .execute_all_with_results(&executions, &cancellation)
        .await;
    interrupt.abort();

    let results = outcome.context("run aborted")?;
    info!(completed = results.len(), "run finished");

    if json {
        println!("{}", serde_json::to_string(&results)?);
    } else {
        for result in &results {
            match result.result().code {
                Some(code) => println!("{}: exit {code}", result.key()),
                None => println!("{}: skipped", result.key()),
            }
        }
    }

    Ok(())
}
