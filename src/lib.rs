// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod ops;
pub mod tree;
pub mod types;
pub mod wear;

use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_with, PlantConfig};
use crate::engine::{Coordinator, Plant, RunReport};
use crate::fs::{FileSystem, RealFileSystem};
use crate::ops::roster_for;
use crate::tree::Role;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - plant loading and validation
/// - the coordinator and its workers
/// - writing the report
pub async fn run(args: CliArgs) -> Result<()> {
    run_with(&RealFileSystem, args).await
}

/// Same as [`run`], reading and writing through `fs`.
///
/// Nothing is written unless the run completes.
pub async fn run_with(fs: &dyn FileSystem, args: CliArgs) -> Result<()> {
    let cfg = load_with(fs, Path::new(&args.input), args.format)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let report = simulate(&cfg).await?;

    let output = Path::new(&args.output);
    fs.write(output, report.render().as_bytes())?;
    info!(output = %output.display(), "report written");

    Ok(())
}

/// Run a validated plant to completion.
pub async fn simulate(cfg: &PlantConfig) -> errors::Result<RunReport> {
    let plant = Plant::from_config(cfg);
    Coordinator::new(plant).run().await
}

/// Simple dry-run output: print machines, rosters and seeds.
fn print_dry_run(cfg: &PlantConfig) {
    let plant = Plant::from_config(cfg);

    println!("prodline dry-run");
    println!("  machines = {}", plant.tree.len());
    println!("  cycles = {}", plant.cycles);
    println!("  threshold = {}", plant.threshold);
    println!("  wear = {:?}", plant.wear);
    println!();

    for machine in plant.tree.machines() {
        let role = machine.role();
        println!("  - machine {} ({role:?})", machine.id);
        if let Some(parent) = machine.parent {
            println!("      parent: {parent}");
        }
        if !machine.children.is_empty() {
            println!("      children: {:?}", machine.children);
        }
        if role != Role::Root {
            let roster: Vec<&str> = roster_for(machine.id).iter().map(|op| op.name()).collect();
            println!("      roster: {roster:?}");
        }
        if let Some(op) = machine.initial_operation {
            println!("      initial operation: {op}");
        }
        if let Some(seed) = &machine.seed {
            println!("      seed: {seed}");
        }
    }

    debug!("dry-run complete (no workers spawned)");
}
