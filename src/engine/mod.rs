// src/engine/mod.rs

//! Production run engine.
//!
//! This module ties together:
//! - one worker task per machine ([`worker`]), passing partial products up
//!   the tree over bounded channels
//! - the pure coordinator state machine ([`core`]) that turns incoming
//!   messages into the run report
//! - the async coordinator shell ([`runtime`]) that spawns workers and
//!   multiplexes their messages
//!
//! Workers and the coordinator share nothing mutable. The only shared value
//! is the immutable [`Plant`], handed to every worker behind an `Arc`.

use crate::config::PlantConfig;
use crate::tree::ProductionTree;
use crate::types::{MachineId, WearFactors};
use crate::wear::{LedgerEntry, MaintenanceEvent};

/// Read-only configuration shared by the coordinator and all workers.
#[derive(Debug, Clone)]
pub struct Plant {
    pub tree: ProductionTree,
    pub wear: WearFactors,
    pub threshold: i64,
    pub cycles: usize,
}

impl Plant {
    pub fn from_config(cfg: &PlantConfig) -> Self {
        Self {
            tree: ProductionTree::from_config(cfg),
            wear: cfg.wear,
            threshold: cfg.threshold,
            cycles: cfg.cycles,
        }
    }
}

/// Product handed from a child machine to its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialProduct {
    pub from: MachineId,
    pub cycle: usize,
    pub product: String,
}

/// Envelope for everything workers send to the coordinator.
///
/// The coordinator classifies messages by variant, never by sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorMessage {
    /// The root's combined output for one cycle.
    FinalProduct { cycle: usize, product: String },
    /// A machine reached the maintenance threshold.
    Maintenance(MaintenanceEvent),
}

/// Everything a finished run produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Final product per cycle, in cycle order.
    pub products: Vec<String>,
    /// Costed maintenance events sorted by `(machine, cycle)`.
    pub ledger: Vec<LedgerEntry>,
}

impl RunReport {
    /// Render the output file contents.
    ///
    /// Every product line is newline-terminated; ledger lines are joined by
    /// newlines with none after the last one.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for product in self.products.iter() {
            out.push_str(product);
            out.push('\n');
        }
        let ledger: Vec<String> = self.ledger.iter().map(ToString::to_string).collect();
        out.push_str(&ledger.join("\n"));
        out
    }
}

pub mod core;
pub mod runtime;
pub mod worker;

pub use self::core::{CoordinatorCore, CoreStep};
pub use runtime::Coordinator;
pub use worker::{Downstream, Worker};
