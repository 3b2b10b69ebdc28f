// src/engine/core.rs

//! Pure coordinator state machine.
//!
//! Consumes [`CoordinatorMessage`]s one at a time and keeps:
//! - the final products received so far, in cycle order
//! - every maintenance event, whatever cycle's poll loop observed it
//!
//! It has no channels, no Tokio types and performs no IO, so the ordering
//! rules can be tested directly.

use crate::engine::{CoordinatorMessage, RunReport};
use crate::errors::{ProdlineError, Result};
use crate::wear::MaintenanceLedger;

/// Outcome of feeding one message to the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreStep {
    /// The cycle whose final product was just recorded, if any.
    pub cycle_completed: Option<usize>,
    /// Whether every cycle now has its final product.
    pub run_finished: bool,
}

#[derive(Debug)]
pub struct CoordinatorCore {
    cycles: usize,
    threshold: i64,
    products: Vec<String>,
    ledger: MaintenanceLedger,
}

impl CoordinatorCore {
    pub fn new(cycles: usize, threshold: i64) -> Self {
        Self {
            cycles,
            threshold,
            products: Vec::new(),
            ledger: MaintenanceLedger::new(),
        }
    }

    /// Cycle whose final product is awaited next.
    pub fn current_cycle(&self) -> usize {
        self.products.len()
    }

    pub fn is_finished(&self) -> bool {
        self.products.len() >= self.cycles
    }

    /// Number of maintenance events collected so far.
    pub fn events_collected(&self) -> usize {
        self.ledger.len()
    }

    pub fn step(&mut self, message: CoordinatorMessage) -> Result<CoreStep> {
        match message {
            CoordinatorMessage::FinalProduct { cycle, product } => {
                self.record_product(cycle, product)?;
                Ok(CoreStep {
                    cycle_completed: Some(cycle),
                    run_finished: self.is_finished(),
                })
            }
            CoordinatorMessage::Maintenance(event) => {
                if event.cycle >= self.cycles {
                    return Err(ProdlineError::ProtocolViolation(format!(
                        "machine {} reported maintenance for cycle {} but the run has {} cycles",
                        event.machine, event.cycle, self.cycles
                    )));
                }
                self.ledger.record(event);
                Ok(CoreStep {
                    cycle_completed: None,
                    run_finished: self.is_finished(),
                })
            }
        }
    }

    fn record_product(&mut self, cycle: usize, product: String) -> Result<()> {
        if self.is_finished() {
            return Err(ProdlineError::ProtocolViolation(format!(
                "final product for cycle {cycle} arrived after all {} cycles completed",
                self.cycles
            )));
        }
        let expected = self.current_cycle();
        if cycle != expected {
            return Err(ProdlineError::ProtocolViolation(format!(
                "final product for cycle {cycle} arrived while waiting for cycle {expected}"
            )));
        }
        self.products.push(product);
        Ok(())
    }

    /// Sort and cost the ledger and hand back the report.
    pub fn finish(self) -> Result<RunReport> {
        if !self.is_finished() {
            return Err(ProdlineError::ProtocolViolation(format!(
                "run ended after {} of {} cycles",
                self.products.len(),
                self.cycles
            )));
        }
        Ok(RunReport {
            products: self.products,
            ledger: self.ledger.finalize(self.threshold),
        })
    }
}
