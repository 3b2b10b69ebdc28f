// src/engine/worker.rs

//! Per-machine worker state machine.
//!
//! Each cycle a worker moves through:
//! `AwaitingInput -> Computing -> Reporting (optional) -> Forwarding`.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::engine::{CoordinatorMessage, PartialProduct, Plant};
use crate::errors::{ProdlineError, Result};
use crate::ops::{self, OperationSchedule};
use crate::tree::Role;
use crate::types::MachineId;
use crate::wear::WearAccumulator;

/// Where a worker sends its per-cycle output.
#[derive(Debug)]
pub enum Downstream {
    /// Non-root machines feed their parent.
    Parent {
        id: MachineId,
        tx: mpsc::Sender<PartialProduct>,
    },
    /// The root hands final products to the coordinator.
    Coordinator(mpsc::Sender<CoordinatorMessage>),
}

/// Worker for one machine.
///
/// Owns its wear accumulator and the receiving ends of its children's
/// channels; nothing here is shared with other workers.
#[derive(Debug)]
pub struct Worker {
    id: MachineId,
    plant: Arc<Plant>,
    role: Role,
    seed: Option<String>,
    schedule: Option<OperationSchedule>,
    inputs: Vec<(MachineId, mpsc::Receiver<PartialProduct>)>,
    downstream: Downstream,
    reports: mpsc::Sender<CoordinatorMessage>,
    wear: WearAccumulator,
}

impl Worker {
    /// Build the worker for machine `id`.
    ///
    /// `inputs` must hold one receiver per child of `id`.
    pub fn new(
        id: MachineId,
        plant: Arc<Plant>,
        mut inputs: Vec<(MachineId, mpsc::Receiver<PartialProduct>)>,
        downstream: Downstream,
        reports: mpsc::Sender<CoordinatorMessage>,
    ) -> Result<Self> {
        let machine = plant.tree.machine(id).ok_or_else(|| {
            ProdlineError::ConfigError(format!("machine {id} is not part of the production tree"))
        })?;
        let role = machine.role();

        inputs.sort_by_key(|(child, _)| *child);
        let wired: Vec<MachineId> = inputs.iter().map(|(child, _)| *child).collect();
        if wired != machine.children {
            return Err(ProdlineError::ConfigError(format!(
                "machine {id} expects inputs from {:?} but was wired to {wired:?}",
                machine.children
            )));
        }

        let schedule = match role {
            Role::Root => None,
            Role::Internal | Role::Leaf => Some(machine.schedule().ok_or_else(|| {
                ProdlineError::ConfigError(format!(
                    "machine {id} has no valid initial operation"
                ))
            })?),
        };

        let seed = match role {
            Role::Leaf => Some(machine.seed.clone().ok_or_else(|| {
                ProdlineError::ConfigError(format!("leaf machine {id} has no seed product"))
            })?),
            Role::Root | Role::Internal => None,
        };

        match (&downstream, role) {
            (Downstream::Coordinator(_), Role::Root) => {}
            (Downstream::Parent { id: parent, .. }, Role::Internal | Role::Leaf)
                if machine.parent == Some(*parent) => {}
            _ => {
                return Err(ProdlineError::ConfigError(format!(
                    "machine {id} is wired to the wrong downstream"
                )));
            }
        }

        Ok(Self {
            id,
            plant,
            role,
            seed,
            schedule,
            inputs,
            downstream,
            reports,
            wear: WearAccumulator::new(),
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Run every cycle, then return.
    pub async fn run(mut self) -> Result<()> {
        debug!(machine = self.id, role = ?self.role, "worker started");

        for cycle in 0..self.plant.cycles {
            let input = self.await_input(cycle).await?;

            let output = match self.schedule {
                Some(schedule) => {
                    let output = self.compute(schedule, cycle, &input);
                    self.report(cycle).await?;
                    output
                }
                // The root only assembles.
                None => input,
            };

            self.forward(cycle, output).await?;
        }

        debug!(machine = self.id, "worker finished all cycles");
        Ok(())
    }

    async fn await_input(&mut self, cycle: usize) -> Result<String> {
        if let Some(seed) = &self.seed {
            return Ok(seed.clone());
        }

        let mut parts = Vec::with_capacity(self.inputs.len());
        for (child, rx) in self.inputs.iter_mut() {
            let part = rx.recv().await.ok_or_else(|| {
                ProdlineError::ChannelClosed(format!(
                    "machine {} stopped before delivering cycle {cycle} to machine {}",
                    child, self.id
                ))
            })?;

            if part.from != *child || part.cycle != cycle {
                return Err(ProdlineError::ProtocolViolation(format!(
                    "machine {} expected cycle {cycle} from machine {child}, got cycle {} from machine {}",
                    self.id, part.cycle, part.from
                )));
            }
            parts.push((part.from, part.product));
        }

        Ok(ops::combine(parts))
    }

    fn compute(&mut self, schedule: OperationSchedule, cycle: usize, input: &str) -> String {
        let operation = schedule.at(cycle);
        let factor = self.plant.wear.factor(operation);
        let output = ops::apply(operation, input);
        self.wear.record(factor);

        trace!(
            machine = self.id,
            cycle,
            operation = %operation,
            input,
            output = %output,
            wear = self.wear.total(),
            "operation applied"
        );
        output
    }

    /// Send a maintenance event if the threshold was reached. The send is
    /// awaited before the product moves on, so the event is enqueued ahead of
    /// anything that depends on this cycle's output.
    async fn report(&mut self, cycle: usize) -> Result<()> {
        let Some(event) = self.wear.check(self.plant.threshold, self.id, cycle) else {
            return Ok(());
        };

        info!(
            machine = self.id,
            cycle,
            accumulated_wear = event.accumulated_wear,
            last_wear_factor = event.last_wear_factor,
            "maintenance threshold reached"
        );

        self.reports
            .send(CoordinatorMessage::Maintenance(event))
            .await
            .map_err(|_| {
                ProdlineError::ChannelClosed(format!(
                    "coordinator stopped accepting maintenance reports (machine {}, cycle {cycle})",
                    self.id
                ))
            })
    }

    async fn forward(&mut self, cycle: usize, product: String) -> Result<()> {
        match &self.downstream {
            Downstream::Parent { id: parent, tx } => {
                let part = PartialProduct {
                    from: self.id,
                    cycle,
                    product,
                };
                tx.send(part).await.map_err(|_| {
                    ProdlineError::ChannelClosed(format!(
                        "machine {parent} stopped before receiving cycle {cycle} from machine {}",
                        self.id
                    ))
                })
            }
            Downstream::Coordinator(tx) => {
                debug!(cycle, product = %product, "root assembled final product");
                tx.send(CoordinatorMessage::FinalProduct { cycle, product })
                    .await
                    .map_err(|_| {
                        ProdlineError::ChannelClosed(format!(
                            "coordinator stopped before receiving the final product of cycle {cycle}"
                        ))
                    })
            }
        }
    }
}
