// src/engine/runtime.rs

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::worker::{Downstream, Worker};
use crate::engine::{CoordinatorMessage, PartialProduct, Plant, RunReport};
use crate::errors::{ProdlineError, Result};
use crate::types::MachineId;

use super::core::CoordinatorCore;

/// Capacity of each child -> parent channel. One slot keeps every machine
/// at most one product ahead of its parent.
const LINK_CAPACITY: usize = 1;

/// Capacity of the maintenance report channel.
const REPORT_CAPACITY: usize = 64;

type WorkerHandle = (MachineId, JoinHandle<Result<()>>);

/// Drives a full production run.
///
/// This is the async shell around [`CoordinatorCore`]: it spawns one worker
/// task per machine, multiplexes their messages, and feeds them into the
/// core in the order it observes them.
pub struct Coordinator {
    plant: Arc<Plant>,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("machines", &self.plant.tree.len())
            .field("cycles", &self.plant.cycles)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    /// Accepts an owned [`Plant`] or one already shared through an `Arc`.
    pub fn new(plant: impl Into<Arc<Plant>>) -> Self {
        Self {
            plant: plant.into(),
        }
    }

    /// Run every cycle and return the report.
    ///
    /// - Each loop iteration waits on both the maintenance channel and the
    ///   final-product channel, preferring maintenance reports.
    /// - A final product closes the current cycle.
    /// - After the last cycle the maintenance channel is drained until every
    ///   worker has dropped its sender, so no late report is lost.
    pub async fn run(self) -> Result<RunReport> {
        let cycles = self.plant.cycles;
        info!(
            machines = self.plant.tree.len(),
            cycles,
            threshold = self.plant.threshold,
            "production run started"
        );

        let (report_tx, mut report_rx) = mpsc::channel::<CoordinatorMessage>(REPORT_CAPACITY);
        let (product_tx, mut product_rx) = mpsc::channel::<CoordinatorMessage>(LINK_CAPACITY);

        let workers = self.spawn_workers(report_tx, product_tx).await?;
        let mut core = CoordinatorCore::new(cycles, self.plant.threshold);

        while !core.is_finished() {
            let message = tokio::select! {
                biased;

                Some(message) = report_rx.recv() => message,

                message = product_rx.recv() => match message {
                    Some(message) => message,
                    None => {
                        let cycle = core.current_cycle();
                        return Err(fail_run(workers, ProdlineError::ChannelClosed(format!(
                            "root stopped before delivering the final product of cycle {cycle}"
                        ))).await);
                    }
                },
            };

            debug!(?message, "coordinator received message");

            match core.step(message) {
                Ok(step) => {
                    if let Some(cycle) = step.cycle_completed {
                        debug!(cycle, events = core.events_collected(), "cycle completed");
                    }
                }
                Err(err) => return Err(fail_run(workers, err).await),
            }
        }

        // Barrier: the channel closes once every worker has returned.
        while let Some(message) = report_rx.recv().await {
            debug!(?message, "coordinator drained late message");
            if let Err(err) = core.step(message) {
                return Err(fail_run(workers, err).await);
            }
        }

        join_workers(workers).await?;

        let report = core.finish()?;
        info!(
            cycles = report.products.len(),
            maintenance_events = report.ledger.len(),
            "production run finished"
        );
        Ok(report)
    }

    /// Wire one channel per tree edge and spawn a worker per machine.
    ///
    /// If a machine cannot be wired, the workers spawned so far are stopped
    /// before the error is returned.
    async fn spawn_workers(
        &self,
        report_tx: mpsc::Sender<CoordinatorMessage>,
        product_tx: mpsc::Sender<CoordinatorMessage>,
    ) -> Result<Vec<WorkerHandle>> {
        let tree = &self.plant.tree;

        let mut uplinks: BTreeMap<MachineId, (MachineId, mpsc::Sender<PartialProduct>)> =
            BTreeMap::new();
        let mut inputs: BTreeMap<MachineId, Vec<(MachineId, mpsc::Receiver<PartialProduct>)>> =
            BTreeMap::new();

        for machine in tree.machines() {
            if let Some(parent) = machine.parent {
                let (tx, rx) = mpsc::channel::<PartialProduct>(LINK_CAPACITY);
                uplinks.insert(machine.id, (parent, tx));
                inputs.entry(parent).or_default().push((machine.id, rx));
            }
        }

        let mut product_tx = Some(product_tx);
        let mut workers = Vec::with_capacity(tree.len());

        for machine in tree.machines() {
            let downstream = match uplinks.remove(&machine.id) {
                Some((parent, tx)) => Downstream::Parent { id: parent, tx },
                None => match product_tx.take() {
                    Some(tx) => Downstream::Coordinator(tx),
                    None => {
                        stop_workers(workers).await;
                        return Err(ProdlineError::ConfigError(format!(
                            "machine {} has no parent but the root is already wired",
                            machine.id
                        )));
                    }
                },
            };

            let worker = match Worker::new(
                machine.id,
                Arc::clone(&self.plant),
                inputs.remove(&machine.id).unwrap_or_default(),
                downstream,
                report_tx.clone(),
            ) {
                Ok(worker) => worker,
                Err(err) => {
                    stop_workers(workers).await;
                    return Err(err);
                }
            };

            debug!(machine = machine.id, role = ?worker.role(), "spawning worker");
            workers.push((machine.id, tokio::spawn(worker.run())));
        }

        Ok(workers)
    }
}

/// Abort workers whose run is no longer needed and wait until they are gone.
async fn stop_workers(workers: Vec<WorkerHandle>) {
    for (_, handle) in workers.iter() {
        handle.abort();
    }
    for (machine, handle) in workers {
        match handle.await {
            Err(join_err) if join_err.is_panic() => {
                warn!(machine, error = %join_err, "worker panicked while stopping");
            }
            _ => {}
        }
    }
}

/// Await every worker and surface the first failure.
async fn join_workers(workers: Vec<WorkerHandle>) -> Result<()> {
    let mut first_error = None;

    for (machine, handle) in workers {
        let outcome = match handle.await {
            Ok(result) => result,
            Err(join_err) => Err(ProdlineError::WorkerFailed {
                machine,
                reason: join_err.to_string(),
            }),
        };

        if let Err(err) = outcome {
            warn!(machine, error = %err, "worker failed");
            first_error.get_or_insert(err);
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Stop all workers and report the most specific failure.
///
/// A worker that fails makes its neighbours fail with `ChannelClosed`, so a
/// worker error of any other kind is preferred as the root cause.
async fn fail_run(workers: Vec<WorkerHandle>, coordinator_err: ProdlineError) -> ProdlineError {
    for (_, handle) in workers.iter() {
        handle.abort();
    }

    let mut root_cause = None;
    let mut cascade = None;
    for (machine, handle) in workers {
        let (reason, is_cascade) = match handle.await {
            Ok(Err(err)) => (err.to_string(), matches!(err, ProdlineError::ChannelClosed(_))),
            Err(join_err) if join_err.is_panic() => (join_err.to_string(), false),
            _ => continue,
        };

        warn!(machine, error = %reason, "worker failed");
        let slot = if is_cascade { &mut cascade } else { &mut root_cause };
        slot.get_or_insert(ProdlineError::WorkerFailed { machine, reason });
    }

    root_cause.or(cascade).unwrap_or(coordinator_err)
}
