// src/wear/mod.rs

//! Wear accounting and the maintenance ledger.
//!
//! Workers own a [`WearAccumulator`] each and emit [`MaintenanceEvent`]s.
//! The coordinator collects them in a [`MaintenanceLedger`] and turns them
//! into costed [`LedgerEntry`] lines once the run is over.

use std::fmt;

use crate::types::MachineId;

/// Cost of one maintenance event: `(accumulated - threshold + 1) * factor`.
///
/// The threshold may be negative. A span below one costs nothing, and the
/// product saturates at `u64::MAX`.
pub fn maintenance_cost(accumulated_wear: u64, threshold: i64, last_wear_factor: u64) -> u64 {
    let span = i128::from(accumulated_wear) - i128::from(threshold) + 1;
    u64::try_from(span.max(0))
        .unwrap_or(u64::MAX)
        .saturating_mul(last_wear_factor)
}

/// Reported by a machine whose accumulated wear reached the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceEvent {
    pub machine: MachineId,
    pub accumulated_wear: u64,
    pub last_wear_factor: u64,
    /// 0-based cycle in which the threshold was reached.
    pub cycle: usize,
}

impl MaintenanceEvent {
    pub fn cost(&self, threshold: i64) -> u64 {
        maintenance_cost(self.accumulated_wear, threshold, self.last_wear_factor)
    }
}

/// Per-machine wear counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct WearAccumulator {
    total: u64,
    last_factor: u64,
}

impl WearAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Charge the wear of one operation.
    pub fn record(&mut self, factor: u64) {
        self.total = self.total.saturating_add(factor);
        self.last_factor = factor;
    }

    /// If the threshold has been reached, produce the event and reset.
    ///
    /// At most one event is produced per crossing because the counter is
    /// zeroed as soon as the event is taken. A threshold of zero or below
    /// is reached after every operation.
    pub fn check(
        &mut self,
        threshold: i64,
        machine: MachineId,
        cycle: usize,
    ) -> Option<MaintenanceEvent> {
        if u64::try_from(threshold).is_ok_and(|threshold| self.total < threshold) {
            return None;
        }

        let event = MaintenanceEvent {
            machine,
            accumulated_wear: self.total,
            last_wear_factor: self.last_factor,
            cycle,
        };
        self.total = 0;
        Some(event)
    }
}

/// One output line of the maintenance log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry {
    pub machine: MachineId,
    pub cost: u64,
    /// 0-based cycle; printed 1-based.
    pub cycle: usize,
}

impl fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.machine, self.cost, self.cycle + 1)
    }
}

/// Unordered collection of events for the whole run.
#[derive(Debug, Clone, Default)]
pub struct MaintenanceLedger {
    events: Vec<MaintenanceEvent>,
}

impl MaintenanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: MaintenanceEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events sorted by `(machine, cycle)`.
    pub fn sorted_events(&self) -> Vec<MaintenanceEvent> {
        let mut events = self.events.clone();
        events.sort_by_key(|e| (e.machine, e.cycle));
        events
    }

    /// Sort and cost every event.
    pub fn finalize(self, threshold: i64) -> Vec<LedgerEntry> {
        let mut events = self.events;
        events.sort_by_key(|e| (e.machine, e.cycle));
        events
            .into_iter()
            .map(|e| LedgerEntry {
                machine: e.machine,
                cost: e.cost(threshold),
                cycle: e.cycle,
            })
            .collect()
    }
}
