// src/ops/roster.rs

use crate::types::{MachineId, Operation};

/// Roster cycled by machines with an even id.
pub const EVEN_ROSTER: [Operation; 3] = [Operation::Enhance, Operation::Split, Operation::Chop];

/// Roster cycled by machines with an odd id.
pub const ODD_ROSTER: [Operation; 2] = [Operation::Reverse, Operation::Trim];

/// Roster a machine cycles through, chosen by id parity.
pub fn roster_for(machine: MachineId) -> &'static [Operation] {
    if machine % 2 == 0 {
        &EVEN_ROSTER
    } else {
        &ODD_ROSTER
    }
}

/// Per-machine operation selection.
///
/// The operation at cycle `c` is `roster[(start + c) % roster.len()]`, where
/// `start` is the position of the machine's initial operation. Selection is
/// stateless given the cycle index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSchedule {
    roster: &'static [Operation],
    start: usize,
}

impl OperationSchedule {
    /// Returns `None` if `initial` is not part of the machine's roster.
    pub fn new(machine: MachineId, initial: Operation) -> Option<Self> {
        let roster = roster_for(machine);
        let start = roster.iter().position(|op| *op == initial)?;
        Some(Self { roster, start })
    }

    pub fn at(&self, cycle: usize) -> Operation {
        self.roster[(self.start + cycle) % self.roster.len()]
    }

    pub fn roster(&self) -> &'static [Operation] {
        self.roster
    }
}
