// src/tree/mod.rs

//! Static production tree derived from a validated [`PlantConfig`].
//!
//! The tree is built once and never mutated; workers read it through the
//! shared [`crate::engine::Plant`].

use std::collections::BTreeMap;

use crate::config::PlantConfig;
use crate::ops::OperationSchedule;
use crate::types::{MachineId, Operation, ROOT_ID};

/// Position of a machine in the tree, which decides its per-cycle input and
/// output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Combines its children and hands the result to the coordinator.
    Root,
    /// Combines its children, operates, and forwards to its parent.
    Internal,
    /// Operates on its seed and forwards to its parent.
    Leaf,
}

/// One machine node.
#[derive(Debug, Clone)]
pub struct Machine {
    pub id: MachineId,
    pub parent: Option<MachineId>,
    /// Child ids in ascending order.
    pub children: Vec<MachineId>,
    pub initial_operation: Option<Operation>,
    pub seed: Option<String>,
}

impl Machine {
    pub fn role(&self) -> Role {
        if self.parent.is_none() {
            Role::Root
        } else if self.children.is_empty() {
            Role::Leaf
        } else {
            Role::Internal
        }
    }

    /// Operation schedule for non-root machines.
    pub fn schedule(&self) -> Option<OperationSchedule> {
        self.initial_operation
            .and_then(|op| OperationSchedule::new(self.id, op))
    }
}

#[derive(Debug, Clone)]
pub struct ProductionTree {
    machines: BTreeMap<MachineId, Machine>,
}

impl ProductionTree {
    /// Build the tree from a validated [`PlantConfig`].
    ///
    /// Assumes that:
    /// - every id in `1..=machines` is reachable from the root
    /// - the number of seeds matches the number of leaves
    pub fn from_config(cfg: &PlantConfig) -> Self {
        let mut machines: BTreeMap<MachineId, Machine> = (1..=cfg.machines)
            .map(|id| {
                (
                    id,
                    Machine {
                        id,
                        parent: None,
                        children: Vec::new(),
                        initial_operation: None,
                        seed: None,
                    },
                )
            })
            .collect();

        for link in cfg.links.iter() {
            if let Some(child) = machines.get_mut(&link.child) {
                child.parent = Some(link.parent);
                child.initial_operation = Some(link.operation);
            }
            if let Some(parent) = machines.get_mut(&link.parent) {
                parent.children.push(link.child);
            }
        }

        for machine in machines.values_mut() {
            machine.children.sort_unstable();
        }

        // Seeds go to leaves in ascending id order; BTreeMap iteration is
        // already ascending.
        let mut seeds = cfg.seeds.iter();
        for machine in machines.values_mut() {
            if machine.children.is_empty() && machine.parent.is_some() {
                machine.seed = seeds.next().cloned();
            }
        }

        Self { machines }
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    pub fn root(&self) -> Option<&Machine> {
        self.machines.get(&ROOT_ID)
    }

    pub fn machine(&self, id: MachineId) -> Option<&Machine> {
        self.machines.get(&id)
    }

    /// All machines in ascending id order.
    pub fn machines(&self) -> impl Iterator<Item = &Machine> {
        self.machines.values()
    }

    pub fn children_of(&self, id: MachineId) -> &[MachineId] {
        self.machines
            .get(&id)
            .map(|m| m.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent_of(&self, id: MachineId) -> Option<MachineId> {
        self.machines.get(&id).and_then(|m| m.parent)
    }

    pub fn role_of(&self, id: MachineId) -> Option<Role> {
        self.machines.get(&id).map(Machine::role)
    }

    /// Leaf ids in ascending order.
    pub fn leaves(&self) -> impl Iterator<Item = MachineId> + '_ {
        self.machines
            .values()
            .filter(|m| m.role() == Role::Leaf)
            .map(|m| m.id)
    }
}
