// src/config/validate.rs

use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{PlantConfig, RawPlantConfig};
use crate::errors::{ProdlineError, Result};
use crate::ops::OperationSchedule;
use crate::types::{MachineId, ROOT_ID};

impl TryFrom<RawPlantConfig> for PlantConfig {
    type Error = crate::errors::ProdlineError;

    fn try_from(raw: RawPlantConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(PlantConfig::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawPlantConfig) -> Result<()> {
    ensure_has_machines(cfg)?;
    validate_links(cfg)?;
    validate_tree(cfg)?;
    validate_initial_operations(cfg)?;
    validate_seeds(cfg)?;
    Ok(())
}

fn config_error(msg: impl Into<String>) -> ProdlineError {
    ProdlineError::ConfigError(msg.into())
}

fn ensure_has_machines(cfg: &RawPlantConfig) -> Result<()> {
    if cfg.machines < 2 {
        return Err(config_error(format!(
            "plant needs a root and at least one child machine (got {} machines)",
            cfg.machines
        )));
    }
    Ok(())
}

fn validate_links(cfg: &RawPlantConfig) -> Result<()> {
    let expected = (cfg.machines - 1) as usize;
    if cfg.links.len() != expected {
        return Err(config_error(format!(
            "expected {expected} adjacency records for {} machines, got {}",
            cfg.machines,
            cfg.links.len()
        )));
    }

    let in_range = |id: MachineId| (1..=cfg.machines).contains(&id);
    let mut children_seen = BTreeSet::new();

    for link in cfg.links.iter() {
        if !in_range(link.child) {
            return Err(config_error(format!(
                "child machine {} is outside 1..={}",
                link.child, cfg.machines
            )));
        }
        if !in_range(link.parent) {
            return Err(config_error(format!(
                "machine {} has unknown parent {}",
                link.child, link.parent
            )));
        }
        if link.child == ROOT_ID {
            return Err(config_error(format!(
                "root machine {ROOT_ID} cannot have a parent (got {})",
                link.parent
            )));
        }
        if link.child == link.parent {
            return Err(config_error(format!(
                "machine {} cannot be its own parent",
                link.child
            )));
        }
        if !children_seen.insert(link.child) {
            return Err(config_error(format!(
                "machine {} has more than one parent",
                link.child
            )));
        }
    }

    Ok(())
}

/// With `N - 1` unique child ids drawn from `2..=N`, the links form a tree
/// rooted at machine 1 exactly when there is no cycle.
fn validate_tree(cfg: &RawPlantConfig) -> Result<()> {
    // Edge direction: child -> parent.
    let mut graph: DiGraphMap<MachineId, ()> = DiGraphMap::new();

    for id in 1..=cfg.machines {
        graph.add_node(id);
    }
    for link in cfg.links.iter() {
        graph.add_edge(link.child, link.parent, ());
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(config_error(format!(
            "cycle detected in production tree involving machine {}; machines in a cycle never reach the root",
            cycle.node_id()
        ))),
    }
}

fn validate_initial_operations(cfg: &RawPlantConfig) -> Result<()> {
    for link in cfg.links.iter() {
        if OperationSchedule::new(link.child, link.operation).is_none() {
            let parity = if link.child % 2 == 0 { "even" } else { "odd" };
            return Err(config_error(format!(
                "machine {} has initial operation '{}' which is not in the {parity}-id roster",
                link.child, link.operation
            )));
        }
    }
    Ok(())
}

fn validate_seeds(cfg: &RawPlantConfig) -> Result<()> {
    let leaves = leaf_ids(cfg);
    if cfg.seeds.len() != leaves.len() {
        return Err(config_error(format!(
            "expected {} leaf products (for leaves {:?}), got {}",
            leaves.len(),
            leaves,
            cfg.seeds.len()
        )));
    }
    Ok(())
}

/// Machines without children, in ascending id order.
pub(crate) fn leaf_ids(cfg: &RawPlantConfig) -> Vec<MachineId> {
    let mut child_counts: BTreeMap<MachineId, usize> = BTreeMap::new();
    for link in cfg.links.iter() {
        *child_counts.entry(link.parent).or_default() += 1;
    }

    (1..=cfg.machines)
        .filter(|id| !child_counts.contains_key(id))
        .collect()
}
