//! Single-threaded reference simulation used to cross-check the engine.

use std::collections::BTreeMap;

use prodline::config::PlantConfig;
use prodline::engine::RunReport;
use prodline::ops;
use prodline::tree::{ProductionTree, Role};
use prodline::types::MachineId;
use prodline::wear::LedgerEntry;

/// Run every cycle depth-first on the current thread.
pub fn reference_run(cfg: &PlantConfig) -> RunReport {
    let tree = ProductionTree::from_config(cfg);
    let mut wear: BTreeMap<MachineId, u64> = BTreeMap::new();
    let mut events: Vec<(MachineId, u64, u64, usize)> = Vec::new();
    let mut products = Vec::with_capacity(cfg.cycles);

    for cycle in 0..cfg.cycles {
        let root = tree.root().expect("validated tree has a root");
        products.push(produce(cfg, &tree, root.id, cycle, &mut wear, &mut events));
    }

    events.sort_by_key(|(machine, _, _, cycle)| (*machine, *cycle));
    let ledger = events
        .into_iter()
        .map(|(machine, accumulated, factor, cycle)| LedgerEntry {
            machine,
            cost: ((i128::from(accumulated) - i128::from(cfg.threshold) + 1) * i128::from(factor))
                as u64,
            cycle,
        })
        .collect();

    RunReport { products, ledger }
}

fn produce(
    cfg: &PlantConfig,
    tree: &ProductionTree,
    id: MachineId,
    cycle: usize,
    wear: &mut BTreeMap<MachineId, u64>,
    events: &mut Vec<(MachineId, u64, u64, usize)>,
) -> String {
    let machine = tree.machine(id).expect("machine exists");

    let input = match machine.role() {
        Role::Leaf => machine.seed.clone().expect("leaf has a seed"),
        Role::Root | Role::Internal => {
            let mut parts = String::new();
            for child in machine.children.iter() {
                parts.push_str(&produce(cfg, tree, *child, cycle, wear, events));
            }
            parts
        }
    };

    if machine.role() == Role::Root {
        return input;
    }

    let op = machine.schedule().expect("non-root has a schedule").at(cycle);
    let factor = cfg.wear.factor(op);
    let total = wear.entry(id).or_default();
    *total += factor;
    if i128::from(*total) >= i128::from(cfg.threshold) {
        events.push((id, *total, factor, cycle));
        *total = 0;
    }

    ops::apply(op, &input)
}
