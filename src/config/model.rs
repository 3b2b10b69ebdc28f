// src/config/model.rs

use serde::Deserialize;

use crate::types::{MachineId, Operation, WearFactors};

/// Plant description exactly as read from the input, before validation.
///
/// Both input encodings produce this type. The TOML encoding mirrors the
/// line format:
///
/// ```toml
/// machines = 3
/// cycles = 1
/// threshold = 5
/// seeds = ["ABCDE"]
///
/// [wear]
/// enhance = 1
/// reverse = 5
///
/// [[link]]
/// child = 2
/// parent = 1
/// operation = "reverse"
///
/// [[link]]
/// child = 3
/// parent = 2
/// operation = "trim"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlantConfig {
    /// Number of machines `N`; ids run from 1 to `N`.
    pub machines: u32,

    /// Number of production cycles to run.
    pub cycles: usize,

    /// Wear factor per operation. Missing entries default to 0.
    #[serde(default)]
    pub wear: WearFactors,

    /// Accumulated wear at which a machine reports for maintenance.
    pub threshold: i64,

    /// `N - 1` adjacency records.
    #[serde(default, rename = "link")]
    pub links: Vec<LinkConfig>,

    /// One seed per leaf, assigned in ascending leaf-id order.
    #[serde(default)]
    pub seeds: Vec<String>,
}

/// One adjacency record: `child` feeds `parent` and starts with `operation`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkConfig {
    pub child: MachineId,
    pub parent: MachineId,
    pub operation: Operation,
}

/// A validated plant description.
///
/// Only constructed through `TryFrom<RawPlantConfig>`, so holders can rely
/// on the topology being a tree rooted at machine 1 with one seed per leaf.
#[derive(Debug, Clone)]
pub struct PlantConfig {
    pub machines: u32,
    pub cycles: usize,
    pub wear: WearFactors,
    pub threshold: i64,
    pub links: Vec<LinkConfig>,
    pub seeds: Vec<String>,
}

impl PlantConfig {
    pub(crate) fn new_unchecked(raw: RawPlantConfig) -> Self {
        Self {
            machines: raw.machines,
            cycles: raw.cycles,
            wear: raw.wear,
            threshold: raw.threshold,
            links: raw.links,
            seeds: raw.seeds,
        }
    }
}
