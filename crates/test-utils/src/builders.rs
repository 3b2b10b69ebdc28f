#![allow(dead_code)]

use prodline::config::{LinkConfig, PlantConfig, RawPlantConfig};
use prodline::types::{MachineId, Operation, WearFactors};

/// Builder for `PlantConfig` to simplify test setup.
///
/// The machine count defaults to `links + 1`.
pub struct PlantConfigBuilder {
    config: RawPlantConfig,
    machines: Option<u32>,
}

impl PlantConfigBuilder {
    pub fn new(cycles: usize, threshold: i64) -> Self {
        Self {
            config: RawPlantConfig {
                machines: 0,
                cycles,
                wear: WearFactors::default(),
                threshold,
                links: Vec::new(),
                seeds: Vec::new(),
            },
            machines: None,
        }
    }

    /// Wear factors in input order: enhance, reverse, chop, trim, split.
    pub fn wear(mut self, factors: [u64; 5]) -> Self {
        self.config.wear = WearFactors::from_ordered(factors);
        self
    }

    pub fn link(mut self, child: MachineId, parent: MachineId, operation: Operation) -> Self {
        self.config.links.push(LinkConfig {
            child,
            parent,
            operation,
        });
        self
    }

    /// Seeds are assigned to leaves in ascending id order.
    pub fn seed(mut self, seed: &str) -> Self {
        self.config.seeds.push(seed.to_string());
        self
    }

    pub fn machines(mut self, machines: u32) -> Self {
        self.machines = Some(machines);
        self
    }

    pub fn build_raw(mut self) -> RawPlantConfig {
        self.config.machines = self
            .machines
            .unwrap_or(self.config.links.len() as u32 + 1);
        self.config
    }

    pub fn build(self) -> PlantConfig {
        PlantConfig::try_from(self.build_raw()).expect("Failed to build valid plant from builder")
    }
}

/// The three-machine chain `1 <- 2 <- 3` used across tests: leaf 3 starts
/// with reverse (wear 5), machine 2 starts with split (wear 0).
pub fn reverse_chain(cycles: usize, threshold: i64) -> PlantConfigBuilder {
    PlantConfigBuilder::new(cycles, threshold)
        .wear([0, 5, 0, 0, 0])
        .link(2, 1, Operation::Split)
        .link(3, 2, Operation::Reverse)
        .seed("ABCDE")
}
