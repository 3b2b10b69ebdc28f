// tests/reference_equivalence.rs

mod common;

use proptest::prelude::*;
use prodline::config::PlantConfig;
use prodline::ops::roster_for;
use prodline::simulate;

use crate::common::builders::PlantConfigBuilder;
use crate::common::reference::reference_run;

// Strategy to generate a valid plant.
// We ensure a tree by only letting machine i pick a parent among 1..i.
fn plant_strategy(max_machines: u32) -> impl Strategy<Value = PlantConfig> {
    (2..=max_machines).prop_flat_map(|machines| {
        let children = (machines - 1) as usize;
        (
            proptest::collection::vec((any::<u32>(), any::<usize>()), children),
            proptest::collection::vec("[A-Z]{1,6}", machines as usize),
            proptest::collection::vec(0u64..6, 5),
            0usize..6,
            -3i64..12,
        )
            .prop_map(move |(links, seeds, wear, cycles, threshold)| {
                let factors = [wear[0], wear[1], wear[2], wear[3], wear[4]];
                let mut builder = PlantConfigBuilder::new(cycles, threshold).wear(factors);

                let mut has_children = vec![false; machines as usize + 1];
                for (i, (parent_pick, op_pick)) in links.into_iter().enumerate() {
                    let child = i as u32 + 2;
                    let parent = parent_pick % (child - 1) + 1;
                    let roster = roster_for(child);
                    builder = builder.link(child, parent, roster[op_pick % roster.len()]);
                    has_children[parent as usize] = true;
                }

                let leaves = (2..=machines).filter(|id| !has_children[*id as usize]).count();
                for seed in seeds.iter().take(leaves) {
                    builder = builder.seed(seed);
                }
                builder.build()
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn concurrent_run_matches_sequential_reference(cfg in plant_strategy(9)) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .unwrap();

        let report = runtime.block_on(simulate(&cfg)).unwrap();
        let expected = reference_run(&cfg);

        prop_assert_eq!(report.products.len(), cfg.cycles);
        prop_assert_eq!(report, expected);
    }
}
