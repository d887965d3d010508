use std::collections::HashSet;

use blake3::hash;
use tm_halting::experiment::sweep;

mod common;
use common::{seeded_machine, small_config};

#[test]
fn seeded_machines_are_identical() {
    let mut fingerprints = HashSet::new();
    let mut outcomes = HashSet::new();
    for _ in 0..5 {
        let mut machine = seeded_machine(&[1, 0, 1, 1, 0, 0], 3, 2, 0.75, 1234);
        fingerprints.insert(machine.transitions().fingerprint());
        outcomes.insert((machine.run().unwrap(), machine.steps()));
    }

    assert_eq!(fingerprints.len(), 1, "transition tables diverged");
    assert_eq!(outcomes.len(), 1, "outcomes diverged");
}

#[test]
fn different_seeds_draw_different_tables() {
    let fingerprints: HashSet<_> = (0..16)
        .map(|seed| {
            seeded_machine(&[0, 1, 0, 1], 2, 3, 0.5, seed)
                .transitions()
                .fingerprint()
        })
        .collect();
    assert!(fingerprints.len() > 1);
}

#[test]
fn seeded_sweeps_are_reproducible() {
    let mut digests = HashSet::new();
    for parallel in [true, false, true] {
        let config = tm_halting::ExperimentConfig {
            parallel,
            ..small_config(77)
        };
        let report = sweep("determinism", &config).expect("sweep succeeds");
        let json = serde_json::to_string(&report).expect("report serialises");
        digests.insert(hash(json.as_bytes()));
    }

    assert_eq!(digests.len(), 1, "sweep results diverged across runs");
}
