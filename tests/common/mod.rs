#![allow(dead_code)]

use tm_halting::{ExperimentConfig, ProbabilisticMachine, Symbol};

/// Machine over an explicit input with a seeded transition table
pub fn seeded_machine(
    input: &[Symbol],
    head_bits: u32,
    state_bits: u32,
    probability: f64,
    seed: u64,
) -> ProbabilisticMachine {
    ProbabilisticMachine::builder()
        .input(input.to_vec())
        .head_bits(head_bits)
        .state_bits(state_bits)
        .probability(probability)
        .seed(seed)
        .build()
        .expect("valid machine")
}

/// Small, fast, reproducible sweep configuration
pub fn small_config(seed: u64) -> ExperimentConfig {
    ExperimentConfig {
        num_experiments: 24,
        min_prob: 0.0,
        max_prob: 1.0,
        num_probs: 5,
        tape_bits: 2,
        head_bits: 2,
        state_bits: 2,
        seed: Some(seed),
        ..ExperimentConfig::default()
    }
}
