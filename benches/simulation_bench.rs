//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tm_halting::experiment::{run_trial, sweep};
use tm_halting::{ExperimentConfig, MachineParams};

fn benchmark_single_run(c: &mut Criterion) {
    let params = MachineParams {
        tape_bits: 4,
        head_bits: 4,
        state_bits: 3,
        probability: 1.0,
    };

    c.bench_function("run_total_table_16_cells", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            black_box(run_trial(params, seed).expect("trial runs"))
        });
    });
}

fn benchmark_sweep(c: &mut Criterion) {
    let config = ExperimentConfig {
        num_experiments: 50,
        seed: Some(42),
        ..ExperimentConfig::default()
    };

    c.bench_function("sweep_default_shape", |b| {
        b.iter(|| black_box(sweep("bench", &config).expect("sweep runs")));
    });
}

criterion_group!(benches, benchmark_single_run, benchmark_sweep);
criterion_main!(benches);
