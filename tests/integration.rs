//! End-to-end machine scenarios

use test_case::test_case;
use tm_halting::{MachineError, Outcome, ProbabilisticMachine, StepSignal};

mod common;
use common::*;

#[test]
fn zero_probability_halts_immediately() {
    let mut machine = seeded_machine(&[0, 1, 0, 1], 2, 1, 0.0, 1);
    assert_eq!(machine.head_position(), 1);
    assert_eq!(machine.current_state(), 0);

    assert_eq!(machine.step().unwrap(), StepSignal::Halt);
    assert_eq!(machine.tape().symbols(), vec![0, 1, 0, 1]);
    assert_eq!(machine.head_position(), 1);
}

#[test]
fn full_probability_loops_within_configuration_space() {
    for seed in 0..64 {
        let mut machine = seeded_machine(&[0, 1, 0, 1], 2, 1, 1.0, seed);
        let outcome = machine.run().expect("run terminates");

        assert_eq!(outcome, Outcome::Looped, "seed {seed}");
        // 2^4 tapes × 4 head positions × 2 states
        assert!(machine.steps() <= 16 * 4 * 2 + 1, "seed {seed}");
        assert_eq!(machine.config_history().len() as u64, machine.steps() - 1);
    }
}

#[test]
fn random_input_has_two_to_the_tape_bits_cells() {
    let machine = ProbabilisticMachine::builder()
        .tape_bits(3)
        .head_bits(1)
        .state_bits(2)
        .probability(0.5)
        .seed(8)
        .build()
        .unwrap();
    assert_eq!(machine.tape().len(), 8);
    assert_eq!(machine.head_limit(), 1);
    assert_eq!(machine.transitions().domain_size(), 8);
}

#[test]
fn explicit_input_sets_the_head_bound() {
    let machine = ProbabilisticMachine::builder()
        .tape_bits(10)
        .head_bits(8)
        .input(vec![1, 1, 0])
        .seed(2)
        .build()
        .unwrap();
    assert_eq!(machine.tape().len(), 3);
    assert_eq!(machine.head_limit(), 2);
}

#[test]
fn outcome_is_fixed_after_run() {
    let mut machine = seeded_machine(&[1, 0, 0, 1, 1], 3, 2, 0.6, 21);
    let outcome = machine.run().unwrap();
    assert!(outcome.is_terminal());

    let history = machine.config_history().len();
    assert_eq!(
        machine.step(),
        Err(MachineError::AlreadyTerminated(outcome))
    );
    assert_eq!(machine.outcome(), outcome);
    assert_eq!(machine.config_history().len(), history);
}

#[test_case(2, 0, 1, 0.5, None ; "zero head bits")]
#[test_case(2, 2, 0, 0.5, None ; "zero state bits")]
#[test_case(0, 2, 1, 0.5, None ; "zero tape bits")]
#[test_case(2, 2, 1, 0.5, Some(vec![1]) ; "single cell input")]
#[test_case(2, 2, 1, 0.5, Some(vec![]) ; "empty input")]
#[test_case(2, 2, 17, 0.5, None ; "too many states")]
fn degenerate_shapes_are_rejected(
    tape_bits: u32,
    head_bits: u32,
    state_bits: u32,
    probability: f64,
    input: Option<Vec<u8>>,
) {
    let mut builder = ProbabilisticMachine::builder()
        .tape_bits(tape_bits)
        .head_bits(head_bits)
        .state_bits(state_bits)
        .probability(probability);
    if let Some(input) = input {
        builder = builder.input(input);
    }
    assert!(matches!(
        builder.build(),
        Err(MachineError::InvalidConfiguration(_))
    ));
}

#[test_case(-0.1 ; "negative")]
#[test_case(1.5 ; "above one")]
#[test_case(f64::NAN ; "nan")]
fn out_of_range_probability_is_rejected(probability: f64) {
    let result = ProbabilisticMachine::builder()
        .probability(probability)
        .build();
    assert!(matches!(result, Err(MachineError::InvalidProbability(_))));
}

#[test]
fn non_binary_input_is_rejected() {
    let result = ProbabilisticMachine::builder()
        .input(vec![0, 1, 3])
        .build();
    assert_eq!(
        result.unwrap_err(),
        MachineError::InvalidSymbol {
            position: 2,
            value: 3
        }
    );
}
