//! # Probabilistic Turing Machines: Halting vs Looping
//!
//! This library measures how the completeness of a random transition
//! function decides whether a small single-tape machine halts or falls into
//! a repeating configuration.
//!
//! ## Core Algorithm
//!
//! 1. **Transition generation**: each (state, symbol) pair receives a random
//!    transition with probability p; a missing entry is an implicit halt
//! 2. **Bounded execution**: a fixed-length binary tape, head clamped to
//!    `min(len - 1, 2^head_bits - 1)`
//! 3. **Loop detection**: every configuration (tape, head, state) is recorded
//!    exactly; the first repeat ends the run
//! 4. **Sweep**: for p linearly spaced in `[min_prob, max_prob]`, run many
//!    independent machines and tabulate halt vs loop frequency
//!
//! Because the configuration space is finite, every run terminates.
//!
//! ## Usage Example
//!
//! ```no_run
//! use tm_halting::{Outcome, ProbabilisticMachine};
//!
//! let mut machine = ProbabilisticMachine::builder()
//!     .input(vec![0, 1, 0, 1])
//!     .head_bits(2)
//!     .state_bits(1)
//!     .probability(1.0)
//!     .seed(42)
//!     .build()?;
//! assert_eq!(machine.run()?, Outcome::Looped);
//! # Ok::<(), tm_halting::MachineError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

pub mod experiment; // Probability sweeps, registry and result output
pub mod machine; // Machine engine, transition table, configuration codec

// Re-exports for convenience
pub use experiment::{
    Experiment, ExperimentConfig, ExperimentError, ExperimentRegistry, OutcomeTally, SweepPoint,
    SweepReport,
};
pub use machine::{
    Configuration, MachineParams, Move, Outcome, ProbabilisticMachine, State, StepSignal, Symbol,
    Tape, Transition, TransitionTable,
};

use thiserror::Error;

/// Errors raised while building or running a machine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MachineError {
    /// Degenerate bit-widths or tape length
    #[error("Invalid machine configuration: {0}")]
    InvalidConfiguration(String),

    /// Transition probability outside `[0, 1]`
    #[error("Transition probability {0} is not in [0, 1]")]
    InvalidProbability(f64),

    /// Input symbol other than 0 or 1
    #[error("Input symbol {value} at position {position} is not binary")]
    InvalidSymbol {
        /// Offending cell
        position: usize,
        /// Offending value
        value: u8,
    },

    /// `step()` or `run()` called after the outcome was fixed
    #[error("Machine already terminated with outcome {0}")]
    AlreadyTerminated(Outcome),

    /// The run exceeded its step ceiling without halting or looping
    #[error("Step limit {limit} reached before halting or looping")]
    StepLimitExceeded {
        /// Ceiling that was reached
        limit: u64,
    },
}
