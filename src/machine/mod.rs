//! Probabilistic Turing machine representation and execution
//!
//! A single fixed-length binary tape, a bounded head and `2^state_bits`
//! control states. The transition function is partial and drawn at random
//! at construction time; a missing entry halts the machine. Execution stops
//! either on a halt or the first time a configuration repeats.

mod config;
mod transition;

pub use config::{Configuration, Tape};
pub use transition::{Move, Transition, TransitionTable};

use crate::MachineError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, trace};

/// Tape symbol (0 or 1)
pub type Symbol = u8;

/// Machine state (element of Q)
pub type State = u32;

/// Size of the tape alphabet
pub const SYMBOLS: usize = 2;

/// Head position every machine starts from
pub const INITIAL_HEAD: usize = 1;

/// Largest accepted `tape_bits` when the input is generated
pub const MAX_TAPE_BITS: u32 = 20;

/// Largest accepted `state_bits`
pub const MAX_STATE_BITS: u32 = 16;

/// Terminal classification of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Not yet run to termination
    Unresolved,

    /// No transition for the current (state, symbol)
    Halted,

    /// A configuration repeated
    Looped,

    /// The step ceiling was reached before halting or looping
    StepLimit,
}

impl Outcome {
    /// True once the machine may no longer be stepped
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Unresolved)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Unresolved => "unresolved",
            Outcome::Halted => "halt",
            Outcome::Looped => "loop",
            Outcome::StepLimit => "step-limit",
        };
        f.write_str(label)
    }
}

/// Result of a single `step()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSignal {
    /// A transition fired
    Continue,

    /// No transition exists; tape, head and state are untouched
    Halt,
}

/// Shape of a machine: bit-widths plus transition probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachineParams {
    /// Random inputs have `2^tape_bits` cells
    pub tape_bits: u32,

    /// The head never moves past `2^head_bits - 1`
    pub head_bits: u32,

    /// The machine has `2^state_bits` states
    pub state_bits: u32,

    /// Chance that any (state, symbol) pair has a transition
    pub probability: f64,
}

impl MachineParams {
    /// Check bit-widths and probability, independently of any input
    ///
    /// `input_len` is the explicit input length, or `None` when the tape is
    /// generated from `tape_bits`.
    pub fn validate(&self, input_len: Option<usize>) -> Result<(), MachineError> {
        if !self.probability.is_finite() || !(0.0..=1.0).contains(&self.probability) {
            return Err(MachineError::InvalidProbability(self.probability));
        }
        if self.head_bits == 0 || self.head_bits >= usize::BITS {
            return Err(MachineError::InvalidConfiguration(format!(
                "head_bits must be in 1..{}, got {}",
                usize::BITS,
                self.head_bits
            )));
        }
        if self.state_bits == 0 || self.state_bits > MAX_STATE_BITS {
            return Err(MachineError::InvalidConfiguration(format!(
                "state_bits must be in 1..={}, got {}",
                MAX_STATE_BITS, self.state_bits
            )));
        }
        let tape_len = match input_len {
            Some(len) => len,
            None => {
                if self.tape_bits == 0 || self.tape_bits > MAX_TAPE_BITS {
                    return Err(MachineError::InvalidConfiguration(format!(
                        "tape_bits must be in 1..={}, got {}",
                        MAX_TAPE_BITS, self.tape_bits
                    )));
                }
                1usize << self.tape_bits
            }
        };
        if tape_len <= INITIAL_HEAD {
            return Err(MachineError::InvalidConfiguration(format!(
                "tape of length {} cannot hold the initial head position {}",
                tape_len, INITIAL_HEAD
            )));
        }
        Ok(())
    }

    /// Number of control states
    pub fn num_states(&self) -> usize {
        1usize << self.state_bits
    }

    /// Total configuration bits, `tape_bits + head_bits + state_bits`
    pub fn config_bits(&self) -> u32 {
        self.tape_bits
            .saturating_add(self.head_bits)
            .saturating_add(self.state_bits)
    }

    /// Largest head index reachable on a tape of `tape_len` cells
    pub fn head_limit(&self, tape_len: usize) -> usize {
        let addressable = 1usize
            .checked_shl(self.head_bits)
            .map_or(usize::MAX, |span| span - 1);
        addressable.min(tape_len.saturating_sub(1))
    }
}

/// Single-tape machine with a random partial transition function
///
/// Built once, mutated only by stepping, and terminated exactly once.
#[derive(Debug, Clone)]
pub struct ProbabilisticMachine {
    params: MachineParams,
    tape: Tape,
    head_position: usize,
    head_limit: usize,
    current_state: State,
    transitions: TransitionTable,
    outcome: Outcome,
    config_history: HashSet<Configuration>,
    steps: u64,
    step_limit: u64,
}

impl ProbabilisticMachine {
    /// Create fluent builder
    pub fn builder() -> ProbabilisticMachineBuilder {
        ProbabilisticMachineBuilder::new()
    }

    /// Construct a machine, drawing the input (when absent) and then the
    /// transition table from `rng`
    pub fn new<R: Rng + ?Sized>(
        params: MachineParams,
        input: Option<&[Symbol]>,
        rng: &mut R,
    ) -> Result<Self, MachineError> {
        params.validate(input.map(<[Symbol]>::len))?;

        let tape = match input {
            Some(symbols) => Tape::from_symbols(symbols)?,
            None => Tape::random(1usize << params.tape_bits, rng),
        };
        let transitions = TransitionTable::random(params.num_states(), params.probability, rng);
        let head_limit = params.head_limit(tape.len());

        let mut machine = Self {
            params,
            tape,
            head_position: INITIAL_HEAD,
            head_limit,
            current_state: 0,
            transitions,
            outcome: Outcome::Unresolved,
            config_history: HashSet::new(),
            steps: 0,
            step_limit: 0,
        };
        machine.step_limit = machine.configuration_space().saturating_add(1);

        debug!(
            tape = %machine.tape,
            head_limit,
            states = params.num_states(),
            probability = params.probability,
            defined = machine.transitions.defined(),
            "constructed machine"
        );
        Ok(machine)
    }

    /// Execute one transition
    ///
    /// A missing transition returns [`StepSignal::Halt`] and leaves the
    /// machine untouched. Stepping a machine whose outcome is already fixed
    /// is rejected.
    pub fn step(&mut self) -> Result<StepSignal, MachineError> {
        if self.outcome.is_terminal() {
            return Err(MachineError::AlreadyTerminated(self.outcome));
        }
        self.steps += 1;

        let symbol = self.tape.read(self.head_position);
        let Some(&transition) = self.transitions.get(self.current_state, symbol) else {
            return Ok(StepSignal::Halt);
        };

        self.tape.write(self.head_position, transition.write);
        self.current_state = transition.next_state;
        self.head_position = transition
            .direction
            .apply(self.head_position, self.head_limit);
        Ok(StepSignal::Continue)
    }

    /// Step until the machine halts or revisits a configuration
    pub fn run(&mut self) -> Result<Outcome, MachineError> {
        if self.outcome.is_terminal() {
            return Err(MachineError::AlreadyTerminated(self.outcome));
        }

        // history starts empty, so only steps taken by this run count
        let start = self.steps;
        loop {
            if self.steps - start >= self.step_limit {
                self.outcome = Outcome::StepLimit;
                return Err(MachineError::StepLimitExceeded {
                    limit: self.step_limit,
                });
            }

            let signal = self.step()?;
            let current = self.configuration();
            trace!(step = self.steps, config = %current, "stepped");

            if signal == StepSignal::Halt {
                self.config_history.insert(current);
                self.outcome = Outcome::Halted;
                break;
            }
            if !self.config_history.insert(current) {
                self.outcome = Outcome::Looped;
                break;
            }
        }

        debug!(
            outcome = %self.outcome,
            steps = self.steps,
            history = self.config_history.len(),
            "machine terminated"
        );
        Ok(self.outcome)
    }

    /// Encoded current configuration
    pub fn configuration(&self) -> Configuration {
        Configuration::capture(&self.tape, self.head_position, self.current_state)
    }

    /// Number of distinct configurations reachable on this tape,
    /// `2^tape_len × (head_limit + 1) × 2^state_bits` (saturating)
    pub fn configuration_space(&self) -> u64 {
        let tapes = u32::try_from(self.tape.len())
            .ok()
            .and_then(|len| 2u64.checked_pow(len))
            .unwrap_or(u64::MAX);
        let heads = self.head_limit as u64 + 1;
        tapes
            .saturating_mul(heads)
            .saturating_mul(self.params.num_states() as u64)
    }

    /// Construction parameters
    pub fn params(&self) -> &MachineParams {
        &self.params
    }

    /// Tape contents
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Current head index
    pub fn head_position(&self) -> usize {
        self.head_position
    }

    /// Largest head index, `min(tape_len - 1, 2^head_bits - 1)`
    pub fn head_limit(&self) -> usize {
        self.head_limit
    }

    /// Current control state
    pub fn current_state(&self) -> State {
        self.current_state
    }

    /// Terminal classification, `Unresolved` until `run()` finishes
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Configurations recorded by `run()`
    pub fn config_history(&self) -> &HashSet<Configuration> {
        &self.config_history
    }

    /// Transition table
    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    /// Executed steps, including a final halting lookup
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Step ceiling enforced by each `run()`, counted from its first step
    pub fn step_limit(&self) -> u64 {
        self.step_limit
    }

    /// Total configuration bits
    pub fn config_bits(&self) -> u32 {
        self.params.config_bits()
    }

    fn set_step_limit(&mut self, limit: u64) {
        self.step_limit = limit;
    }
}

/// Builder for probabilistic machines (fluent API)
#[derive(Debug)]
pub struct ProbabilisticMachineBuilder {
    tape_bits: u32,
    head_bits: u32,
    state_bits: u32,
    probability: f64,
    input: Option<Vec<Symbol>>,
    seed: Option<u64>,
    step_limit: Option<u64>,
}

impl ProbabilisticMachineBuilder {
    /// Create new builder
    pub fn new() -> Self {
        Self {
            tape_bits: 2,
            head_bits: 2,
            state_bits: 1,
            probability: 0.5,
            input: None,
            seed: None,
            step_limit: None,
        }
    }

    /// Set tape bits (random input length is `2^tape_bits`)
    pub fn tape_bits(mut self, bits: u32) -> Self {
        self.tape_bits = bits;
        self
    }

    /// Set head bits
    pub fn head_bits(mut self, bits: u32) -> Self {
        self.head_bits = bits;
        self
    }

    /// Set state bits
    pub fn state_bits(mut self, bits: u32) -> Self {
        self.state_bits = bits;
        self
    }

    /// Set transition probability
    pub fn probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// Use an explicit input instead of a random one
    pub fn input(mut self, symbols: Vec<Symbol>) -> Self {
        self.input = Some(symbols);
        self
    }

    /// Seed the generator for reproducible machines
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Override the default step ceiling
    pub fn step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }

    /// Build the machine
    pub fn build(self) -> Result<ProbabilisticMachine, MachineError> {
        let params = MachineParams {
            tape_bits: self.tape_bits,
            head_bits: self.head_bits,
            state_bits: self.state_bits,
            probability: self.probability,
        };
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let mut machine = ProbabilisticMachine::new(params, self.input.as_deref(), &mut rng)?;
        if let Some(limit) = self.step_limit {
            machine.set_step_limit(limit);
        }
        Ok(machine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(probability: f64) -> ProbabilisticMachine {
        ProbabilisticMachine::builder()
            .tape_bits(2)
            .head_bits(2)
            .state_bits(1)
            .input(vec![0, 1, 0, 1])
            .probability(probability)
            .seed(11)
            .build()
            .unwrap()
    }

    #[test]
    fn test_initial_configuration() {
        let machine = scenario(0.5);
        assert_eq!(machine.head_position(), 1);
        assert_eq!(machine.current_state(), 0);
        assert_eq!(machine.outcome(), Outcome::Unresolved);
        assert_eq!(machine.head_limit(), 3);
        assert_eq!(machine.config_bits(), 5);
        assert!(machine.config_history().is_empty());
    }

    #[test]
    fn test_step_halts_without_transitions() {
        let mut machine = scenario(0.0);
        let signal = machine.step().unwrap();

        assert_eq!(signal, StepSignal::Halt);
        assert_eq!(machine.tape().symbols(), vec![0, 1, 0, 1]);
        assert_eq!(machine.head_position(), 1);
        assert_eq!(machine.current_state(), 0);
    }

    #[test]
    fn test_run_halts_after_one_step() {
        let mut machine = scenario(0.0);
        assert_eq!(machine.run().unwrap(), Outcome::Halted);
        assert_eq!(machine.steps(), 1);
        assert_eq!(machine.config_history().len(), 1);
        assert!(machine.config_history().contains(&machine.configuration()));
    }

    #[test]
    fn test_total_table_loops() {
        let mut machine = scenario(1.0);
        assert_eq!(machine.configuration_space(), 16 * 4 * 2);
        assert_eq!(machine.run().unwrap(), Outcome::Looped);
        assert!(machine.steps() <= machine.configuration_space() + 1);
        assert_eq!(machine.config_history().len() as u64, machine.steps() - 1);
    }

    #[test]
    fn test_terminated_machine_rejects_steps() {
        let mut machine = scenario(0.0);
        machine.run().unwrap();
        assert!(matches!(
            machine.step(),
            Err(MachineError::AlreadyTerminated(Outcome::Halted))
        ));
        assert!(matches!(
            machine.run(),
            Err(MachineError::AlreadyTerminated(Outcome::Halted))
        ));
    }

    #[test]
    fn test_step_limit_is_reported() {
        let mut machine = ProbabilisticMachine::builder()
            .input(vec![0, 1, 0, 1])
            .probability(1.0)
            .seed(3)
            .step_limit(0)
            .build()
            .unwrap();
        assert!(matches!(
            machine.run(),
            Err(MachineError::StepLimitExceeded { limit: 0 })
        ));
        assert_eq!(machine.outcome(), Outcome::StepLimit);
        assert!(machine.step().is_err());
    }

    #[test]
    fn test_manual_steps_do_not_consume_run_budget() {
        let mut machine = scenario(1.0);
        let limit = machine.step_limit();
        for _ in 0..limit - 1 {
            assert_eq!(machine.step().unwrap(), StepSignal::Continue);
        }
        assert_eq!(machine.steps(), limit - 1);
        assert_eq!(machine.run().unwrap(), Outcome::Looped);
        assert!(machine.steps() - (limit - 1) <= limit);
    }

    #[test]
    fn test_config_bits_saturate_with_explicit_input() {
        let machine = ProbabilisticMachine::builder()
            .tape_bits(u32::MAX)
            .input(vec![0, 1])
            .seed(4)
            .build()
            .unwrap();
        assert_eq!(machine.tape().len(), 2);
        assert_eq!(machine.config_bits(), u32::MAX);
    }

    #[test]
    fn test_head_bits_bound_the_head() {
        let mut table = TransitionTable::empty(2);
        table.set(
            0,
            0,
            Some(Transition {
                next_state: 0,
                write: 0,
                direction: Move::Right,
            }),
        );
        let mut machine = ProbabilisticMachine::builder()
            .head_bits(1)
            .input(vec![0; 8])
            .probability(0.0)
            .build()
            .unwrap();
        machine.transitions = table;

        assert_eq!(machine.head_limit(), 1);
        assert_eq!(machine.step().unwrap(), StepSignal::Continue);
        assert_eq!(machine.head_position(), 1);
        assert_eq!(machine.run().unwrap(), Outcome::Looped);
    }
}
