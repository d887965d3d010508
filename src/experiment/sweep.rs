//! Probability sweep: many independent machines per transition probability,
//! aggregated into halt/loop frequencies.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{ExperimentConfig, ExperimentError};
use crate::machine::{MachineParams, Outcome, ProbabilisticMachine};
use crate::MachineError;

/// Result of running one machine to termination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Seed the machine was drawn from
    pub seed: u64,
    /// Terminal classification
    pub outcome: Outcome,
    /// Executed steps
    pub steps: u64,
    /// Distinct configurations recorded
    pub history_len: usize,
}

/// Outcome counts at one probability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTally {
    /// Runs that halted
    pub halted: usize,
    /// Runs that revisited a configuration
    pub looped: usize,
    /// Runs stopped by the step ceiling
    pub step_limited: usize,
}

impl OutcomeTally {
    /// Count one outcome; `Unresolved` is ignored
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Halted => self.halted += 1,
            Outcome::Looped => self.looped += 1,
            Outcome::StepLimit => self.step_limited += 1,
            Outcome::Unresolved => {}
        }
    }

    /// Runs counted
    pub fn total(&self) -> usize {
        self.halted + self.looped + self.step_limited
    }

    /// Share of runs that halted
    pub fn halt_fraction(&self) -> f64 {
        fraction(self.halted, self.total())
    }

    /// Share of runs that looped
    pub fn loop_fraction(&self) -> f64 {
        fraction(self.looped, self.total())
    }
}

fn fraction(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Aggregated trials at one probability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Transition probability
    pub probability: f64,
    /// Outcome counts
    pub tally: OutcomeTally,
    /// Mean steps over all trials
    pub mean_steps: f64,
    /// Mean steps over halting trials
    pub mean_steps_to_halt: Option<f64>,
    /// Mean steps over looping trials
    pub mean_steps_to_loop: Option<f64>,
}

impl SweepPoint {
    /// Aggregate trial records
    pub fn from_records(probability: f64, records: &[TrialRecord]) -> Self {
        let mut tally = OutcomeTally::default();
        for record in records {
            tally.record(record.outcome);
        }
        let mean_for = |filter: Option<Outcome>| {
            let steps: Vec<u64> = records
                .iter()
                .filter(|r| filter.map_or(true, |outcome| r.outcome == outcome))
                .map(|r| r.steps)
                .collect();
            if steps.is_empty() {
                None
            } else {
                Some(steps.iter().sum::<u64>() as f64 / steps.len() as f64)
            }
        };

        Self {
            probability,
            tally,
            mean_steps: mean_for(None).unwrap_or(0.0),
            mean_steps_to_halt: mean_for(Some(Outcome::Halted)),
            mean_steps_to_loop: mean_for(Some(Outcome::Looped)),
        }
    }
}

/// Full sweep output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Experiment that produced the sweep
    pub experiment: String,
    /// Seed every trial seed was derived from
    pub base_seed: u64,
    /// Trials per probability
    pub num_experiments: usize,
    /// Tape bits of every machine
    pub tape_bits: u32,
    /// Head bits of every machine
    pub head_bits: u32,
    /// State bits of every machine
    pub state_bits: u32,
    /// One entry per probability, in sweep order
    pub points: Vec<SweepPoint>,
}

/// Seed of trial `trial` at sweep position `prob_index`
pub fn trial_seed(base_seed: u64, prob_index: usize, trial: usize, trials: usize) -> u64 {
    base_seed.wrapping_add((prob_index * trials + trial) as u64)
}

/// Build and run one machine from its own seed
///
/// A run stopped by the step ceiling is recorded as `StepLimit` rather than
/// failing the sweep.
pub fn run_trial(params: MachineParams, seed: u64) -> Result<TrialRecord, MachineError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut machine = ProbabilisticMachine::new(params, None, &mut rng)?;
    let outcome = match machine.run() {
        Ok(outcome) => outcome,
        Err(MachineError::StepLimitExceeded { limit }) => {
            warn!(seed, limit, "trial reached the step ceiling");
            Outcome::StepLimit
        }
        Err(err) => return Err(err),
    };

    Ok(TrialRecord {
        seed,
        outcome,
        steps: machine.steps(),
        history_len: machine.config_history().len(),
    })
}

#[cfg(feature = "parallel")]
fn run_trials(
    params: MachineParams,
    seeds: &[u64],
    parallel: bool,
) -> Result<Vec<TrialRecord>, MachineError> {
    use rayon::prelude::*;

    if parallel {
        seeds
            .par_iter()
            .map(|&seed| run_trial(params, seed))
            .collect()
    } else {
        run_sequential(params, seeds)
    }
}

#[cfg(not(feature = "parallel"))]
fn run_trials(
    params: MachineParams,
    seeds: &[u64],
    _parallel: bool,
) -> Result<Vec<TrialRecord>, MachineError> {
    run_sequential(params, seeds)
}

fn run_sequential(params: MachineParams, seeds: &[u64]) -> Result<Vec<TrialRecord>, MachineError> {
    seeds.iter().map(|&seed| run_trial(params, seed)).collect()
}

/// Run `num_experiments` machines at every probability of the sweep
pub fn sweep(experiment: &str, config: &ExperimentConfig) -> Result<SweepReport, ExperimentError> {
    config.validate()?;
    let base_seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let probabilities = config.probabilities();
    info!(
        experiment,
        base_seed,
        trials = config.num_experiments,
        points = probabilities.len(),
        "starting sweep"
    );

    let mut points = Vec::with_capacity(probabilities.len());
    for (prob_index, &probability) in probabilities.iter().enumerate() {
        let seeds: Vec<u64> = (0..config.num_experiments)
            .map(|trial| trial_seed(base_seed, prob_index, trial, config.num_experiments))
            .collect();
        let records = run_trials(config.machine_params(probability), &seeds, config.parallel)?;
        let point = SweepPoint::from_records(probability, &records);

        info!(
            probability,
            halted = point.tally.halted,
            looped = point.tally.looped,
            step_limited = point.tally.step_limited,
            mean_steps = point.mean_steps,
            "sweep point"
        );
        points.push(point);
    }

    Ok(SweepReport {
        experiment: experiment.to_string(),
        base_seed,
        num_experiments: config.num_experiments,
        tape_bits: config.tape_bits,
        head_bits: config.head_bits,
        state_bits: config.state_bits,
        points,
    })
}
