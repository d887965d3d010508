//! Experiment configuration: trial counts, the probability sweep, machine
//! shape and output toggles.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ExperimentError;
use crate::machine::MachineParams;

/// Configuration passed explicitly to every experiment routine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Trials per transition probability
    pub num_experiments: usize,

    /// First probability of the sweep
    pub min_prob: f64,

    /// Last probability of the sweep
    pub max_prob: f64,

    /// Number of linearly spaced probabilities
    pub num_probs: usize,

    /// Write the log file and the JSON result data
    pub should_log: bool,

    /// Render an SVG plot of the results
    pub should_plot: bool,

    /// Directory for log files
    pub logs_path: PathBuf,

    /// Directory for result data and plots
    pub data_path: PathBuf,

    /// Random inputs have `2^tape_bits` cells
    pub tape_bits: u32,

    /// Head bound is `2^head_bits - 1`
    pub head_bits: u32,

    /// Machines have `2^state_bits` states
    pub state_bits: u32,

    /// Base seed; drawn at random (and logged) when absent
    pub seed: Option<u64>,

    /// Run trials on the rayon pool when the `parallel` feature is enabled
    pub parallel: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            num_experiments: 200,
            min_prob: 0.1,
            max_prob: 1.0,
            num_probs: 10,
            should_log: false,
            should_plot: false,
            logs_path: PathBuf::from("logs"),
            data_path: PathBuf::from("data"),
            tape_bits: 3,
            head_bits: 3,
            state_bits: 2,
            seed: None,
            parallel: true,
        }
    }
}

impl ExperimentConfig {
    /// Load from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self, ExperimentError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Reject configurations no sweep could run with
    pub fn validate(&self) -> Result<(), ExperimentError> {
        if self.num_experiments == 0 {
            return Err(ExperimentError::InvalidConfig(
                "num_experiments must be positive".to_string(),
            ));
        }
        if self.num_probs == 0 {
            return Err(ExperimentError::InvalidConfig(
                "num_probs must be positive".to_string(),
            ));
        }
        let in_unit = |p: f64| p.is_finite() && (0.0..=1.0).contains(&p);
        if !in_unit(self.min_prob) || !in_unit(self.max_prob) || self.min_prob > self.max_prob {
            return Err(ExperimentError::InvalidConfig(format!(
                "probability range [{}, {}] must satisfy 0 <= min <= max <= 1",
                self.min_prob, self.max_prob
            )));
        }
        self.machine_params(self.min_prob).validate(None)?;
        Ok(())
    }

    /// `num_probs` values linearly spaced in `[min_prob, max_prob]`
    pub fn probabilities(&self) -> Vec<f64> {
        match self.num_probs {
            0 => Vec::new(),
            1 => vec![self.min_prob],
            n => {
                let step = (self.max_prob - self.min_prob) / (n - 1) as f64;
                let mut values: Vec<f64> =
                    (0..n).map(|i| self.min_prob + step * i as f64).collect();
                values[n - 1] = self.max_prob;
                values
            }
        }
    }

    /// Machine shape at one point of the sweep
    pub fn machine_params(&self, probability: f64) -> MachineParams {
        MachineParams {
            tape_bits: self.tape_bits,
            head_bits: self.head_bits,
            state_bits: self.state_bits,
            probability,
        }
    }
}
