//! Experiment driver: probability sweeps over many independent machines,
//! named experiment routines and result output.
//!
//! Every routine receives an explicit [`ExperimentConfig`]; nothing here reads
//! process-wide state.

mod api;
mod config;
mod output;
#[cfg(feature = "plot")]
mod plot;
mod registry;
mod routines;
mod sweep;

pub use api::{execute, Experiment, ExperimentRun, PlotSeries};
pub use config::ExperimentConfig;
pub use output::write_report;
pub use registry::{ExperimentInfo, ExperimentRegistry};
pub use routines::{HaltFrequency, RunLength};
pub use sweep::{
    run_trial, sweep, trial_seed, OutcomeTally, SweepPoint, SweepReport, TrialRecord,
};

use crate::MachineError;
use thiserror::Error;

/// Errors raised while configuring or running experiments
#[derive(Error, Debug)]
pub enum ExperimentError {
    /// No experiment registered under this name
    #[error("Unknown experiment '{name}' (available: {})", .available.join(", "))]
    UnknownExperiment {
        /// Requested name
        name: String,
        /// Registered names
        available: Vec<String>,
    },

    /// Sweep parameters no run could use
    #[error("Invalid experiment configuration: {0}")]
    InvalidConfig(String),

    /// Machine construction or execution failed
    #[error(transparent)]
    Machine(#[from] MachineError),

    /// Reading configuration or writing results failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration or result JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Plot rendering failed
    #[error("Plotting failed: {0}")]
    Plot(String),
}
