use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::output;
use super::sweep::{sweep, SweepReport};
use super::{ExperimentConfig, ExperimentError};

/// One named curve extracted from a sweep, plotted against probability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSeries {
    /// Legend label
    pub label: String,
    /// (probability, value) pairs
    pub points: Vec<(f64, f64)>,
}

/// Trait implemented by experiment routines selectable by name.
pub trait Experiment: Send + Sync + 'static {
    /// Unique experiment name.
    fn name(&self) -> &'static str;

    /// Human-readable description.
    fn description(&self) -> &'static str;

    /// Axis label for the values produced by [`Experiment::series`].
    fn y_label(&self) -> &'static str;

    /// Curves this experiment reports.
    fn series(&self, report: &SweepReport) -> Vec<PlotSeries>;

    /// Run the probability sweep (defaults to the shared driver).
    fn run_experiment(&self, config: &ExperimentConfig) -> Result<SweepReport, ExperimentError> {
        sweep(self.name(), config)
    }
}

/// A finished experiment and the files it wrote.
#[derive(Debug, Clone)]
pub struct ExperimentRun {
    /// Sweep results
    pub report: SweepReport,
    /// Curves extracted from the report
    pub series: Vec<PlotSeries>,
    /// JSON data file, when `should_log` is set
    pub data_file: Option<PathBuf>,
    /// SVG plot, when `should_plot` is set and plotting is compiled in
    pub plot_file: Option<PathBuf>,
}

/// Run an experiment and write its outputs as configured.
pub fn execute(
    experiment: &dyn Experiment,
    config: &ExperimentConfig,
) -> Result<ExperimentRun, ExperimentError> {
    let report = experiment.run_experiment(config)?;
    let series = experiment.series(&report);

    let data_file = if config.should_log {
        let path = output::write_report(&report, &config.data_path)?;
        info!(path = %path.display(), "wrote sweep data");
        Some(path)
    } else {
        None
    };

    let plot_file = if config.should_plot {
        output::plot_report(experiment, &series, &config.data_path)?
    } else {
        None
    };

    Ok(ExperimentRun {
        report,
        series,
        data_file,
        plot_file,
    })
}
