//! Result files: JSON sweep data and optional SVG plots.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{Experiment, ExperimentError, PlotSeries, SweepReport};

/// Write `report` as pretty JSON to `<data_dir>/<experiment>.json`
pub fn write_report(report: &SweepReport, data_dir: &Path) -> Result<PathBuf, ExperimentError> {
    fs::create_dir_all(data_dir)?;
    let path = data_dir.join(format!("{}.json", report.experiment));
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(path)
}

/// Render `series` to `<data_dir>/<experiment>.svg`
#[cfg(feature = "plot")]
pub fn plot_report(
    experiment: &dyn Experiment,
    series: &[PlotSeries],
    data_dir: &Path,
) -> Result<Option<PathBuf>, ExperimentError> {
    fs::create_dir_all(data_dir)?;
    let path = data_dir.join(format!("{}.svg", experiment.name()));
    super::plot::render(&path, experiment.description(), experiment.y_label(), series)?;
    tracing::info!(path = %path.display(), "wrote plot");
    Ok(Some(path))
}

/// Plotting is compiled out; log and skip
#[cfg(not(feature = "plot"))]
pub fn plot_report(
    experiment: &dyn Experiment,
    _series: &[PlotSeries],
    _data_dir: &Path,
) -> Result<Option<PathBuf>, ExperimentError> {
    tracing::warn!(
        experiment = experiment.name(),
        "plotting requested but the `plot` feature is disabled"
    );
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_round_trips_through_data_file() {
        let dir = std::env::temp_dir().join(format!("tm-halting-output-{}", std::process::id()));
        let report = SweepReport {
            experiment: "output_test".to_string(),
            base_seed: 3,
            num_experiments: 1,
            tape_bits: 2,
            head_bits: 2,
            state_bits: 1,
            points: Vec::new(),
        };

        let path = write_report(&report, &dir).unwrap();
        assert_eq!(path, dir.join("output_test.json"));
        let loaded: SweepReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, report);

        fs::remove_dir_all(&dir).unwrap();
    }
}
