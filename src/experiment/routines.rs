use super::{Experiment, PlotSeries, SweepReport};

/// Fraction of machines that halt vs loop at each transition probability.
#[derive(Debug, Default)]
pub struct HaltFrequency;

impl Experiment for HaltFrequency {
    fn name(&self) -> &'static str {
        "halt_frequency"
    }

    fn description(&self) -> &'static str {
        "Halt vs loop frequency across the transition probability sweep."
    }

    fn y_label(&self) -> &'static str {
        "fraction of machines"
    }

    fn series(&self, report: &SweepReport) -> Vec<PlotSeries> {
        let curve = |label: &str, value: fn(&super::OutcomeTally) -> f64| PlotSeries {
            label: label.to_string(),
            points: report
                .points
                .iter()
                .map(|point| (point.probability, value(&point.tally)))
                .collect(),
        };
        vec![
            curve("halt", |tally| tally.halt_fraction()),
            curve("loop", |tally| tally.loop_fraction()),
        ]
    }
}

/// Mean number of steps before a machine halts or loops.
#[derive(Debug, Default)]
pub struct RunLength;

impl Experiment for RunLength {
    fn name(&self) -> &'static str {
        "run_length"
    }

    fn description(&self) -> &'static str {
        "Mean steps to termination, split by outcome, across the sweep."
    }

    fn y_label(&self) -> &'static str {
        "mean steps"
    }

    fn series(&self, report: &SweepReport) -> Vec<PlotSeries> {
        let curve = |label: &str, value: fn(&super::SweepPoint) -> Option<f64>| PlotSeries {
            label: label.to_string(),
            points: report
                .points
                .iter()
                .filter_map(|point| value(point).map(|v| (point.probability, v)))
                .collect(),
        };
        vec![
            curve("steps to halt", |point| point.mean_steps_to_halt),
            curve("steps to loop", |point| point.mean_steps_to_loop),
            curve("all runs", |point| Some(point.mean_steps)),
        ]
    }
}
