use std::collections::BTreeMap;
use std::fmt;

use super::routines::{HaltFrequency, RunLength};
use super::{Experiment, ExperimentError};

/// Metadata describing a registered experiment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentInfo {
    /// Name used to select the experiment
    pub name: String,
    /// One-line description
    pub description: String,
}

/// Registry mapping experiment names to routines.
#[derive(Default)]
pub struct ExperimentRegistry {
    entries: BTreeMap<String, Box<dyn Experiment>>,
}

impl ExperimentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Registry holding every built-in experiment.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(HaltFrequency);
        registry.register(RunLength);
        registry
    }

    /// Register an experiment, replacing any previous one with the same name.
    pub fn register<E: Experiment>(&mut self, experiment: E) {
        self.entries
            .insert(experiment.name().to_string(), Box::new(experiment));
    }

    /// Resolve an experiment by name.
    pub fn resolve(&self, name: &str) -> Result<&dyn Experiment, ExperimentError> {
        self.entries
            .get(name)
            .map(|entry| entry.as_ref())
            .ok_or_else(|| ExperimentError::UnknownExperiment {
                name: name.to_string(),
                available: self.entries.keys().cloned().collect(),
            })
    }

    /// List all registered experiments, sorted by name.
    pub fn list(&self) -> Vec<ExperimentInfo> {
        self.entries
            .iter()
            .map(|(name, entry)| ExperimentInfo {
                name: name.clone(),
                description: entry.description().to_string(),
            })
            .collect()
    }
}

impl fmt::Debug for ExperimentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExperimentRegistry")
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
