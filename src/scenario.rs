//! Scenarios produced from sample rows.

use std::path::{Path, PathBuf};

/// One sampled parameter assignment and the fragment files that encode it.
///
/// `values` and `files` are both in parameter-name order and aligned by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    name: String,
    values: Vec<(String, f64)>,
    files: Vec<(String, PathBuf)>,
}

impl Scenario {
    pub(crate) fn new(name: String, values: Vec<(String, f64)>, files: Vec<(String, PathBuf)>) -> Self {
        Self {
            name,
            values,
            files,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `(parameter name, sampled value)` pairs.
    pub fn values(&self) -> &[(String, f64)] {
        &self.values
    }

    /// `(parameter name, fragment path)` pairs.
    pub fn files(&self) -> &[(String, PathBuf)] {
        &self.files
    }

    pub fn value(&self, parameter: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(name, _)| name == parameter)
            .map(|&(_, v)| v)
    }

    pub fn file(&self, parameter: &str) -> Option<&Path> {
        self.files
            .iter()
            .find(|(name, _)| name == parameter)
            .map(|(_, p)| p.as_path())
    }
}

/// A named group of scenarios; becomes one `ComponentSet` in the batch manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSet {
    pub name: String,
    pub scenarios: Vec<Scenario>,
}

impl ScenarioSet {
    pub fn new(name: impl Into<String>, scenarios: Vec<Scenario>) -> Self {
        Self {
            name: name.into(),
            scenarios,
        }
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
