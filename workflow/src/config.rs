//! TOML settings loading and validation.
//!
//! Every section and field is optional:
//!
//! ```toml
//! [sampling]
//! seed = 42
//! lhs_criterion = "maximin"
//! iterations = 5
//!
//! [batch]
//! file_name = "parameter_sampling_batch.xml"
//! set_name = "lhs_analysis"
//!
//! [model]
//! executable = "exe/gcam.exe"
//! config_env = "GCAM_CONFIG_FILE"
//! batch_env = "BATCH_FILE"
//!
//! [logging]
//! level = "info"
//! audit_file = "workflow_audit.jsonl"
//! ```

use std::path::{Path, PathBuf};

use gcam_sampling::LhsCriterion;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Top-level settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub sampling: SamplingSettings,
    #[serde(default)]
    pub batch: BatchSettings,
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SamplingSettings {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub lhs_criterion: LhsCriterion,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
}

fn default_iterations() -> usize {
    5
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            seed: None,
            lhs_criterion: LhsCriterion::default(),
            iterations: default_iterations(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchSettings {
    #[serde(default = "default_batch_file")]
    pub file_name: String,
    /// Defaults to `{method}_analysis`.
    #[serde(default)]
    pub set_name: Option<String>,
}

fn default_batch_file() -> String {
    gcam_sampling::DEFAULT_BATCH_FILE.into()
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            file_name: default_batch_file(),
            set_name: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    /// Relative to the GCAM root.
    #[serde(default = "default_executable")]
    pub executable: PathBuf,
    #[serde(default = "default_config_env")]
    pub config_env: String,
    #[serde(default = "default_batch_env")]
    pub batch_env: String,
}

fn default_executable() -> PathBuf {
    gcam_sampling::manager::DEFAULT_EXECUTABLE.into()
}
fn default_config_env() -> String {
    gcam_sampling::runner::DEFAULT_CONFIG_ENV.into()
}
fn default_batch_env() -> String {
    gcam_sampling::runner::DEFAULT_BATCH_ENV.into()
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            config_env: default_config_env(),
            batch_env: default_batch_env(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_level")]
    pub level: String,
    /// Relative to the output directory.
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
}

fn default_level() -> String {
    "info".into()
}
fn default_audit_file() -> String {
    "workflow_audit.jsonl".into()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            audit_file: default_audit_file(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::SettingsRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&contents)
    }

    /// Defaults when no file is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.sampling.iterations == 0 {
            return Err(Error::Settings("sampling.iterations must be >= 1".into()));
        }
        if self.batch.file_name.trim().is_empty() {
            return Err(Error::Settings("batch.file_name must not be empty".into()));
        }
        if self
            .batch
            .set_name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(Error::Settings("batch.set_name must not be empty".into()));
        }
        if self.model.executable.as_os_str().is_empty() {
            return Err(Error::Settings("model.executable must not be empty".into()));
        }
        if self.model.config_env.trim().is_empty() || self.model.batch_env.trim().is_empty() {
            return Err(Error::Settings(
                "model environment variable names must not be empty".into(),
            ));
        }
        if self.logging.audit_file.trim().is_empty() {
            return Err(Error::Settings("logging.audit_file must not be empty".into()));
        }
        Ok(())
    }

    /// Batch component-set name for a method key.
    pub fn set_name(&self, method: &str) -> String {
        self.batch
            .set_name
            .clone()
            .unwrap_or_else(|| format!("{method}_analysis"))
    }

    pub fn batch_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.batch.file_name)
    }

    pub fn audit_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.logging.audit_file)
    }
}
