//! Turns sample matrices into scenario fragment files and batch manifests.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::batch;
use crate::error::{Error, Result};
use crate::fragment;
use crate::matrix::SampleMatrix;
use crate::parameter::Parameter;
use crate::runner::{ModelRunner, RunOutcome, RunStatus};
use crate::scenario::{Scenario, ScenarioSet};
use crate::space::ParameterSpace;

/// Default model executable, relative to the model root.
pub const DEFAULT_EXECUTABLE: &str = "exe/gcam.exe";

/// Subdirectory of the output directory holding per-scenario fragments.
pub const PARAMETERS_DIR: &str = "parameters";

/// Owns a parameter space and writes everything the model needs to run it.
#[derive(Debug, Clone)]
pub struct GcamParameterManager {
    gcam_root: PathBuf,
    output_dir: PathBuf,
    executable: PathBuf,
    space: ParameterSpace,
}

impl GcamParameterManager {
    pub fn new(gcam_root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            gcam_root: gcam_root.into(),
            output_dir: output_dir.into(),
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            space: ParameterSpace::new(),
        }
    }

    /// Executable path relative to the model root.
    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn gcam_root(&self) -> &Path {
        &self.gcam_root
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn executable_path(&self) -> PathBuf {
        self.gcam_root.join(&self.executable)
    }

    pub fn parameter_space(&self) -> &ParameterSpace {
        &self.space
    }

    /// Add (or replace, by name) a parameter.
    pub fn add_parameter(&mut self, parameter: Parameter) -> Option<Parameter> {
        self.space.add(parameter)
    }

    /// Populate the six built-in climate, economic and technology parameters.
    pub fn define_standard_parameters(&mut self) -> Result<()> {
        for parameter in standard_parameters()? {
            self.space.add(parameter);
        }
        Ok(())
    }

    pub fn create_fragment(&self, parameter: &Parameter, value: f64) -> Result<String> {
        fragment::create_fragment(parameter, value)
    }

    /// Write one fragment per `(name, value)` pair under
    /// `<output_dir>/parameters/<scenario_name>/`.
    ///
    /// Returned paths follow the input order. Every name is resolved before
    /// anything is written, so an unknown name leaves no partial scenario.
    pub fn create_parameter_files(
        &self,
        scenario_name: &str,
        parameter_values: &[(String, f64)],
    ) -> Result<Vec<PathBuf>> {
        let resolved = parameter_values
            .iter()
            .map(|(name, value)| self.space.get(name).map(|p| (p, *value)))
            .collect::<Result<Vec<_>>>()?;

        let dir = self.scenario_dir(scenario_name);
        fs::create_dir_all(&dir)?;

        let mut written = Vec::with_capacity(resolved.len());
        for (parameter, value) in resolved {
            let xml = fragment::create_fragment(parameter, value)?;
            let path = dir.join(format!("{}.xml", parameter.file_stem()));
            fs::write(&path, xml)?;
            written.push(path);
        }
        debug!("wrote {} fragments for {scenario_name}", written.len());
        Ok(written)
    }

    /// One scenario per sample row, named `{sampler_name}_scenario_{i}` from 1.
    ///
    /// `parameter_names` must have exactly one entry per sample column.
    pub fn create_scenarios_from_samples(
        &self,
        sampler_name: &str,
        samples: &SampleMatrix,
        parameter_names: &[String],
    ) -> Result<Vec<Scenario>> {
        if samples.num_dimensions() != parameter_names.len() {
            return Err(Error::DimensionMismatch {
                expected: parameter_names.len(),
                found: samples.num_dimensions(),
            });
        }

        let mut scenarios = Vec::with_capacity(samples.num_samples());
        for (i, row) in samples.rows().enumerate() {
            let name = scenario_name(sampler_name, i);
            let values: Vec<(String, f64)> = parameter_names
                .iter()
                .cloned()
                .zip(row.iter().copied())
                .collect();
            let paths = self.create_parameter_files(&name, &values)?;
            let files = parameter_names.iter().cloned().zip(paths).collect();
            scenarios.push(Scenario::new(name, values, files));
        }
        info!(
            "created {} scenarios with {} parameters each",
            scenarios.len(),
            parameter_names.len()
        );
        Ok(scenarios)
    }

    pub fn create_batch_file(&self, sets: &[ScenarioSet], output_file: &Path) -> Result<PathBuf> {
        let path = batch::create_batch_file(sets, output_file)?;
        info!("batch file written to {}", path.display());
        Ok(path)
    }

    /// Run the model once over `batch_file` and log what happened.
    pub fn run_gcam(
        &self,
        runner: &dyn ModelRunner,
        config_file: &Path,
        batch_file: &Path,
    ) -> RunOutcome {
        let executable = self.executable_path();
        info!(
            "Running GCAM with config: {}, batch: {}",
            config_file.display(),
            batch_file.display()
        );
        let outcome = runner.run(&executable, config_file, batch_file);

        match &outcome.status {
            RunStatus::NotFound => {
                error!("GCAM executable not found at: {}", executable.display());
            }
            RunStatus::LaunchFailed(msg) => error!("Error running GCAM: {msg}"),
            status => {
                info!("GCAM stdout: {}", outcome.stdout);
                if !outcome.stderr.is_empty() {
                    warn!("GCAM stderr: {}", outcome.stderr);
                }
                if !outcome.success() {
                    error!("GCAM {status}");
                }
            }
        }
        outcome
    }

    fn scenario_dir(&self, scenario_name: &str) -> PathBuf {
        self.output_dir.join(PARAMETERS_DIR).join(scenario_name)
    }
}

/// Name of the scenario built from sample row `row` (0-based).
pub fn scenario_name(sampler_name: &str, row: usize) -> String {
    format!("{sampler_name}_scenario_{}", row + 1)
}

/// The built-in parameter set, in canonical column order.
pub fn standard_parameters() -> Result<Vec<Parameter>> {
    Ok(vec![
        Parameter::new(
            "climate-sensitivity",
            2.0,
            4.5,
            "climate/magicc-input/climate_sensitivity",
        )?
        .with_units("°C")
        .with_description("Equilibrium climate sensitivity"),
        Parameter::new(
            "ocean-carbon-flux",
            1.5,
            3.5,
            "climate/magicc-input/ocean_carbon_flux",
        )?
        .with_units("GtC/yr")
        .with_description("1980s Ocean Carbon Flux"),
        Parameter::new(
            "social-discount-rate",
            0.01,
            0.05,
            "socioeconomics/social_discount_rate",
        )?
        .with_units("fraction")
        .with_description("Social discount rate"),
        Parameter::new("interest-rate", 0.05, 0.10, "socioeconomics/interest_rate")?
            .with_units("fraction")
            .with_description("Investment interest rate"),
        Parameter::new(
            "renewables-cost-improvement",
            0.005,
            0.025,
            "technology/renewables/cost_improvement_rate",
        )?
        .with_units("fraction/yr")
        .with_description("Annual cost improvement rate for renewable technologies"),
        Parameter::new("ccs-efficiency", 0.85, 0.95, "technology/ccs/efficiency")?
            .with_units("fraction")
            .with_description("Carbon capture and storage efficiency"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::mock::MockRunner;

    fn manager(dir: &Path) -> GcamParameterManager {
        let mut m = GcamParameterManager::new("gcam-core", dir);
        m.define_standard_parameters().unwrap();
        m
    }

    #[test]
    fn standard_set_order_and_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let m = manager(dir.path());
        let space = m.parameter_space();
        assert_eq!(
            space.names(),
            vec![
                "climate-sensitivity",
                "ocean-carbon-flux",
                "social-discount-rate",
                "interest-rate",
                "renewables-cost-improvement",
                "ccs-efficiency",
            ]
        );
        assert_eq!(space.lower_bounds(), vec![2.0, 1.5, 0.01, 0.05, 0.005, 0.85]);
        assert_eq!(space.upper_bounds(), vec![4.5, 3.5, 0.05, 0.10, 0.025, 0.95]);
    }

    #[test]
    fn scenario_names_are_one_based() {
        assert_eq!(scenario_name("Sobol Sequence Sampling", 0), "Sobol Sequence Sampling_scenario_1");
        assert_eq!(scenario_name("x", 9), "x_scenario_10");
    }

    #[test]
    fn parameter_files_layout() {
        let dir = tempfile::tempdir().unwrap();
        let m = manager(dir.path());
        let paths = m
            .create_parameter_files(
                "s_1",
                &[("interest-rate".into(), 0.07), ("ccs-efficiency".into(), 0.9)],
            )
            .unwrap();
        assert_eq!(
            paths,
            vec![
                dir.path().join("parameters/s_1/interest_rate.xml"),
                dir.path().join("parameters/s_1/ccs_efficiency.xml"),
            ]
        );
        let xml = fs::read_to_string(&paths[0]).unwrap();
        assert!(xml.contains("<interest_rate>0.07</interest_rate>"));
    }

    #[test]
    fn unknown_parameter_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let m = manager(dir.path());
        let err = m
            .create_parameter_files(
                "s_1",
                &[("interest-rate".into(), 0.07), ("albedo".into(), 0.3)],
            )
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(name) if name == "albedo"));
        assert!(!dir.path().join("parameters").exists());
    }

    #[test]
    fn run_gcam_uses_executable_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let m = manager(dir.path()).with_executable("bin/gcam");
        let runner = MockRunner::builder().build();
        let outcome = m.run_gcam(&runner, Path::new("config.xml"), Path::new("batch.xml"));
        assert!(outcome.success());
        assert_eq!(
            runner.runs()[0].executable,
            PathBuf::from("gcam-core").join("bin/gcam")
        );
    }

    #[test]
    fn run_gcam_reports_failure_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let m = manager(dir.path());
        let runner = MockRunner::builder().exit_code(1).stderr("bad input").build();
        let outcome = m.run_gcam(&runner, Path::new("c.xml"), Path::new("b.xml"));
        assert!(!outcome.success());
    }
}
