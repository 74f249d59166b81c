//! Workflow orchestrator: parameters -> samples -> scenarios -> batch -> model.

use std::path::{Path, PathBuf};

use gcam_sampling::persistence::{self, load_custom_parameters};
use gcam_sampling::runner::ModelRunner;
use gcam_sampling::{
    GcamParameterManager, SampleMatrix, SamplingMethod, SamplingStrategy, Scenario, ScenarioSet,
    StrategyOptions, scenario_name,
};
use log::{error, info, warn};

use crate::audit::{self, AuditLog};
use crate::config::Settings;
use crate::error::Result;

/// Sample table file name inside the output directory.
pub const SAMPLE_TABLE_FILE: &str = "parameter_samples.csv";
/// Plot directory inside the output directory.
pub const PLOTS_DIR: &str = "plots";

/// Options for one workflow run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Strategy key (`lhs`, `sobol`, `random`, `halton`, `orthogonal`).
    pub method: String,
    pub num_samples: usize,
    pub gcam_root: PathBuf,
    pub output_dir: PathBuf,
    /// Parameter configuration CSV; the standard set is used otherwise.
    pub config_file: Option<PathBuf>,
    pub run_gcam: bool,
    pub gcam_config: Option<PathBuf>,
    pub analyze: bool,
    /// Overrides `[sampling] seed`.
    pub seed: Option<u64>,
}

impl RunOptions {
    pub fn new(gcam_root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            method: SamplingMethod::LatinHypercube.key().into(),
            num_samples: 10,
            gcam_root: gcam_root.into(),
            output_dir: output_dir.into(),
            config_file: None,
            run_gcam: false,
            gcam_config: None,
            analyze: false,
            seed: None,
        }
    }
}

/// What a run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub sampler: String,
    pub parameter_names: Vec<String>,
    pub samples: SampleMatrix,
    pub scenarios: Vec<Scenario>,
    pub sample_table: PathBuf,
    pub plot: Option<PathBuf>,
    pub batch_file: PathBuf,
    /// `None` when the model was not run.
    pub model_success: Option<bool>,
}

/// Execute a full workflow run.
pub fn run(settings: &Settings, opts: &RunOptions, runner: &dyn ModelRunner) -> Result<RunSummary> {
    // Reject an unknown method before touching the filesystem.
    let method: SamplingMethod = opts.method.parse()?;
    let seed = opts.seed.or(settings.sampling.seed);

    std::fs::create_dir_all(&opts.output_dir)?;
    let mut audit = AuditLog::open(&settings.audit_path(&opts.output_dir))?;
    audit::log_run_started(
        &mut audit,
        method.key(),
        opts.num_samples,
        &opts.gcam_root,
        &opts.output_dir,
        seed,
    )?;

    // 1. Parameter space
    let mut manager = GcamParameterManager::new(&opts.gcam_root, &opts.output_dir)
        .with_executable(&settings.model.executable);
    let source = define_parameters(&mut manager, opts.config_file.as_deref())?;
    let space = manager.parameter_space();
    info!("parameter space has {} parameters ({source})", space.size());
    audit::log_parameters(&mut audit, space, source)?;
    let parameter_names = space.names();

    // 2. Samples
    let options = StrategyOptions {
        seed,
        lhs_criterion: settings.sampling.lhs_criterion,
        iterations: settings.sampling.iterations,
    };
    let mut sampler = method.strategy(&options);
    let sampler_name = sampler.name().to_string();
    info!("Generating {} samples using {sampler_name}", opts.num_samples);
    let samples =
        sampler.generate_samples(&space.lower_bounds(), &space.upper_bounds(), opts.num_samples)?;
    audit::log_samples(&mut audit, &sampler_name, &samples)?;

    // 3. Sample table
    let scenario_names: Vec<String> = (0..samples.num_samples())
        .map(|i| scenario_name(&sampler_name, i))
        .collect();
    let sample_table = opts.output_dir.join(SAMPLE_TABLE_FILE);
    persistence::write_sample_table(&sample_table, &parameter_names, &samples, &scenario_names)?;
    info!("samples saved to {}", sample_table.display());

    // 4. Diagnostic plot
    let plot = if parameter_names.len() < 2 {
        warn!(
            "skipping sample visualization: {} dimension(s), need at least 2",
            parameter_names.len()
        );
        None
    } else {
        let path = opts
            .output_dir
            .join(PLOTS_DIR)
            .join(format!("{}_samples.svg", method.key()));
        match sampler.visualize_samples(&samples, &parameter_names, &path) {
            Ok(()) => {
                info!("sample plot saved to {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("sample visualization failed: {e}");
                None
            }
        }
    };

    // 5. Scenarios
    let scenarios = manager.create_scenarios_from_samples(&sampler_name, &samples, &parameter_names)?;
    let set_name = settings.set_name(method.key());
    audit::log_scenarios(&mut audit, &set_name, scenarios.len())?;

    // 6. Batch manifest
    let set = ScenarioSet::new(set_name, scenarios);
    let batch_file = manager.create_batch_file(
        std::slice::from_ref(&set),
        &settings.batch_path(&opts.output_dir),
    )?;
    audit::log_batch_written(&mut audit, &batch_file)?;

    // 7. Model run
    let model_success = if opts.run_gcam {
        run_model(&manager, runner, opts.gcam_config.as_deref(), &batch_file, &mut audit)?
    } else {
        None
    };

    // 8. Analysis
    if opts.analyze {
        warn!("post-run analysis is not implemented; skipping");
        audit.log_marker("analysis_skipped")?;
    }

    audit::log_run_completed(&mut audit, set.scenarios.len(), model_success)?;
    info!("workflow completed: {} scenarios", set.scenarios.len());

    Ok(RunSummary {
        sampler: sampler_name,
        parameter_names,
        samples,
        scenarios: set.scenarios,
        sample_table,
        plot,
        batch_file,
        model_success,
    })
}

/// Load custom parameters, falling back to the standard set when none load.
fn define_parameters(
    manager: &mut GcamParameterManager,
    config_file: Option<&Path>,
) -> Result<&'static str> {
    if let Some(path) = config_file {
        let custom = load_custom_parameters(path);
        if !custom.is_empty() {
            for parameter in custom {
                manager.add_parameter(parameter);
            }
            return Ok("config file");
        }
        warn!("no custom parameters loaded; using standard parameters");
    }
    manager.define_standard_parameters()?;
    Ok("standard")
}

fn run_model(
    manager: &GcamParameterManager,
    runner: &dyn ModelRunner,
    gcam_config: Option<&Path>,
    batch_file: &Path,
    audit: &mut AuditLog,
) -> Result<Option<bool>> {
    let Some(config) = gcam_config else {
        error!("GCAM configuration file is required to run GCAM (--gcam-config)");
        return Ok(None);
    };

    let outcome = manager.run_gcam(runner, config, batch_file);
    audit::log_model_run(audit, &outcome)?;
    if outcome.success() {
        info!("GCAM run completed successfully");
    } else {
        error!("GCAM run failed");
    }
    Ok(Some(outcome.success()))
}
