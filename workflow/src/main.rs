//! CLI entry point for the GCAM sampling workflow.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use gcam_sampling::ProcessRunner;
use gcam_sampling_workflow::config::Settings;
use gcam_sampling_workflow::logging;
use gcam_sampling_workflow::workflow::{self, RunOptions};

#[derive(Parser)]
#[command(name = "sampling-workflow")]
#[command(about = "Sample a GCAM parameter space and generate batch scenarios")]
#[command(version)]
struct Cli {
    /// Sampling method: lhs, sobol, random, halton or orthogonal
    #[arg(long, default_value = "lhs")]
    method: String,

    /// Number of samples to generate
    #[arg(long, default_value_t = 10)]
    samples: usize,

    /// Path to the GCAM root directory
    #[arg(long)]
    gcam_root: PathBuf,

    /// Directory for scenarios, batch file, samples and plots
    #[arg(long, default_value = "outputs")]
    output_dir: PathBuf,

    /// Parameter configuration CSV (standard parameters otherwise)
    #[arg(long)]
    config_file: Option<PathBuf>,

    /// Also write log records to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Run GCAM with the generated batch file
    #[arg(long)]
    run_gcam: bool,

    /// GCAM top-level configuration file (required with --run-gcam)
    #[arg(long)]
    gcam_config: Option<PathBuf>,

    /// Run post-run analysis
    #[arg(long)]
    analyze: bool,

    /// Seed for reproducible sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Path to settings.toml
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let settings = match Settings::load_or_default(cli.settings.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = logging::init(&settings.logging.level, cli.log_file.as_deref()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    let opts = RunOptions {
        method: cli.method,
        num_samples: cli.samples,
        gcam_root: cli.gcam_root,
        output_dir: cli.output_dir,
        config_file: cli.config_file,
        run_gcam: cli.run_gcam,
        gcam_config: cli.gcam_config,
        analyze: cli.analyze,
        seed: cli.seed,
    };
    let runner = ProcessRunner::new(&settings.model.config_env, &settings.model.batch_env);

    if let Err(e) = workflow::run(&settings, &opts, &runner) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
