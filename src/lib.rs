//! # gcam-sampling
//!
//! Parameter-space sampling and scenario generation for GCAM runs.
//!
//! ## Features
//!
//! - **Parameter spaces**: ordered, named, bounded parameters with an XML target path
//! - **Sampling strategies**: Latin hypercube, Sobol, random, Halton, orthogonal
//! - **Scenario files**: one XML fragment per parameter per sampled point
//! - **Batch manifests**: a single file describing every scenario to the model
//! - **Model runner**: pluggable invocation of the external executable
//!
//! ## Quick Start
//!
//! ```
//! use gcam_sampling::{Parameter, ParameterSpace, SamplingMethod, SamplingStrategy, StrategyOptions};
//!
//! let mut space = ParameterSpace::new();
//! space.add(Parameter::new("climate-sensitivity", 2.0, 4.5, "climate/magicc-input/climate_sensitivity")?);
//! space.add(Parameter::new("ccs-efficiency", 0.85, 0.95, "technology/ccs/efficiency")?);
//!
//! let options = StrategyOptions { seed: Some(42), ..StrategyOptions::default() };
//! let mut sampler = SamplingMethod::LatinHypercube.strategy(&options);
//! let samples = sampler.generate_samples(&space.lower_bounds(), &space.upper_bounds(), 10)?;
//!
//! assert_eq!(samples.shape(), (10, 2));
//! assert!(samples.column(0).iter().all(|v| (2.0..=4.5).contains(v)));
//! # Ok::<(), gcam_sampling::Error>(())
//! ```
//!
//! ## Scenarios
//!
//! [`GcamParameterManager`] turns each sample row into a scenario directory of
//! fragments and then into a batch manifest:
//!
//! ```ignore
//! let mut manager = GcamParameterManager::new("../gcam-core", "outputs");
//! manager.define_standard_parameters()?;
//! let names = manager.parameter_space().names();
//! let scenarios = manager.create_scenarios_from_samples(sampler.name(), &samples, &names)?;
//! manager.create_batch_file(
//!     &[ScenarioSet::new("lhs_analysis", scenarios)],
//!     Path::new("outputs/parameter_sampling_batch.xml"),
//! )?;
//! ```

pub mod batch;
mod error;
pub mod fragment;
pub mod manager;
mod matrix;
mod parameter;
pub mod persistence;
#[cfg(feature = "plot")]
pub mod plot;
pub mod runner;
pub mod sampling;
mod scenario;
mod space;
mod xml;

// Re-export public API
pub use batch::{DEFAULT_BATCH_FILE, create_batch_file};
pub use error::{Error, Result};
pub use manager::{GcamParameterManager, scenario_name, standard_parameters};
pub use matrix::SampleMatrix;
pub use parameter::Parameter;
pub use runner::{ModelRunner, ProcessRunner, RunOutcome, RunStatus};
pub use sampling::{
    LhsCriterion, LowDiscrepancySequence, SamplingMethod, SamplingStrategy, StrategyOptions,
    sampler_for,
};
pub use scenario::{Scenario, ScenarioSet};
pub use space::ParameterSpace;
