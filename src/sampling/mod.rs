//! Sampling strategies over a bounded parameter space.
//!
//! Every strategy draws points in the unit hypercube and maps them onto the
//! requested bounds with `value = lower + raw * (upper - lower)`, one
//! dimension at a time. Strategies own their random generators; seeding one
//! instance never affects another.
//!
//! | Key | Strategy |
//! |-----|----------|
//! | `lhs` | [`LatinHypercube`] (maximin criterion by default) |
//! | `sobol` | [`SobolSampling`] (origin point discarded) |
//! | `random` | [`RandomSampling`] |
//! | `halton` | [`HaltonSampling`] (scrambled) |
//! | `orthogonal` | [`LatinHypercube::orthogonal`] (correlation criterion) |

mod halton;
mod lhs;
mod random;
mod sequence;
mod sobol;

use std::fmt;
use std::str::FromStr;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::error::{Error, Result};
use crate::matrix::SampleMatrix;

pub use halton::{HaltonSampling, HaltonSequence};
pub use lhs::{LatinHypercube, LhsCriterion};
pub use random::RandomSampling;
pub use sequence::LowDiscrepancySequence;
pub use self::sobol::{MAX_DIMENSIONS, SobolSampling, SobolSequence};

/// A generator of sample points inside per-dimension bounds.
pub trait SamplingStrategy {
    /// Human-readable strategy name, also used to prefix scenario names.
    fn name(&self) -> &str;

    /// Draw `num_samples` points in `[0, 1)^num_dimensions`.
    fn unit_samples(&mut self, num_dimensions: usize, num_samples: usize) -> Result<SampleMatrix>;

    /// Draw `num_samples` points scaled onto `[lower_bounds[i], upper_bounds[i]]`.
    ///
    /// Bound ordering is not checked; a zero-width range yields a constant column.
    fn generate_samples(
        &mut self,
        lower_bounds: &[f64],
        upper_bounds: &[f64],
        num_samples: usize,
    ) -> Result<SampleMatrix> {
        validate_request(lower_bounds, upper_bounds, num_samples)?;
        let unit = self.unit_samples(lower_bounds.len(), num_samples)?;
        Ok(scale_to_bounds(unit, lower_bounds, upper_bounds))
    }

    /// Render a diagnostic plot of `samples` to an SVG file.
    #[cfg(feature = "plot")]
    fn visualize_samples(
        &self,
        samples: &SampleMatrix,
        parameter_names: &[String],
        path: &std::path::Path,
    ) -> Result<()> {
        crate::plot::visualize_samples(self.name(), samples, parameter_names, path)
    }
}

/// The sampling strategies selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplingMethod {
    LatinHypercube,
    Sobol,
    Random,
    Halton,
    Orthogonal,
}

const METHODS: [(&str, SamplingMethod); 5] = [
    ("lhs", SamplingMethod::LatinHypercube),
    ("sobol", SamplingMethod::Sobol),
    ("random", SamplingMethod::Random),
    ("halton", SamplingMethod::Halton),
    ("orthogonal", SamplingMethod::Orthogonal),
];

/// Knobs shared by the seeded strategies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyOptions {
    pub seed: Option<u64>,
    pub lhs_criterion: LhsCriterion,
    pub iterations: usize,
}

impl Default for StrategyOptions {
    fn default() -> Self {
        Self {
            seed: None,
            lhs_criterion: LhsCriterion::Maximin,
            iterations: lhs::DEFAULT_ITERATIONS,
        }
    }
}

impl SamplingMethod {
    pub const ALL: [SamplingMethod; 5] = [
        SamplingMethod::LatinHypercube,
        SamplingMethod::Sobol,
        SamplingMethod::Random,
        SamplingMethod::Halton,
        SamplingMethod::Orthogonal,
    ];

    /// Short key used on the command line (`lhs`, `sobol`, ...).
    pub fn key(self) -> &'static str {
        METHODS
            .iter()
            .find(|(_, m)| *m == self)
            .map_or("unknown", |(k, _)| k)
    }

    /// Build a fresh strategy instance for this method.
    pub fn strategy(self, options: &StrategyOptions) -> Box<dyn SamplingStrategy> {
        match self {
            SamplingMethod::LatinHypercube => Box::new(
                LatinHypercube::with_seed(options.lhs_criterion, options.seed)
                    .with_iterations(options.iterations),
            ),
            SamplingMethod::Sobol => Box::new(SobolSampling::new()),
            SamplingMethod::Random => Box::new(RandomSampling::new(options.seed)),
            SamplingMethod::Halton => Box::new(HaltonSampling::new(options.seed)),
            SamplingMethod::Orthogonal => Box::new(
                LatinHypercube::orthogonal(options.seed).with_iterations(options.iterations),
            ),
        }
    }
}

impl FromStr for SamplingMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        METHODS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, m)| *m)
            .ok_or_else(|| Error::UnsupportedMethod(s.to_string()))
    }
}

impl fmt::Display for SamplingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Look up a strategy by its short key.
pub fn sampler_for(method: &str, options: &StrategyOptions) -> Result<Box<dyn SamplingStrategy>> {
    let method: SamplingMethod = method.parse()?;
    Ok(method.strategy(options))
}

/// Map one unit-interval draw onto `[lower, upper]`.
pub fn scale(raw: f64, lower: f64, upper: f64) -> f64 {
    let value = lower + raw * (upper - lower);
    // Rounding can push lower + raw * range a hair past the upper bound.
    if lower <= upper {
        value.clamp(lower, upper)
    } else {
        value
    }
}

fn scale_to_bounds(mut unit: SampleMatrix, lower: &[f64], upper: &[f64]) -> SampleMatrix {
    let (rows, cols) = unit.shape();
    for i in 0..rows {
        for j in 0..cols {
            let raw = unit.get(i, j);
            unit.set(i, j, scale(raw, lower[j], upper[j]));
        }
    }
    unit
}

fn validate_request(lower: &[f64], upper: &[f64], num_samples: usize) -> Result<()> {
    if lower.len() != upper.len() {
        return Err(Error::DimensionMismatch {
            expected: lower.len(),
            found: upper.len(),
        });
    }
    if lower.is_empty() {
        return Err(Error::InvalidSampleRequest(
            "at least one dimension is required".into(),
        ));
    }
    if num_samples == 0 {
        return Err(Error::InvalidSampleRequest(
            "num_samples must be at least 1".into(),
        ));
    }
    Ok(())
}

pub(crate) fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    }
}
