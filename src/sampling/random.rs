use rand::Rng;
use rand_chacha::ChaCha20Rng;

use super::{SamplingStrategy, seeded_rng};
use crate::error::Result;
use crate::matrix::SampleMatrix;

/// Independent uniform draws per dimension.
///
/// The generator belongs to the instance: two instances built with the same
/// seed produce the same matrices, and an unseeded instance is entropy-seeded.
pub struct RandomSampling {
    seed: Option<u64>,
    rng: ChaCha20Rng,
}

impl RandomSampling {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            rng: seeded_rng(seed),
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl SamplingStrategy for RandomSampling {
    fn name(&self) -> &str {
        "Random Sampling"
    }

    fn unit_samples(&mut self, num_dimensions: usize, num_samples: usize) -> Result<SampleMatrix> {
        let mut matrix = SampleMatrix::zeros(num_samples, num_dimensions);
        for i in 0..num_samples {
            for j in 0..num_dimensions {
                matrix.set(i, j, self.rng.r#gen::<f64>());
            }
        }
        Ok(matrix)
    }
}
