//! Halton sequence with optional random digit-permutation scrambling.

use rand::Rng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

use super::sequence::LowDiscrepancySequence;
use super::{SamplingStrategy, seeded_rng};
use crate::error::{Error, Result};
use crate::matrix::SampleMatrix;

/// Largest f64 strictly below 1.
const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// Radical-inverse sequence in the first `d` prime bases.
#[derive(Debug, Clone)]
pub struct HaltonSequence {
    bases: Vec<u64>,
    /// `[dimension][digit position]` -> permutation of `0..base`.
    permutations: Option<Vec<Vec<Vec<u64>>>>,
    index: u64,
    point: Vec<f64>,
}

impl HaltonSequence {
    /// Unscrambled sequence; the first point is the origin.
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(Error::InvalidSampleRequest(
                "halton sequence needs at least one dimension".into(),
            ));
        }
        Ok(Self {
            bases: first_primes(dimension),
            permutations: None,
            index: 0,
            point: vec![0.0; dimension],
        })
    }

    /// Scrambled sequence: every digit position of every base gets its own
    /// random permutation drawn from `rng`.
    pub fn scrambled<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> Result<Self> {
        let mut seq = Self::new(dimension)?;
        let permutations = seq
            .bases
            .iter()
            .map(|&base| {
                (0..digit_count(base))
                    .map(|_| {
                        let mut perm: Vec<u64> = (0..base).collect();
                        perm.shuffle(rng);
                        perm
                    })
                    .collect()
            })
            .collect();
        seq.permutations = Some(permutations);
        Ok(seq)
    }

    pub fn bases(&self) -> &[u64] {
        &self.bases
    }

    fn radical_inverse(&self, dim: usize, mut n: u64) -> f64 {
        let base = self.bases[dim];
        let inv_base = 1.0 / base as f64;
        let mut factor = inv_base;
        let mut value = 0.0;
        match &self.permutations {
            Some(perms) => {
                // Permuted zero digits past the end of `n` still contribute.
                for perm in &perms[dim] {
                    value += perm[(n % base) as usize] as f64 * factor;
                    n /= base;
                    factor *= inv_base;
                }
            }
            None => {
                while n > 0 {
                    value += (n % base) as f64 * factor;
                    n /= base;
                    factor *= inv_base;
                }
            }
        }
        value.min(BELOW_ONE)
    }
}

impl LowDiscrepancySequence for HaltonSequence {
    fn dimension(&self) -> usize {
        self.bases.len()
    }

    fn next_point(&mut self) -> &[f64] {
        for j in 0..self.bases.len() {
            self.point[j] = self.radical_inverse(j, self.index);
        }
        self.index += 1;
        &self.point
    }

    fn reset(&mut self) {
        self.index = 0;
    }

    fn skip(&mut self, n: usize) {
        self.index += n as u64;
    }
}

/// Digits needed to resolve a full f64 mantissa in `base`.
fn digit_count(base: u64) -> usize {
    (53.0 / (base as f64).log2()).ceil() as usize
}

fn first_primes(count: usize) -> Vec<u64> {
    let mut primes: Vec<u64> = Vec::with_capacity(count);
    let mut candidate = 2u64;
    while primes.len() < count {
        if primes
            .iter()
            .take_while(|&&p| p * p <= candidate)
            .all(|&p| candidate % p != 0)
        {
            primes.push(candidate);
        }
        candidate += 1;
    }
    primes
}

/// Halton sampling, scrambled by default.
pub struct HaltonSampling {
    scramble: bool,
    rng: ChaCha20Rng,
}

impl HaltonSampling {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            scramble: true,
            rng: seeded_rng(seed),
        }
    }

    /// Plain Halton points (deterministic, starts at the origin).
    pub fn unscrambled() -> Self {
        Self {
            scramble: false,
            ..Self::new(Some(0))
        }
    }
}

impl SamplingStrategy for HaltonSampling {
    fn name(&self) -> &str {
        "Halton Sequence Sampling"
    }

    fn unit_samples(&mut self, num_dimensions: usize, num_samples: usize) -> Result<SampleMatrix> {
        let mut seq = if self.scramble {
            HaltonSequence::scrambled(num_dimensions, &mut self.rng)?
        } else {
            HaltonSequence::new(num_dimensions)?
        };
        let mut matrix = SampleMatrix::zeros(num_samples, num_dimensions);
        for i in 0..num_samples {
            for (j, &v) in seq.next_point().iter().enumerate() {
                matrix.set(i, j, v);
            }
        }
        Ok(matrix)
    }
}
