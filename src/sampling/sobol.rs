//! Sobol low-discrepancy sequence.
//!
//! Backed by the `sobol` crate with the Joe-Kuo D6 direction numbers
//! (new-joe-kuo-6.1000). Dimension 1 is the van der Corput sequence in base 2.

use std::sync::LazyLock;

use ::sobol::Sobol;
use ::sobol::params::JoeKuoD6;

use super::SamplingStrategy;
use super::sequence::LowDiscrepancySequence;
use crate::error::{Error, Result};
use crate::matrix::SampleMatrix;

/// Highest dimension the Joe-Kuo D6 standard table covers.
pub const MAX_DIMENSIONS: usize = 1000;

static PARAMS: LazyLock<JoeKuoD6> = LazyLock::new(JoeKuoD6::standard);

/// The raw Sobol sequence. The first point is the origin.
pub struct SobolSequence {
    inner: Sobol<f64>,
    dimension: usize,
    point: Vec<f64>,
}

impl SobolSequence {
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(Error::InvalidSampleRequest(
                "sobol sequence needs at least one dimension".into(),
            ));
        }
        if dimension > MAX_DIMENSIONS {
            return Err(Error::DimensionLimit {
                requested: dimension,
                max: MAX_DIMENSIONS,
            });
        }
        Ok(Self {
            inner: Sobol::<f64>::new(dimension, &*PARAMS),
            dimension,
            point: vec![0.0; dimension],
        })
    }
}

impl std::fmt::Debug for SobolSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SobolSequence")
            .field("dimension", &self.dimension)
            .field("point", &self.point)
            .finish_non_exhaustive()
    }
}

impl LowDiscrepancySequence for SobolSequence {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn next_point(&mut self) -> &[f64] {
        // Exhausted only after 2^64 points.
        if let Some(point) = self.inner.next() {
            self.point = point;
        }
        &self.point
    }

    fn reset(&mut self) {
        self.inner = Sobol::<f64>::new(self.dimension, &*PARAMS);
        self.point.iter_mut().for_each(|p| *p = 0.0);
    }
}

/// Sobol sampling with the origin point skipped.
#[derive(Debug, Clone, Default)]
pub struct SobolSampling;

impl SobolSampling {
    pub fn new() -> Self {
        Self
    }
}

impl SamplingStrategy for SobolSampling {
    fn name(&self) -> &str {
        "Sobol Sequence Sampling"
    }

    fn unit_samples(&mut self, num_dimensions: usize, num_samples: usize) -> Result<SampleMatrix> {
        let mut seq = SobolSequence::new(num_dimensions)?;
        seq.skip(1);
        let mut matrix = SampleMatrix::zeros(num_samples, num_dimensions);
        for i in 0..num_samples {
            for (j, &v) in seq.next_point().iter().enumerate() {
                matrix.set(i, j, v);
            }
        }
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_column(points: &[Vec<f64>], j: usize) -> Vec<f64> {
        let mut col: Vec<f64> = points.iter().map(|p| p[j]).collect();
        col.sort_by(f64::total_cmp);
        col
    }

    #[test]
    fn first_dimension_is_van_der_corput() {
        let mut seq = SobolSequence::new(1).unwrap();
        let pts: Vec<Vec<f64>> = (0..8).map(|_| seq.next_point().to_vec()).collect();
        let expected: Vec<f64> = (0..8).map(|k| k as f64 / 8.0).collect();
        assert_eq!(sorted_column(&pts, 0), expected);
    }

    #[test]
    fn origin_is_skipped() {
        let raw_first: Vec<f64> = SobolSequence::new(3).unwrap().next_point().to_vec();
        assert!(raw_first.iter().all(|&v| v == 0.0));

        let m = SobolSampling::new().unit_samples(3, 4).unwrap();
        assert_ne!(m.row(0), raw_first.as_slice());
        assert_eq!(m.row(0), &[0.5, 0.5, 0.5]);
    }

    #[test]
    fn reset_rewinds() {
        let mut seq = SobolSequence::new(4).unwrap();
        let first: Vec<Vec<f64>> = (0..5).map(|_| seq.next_point().to_vec()).collect();
        seq.reset();
        let again: Vec<Vec<f64>> = (0..5).map(|_| seq.next_point().to_vec()).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn every_dimension_stratifies_dyadic_blocks() {
        // The first 2^6 points put exactly one value in each [k/64, (k+1)/64).
        let n = 64;
        let dims = 40;
        let mut seq = SobolSequence::new(dims).unwrap();
        let pts: Vec<Vec<f64>> = (0..n).map(|_| seq.next_point().to_vec()).collect();
        for j in 0..dims {
            let bins: Vec<usize> = sorted_column(&pts, j)
                .iter()
                .map(|&v| (v * n as f64).floor() as usize)
                .collect();
            assert_eq!(bins, (0..n).collect::<Vec<_>>(), "dimension {j}");
        }
    }

    #[test]
    fn dimension_limit() {
        assert!(SobolSequence::new(MAX_DIMENSIONS).is_ok());
        assert!(matches!(
            SobolSequence::new(MAX_DIMENSIONS + 1),
            Err(Error::DimensionLimit { .. })
        ));
        assert!(SobolSequence::new(0).is_err());
    }
}
