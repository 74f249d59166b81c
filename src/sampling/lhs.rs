//! Latin hypercube designs.
//!
//! Each column is split into `n` equal-probability strata and holds exactly
//! one point per stratum. The optimizing criteria draw several candidate
//! designs and keep the best one.

use rand::Rng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use serde::Deserialize;

use super::{SamplingStrategy, seeded_rng};
use crate::error::{Error, Result};
use crate::matrix::SampleMatrix;

pub(crate) const DEFAULT_ITERATIONS: usize = 5;

/// How candidate Latin hypercube designs are built and compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LhsCriterion {
    /// Uniform point inside each stratum.
    Classic,
    /// Stratum midpoints.
    Center,
    /// Maximize the minimum pairwise distance.
    #[default]
    Maximin,
    /// Maximin over centered designs.
    CenterMaximin,
    /// Minimize the largest absolute correlation between columns.
    Correlation,
}

impl std::str::FromStr for LhsCriterion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(LhsCriterion::Classic),
            "c" | "center" => Ok(LhsCriterion::Center),
            "m" | "maximin" => Ok(LhsCriterion::Maximin),
            "cm" | "centermaximin" => Ok(LhsCriterion::CenterMaximin),
            "corr" | "correlation" => Ok(LhsCriterion::Correlation),
            _ => Err(Error::InvalidSampleRequest(format!(
                "unknown latin hypercube criterion: {s}"
            ))),
        }
    }
}

pub struct LatinHypercube {
    name: &'static str,
    criterion: LhsCriterion,
    iterations: usize,
    rng: ChaCha20Rng,
}

impl LatinHypercube {
    pub fn new(criterion: LhsCriterion) -> Self {
        Self::with_seed(criterion, None)
    }

    pub fn with_seed(criterion: LhsCriterion, seed: Option<u64>) -> Self {
        Self {
            name: "Latin Hypercube Sampling",
            criterion,
            iterations: DEFAULT_ITERATIONS,
            rng: seeded_rng(seed),
        }
    }

    /// Orthogonal sampling: a correlation-minimizing Latin hypercube.
    pub fn orthogonal(seed: Option<u64>) -> Self {
        Self {
            name: "Orthogonal Sampling",
            ..Self::with_seed(LhsCriterion::Correlation, seed)
        }
    }

    /// Number of candidate designs the optimizing criteria compare (at least 1).
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    pub fn criterion(&self) -> LhsCriterion {
        self.criterion
    }

    fn design(&mut self, dims: usize, n: usize, centered: bool) -> SampleMatrix {
        let mut matrix = SampleMatrix::zeros(n, dims);
        let width = 1.0 / n as f64;
        let mut column = vec![0.0; n];
        for j in 0..dims {
            for (k, slot) in column.iter_mut().enumerate() {
                let offset = if centered {
                    0.5
                } else {
                    self.rng.r#gen::<f64>()
                };
                *slot = (k as f64 + offset) * width;
            }
            column.shuffle(&mut self.rng);
            for (i, &v) in column.iter().enumerate() {
                matrix.set(i, j, v);
            }
        }
        matrix
    }

    /// Keep the candidate with the highest score. NaN scores never win.
    fn best_of(
        &mut self,
        dims: usize,
        n: usize,
        centered: bool,
        score: fn(&SampleMatrix) -> f64,
    ) -> SampleMatrix {
        let mut best: Option<(f64, SampleMatrix)> = None;
        for _ in 0..self.iterations {
            let candidate = self.design(dims, n, centered);
            let s = score(&candidate);
            match &best {
                Some((best_score, _)) if !(s > *best_score) => {}
                _ => best = Some((s, candidate)),
            }
        }
        match best {
            Some((_, m)) => m,
            None => self.design(dims, n, centered),
        }
    }
}

impl SamplingStrategy for LatinHypercube {
    fn name(&self) -> &str {
        self.name
    }

    fn unit_samples(&mut self, num_dimensions: usize, num_samples: usize) -> Result<SampleMatrix> {
        let (d, n) = (num_dimensions, num_samples);
        Ok(match self.criterion {
            LhsCriterion::Classic => self.design(d, n, false),
            LhsCriterion::Center => self.design(d, n, true),
            LhsCriterion::Maximin => self.best_of(d, n, false, min_pairwise_distance),
            LhsCriterion::CenterMaximin => self.best_of(d, n, true, min_pairwise_distance),
            LhsCriterion::Correlation => {
                self.best_of(d, n, false, |m| -max_abs_correlation(m))
            }
        })
    }
}

fn min_pairwise_distance(m: &SampleMatrix) -> f64 {
    let mut min = f64::INFINITY;
    for i in 0..m.num_samples() {
        for j in (i + 1)..m.num_samples() {
            let d: f64 = m
                .row(i)
                .iter()
                .zip(m.row(j))
                .map(|(a, b)| (a - b) * (a - b))
                .sum();
            min = min.min(d.sqrt());
        }
    }
    min
}

fn max_abs_correlation(m: &SampleMatrix) -> f64 {
    let columns: Vec<Vec<f64>> = (0..m.num_dimensions()).map(|j| m.column(j)).collect();
    let mut max = 0.0_f64;
    for a in 0..columns.len() {
        for b in (a + 1)..columns.len() {
            let r = pearson(&columns[a], &columns[b]);
            if r.is_nan() {
                return f64::NAN;
            }
            max = max.max(r.abs());
        }
    }
    max
}

/// Pearson correlation coefficient between two slices.
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    if n < 2.0 {
        return f64::NAN;
    }

    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0_f64;
    let mut var_x = 0.0_f64;
    let mut var_y = 0.0_f64;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x * var_y).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every column must hit each of the `n` strata exactly once.
    fn assert_latin(m: &SampleMatrix) {
        let n = m.num_samples();
        for j in 0..m.num_dimensions() {
            let mut strata: Vec<usize> = m
                .column(j)
                .iter()
                .map(|v| ((v * n as f64).floor() as usize).min(n - 1))
                .collect();
            strata.sort_unstable();
            assert_eq!(strata, (0..n).collect::<Vec<_>>(), "column {j} not stratified");
        }
    }

    #[test]
    fn every_criterion_is_stratified() {
        for criterion in [
            LhsCriterion::Classic,
            LhsCriterion::Center,
            LhsCriterion::Maximin,
            LhsCriterion::CenterMaximin,
            LhsCriterion::Correlation,
        ] {
            let mut lhs = LatinHypercube::with_seed(criterion, Some(7));
            let m = lhs.unit_samples(4, 12).unwrap();
            assert_eq!(m.shape(), (12, 4));
            assert_latin(&m);
        }
    }

    #[test]
    fn center_uses_midpoints() {
        let mut lhs = LatinHypercube::with_seed(LhsCriterion::Center, Some(1));
        let m = lhs.unit_samples(1, 4).unwrap();
        let mut col = m.column(0);
        col.sort_by(f64::total_cmp);
        assert_eq!(col, vec![0.125, 0.375, 0.625, 0.875]);
    }

    #[test]
    fn seeded_designs_repeat() {
        let a = LatinHypercube::with_seed(LhsCriterion::Maximin, Some(42))
            .unit_samples(3, 8)
            .unwrap();
        let b = LatinHypercube::with_seed(LhsCriterion::Maximin, Some(42))
            .unit_samples(3, 8)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn maximin_never_worse_than_first_candidate() {
        // Same seed: the first maximin candidate is exactly the classic design.
        let classic = LatinHypercube::with_seed(LhsCriterion::Classic, Some(3))
            .unit_samples(2, 10)
            .unwrap();
        let maximin = LatinHypercube::with_seed(LhsCriterion::Maximin, Some(3))
            .with_iterations(20)
            .unit_samples(2, 10)
            .unwrap();
        assert!(min_pairwise_distance(&maximin) >= min_pairwise_distance(&classic));
    }

    #[test]
    fn single_sample_design() {
        for criterion in [LhsCriterion::Maximin, LhsCriterion::Correlation] {
            let m = LatinHypercube::with_seed(criterion, Some(5))
                .unit_samples(3, 1)
                .unwrap();
            assert_eq!(m.shape(), (1, 3));
            assert!(m.row(0).iter().all(|v| (0.0..1.0).contains(v)));
        }
    }

    #[test]
    fn orthogonal_name_and_criterion() {
        let o = LatinHypercube::orthogonal(None);
        assert_eq!(o.name(), "Orthogonal Sampling");
        assert_eq!(o.criterion(), LhsCriterion::Correlation);
    }

    #[test]
    fn parse_criterion() {
        assert_eq!("cm".parse::<LhsCriterion>().unwrap(), LhsCriterion::CenterMaximin);
        assert_eq!("Correlation".parse::<LhsCriterion>().unwrap(), LhsCriterion::Correlation);
        assert!("spread".parse::<LhsCriterion>().is_err());
    }

    #[test]
    fn pearson_perfect_correlation() {
        assert!((pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]) - 1.0).abs() < 1e-12);
        assert!((pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) + 1.0).abs() < 1e-12);
        assert!(pearson(&[1.0, 1.0], &[1.0, 2.0]).is_nan());
    }
}
