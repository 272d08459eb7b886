use std::fmt;
use std::ops::RangeInclusive;

use rand::Rng;

use super::{
    check_dimension, check_positive, check_probability, CumulativeDistribution, Distribution,
    MassFunction, ParameterVector,
};
use crate::error::{NumericError, Result};
use crate::random::inverse_cdf_draw;
use crate::special::{lanczos_ln_gamma, regularized_incomplete_beta};
use crate::stats::{self, WeightedValue};

/// Negative binomial distribution: the number of successes (probability
/// `p` each) before `r` failures occur.
///
/// `r` may be any positive real (the Pólya distribution).
///
/// # Mathematical Definition
/// - PMF: Γ(k+r) / (k! Γ(r)) · (1−p)^r · p^k for k ≥ 0
/// - CDF: I_{1−p}(r, k+1)
/// - Mean: rp/(1−p)
/// - Variance: rp/(1−p)²
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegativeBinomial {
    r: f64,
    p: f64,
}

impl NegativeBinomial {
    pub const DEFAULT_R: f64 = 1.0;
    pub const DEFAULT_P: f64 = 0.5;

    /// # Errors
    /// [`NumericError::Domain`] unless `r > 0` and `p ∈ [0, 1]`.
    pub fn new(r: f64, p: f64) -> Result<Self> {
        check_positive("NegativeBinomial r", r)?;
        check_probability("NegativeBinomial p", p)?;
        Ok(Self { r, p })
    }

    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn set_r(&mut self, r: f64) -> Result<()> {
        check_positive("NegativeBinomial r", r)?;
        self.r = r;
        Ok(())
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn set_p(&mut self, p: f64) -> Result<()> {
        check_probability("NegativeBinomial p", p)?;
        self.p = p;
        Ok(())
    }

    /// Distribution with the given first two moments:
    /// `p = 1 − mean/variance`, `r = mean·(1−p)/p`.
    ///
    /// # Errors
    /// [`NumericError::Domain`] unless `0 < mean < variance`; an
    /// under-dispersed sample has no negative binomial fit.
    pub fn from_moments(mean: f64, variance: f64) -> Result<Self> {
        if !(mean > 0.0) || !(variance > mean) {
            return Err(NumericError::domain(format!(
                "NegativeBinomial moments require 0 < mean < variance, got mean={mean}, variance={variance}"
            )));
        }
        let p = 1.0 - mean / variance;
        Self::new(mean * (1.0 - p) / p, p)
    }

    /// Moment-matching estimate from a sample of counts.
    pub fn moment_matching(data: &[f64]) -> Result<Self> {
        let (mean, variance) = stats::mean_and_variance(data).ok_or_else(|| {
            NumericError::domain(
                "NegativeBinomial moment matching needs at least two finite samples",
            )
        })?;
        Self::from_moments(mean, variance)
    }

    /// Moment-matching estimate from weighted counts.
    pub fn weighted_moment_matching(data: &[WeightedValue]) -> Result<Self> {
        let (mean, variance) = stats::weighted_mean_and_variance(data).ok_or_else(|| {
            NumericError::domain(
                "NegativeBinomial moment matching needs at least two positively weighted samples",
            )
        })?;
        Self::from_moments(mean, variance)
    }
}

impl Default for NegativeBinomial {
    fn default() -> Self {
        Self {
            r: Self::DEFAULT_R,
            p: Self::DEFAULT_P,
        }
    }
}

impl fmt::Display for NegativeBinomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r = {}, p = {}", self.r, self.p)
    }
}

impl Distribution for NegativeBinomial {
    type Value = i64;

    fn mean(&self) -> f64 {
        self.r * self.p / (1.0 - self.p)
    }

    fn variance(&self) -> f64 {
        let q = 1.0 - self.p;
        self.r * self.p / (q * q)
    }

    fn min_support(&self) -> i64 {
        0
    }

    fn max_support(&self) -> i64 {
        i64::MAX
    }

    /// Inverse-CDF walk over [`domain`](MassFunction::domain).
    ///
    /// # Errors
    /// [`NumericError::Domain`] when `p = 1`: no finite count has mass.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Result<Vec<i64>> {
        if self.p >= 1.0 {
            return Err(NumericError::domain(
                "NegativeBinomial with p = 1 has no finite draws",
            ));
        }
        let domain = self.domain();
        Ok((0..n)
            .map(|_| {
                let masses = domain.clone().map(|k| (k, self.pmf(k)));
                inverse_cdf_draw(masses, rng).unwrap_or(0)
            })
            .collect())
    }
}

impl ParameterVector for NegativeBinomial {
    const DIMENSION: usize = 2;

    /// `[r, p]`
    fn convert_to_vector(&self) -> Vec<f64> {
        vec![self.r, self.p]
    }

    fn convert_from_vector(&mut self, parameters: &[f64]) -> Result<()> {
        check_dimension(parameters, Self::DIMENSION)?;
        *self = Self::new(parameters[0], parameters[1])?;
        Ok(())
    }
}

impl MassFunction for NegativeBinomial {
    fn pmf(&self, k: i64) -> f64 {
        self.ln_pmf(k).exp()
    }

    fn ln_pmf(&self, k: i64) -> f64 {
        if k < 0 {
            return f64::NEG_INFINITY;
        }
        let kf = k as f64;
        let ln_k_factorial = if k <= 1 {
            0.0
        } else {
            lanczos_ln_gamma(kf + 1.0)
        };
        // 0·ln(0) is taken as 0 so that p = 0 puts all mass on k = 0.
        let successes = if k == 0 { 0.0 } else { kf * self.p.ln() };
        lanczos_ln_gamma(kf + self.r) - ln_k_factorial - lanczos_ln_gamma(self.r)
            + self.r * (1.0 - self.p).ln()
            + successes
    }

    /// `0..=⌈10·mean + 10⌉`; empty when `p = 1`.
    fn domain(&self) -> RangeInclusive<i64> {
        let upper = (10.0 * self.mean() + 10.0).ceil();
        if upper.is_finite() {
            0..=(upper as i64)
        } else {
            RangeInclusive::new(1, 0)
        }
    }
}

impl CumulativeDistribution for NegativeBinomial {
    fn cdf(&self, k: i64) -> Result<f64> {
        if k < 0 {
            return Ok(0.0);
        }
        regularized_incomplete_beta(self.r, k as f64 + 1.0, 1.0 - self.p)
    }
}
