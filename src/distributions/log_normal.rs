use std::f64::consts::PI;
use std::fmt;

use rand::Rng;

use super::{
    check_dimension, check_positive, CumulativeDistribution, DensityFunction, Distribution,
    ParameterVector,
};
use crate::error::{NumericError, Result};
use crate::random::standard_normal;
use crate::special::erf;
use crate::stats::{self, WeightedValue};

/// Log-normal distribution: if X ~ LogNormal(μ, σ²), then ln(X) ~ N(μ, σ²).
///
/// Parameterized by the mean μ and the **variance** σ² of ln X.
///
/// # Mathematical Definition
/// - PDF: exp(−(ln x − μ)²/(2σ²)) / (x √(2πσ²)) for x > 0
/// - CDF: ½ (1 + erf((ln x − μ)/√(2σ²)))
/// - Mean: exp(μ + σ²/2)
/// - Variance: (exp(σ²) − 1) · exp(2μ + σ²)
///
/// Reference: Johnson, Kotz & Balakrishnan (1994), *Continuous Univariate
/// Distributions*, Vol. 1, Chapter 14.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNormal {
    log_mean: f64,
    log_variance: f64,
}

impl LogNormal {
    pub const DEFAULT_LOG_MEAN: f64 = 0.0;
    pub const DEFAULT_LOG_VARIANCE: f64 = 1.0;

    /// # Errors
    /// [`NumericError::Domain`] unless `log_mean` is finite and
    /// `log_variance > 0`.
    pub fn new(log_mean: f64, log_variance: f64) -> Result<Self> {
        check_log_mean(log_mean)?;
        check_positive("LogNormal log-variance", log_variance)?;
        Ok(Self {
            log_mean,
            log_variance,
        })
    }

    /// Mean of ln X.
    pub fn log_mean(&self) -> f64 {
        self.log_mean
    }

    pub fn set_log_mean(&mut self, log_mean: f64) -> Result<()> {
        check_log_mean(log_mean)?;
        self.log_mean = log_mean;
        Ok(())
    }

    /// Variance of ln X.
    pub fn log_variance(&self) -> f64 {
        self.log_variance
    }

    pub fn set_log_variance(&mut self, log_variance: f64) -> Result<()> {
        check_positive("LogNormal log-variance", log_variance)?;
        self.log_variance = log_variance;
        Ok(())
    }

    /// Maximum-likelihood estimate: sample mean and variance of `ln x`.
    ///
    /// # Errors
    /// [`NumericError::Domain`] if any value is not > 0, or fewer than two
    /// values are given.
    pub fn maximum_likelihood(data: &[f64]) -> Result<Self> {
        if let Some(bad) = data.iter().find(|&&x| !(x > 0.0)) {
            return Err(NumericError::domain(format!(
                "LogNormal estimation requires positive data, got {bad}"
            )));
        }
        let logs: Vec<f64> = data.iter().map(|x| x.ln()).collect();
        let (mean, variance) = stats::mean_and_variance(&logs).ok_or_else(|| {
            NumericError::domain("LogNormal estimation needs at least two finite samples")
        })?;
        Self::new(mean, variance)
    }

    /// Weighted maximum-likelihood estimate on `ln x`.
    ///
    /// Values `x ≤ 0` have no logarithm; they are given zero weight.
    pub fn weighted_maximum_likelihood(data: &[WeightedValue]) -> Result<Self> {
        let logs: Vec<WeightedValue> = data
            .iter()
            .filter(|wv| wv.value > 0.0)
            .map(|wv| WeightedValue::new(wv.value.ln(), wv.weight))
            .collect();
        let (mean, variance) = stats::weighted_mean_and_variance(&logs).ok_or_else(|| {
            NumericError::domain(
                "LogNormal estimation needs at least two positive, positively weighted samples",
            )
        })?;
        Self::new(mean, variance)
    }
}

fn check_log_mean(log_mean: f64) -> Result<()> {
    if !log_mean.is_finite() {
        return Err(NumericError::domain(format!(
            "LogNormal log-mean must be finite, got {log_mean}"
        )));
    }
    Ok(())
}

impl Default for LogNormal {
    fn default() -> Self {
        Self {
            log_mean: Self::DEFAULT_LOG_MEAN,
            log_variance: Self::DEFAULT_LOG_VARIANCE,
        }
    }
}

impl fmt::Display for LogNormal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Log-Mean: {} Log-Variance: {}",
            self.log_mean, self.log_variance
        )
    }
}

impl Distribution for LogNormal {
    type Value = f64;

    /// Mean = exp(μ + σ²/2).
    fn mean(&self) -> f64 {
        (self.log_mean + 0.5 * self.log_variance).exp()
    }

    /// Variance = (exp(σ²) − 1) · exp(2μ + σ²), with `expm1` for small σ².
    fn variance(&self) -> f64 {
        self.log_variance.exp_m1() * (2.0 * self.log_mean + self.log_variance).exp()
    }

    fn min_support(&self) -> f64 {
        0.0
    }

    fn max_support(&self) -> f64 {
        f64::INFINITY
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Result<Vec<f64>> {
        let std_dev = self.log_variance.sqrt();
        Ok((0..n)
            .map(|_| (self.log_mean + std_dev * standard_normal(rng)).exp())
            .collect())
    }
}

impl ParameterVector for LogNormal {
    const DIMENSION: usize = 2;

    /// `[log_mean, log_variance]`
    fn convert_to_vector(&self) -> Vec<f64> {
        vec![self.log_mean, self.log_variance]
    }

    fn convert_from_vector(&mut self, parameters: &[f64]) -> Result<()> {
        check_dimension(parameters, Self::DIMENSION)?;
        *self = Self::new(parameters[0], parameters[1])?;
        Ok(())
    }
}

impl DensityFunction for LogNormal {
    fn pdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        let delta = x.ln() - self.log_mean;
        let numerator = (delta * delta / (-2.0 * self.log_variance)).exp();
        numerator / ((2.0 * PI).sqrt() * x * self.log_variance.sqrt())
    }

    fn ln_pdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return f64::NEG_INFINITY;
        }
        let ln_x = x.ln();
        let delta = ln_x - self.log_mean;
        delta * delta / (-2.0 * self.log_variance)
            - 0.5 * (2.0 * PI * self.log_variance).ln()
            - ln_x
    }
}

impl CumulativeDistribution for LogNormal {
    fn cdf(&self, x: f64) -> Result<f64> {
        if x <= 0.0 {
            return Ok(0.0);
        }
        let z = (x.ln() - self.log_mean) / (2.0 * self.log_variance).sqrt();
        Ok(0.5 * (1.0 + erf(z)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::E;

    #[test]
    fn test_lognormal_moments() {
        let l = LogNormal::default();
        assert_relative_eq!(l.mean(), 0.5_f64.exp(), max_relative = 1e-14);
        assert_relative_eq!(l.variance(), (E - 1.0) * E, max_relative = 1e-12);
    }

    #[test]
    fn test_lognormal_small_variance_precision() {
        // expm1 keeps the variance accurate for tiny σ²
        let l = LogNormal::new(0.0, 1e-12).unwrap();
        assert_relative_eq!(l.variance(), 1e-12, max_relative = 1e-6);
    }

    #[test]
    fn test_lognormal_invalid() {
        assert!(matches!(
            LogNormal::new(0.0, 0.0),
            Err(NumericError::Domain(_))
        ));
        assert!(LogNormal::new(0.0, -1.0).is_err());
        assert!(LogNormal::new(f64::NAN, 1.0).is_err());
        assert!(LogNormal::new(f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_lognormal_failed_setter_keeps_state() {
        let mut l = LogNormal::new(1.0, 2.0).unwrap();
        assert!(l.set_log_variance(0.0).is_err());
        assert!(l.set_log_mean(f64::NAN).is_err());
        assert_eq!(l.convert_to_vector(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_lognormal_pdf() {
        let l = LogNormal::default();
        assert_abs_diff_eq!(l.pdf(1.0), 0.3989422804014327, epsilon = 1e-14);
        assert_eq!(l.pdf(0.0), 0.0);
        assert_eq!(l.pdf(-2.0), 0.0);
        assert_eq!(l.ln_pdf(0.0), f64::NEG_INFINITY);
    }

    #[test]
    fn test_lognormal_ln_pdf_consistent() {
        let l = LogNormal::new(0.3, 0.8).unwrap();
        for &x in &[0.05, 0.5, 1.0, 3.0, 12.0] {
            assert_abs_diff_eq!(l.ln_pdf(x), l.pdf(x).ln(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_lognormal_cdf() {
        let l = LogNormal::default();
        assert_eq!(l.cdf(1.0).unwrap(), 0.5);
        assert_eq!(l.cdf(0.0).unwrap(), 0.0);
        // Φ(1) and Φ(−1)
        assert_abs_diff_eq!(l.cdf(E).unwrap(), 0.8413447461, epsilon = 1e-6);
        assert_abs_diff_eq!(l.cdf(1.0 / E).unwrap(), 0.1586552539, epsilon = 1e-6);
    }

    #[test]
    fn test_maximum_likelihood_exact() {
        let data = [1.0_f64.exp(), 2.0_f64.exp(), 3.0_f64.exp()];
        let l = LogNormal::maximum_likelihood(&data).unwrap();
        assert_abs_diff_eq!(l.log_mean(), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(l.log_variance(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_maximum_likelihood_rejects_non_positive() {
        assert!(LogNormal::maximum_likelihood(&[1.0, 0.0, 2.0]).is_err());
        assert!(LogNormal::maximum_likelihood(&[1.0, -3.0]).is_err());
        assert!(LogNormal::maximum_likelihood(&[2.0]).is_err());
    }

    #[test]
    fn test_weighted_maximum_likelihood_ignores_non_positive() {
        let data = [
            WeightedValue::new(1.0_f64.exp(), 1.0),
            WeightedValue::new(2.0_f64.exp(), 1.0),
            WeightedValue::new(0.0, 5.0),
            WeightedValue::new(3.0_f64.exp(), 1.0),
            WeightedValue::new(-1.0, 2.0),
        ];
        let l = LogNormal::weighted_maximum_likelihood(&data).unwrap();
        assert_abs_diff_eq!(l.log_mean(), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(l.log_variance(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_recovers_parameters() {
        let l = LogNormal::new(0.5, 0.25).unwrap();
        let mut rng = create_rng(42);
        let draws = l.sample(&mut rng, 20_000).unwrap();
        assert!(draws.iter().all(|&x| x > 0.0));
        let fitted = LogNormal::maximum_likelihood(&draws).unwrap();
        assert!((fitted.log_mean() - 0.5).abs() < 0.02, "{fitted}");
        assert!((fitted.log_variance() - 0.25).abs() < 0.02, "{fitted}");
    }

    #[test]
    fn test_display() {
        let l = LogNormal::new(0.5, 2.0).unwrap();
        assert_eq!(l.to_string(), "Log-Mean: 0.5 Log-Variance: 2");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn lognormal_cdf_monotonic(
            mu in -3.0_f64..3.0,
            var in 0.05_f64..4.0,
            x1 in 0.001_f64..50.0,
            x2 in 0.001_f64..50.0,
        ) {
            let l = LogNormal::new(mu, var).unwrap();
            let (lo, hi) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
            prop_assert!(l.cdf(lo).unwrap() <= l.cdf(hi).unwrap() + 1e-6);
        }

        #[test]
        fn lognormal_vector_round_trip(mu in -1e3_f64..1e3, var in 1e-6_f64..1e3) {
            let l = LogNormal::new(mu, var).unwrap();
            let mut m = LogNormal::default();
            m.convert_from_vector(&l.convert_to_vector()).unwrap();
            prop_assert_eq!(l, m);
        }
    }
}
