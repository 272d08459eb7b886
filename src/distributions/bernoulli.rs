use std::fmt;
use std::ops::RangeInclusive;

use rand::Rng;

use super::{
    check_dimension, check_probability, CumulativeDistribution, Distribution, MassFunction,
    ParameterVector,
};
use crate::error::{NumericError, Result};
use crate::random::unit;
use crate::stats::WeightedValue;

/// Bernoulli distribution: 1 with probability `p`, 0 otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bernoulli {
    p: f64,
}

impl Bernoulli {
    pub const DEFAULT_P: f64 = 0.5;

    /// # Errors
    /// [`NumericError::Domain`] unless `p ∈ [0, 1]`.
    pub fn new(p: f64) -> Result<Self> {
        check_probability("Bernoulli p", p)?;
        Ok(Self { p })
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn set_p(&mut self, p: f64) -> Result<()> {
        check_probability("Bernoulli p", p)?;
        self.p = p;
        Ok(())
    }

    /// Maximum-likelihood estimate: the fraction of non-zero observations.
    ///
    /// # Errors
    /// [`NumericError::Domain`] for empty data.
    pub fn maximum_likelihood(data: &[i64]) -> Result<Self> {
        if data.is_empty() {
            return Err(NumericError::domain(
                "Bernoulli estimation needs at least one sample",
            ));
        }
        let successes = data.iter().filter(|&&k| k != 0).count();
        Self::new(successes as f64 / data.len() as f64)
    }

    /// Weighted maximum-likelihood estimate: the weighted fraction of
    /// non-zero observations. Entries with weight ≤ 0 are ignored.
    pub fn weighted_maximum_likelihood(data: &[WeightedValue]) -> Result<Self> {
        let mut total = 0.0;
        let mut successes = 0.0;
        for wv in data.iter().filter(|wv| wv.weight > 0.0) {
            total += wv.weight;
            if wv.value != 0.0 {
                successes += wv.weight;
            }
        }
        if !(total > 0.0) {
            return Err(NumericError::domain(
                "Bernoulli estimation needs positive total weight",
            ));
        }
        Self::new(successes / total)
    }
}

impl Default for Bernoulli {
    fn default() -> Self {
        Self { p: Self::DEFAULT_P }
    }
}

impl fmt::Display for Bernoulli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p = {}", self.p)
    }
}

impl Distribution for Bernoulli {
    type Value = i64;

    fn mean(&self) -> f64 {
        self.p
    }

    fn variance(&self) -> f64 {
        self.p * (1.0 - self.p)
    }

    fn min_support(&self) -> i64 {
        0
    }

    fn max_support(&self) -> i64 {
        1
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Result<Vec<i64>> {
        Ok((0..n)
            .map(|_| if unit(rng) < self.p { 1 } else { 0 })
            .collect())
    }
}

impl ParameterVector for Bernoulli {
    const DIMENSION: usize = 1;

    /// `[p]`
    fn convert_to_vector(&self) -> Vec<f64> {
        vec![self.p]
    }

    fn convert_from_vector(&mut self, parameters: &[f64]) -> Result<()> {
        check_dimension(parameters, Self::DIMENSION)?;
        self.set_p(parameters[0])
    }
}

impl MassFunction for Bernoulli {
    fn pmf(&self, k: i64) -> f64 {
        match k {
            0 => 1.0 - self.p,
            1 => self.p,
            _ => 0.0,
        }
    }

    fn domain(&self) -> RangeInclusive<i64> {
        0..=1
    }
}

impl CumulativeDistribution for Bernoulli {
    fn cdf(&self, k: i64) -> Result<f64> {
        Ok(match k {
            k if k < 0 => 0.0,
            0 => 1.0 - self.p,
            _ => 1.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_bernoulli_moments() {
        let b = Bernoulli::new(0.3).unwrap();
        assert_eq!(b.mean(), 0.3);
        assert_abs_diff_eq!(b.variance(), 0.21, epsilon = 1e-15);
        assert_eq!(b.min_support(), 0);
        assert_eq!(b.max_support(), 1);
    }

    #[test]
    fn test_bernoulli_invalid() {
        assert!(matches!(Bernoulli::new(-0.1), Err(NumericError::Domain(_))));
        assert!(Bernoulli::new(1.01).is_err());
        assert!(Bernoulli::new(f64::NAN).is_err());
        let mut b = Bernoulli::new(0.2).unwrap();
        assert!(b.set_p(2.0).is_err());
        assert_eq!(b.p(), 0.2);
    }

    #[test]
    fn test_bernoulli_pmf() {
        let b = Bernoulli::new(0.25).unwrap();
        assert_eq!(b.pmf(0), 0.75);
        assert_eq!(b.pmf(1), 0.25);
        assert_eq!(b.pmf(2), 0.0);
        assert_eq!(b.pmf(-1), 0.0);
        assert_eq!(b.ln_pmf(1), 0.25_f64.ln());
        assert_eq!(b.ln_pmf(5), f64::NEG_INFINITY);
    }

    #[test]
    fn test_bernoulli_cdf() {
        let b = Bernoulli::new(0.25).unwrap();
        assert_eq!(b.cdf(-1).unwrap(), 0.0);
        assert_eq!(b.cdf(0).unwrap(), 0.75);
        assert_eq!(b.cdf(1).unwrap(), 1.0);
        assert_eq!(b.cdf(7).unwrap(), 1.0);
    }

    #[test]
    fn test_bernoulli_entropy() {
        assert_abs_diff_eq!(Bernoulli::default().entropy(), 2.0_f64.ln(), epsilon = 1e-15);
        assert_eq!(Bernoulli::new(1.0).unwrap().entropy(), 0.0);
        assert_eq!(Bernoulli::new(0.0).unwrap().entropy(), 0.0);
    }

    #[test]
    fn test_bernoulli_domain() {
        let domain: Vec<i64> = Bernoulli::default().domain().collect();
        assert_eq!(domain, vec![0, 1]);
    }

    #[test]
    fn test_sample_extremes() {
        let mut rng = create_rng(1);
        let always = Bernoulli::new(1.0).unwrap().sample(&mut rng, 100).unwrap();
        assert!(always.iter().all(|&k| k == 1));
        let never = Bernoulli::new(0.0).unwrap().sample(&mut rng, 100).unwrap();
        assert!(never.iter().all(|&k| k == 0));
    }

    #[test]
    fn test_sample_frequency() {
        let b = Bernoulli::new(0.3).unwrap();
        let mut rng = create_rng(42);
        let draws = b.sample(&mut rng, 20_000).unwrap();
        let fitted = Bernoulli::maximum_likelihood(&draws).unwrap();
        assert!((fitted.p() - 0.3).abs() < 0.02, "{fitted}");
    }

    #[test]
    fn test_maximum_likelihood() {
        let b = Bernoulli::maximum_likelihood(&[1, 0, 0, 1, 1, 0, 0, 0]).unwrap();
        assert_eq!(b.p(), 0.375);
        assert!(Bernoulli::maximum_likelihood(&[]).is_err());
    }

    #[test]
    fn test_weighted_maximum_likelihood() {
        let data = [
            WeightedValue::new(1.0, 3.0),
            WeightedValue::new(0.0, 1.0),
            WeightedValue::new(1.0, -4.0),
            WeightedValue::new(0.0, 0.0),
        ];
        let b = Bernoulli::weighted_maximum_likelihood(&data).unwrap();
        assert_eq!(b.p(), 0.75);
        assert!(Bernoulli::weighted_maximum_likelihood(&[]).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Bernoulli::new(0.25).unwrap().to_string(), "p = 0.25");
    }
}
