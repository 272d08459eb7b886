//! Closed-form scalar probability distributions.
//!
//! Each distribution is one validated parameter struct. Its capabilities
//! are traits over that struct rather than separate PDF/CDF objects:
//!
//! | Trait | Capability |
//! |---|---|
//! | [`Distribution`] | mean, variance, support, sampling |
//! | [`ParameterVector`] | conversion to/from a flat `f64` parameter vector |
//! | [`DensityFunction`] | pdf / ln-pdf (continuous) |
//! | [`MassFunction`] | pmf / ln-pmf, domain, entropy (discrete) |
//! | [`CumulativeDistribution`] | cdf |
//! | [`SmoothCumulativeDistribution`] | derivative of the cdf (= pdf) |
//!
//! # Supported Distributions
//!
//! | Distribution | Parameters | Mean | Variance |
//! |---|---|---|---|
//! | [`Gamma`] | shape k, scale θ | kθ | kθ² |
//! | [`LogNormal`] | μ, σ² of ln X | exp(μ+σ²/2) | (exp(σ²)−1)·exp(2μ+σ²) |
//! | [`Uniform`] | min, max | (a+b)/2 | (b−a)²/12 |
//! | [`Bernoulli`] | p | p | p(1−p) |
//! | [`NegativeBinomial`] | r, p | rp/(1−p) | rp/(1−p)² |
//!
//! # Design Notes
//!
//! Parameters are plain `f64` values. Constructors and setters validate
//! every parameter; a failed setter leaves the distribution unchanged.

mod bernoulli;
mod gamma;
mod log_normal;
mod negative_binomial;
mod uniform;

use std::ops::RangeInclusive;

use rand::Rng;

use crate::error::{NumericError, Result};

pub use crate::stats::WeightedValue;
pub use bernoulli::Bernoulli;
pub use gamma::Gamma;
pub use log_normal::LogNormal;
pub use negative_binomial::NegativeBinomial;
pub use uniform::Uniform;

/// Moments, support and sampling shared by every distribution.
pub trait Distribution {
    /// Type of a single observation: `f64` for continuous, `i64` for discrete.
    type Value;

    fn mean(&self) -> f64;

    fn variance(&self) -> f64;

    /// Smallest value with non-zero density/mass.
    fn min_support(&self) -> Self::Value;

    /// Largest value with non-zero density/mass.
    fn max_support(&self) -> Self::Value;

    /// Draws `n` independent values using the caller's generator.
    ///
    /// # Errors
    /// Samplers with a bounded rejection loop report
    /// [`NumericError::NonConvergence`] when the loop is exhausted.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Result<Vec<Self::Value>>;
}

/// Conversion between a distribution and its flat parameter vector.
pub trait ParameterVector {
    /// Number of parameters.
    const DIMENSION: usize;

    fn convert_to_vector(&self) -> Vec<f64>;

    /// Replaces the parameters with `parameters`.
    ///
    /// # Errors
    /// - [`NumericError::DimensionMismatch`] for a vector of the wrong length.
    /// - [`NumericError::Domain`] when a value violates its constraint; the
    ///   distribution is left unchanged.
    fn convert_from_vector(&mut self, parameters: &[f64]) -> Result<()>;
}

/// Probability density of a continuous distribution.
pub trait DensityFunction {
    fn pdf(&self, x: f64) -> f64;

    /// Natural log of the density; `-∞` outside the support.
    fn ln_pdf(&self, x: f64) -> f64;
}

/// Probability mass of a discrete distribution.
pub trait MassFunction {
    fn pmf(&self, k: i64) -> f64;

    /// Natural log of the mass; `-∞` outside the support.
    fn ln_pmf(&self, k: i64) -> f64 {
        self.pmf(k).ln()
    }

    /// Finite set of values carrying (nearly) all of the mass.
    fn domain(&self) -> RangeInclusive<i64>;

    /// Shannon entropy `−Σ p ln p` over [`domain`](Self::domain), in nats.
    fn entropy(&self) -> f64 {
        self.domain()
            .map(|k| self.pmf(k))
            .filter(|&p| p > 0.0)
            .map(|p| -p * p.ln())
            .sum()
    }
}

/// Cumulative distribution function.
pub trait CumulativeDistribution: Distribution {
    /// `Pr(X ≤ x)`.
    ///
    /// # Errors
    /// Propagates failures of the underlying special function.
    fn cdf(&self, x: Self::Value) -> Result<f64>;
}

/// A cumulative distribution whose derivative is the density.
pub trait SmoothCumulativeDistribution:
    CumulativeDistribution<Value = f64> + DensityFunction
{
    fn derivative(&self, x: f64) -> f64 {
        self.pdf(x)
    }
}

impl<D> SmoothCumulativeDistribution for D where D: CumulativeDistribution<Value = f64> + DensityFunction
{}

pub(crate) fn check_dimension(parameters: &[f64], expected: usize) -> Result<()> {
    if parameters.len() != expected {
        return Err(NumericError::DimensionMismatch {
            expected,
            actual: parameters.len(),
        });
    }
    Ok(())
}

pub(crate) fn check_probability(name: &str, p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(NumericError::domain(format!(
            "{name} must be a probability in [0, 1], got {p}"
        )));
    }
    Ok(())
}

pub(crate) fn check_positive(name: &str, value: f64) -> Result<()> {
    if !(value > 0.0) || !value.is_finite() {
        return Err(NumericError::domain(format!(
            "{name} must be finite and > 0, got {value}"
        )));
    }
    Ok(())
}
