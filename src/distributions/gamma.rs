use std::f64::consts::E;
use std::fmt;

use rand::Rng;

use super::{
    check_dimension, check_positive, CumulativeDistribution, DensityFunction, Distribution,
    ParameterVector,
};
use crate::error::{NumericError, Result};
use crate::random::{open_closed_unit, unit};
use crate::special::{lanczos_ln_gamma, lower_incomplete_gamma};
use crate::stats::{self, WeightedValue};

/// Rejection attempts allowed per draw for the fractional shape part.
const MAX_REJECTIONS: usize = 100;

/// Gamma distribution with shape k and scale θ.
///
/// # Mathematical Definition
/// - PDF: x^(k−1) e^(−x/θ) / (Γ(k) θ^k) for x > 0
/// - CDF: P(k, x/θ), the regularized lower incomplete gamma function
/// - Mean: kθ
/// - Variance: kθ²
///
/// # Examples
/// ```
/// use u_numstat::distributions::{Distribution, Gamma};
/// let g = Gamma::new(2.0, 2.0).unwrap();
/// assert_eq!(g.mean(), 4.0);
/// assert_eq!(g.variance(), 8.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gamma {
    shape: f64,
    scale: f64,
}

impl Gamma {
    pub const DEFAULT_SHAPE: f64 = 1.0;
    pub const DEFAULT_SCALE: f64 = 1.0;

    /// # Errors
    /// [`NumericError::Domain`] unless `shape > 0` and `scale > 0`.
    pub fn new(shape: f64, scale: f64) -> Result<Self> {
        check_positive("Gamma shape", shape)?;
        check_positive("Gamma scale", scale)?;
        Ok(Self { shape, scale })
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }

    pub fn set_shape(&mut self, shape: f64) -> Result<()> {
        check_positive("Gamma shape", shape)?;
        self.shape = shape;
        Ok(())
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<()> {
        check_positive("Gamma scale", scale)?;
        self.scale = scale;
        Ok(())
    }

    /// Gamma distribution with the given first two moments:
    /// `scale = variance / mean`, `shape = mean² / variance`.
    ///
    /// # Errors
    /// [`NumericError::Domain`] unless `mean > 0` and `variance > 0`.
    pub fn from_moments(mean: f64, variance: f64) -> Result<Self> {
        Self::new(mean * mean / variance, variance / mean)
    }

    /// Moment-matching estimate from a sample.
    ///
    /// # Errors
    /// [`NumericError::Domain`] for fewer than two finite samples or
    /// moments that admit no Gamma distribution.
    pub fn moment_matching(data: &[f64]) -> Result<Self> {
        let (mean, variance) = stats::mean_and_variance(data).ok_or_else(|| {
            NumericError::domain("Gamma moment matching needs at least two finite samples")
        })?;
        Self::from_moments(mean, variance)
    }

    /// Moment-matching estimate from weighted samples.
    pub fn weighted_moment_matching(data: &[WeightedValue]) -> Result<Self> {
        let (mean, variance) = stats::weighted_mean_and_variance(data).ok_or_else(|| {
            NumericError::domain(
                "Gamma moment matching needs at least two positively weighted samples",
            )
        })?;
        Self::from_moments(mean, variance)
    }

    /// One Ahrens–Dieter (GS) draw of Gamma(δ, 1) for `0 < δ < 1`.
    fn sample_fractional<R: Rng + ?Sized>(&self, rng: &mut R, delta: f64, v0: f64) -> Result<f64> {
        for _ in 0..MAX_REJECTIONS {
            let vm2 = unit(rng);
            let vm1 = open_closed_unit(rng);
            let vm0 = unit(rng);

            let (xi, nu) = if vm2 < v0 {
                let xi = vm1.powf(1.0 / delta);
                (xi, vm0 * xi.powf(delta - 1.0))
            } else {
                let xi = 1.0 - vm1.ln();
                (xi, vm0 * (-xi).exp())
            };

            if nu <= xi.powf(delta - 1.0) * (-xi).exp() {
                return Ok(xi);
            }
        }

        log::debug!(
            "gamma sampler exhausted {MAX_REJECTIONS} rejections: shape = {}, scale = {}",
            self.shape,
            self.scale
        );
        Err(NumericError::NonConvergence {
            method: "gamma rejection sampler",
            max_iterations: MAX_REJECTIONS,
            context: format!(" (shape = {}, scale = {})", self.shape, self.scale),
        })
    }
}

impl Default for Gamma {
    fn default() -> Self {
        Self {
            shape: Self::DEFAULT_SHAPE,
            scale: Self::DEFAULT_SCALE,
        }
    }
}

impl fmt::Display for Gamma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape = {}, Scale = {}", self.shape, self.scale)
    }
}

impl Distribution for Gamma {
    type Value = f64;

    fn mean(&self) -> f64 {
        self.shape * self.scale
    }

    fn variance(&self) -> f64 {
        self.shape * self.scale * self.scale
    }

    fn min_support(&self) -> f64 {
        0.0
    }

    fn max_support(&self) -> f64 {
        f64::INFINITY
    }

    /// Integer part as a sum of `⌊k⌋` exponentials (log-uniforms); the
    /// fractional remainder by Ahrens–Dieter GS rejection.
    ///
    /// Reference: Ahrens & Dieter (1974), "Computer Methods for Sampling
    /// from Gamma, Beta, Poisson and Binomial Distributions",
    /// *Computing* 12(3).
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Result<Vec<f64>> {
        let whole = self.shape.floor();
        let delta = self.shape - whole;
        let v0 = if delta > 0.0 { E / (E + delta) } else { 0.0 };
        let exponentials = whole as u64;

        (0..n)
            .map(|_| -> Result<f64> {
                let mut log_sum = 0.0;
                for _ in 0..exponentials {
                    log_sum += open_closed_unit(rng).ln();
                }
                let xi = if delta > 0.0 {
                    self.sample_fractional(rng, delta, v0)?
                } else {
                    0.0
                };
                Ok(self.scale * (xi - log_sum))
            })
            .collect()
    }
}

impl ParameterVector for Gamma {
    const DIMENSION: usize = 2;

    /// `[shape, scale]`
    fn convert_to_vector(&self) -> Vec<f64> {
        vec![self.shape, self.scale]
    }

    fn convert_from_vector(&mut self, parameters: &[f64]) -> Result<()> {
        check_dimension(parameters, Self::DIMENSION)?;
        *self = Self::new(parameters[0], parameters[1])?;
        Ok(())
    }
}

impl DensityFunction for Gamma {
    fn pdf(&self, x: f64) -> f64 {
        if x > 0.0 {
            self.ln_pdf(x).exp()
        } else {
            0.0
        }
    }

    fn ln_pdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return f64::NEG_INFINITY;
        }
        (self.shape - 1.0) * x.ln() - x / self.scale
            - lanczos_ln_gamma(self.shape)
            - self.shape * self.scale.ln()
    }
}

impl CumulativeDistribution for Gamma {
    fn cdf(&self, x: f64) -> Result<f64> {
        if x <= 0.0 {
            return Ok(0.0);
        }
        lower_incomplete_gamma(self.shape, x / self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_gamma_moments() {
        let g = Gamma::new(2.0, 2.0).unwrap();
        assert_eq!(g.mean(), 4.0);
        assert_eq!(g.variance(), 8.0);
        assert_eq!(g.min_support(), 0.0);
        assert_eq!(g.max_support(), f64::INFINITY);
    }

    #[test]
    fn test_gamma_default() {
        let g = Gamma::default();
        assert_eq!(g.shape(), 1.0);
        assert_eq!(g.scale(), 1.0);
    }

    #[test]
    fn test_gamma_invalid() {
        assert!(matches!(Gamma::new(0.0, 1.0), Err(NumericError::Domain(_))));
        assert!(Gamma::new(1.0, -2.0).is_err());
        assert!(Gamma::new(f64::NAN, 1.0).is_err());
        assert!(Gamma::new(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_gamma_failed_setter_keeps_state() {
        let mut g = Gamma::new(3.0, 4.0).unwrap();
        assert!(g.set_shape(-1.0).is_err());
        assert!(g.set_scale(0.0).is_err());
        assert_eq!(g, Gamma::new(3.0, 4.0).unwrap());
        g.set_shape(5.0).unwrap();
        assert_eq!(g.shape(), 5.0);
    }

    #[test]
    fn test_gamma_convert_from_vector_rejects_bad_input() {
        let mut g = Gamma::new(3.0, 4.0).unwrap();
        assert_eq!(
            g.convert_from_vector(&[1.0, 2.0, 3.0]),
            Err(NumericError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
        assert!(g.convert_from_vector(&[1.0, -1.0]).is_err());
        assert_eq!(g.convert_to_vector(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_gamma_pdf_exponential_case() {
        // Gamma(1, θ) is Exponential with mean θ
        let g = Gamma::new(1.0, 2.0).unwrap();
        for &x in &[0.1, 1.0, 3.0] {
            assert_relative_eq!(g.pdf(x), (-x / 2.0).exp() / 2.0, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_gamma_pdf_known_value() {
        // x e^(−x/2) / 4 at x = 3
        let g = Gamma::new(2.0, 2.0).unwrap();
        assert_abs_diff_eq!(g.pdf(3.0), 3.0 * (-1.5_f64).exp() / 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_gamma_pdf_outside_support() {
        let g = Gamma::new(0.5, 1.0).unwrap();
        assert_eq!(g.pdf(0.0), 0.0);
        assert_eq!(g.pdf(-1.0), 0.0);
        assert_eq!(g.ln_pdf(-1.0), f64::NEG_INFINITY);
    }

    #[test]
    fn test_gamma_ln_pdf_consistent() {
        let g = Gamma::new(3.5, 0.7).unwrap();
        for &x in &[0.2, 1.0, 2.5, 6.0] {
            assert_abs_diff_eq!(g.ln_pdf(x), g.pdf(x).ln(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_gamma_cdf() {
        let g = Gamma::new(1.0, 2.0).unwrap();
        assert_eq!(g.cdf(0.0).unwrap(), 0.0);
        assert_eq!(g.cdf(-3.0).unwrap(), 0.0);
        assert_abs_diff_eq!(g.cdf(2.0).unwrap(), 1.0 - (-1.0_f64).exp(), epsilon = 1e-6);
        // Gamma(2, 1): 1 − (1 + x) e^(−x)
        let g = Gamma::new(2.0, 1.0).unwrap();
        assert_abs_diff_eq!(g.cdf(2.0).unwrap(), 0.5939941503, epsilon = 1e-6);
    }

    #[test]
    fn test_from_moments_round_trip() {
        let g = Gamma::from_moments(4.0, 8.0).unwrap();
        assert_relative_eq!(g.shape(), 2.0, max_relative = 1e-12);
        assert_relative_eq!(g.scale(), 2.0, max_relative = 1e-12);
        assert!(Gamma::from_moments(-1.0, 2.0).is_err());
        assert!(Gamma::from_moments(1.0, 0.0).is_err());
    }

    #[test]
    fn test_moment_matching() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        // mean 3, sample variance 2.5
        let g = Gamma::moment_matching(&data).unwrap();
        assert_relative_eq!(g.scale(), 2.5 / 3.0, max_relative = 1e-12);
        assert_relative_eq!(g.shape(), 9.0 / 2.5, max_relative = 1e-12);
        assert!(Gamma::moment_matching(&[1.0]).is_err());
        assert!(Gamma::moment_matching(&[]).is_err());
    }

    #[test]
    fn test_weighted_moment_matching_equal_weights() {
        let data = [1.5, 2.0, 4.0, 7.5, 3.25];
        let weighted: Vec<WeightedValue> =
            data.iter().map(|&x| WeightedValue::new(x, 2.0)).collect();
        let a = Gamma::moment_matching(&data).unwrap();
        let b = Gamma::weighted_moment_matching(&weighted).unwrap();
        assert_relative_eq!(a.shape(), b.shape(), max_relative = 1e-12);
        assert_relative_eq!(a.scale(), b.scale(), max_relative = 1e-12);
    }

    #[test]
    fn test_sample_moments_fractional_shape() {
        let g = Gamma::new(2.5, 1.5).unwrap();
        let mut rng = create_rng(42);
        let draws = g.sample(&mut rng, 20_000).unwrap();
        assert!(draws.iter().all(|x| x.is_finite() && *x > 0.0));
        let (mean, var) = stats::mean_and_variance(&draws).unwrap();
        assert!((mean - 3.75).abs() < 0.1, "mean {mean}");
        assert!((var - 5.625).abs() < 0.4, "variance {var}");
    }

    #[test]
    fn test_sample_integer_shape() {
        let g = Gamma::new(3.0, 1.0).unwrap();
        let mut rng = create_rng(7);
        let draws = g.sample(&mut rng, 20_000).unwrap();
        let mean = stats::mean(&draws).unwrap();
        assert!((mean - 3.0).abs() < 0.08, "mean {mean}");
    }

    #[test]
    fn test_sample_shape_below_one() {
        let g = Gamma::new(0.5, 2.0).unwrap();
        let mut rng = create_rng(2024);
        let draws = g.sample(&mut rng, 20_000).unwrap();
        assert!(draws.iter().all(|x| *x >= 0.0));
        let mean = stats::mean(&draws).unwrap();
        assert!((mean - 1.0).abs() < 0.05, "mean {mean}");
    }

    #[test]
    fn test_sample_reproducible() {
        let g = Gamma::new(1.7, 0.3).unwrap();
        let a = g.sample(&mut create_rng(9), 50).unwrap();
        let b = g.sample(&mut create_rng(9), 50).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_display() {
        let g = Gamma::new(2.0, 0.5).unwrap();
        assert_eq!(g.to_string(), "Shape = 2, Scale = 0.5");
    }
}
