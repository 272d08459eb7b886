use std::fmt;

use rand::Rng;

use super::{check_dimension, CumulativeDistribution, DensityFunction, Distribution, ParameterVector};
use crate::error::{NumericError, Result};
use crate::random::unit;
use crate::stats;

/// Continuous uniform distribution on `[min, max]`.
///
/// `min == max` is allowed: the distribution is a point mass and the
/// density at that point is `+∞`.
///
/// # Mathematical Definition
/// - PDF: f(x) = 1/(max−min) for x ∈ [min, max]
/// - CDF: F(x) = (x−min)/(max−min)
/// - Mean: (min+max)/2
/// - Variance: (max−min)²/12
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform {
    min: f64,
    max: f64,
}

impl Uniform {
    pub const DEFAULT_MIN: f64 = 0.0;
    pub const DEFAULT_MAX: f64 = 1.0;

    /// Creates a new uniform distribution on `[min, max]`.
    ///
    /// # Errors
    /// [`NumericError::Domain`] if `min > max` or either bound is not finite.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(NumericError::domain(format!(
                "Uniform requires finite min <= max, got min={min}, max={max}"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    /// # Errors
    /// [`NumericError::Domain`] if `min` is not finite or exceeds the current max.
    pub fn set_min(&mut self, min: f64) -> Result<()> {
        *self = Self::new(min, self.max)?;
        Ok(())
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// # Errors
    /// [`NumericError::Domain`] if `max` is not finite or below the current min.
    pub fn set_max(&mut self, max: f64) -> Result<()> {
        *self = Self::new(self.min, max)?;
        Ok(())
    }

    /// Inverse CDF: x = min + p·(max−min), clamped to the support for
    /// `p ≤ 0` and `p ≥ 1`.
    pub fn inverse_cdf(&self, p: f64) -> f64 {
        if p <= 0.0 {
            self.min
        } else if p >= 1.0 {
            self.max
        } else {
            p * (self.max - self.min) + self.min
        }
    }

    /// Maximum-likelihood estimate with the German tank correction.
    ///
    /// The sample extremes underestimate the support, so each bound is
    /// pushed outward by `|bound / n|`.
    ///
    /// # Errors
    /// [`NumericError::Domain`] for empty data or non-finite values.
    ///
    /// # Examples
    /// ```
    /// use u_numstat::distributions::Uniform;
    /// let u = Uniform::maximum_likelihood(&[2.0, 4.0, 8.0, 6.0]).unwrap();
    /// assert_eq!(u.min(), 1.5);
    /// assert_eq!(u.max(), 10.0);
    /// ```
    pub fn maximum_likelihood(data: &[f64]) -> Result<Self> {
        let (min, max) = stats::min_and_max(data).ok_or_else(|| {
            NumericError::domain("Uniform estimation needs at least one finite sample")
        })?;
        let n = data.len() as f64;
        Self::new(min - (min / n).abs(), max + (max / n).abs())
    }
}

impl Default for Uniform {
    fn default() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
        }
    }
}

impl fmt::Display for Uniform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Min = {}, Max = {}", self.min, self.max)
    }
}

impl Distribution for Uniform {
    type Value = f64;

    fn mean(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    fn variance(&self) -> f64 {
        let range = self.max - self.min;
        range * range / 12.0
    }

    fn min_support(&self) -> f64 {
        self.min
    }

    fn max_support(&self) -> f64 {
        self.max
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Result<Vec<f64>> {
        let range = self.max - self.min;
        Ok((0..n).map(|_| unit(rng) * range + self.min).collect())
    }
}

impl ParameterVector for Uniform {
    const DIMENSION: usize = 2;

    /// `[min, max]`
    fn convert_to_vector(&self) -> Vec<f64> {
        vec![self.min, self.max]
    }

    /// The two values may come in either order.
    fn convert_from_vector(&mut self, parameters: &[f64]) -> Result<()> {
        check_dimension(parameters, Self::DIMENSION)?;
        let (a, b) = (parameters[0], parameters[1]);
        // A NaN fails `a <= b` and lands in `min`, where `new` rejects it.
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        *self = Self::new(min, max)?;
        Ok(())
    }
}

impl DensityFunction for Uniform {
    fn pdf(&self, x: f64) -> f64 {
        if x < self.min || x > self.max {
            return 0.0;
        }
        let range = self.max - self.min;
        if range != 0.0 {
            1.0 / range
        } else {
            f64::INFINITY
        }
    }

    fn ln_pdf(&self, x: f64) -> f64 {
        self.pdf(x).ln()
    }
}

impl CumulativeDistribution for Uniform {
    fn cdf(&self, x: f64) -> Result<f64> {
        Ok(if x < self.min {
            0.0
        } else if x >= self.max {
            1.0
        } else {
            (x - self.min) / (self.max - self.min)
        })
    }
}
