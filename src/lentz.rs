//! Modified Lentz method for evaluating continued fractions.
//!
//! Evaluates
//! ```text
//! f = b₀ + a₁/(b₁ + a₂/(b₂ + a₃/(b₃ + …)))
//! ```
//! one term pair at a time. Zero denominators are replaced by a tiny
//! floor so the recurrence never divides by zero.
//!
//! Reference: Press et al. (1992), *Numerical Recipes in C*, 2nd ed., §5.2.
//!
//! # Usage
//! ```
//! use u_numstat::lentz::LentzMethod;
//! // Golden ratio: φ = 1 + 1/(1 + 1/(1 + …))
//! let mut lentz = LentzMethod::new();
//! lentz.initialize(1.0);
//! while lentz.keep_going() {
//!     lentz.iterate(1.0, 1.0);
//! }
//! let phi = lentz.finish("golden ratio").unwrap();
//! assert!((phi - 1.618033988749895).abs() < 1e-6);
//! ```

use crate::error::{NumericError, Result};

/// Convergence limits for [`LentzMethod`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LentzConfig {
    /// Convergence tolerance on `|delta − 1|`.
    pub eps: f64,
    /// Iteration cap; reaching it without convergence invalidates the result.
    pub max_iterations: usize,
    /// Floor substituted for vanishing numerators/denominators.
    pub tiny: f64,
}

impl LentzConfig {
    pub const DEFAULT_EPS: f64 = 3e-7;
    pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
    pub const DEFAULT_TINY: f64 = 1e-30;
}

impl Default for LentzConfig {
    fn default() -> Self {
        Self {
            eps: Self::DEFAULT_EPS,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            tiny: Self::DEFAULT_TINY,
        }
    }
}

/// Iteration state of one continued-fraction evaluation.
///
/// Create one per evaluation, feed it term pairs with
/// [`iterate`](Self::iterate) while [`keep_going`](Self::keep_going)
/// holds, then read the value through [`finish`](Self::finish).
#[derive(Debug, Clone)]
pub struct LentzMethod {
    config: LentzConfig,
    c: f64,
    d: f64,
    result: f64,
    delta: f64,
    iteration: usize,
    keep_going: bool,
}

impl LentzMethod {
    /// Creates a solver with the default limits, initialized with `b₀ = 0`.
    pub fn new() -> Self {
        Self::with_config(LentzConfig::default())
    }

    /// Creates a solver with custom limits, initialized with `b₀ = 0`.
    pub fn with_config(config: LentzConfig) -> Self {
        let mut lentz = Self {
            config,
            c: 0.0,
            d: 0.0,
            result: 0.0,
            delta: 0.0,
            iteration: 0,
            keep_going: true,
        };
        lentz.initialize(0.0);
        lentz
    }

    /// Resets the state to evaluate a fraction whose leading term is `b0`.
    ///
    /// A zero `b0` is replaced by the tiny floor.
    pub fn initialize(&mut self, b0: f64) {
        self.result = if b0 == 0.0 { self.config.tiny } else { b0 };
        self.c = self.result;
        self.d = 0.0;
        self.delta = 0.0;
        self.iteration = 0;
        self.keep_going = true;
    }

    /// Consumes the term pair `(aᵢ, bᵢ)` and returns [`keep_going`](Self::keep_going).
    pub fn iterate(&mut self, a: f64, b: f64) -> bool {
        let tiny = self.config.tiny;

        self.d = b + a * self.d;
        if self.d.abs() < tiny {
            self.d = tiny;
        }
        self.c = b + a / self.c;
        if self.c.abs() < tiny {
            self.c = tiny;
        }
        self.d = 1.0 / self.d;
        self.delta = self.c * self.d;
        self.result *= self.delta;
        self.iteration += 1;

        self.keep_going = !self.has_converged() && self.iteration < self.config.max_iterations;
        self.keep_going
    }

    /// True while the last delta is outside tolerance and the cap is not reached.
    pub fn keep_going(&self) -> bool {
        self.keep_going
    }

    /// Number of term pairs consumed since the last initialization.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Current value of the fraction.
    pub fn result(&self) -> f64 {
        self.result
    }

    /// False when the iteration cap was reached without convergence.
    pub fn is_result_valid(&self) -> bool {
        self.has_converged()
    }

    /// Returns the converged value, or a non-convergence error naming `method`.
    pub fn finish(&self, method: &'static str) -> Result<f64> {
        if self.is_result_valid() {
            log::trace!("{method} converged after {} iterations", self.iteration);
            Ok(self.result)
        } else {
            Err(NumericError::non_convergence(
                method,
                self.config.max_iterations,
            ))
        }
    }

    fn has_converged(&self) -> bool {
        self.iteration > 0 && (self.delta - 1.0).abs() <= self.config.eps
    }
}

impl Default for LentzMethod {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_initialize_replaces_zero_with_tiny() {
        let lentz = LentzMethod::new();
        assert_eq!(lentz.result(), LentzConfig::DEFAULT_TINY);
        assert_eq!(lentz.iteration(), 0);
        assert!(lentz.keep_going());
        assert!(!lentz.is_result_valid());
    }

    #[test]
    fn test_golden_ratio() {
        let mut lentz = LentzMethod::new();
        lentz.initialize(1.0);
        while lentz.keep_going() {
            lentz.iterate(1.0, 1.0);
        }
        assert!(lentz.is_result_valid());
        assert_abs_diff_eq!(lentz.result(), (1.0 + 5.0_f64.sqrt()) / 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_sqrt_two() {
        // √2 = 1 + 1/(2 + 1/(2 + …))
        let mut lentz = LentzMethod::new();
        lentz.initialize(1.0);
        while lentz.keep_going() {
            lentz.iterate(1.0, 2.0);
        }
        let v = lentz.finish("sqrt two").unwrap();
        assert_abs_diff_eq!(v, 2.0_f64.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn test_zero_leading_term() {
        // 1/(1 + 1/(1 + …)) = 1/φ
        let mut lentz = LentzMethod::new();
        lentz.initialize(0.0);
        lentz.iterate(1.0, 1.0);
        while lentz.keep_going() {
            lentz.iterate(1.0, 1.0);
        }
        let v = lentz.finish("inverse golden ratio").unwrap();
        assert_abs_diff_eq!(v, 2.0 / (1.0 + 5.0_f64.sqrt()), epsilon = 1e-6);
    }

    #[test]
    fn test_iteration_cap_invalidates_result() {
        let config = LentzConfig {
            max_iterations: 3,
            ..LentzConfig::default()
        };
        let mut lentz = LentzMethod::with_config(config);
        lentz.initialize(1.0);
        while lentz.keep_going() {
            lentz.iterate(1.0, 1.0);
        }
        assert_eq!(lentz.iteration(), 3);
        assert!(!lentz.is_result_valid());
        let err = lentz.finish("golden ratio").unwrap_err();
        assert!(matches!(
            err,
            NumericError::NonConvergence {
                max_iterations: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_reinitialize_resets_state() {
        let mut lentz = LentzMethod::new();
        lentz.initialize(1.0);
        for _ in 0..5 {
            lentz.iterate(1.0, 1.0);
        }
        lentz.initialize(2.0);
        assert_eq!(lentz.iteration(), 0);
        assert_eq!(lentz.result(), 2.0);
        assert!(lentz.keep_going());
    }
}
