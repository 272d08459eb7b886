//! Random number generation helpers for the distribution samplers.
//!
//! Provides seeded RNG construction, the unit-interval and Gaussian draws
//! the samplers build on, and inverse-CDF sampling over a discrete mass
//! sequence.
//!
//! # Reproducibility
//!
//! For reproducible experiments, use [`create_rng`] with a fixed seed.
//! The underlying algorithm (SmallRng) is deterministic for a given seed
//! on the same platform. Generators are caller-owned and never shared by
//! the samplers.

use rand::distr::OpenClosed01;
use rand::Rng;
use rand_distr::StandardNormal;

/// Creates a fast, seeded random number generator.
///
/// Uses `SmallRng` (Xoshiro256++) for high performance.
/// The sequence is deterministic for a given seed on the same platform.
///
/// # Examples
/// ```
/// use u_numstat::random::create_rng;
/// use rand::Rng;
/// let mut rng = create_rng(42);
/// let x: f64 = rng.random();
/// assert!(x >= 0.0 && x < 1.0);
/// ```
pub fn create_rng(seed: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(seed)
}

/// Uniform draw on `[0, 1)`.
pub fn unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random()
}

/// Uniform draw on `(0, 1]`, safe to pass to `ln`.
pub fn open_closed_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.sample(OpenClosed01)
}

/// Standard normal draw, N(0, 1).
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.sample(StandardNormal)
}

/// Inverse-CDF draw from an ordered sequence of `(value, mass)` pairs.
///
/// Accumulates mass until it exceeds a uniform threshold in `[0, 1)`.
/// When the sequence is a truncation whose total mass falls short of the
/// threshold, the last value is returned.
///
/// # Complexity
/// Time: O(k) for a draw landing on the k-th value
///
/// # Returns
/// - `None` if `masses` is empty.
///
/// # Examples
/// ```
/// use u_numstat::random::{create_rng, inverse_cdf_draw};
/// let mut rng = create_rng(42);
/// let masses = [(0, 0.2), (1, 0.5), (2, 0.3)];
/// let k = inverse_cdf_draw(masses, &mut rng).unwrap();
/// assert!((0..=2).contains(&k));
/// ```
pub fn inverse_cdf_draw<R, I>(masses: I, rng: &mut R) -> Option<i64>
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = (i64, f64)>,
{
    let threshold = unit(rng);
    let mut cumulative = 0.0;
    let mut last = None;
    for (value, mass) in masses {
        if mass > 0.0 {
            cumulative += mass;
        }
        if cumulative > threshold {
            return Some(value);
        }
        last = Some(value);
    }

    // Truncated tail (or accumulated rounding)
    last
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn inverse_cdf_draw_returns_member(
            weights in proptest::collection::vec(0.0_f64..10.0, 1..20),
            seed in 0_u64..1000,
        ) {
            let total: f64 = weights.iter().sum();
            prop_assume!(total > 0.0);
            let masses: Vec<(i64, f64)> = weights
                .iter()
                .enumerate()
                .map(|(i, w)| (i as i64, w / total))
                .collect();
            let mut rng = create_rng(seed);
            let k = inverse_cdf_draw(masses.iter().copied(), &mut rng).unwrap();
            prop_assert!((0..weights.len() as i64).contains(&k));
        }
    }
}
