//! Sample statistics used by the distribution estimators.
//!
//! Every function returns `None` instead of a meaningless number when the
//! input cannot support the statistic (too few samples, NaN/Inf values,
//! no positive weight).
//!
//! # Algorithms
//!
//! - **Sums**: Neumaier compensated summation.
//! - **Variance**: Welford's online algorithm.
//!   Reference: Welford (1962), "Note on a Method for Calculating
//!   Corrected Sums of Squares and Products", *Technometrics* 4(3).
//! - **Weighted variance**: reliability weights, `Σw(x−μ)² / (V₁ − V₂/V₁)`.
//! - **Order statistics**: quickselect over an index permutation
//!   ([`crate::collections::find_kth_largest_f64`]), average O(n).
//! - **Quantile**: R-7 linear interpolation.
//!   Reference: Hyndman & Fan (1996), "Sample Quantiles in Statistical
//!   Packages", *The American Statistician* 50(4).

use crate::collections::find_kth_largest_f64;

// ---------------------------------------------------------------------------
// Weighted observations
// ---------------------------------------------------------------------------

/// An observation paired with a non-negative importance weight.
///
/// Estimators ignore entries whose weight is zero or negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedValue {
    pub value: f64,
    pub weight: f64,
}

impl WeightedValue {
    pub fn new(value: f64, weight: f64) -> Self {
        Self { value, weight }
    }
}

// ---------------------------------------------------------------------------
// Moments
// ---------------------------------------------------------------------------

/// Computes the arithmetic mean using compensated summation.
///
/// # Returns
/// - `None` if `data` is empty or contains any NaN/Inf.
///
/// # Examples
/// ```
/// use u_numstat::stats::mean;
/// let v = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert!((mean(&v).unwrap() - 3.0).abs() < 1e-15);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(kahan_sum(data) / data.len() as f64)
}

/// Computes the sample variance (denominator `n − 1`).
///
/// # Returns
/// - `None` if `data.len() < 2` or contains NaN/Inf.
pub fn variance(data: &[f64]) -> Option<f64> {
    mean_and_variance(data).map(|(_, var)| var)
}

/// Computes the mean and sample variance in a single Welford pass.
///
/// # Returns
/// - `None` if `data.len() < 2` or contains NaN/Inf.
///
/// # Examples
/// ```
/// use u_numstat::stats::mean_and_variance;
/// let (m, v) = mean_and_variance(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
/// assert!((m - 5.0).abs() < 1e-15);
/// assert!((v - 32.0 / 7.0).abs() < 1e-12);
/// ```
pub fn mean_and_variance(data: &[f64]) -> Option<(f64, f64)> {
    if data.len() < 2 || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    let mut acc = WelfordAccumulator::new();
    for &x in data {
        acc.update(x);
    }
    Some((acc.mean()?, acc.sample_variance()?))
}

/// Weighted mean and unbiased weighted variance with reliability weights.
///
/// Entries with weight ≤ 0 are ignored. The variance is
/// `Σwᵢ(xᵢ−μ)² / (V₁ − V₂/V₁)` with `V₁ = Σwᵢ`, `V₂ = Σwᵢ²`, which reduces
/// to the ordinary sample variance when all weights are equal.
///
/// # Returns
/// - `None` if fewer than two entries carry positive weight, a kept entry
///   is NaN/Inf, or the weights leave no degrees of freedom.
///
/// # Examples
/// ```
/// use u_numstat::stats::{weighted_mean_and_variance, WeightedValue};
/// let data = [WeightedValue::new(1.0, 2.0), WeightedValue::new(4.0, 1.0)];
/// let (m, _) = weighted_mean_and_variance(&data).unwrap();
/// assert!((m - 2.0).abs() < 1e-15);
/// ```
pub fn weighted_mean_and_variance(data: &[WeightedValue]) -> Option<(f64, f64)> {
    let kept: Vec<WeightedValue> = data.iter().copied().filter(|wv| wv.weight > 0.0).collect();
    if kept.len() < 2
        || !kept
            .iter()
            .all(|wv| wv.value.is_finite() && wv.weight.is_finite())
    {
        return None;
    }

    // West (1979) weighted incremental update.
    let mut v1 = 0.0_f64;
    let mut v2 = 0.0_f64;
    let mut mu = 0.0_f64;
    let mut s = 0.0_f64;
    for wv in &kept {
        v1 += wv.weight;
        v2 += wv.weight * wv.weight;
        let delta = wv.value - mu;
        mu += delta * wv.weight / v1;
        s += wv.weight * delta * (wv.value - mu);
    }

    let denom = v1 - v2 / v1;
    if !(denom > 0.0) {
        return None;
    }
    Some((mu, (s / denom).max(0.0)))
}

// ---------------------------------------------------------------------------
// Extremes and order statistics
// ---------------------------------------------------------------------------

/// Returns `(min, max)` of the data.
///
/// # Returns
/// - `None` if `data` is empty or contains any NaN/Inf.
pub fn min_and_max(data: &[f64]) -> Option<(f64, f64)> {
    if data.is_empty() {
        return None;
    }
    data.iter()
        .copied()
        .try_fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            if x.is_finite() {
                Some((lo.min(x), hi.max(x)))
            } else {
                None
            }
        })
}

/// Returns the `k`-th smallest value (0-based) without sorting.
///
/// # Returns
/// - `None` if `k >= data.len()` or `data` contains NaN.
///
/// # Examples
/// ```
/// use u_numstat::stats::kth_smallest;
/// assert_eq!(kth_smallest(&[5.0, 3.0, 8.0, 1.0, 9.0], 1), Some(3.0));
/// assert_eq!(kth_smallest(&[5.0], 1), None);
/// ```
pub fn kth_smallest(data: &[f64], k: usize) -> Option<f64> {
    if data.iter().any(|x| x.is_nan()) {
        return None;
    }
    let indices = find_kth_largest_f64(k, data).ok()?;
    Some(data[indices[k]])
}

/// Computes the median by selection.
///
/// For an even count the two middle values are averaged.
///
/// # Returns
/// - `None` if `data` is empty or contains NaN.
///
/// # Examples
/// ```
/// use u_numstat::stats::median;
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// ```
pub fn median(data: &[f64]) -> Option<f64> {
    if data.is_empty() || data.iter().any(|x| x.is_nan()) {
        return None;
    }
    let n = data.len();
    let k = n / 2;
    let indices = find_kth_largest_f64(k, data).ok()?;
    let upper = data[indices[k]];
    if n % 2 == 1 {
        return Some(upper);
    }
    // Everything left of `k` is <= the pivot, so its maximum is the lower middle.
    let lower = indices[..k]
        .iter()
        .map(|&i| data[i])
        .fold(f64::NEG_INFINITY, f64::max);
    Some((lower + upper) / 2.0)
}

/// Computes the `p`-quantile with R-7 linear interpolation.
///
/// `h = (n−1)·p`, `j = ⌊h⌋`, `g = h − j`, result
/// `(1−g)·x₍ⱼ₎ + g·x₍ⱼ₊₁₎`, where `x₍ᵢ₎` is the `i`-th order statistic.
///
/// # Returns
/// - `None` if `data` is empty, contains NaN, or `p ∉ [0, 1]`.
///
/// # Examples
/// ```
/// use u_numstat::stats::quantile;
/// let v = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(quantile(&v, 0.25), Some(2.0));
/// assert_eq!(quantile(&v, 1.0), Some(5.0));
/// ```
pub fn quantile(data: &[f64], p: f64) -> Option<f64> {
    let n = data.len();
    if n == 0 || !(0.0..=1.0).contains(&p) || data.iter().any(|x| x.is_nan()) {
        return None;
    }
    let h = (n - 1) as f64 * p;
    let j = (h.floor() as usize).min(n - 1);
    let g = h - j as f64;

    let indices = find_kth_largest_f64(j, data).ok()?;
    let lo = data[indices[j]];
    if j + 1 >= n || g == 0.0 {
        return Some(lo);
    }
    // The right partition holds values >= x₍ⱼ₎; its minimum is x₍ⱼ₊₁₎.
    let hi = indices[j + 1..]
        .iter()
        .map(|&i| data[i])
        .fold(f64::INFINITY, f64::min);
    Some((1.0 - g) * lo + g * hi)
}

// ---------------------------------------------------------------------------
// Compensated summation
// ---------------------------------------------------------------------------

/// Neumaier compensated summation for O(ε) error independent of `n`.
///
/// An improved variant of Kahan summation that also handles an addend
/// larger in magnitude than the running sum.
///
/// Reference: Neumaier (1974), *Zeitschrift für Angewandte Mathematik und
/// Mechanik* 54(1), pp. 39–51.
pub fn kahan_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for &x in data {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

// ---------------------------------------------------------------------------
// Welford online accumulator
// ---------------------------------------------------------------------------

/// Streaming accumulator for mean and variance.
///
/// Single pass, O(1) memory, no catastrophic cancellation.
///
/// # Examples
/// ```
/// use u_numstat::stats::WelfordAccumulator;
/// let mut acc = WelfordAccumulator::new();
/// for &x in &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     acc.update(x);
/// }
/// assert!((acc.mean().unwrap() - 5.0).abs() < 1e-15);
/// assert!((acc.sample_variance().unwrap() - 32.0 / 7.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WelfordAccumulator {
    count: u64,
    mean_acc: f64,
    m2: f64,
}

impl WelfordAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a new sample into the accumulator.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            // Avoids squaring a huge first delta.
            self.mean_acc = value;
            return;
        }
        let delta = value - self.mean_acc;
        self.mean_acc += delta / self.count as f64;
        self.m2 += delta * (value - self.mean_acc);
    }

    /// Returns the running mean, or `None` if no samples have been added.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean_acc)
    }

    /// Sample variance (n − 1 denominator); `None` below 2 samples.
    pub fn sample_variance(&self) -> Option<f64> {
        (self.count >= 2).then(|| self.m2 / (self.count - 1) as f64)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
