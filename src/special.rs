//! Special mathematical functions.
//!
//! Log-space Gamma/Beta family functions and the regularized incomplete
//! Gamma and Beta functions that the closed-form distributions use for
//! their CDFs. Every function validates its domain and reports failures
//! through [`NumericError`](crate::error::NumericError); iterative methods
//! report non-convergence instead of returning a partial sum.

use crate::error::{NumericError, Result};
use crate::lentz::LentzMethod;

/// Arguments above this saturate the lower incomplete gamma function to 1.
const INCOMPLETE_GAMMA_SATURATION: f64 = 1e10;

const SERIES_MAX_ITERATIONS: usize = 1000;
const SERIES_EPS: f64 = 3e-7;

// ============================================================================
// Logarithms
// ============================================================================

/// Logarithm of `x` in the given `base`: `ln(x) / ln(base)`.
///
/// # Examples
/// ```
/// use u_numstat::special::log_base;
/// assert_eq!(log_base(1.0, 4.0), 0.0);
/// assert_eq!(log_base(2.0, 4.0), 0.5);
/// ```
pub fn log_base(x: f64, base: f64) -> f64 {
    x.ln() / base.ln()
}

/// Base-2 logarithm through [`log_base`].
pub fn log2(x: f64) -> f64 {
    log_base(x, 2.0)
}

// ============================================================================
// Gamma Function
// ============================================================================

/// Natural log of the Gamma function, ln Γ(x), for `x > 0`.
///
/// # Algorithm
/// Six-term Lanczos approximation (γ = 5), in the shifted `x + 4.5` form
/// that fixes the off-by-one of the published 2nd-edition routine.
///
/// Reference: Press et al. (1992), *Numerical Recipes in C*, 2nd ed., §6.1
/// (`gammln`).
///
/// # Accuracy
/// Relative error < 2 × 10⁻¹⁰ for x > 0.
///
/// # Errors
/// [`NumericError::Domain`] unless `x` is finite and `> 0`.
///
/// # Examples
/// ```
/// use u_numstat::special::ln_gamma;
/// // Γ(5) = 24
/// assert!((ln_gamma(5.0).unwrap() - 24.0_f64.ln()).abs() < 1e-8);
/// assert!(ln_gamma(0.0).is_err());
/// ```
pub fn ln_gamma(x: f64) -> Result<f64> {
    if !(x > 0.0) || !x.is_finite() {
        return Err(NumericError::domain(format!(
            "ln_gamma requires finite x > 0, got {x}"
        )));
    }
    Ok(lanczos_ln_gamma(x))
}

/// Lanczos evaluation without the domain check. Callers guarantee `x > 0`.
pub(crate) fn lanczos_ln_gamma(x: f64) -> f64 {
    #[allow(clippy::excessive_precision)]
    const COEFFICIENTS: [f64; 6] = [
        76.18009172947146,
        -86.50532032941677,
        24.01409824083091,
        -1.231739572450155,
        0.1208650973866179e-2,
        -0.5395239384953e-5,
    ];
    const SQRT_2PI: f64 = 2.5066282746310005;

    let shifted = x + 4.5;
    let tmp = shifted - (x - 0.5) * shifted.ln();

    let mut ser = 1.000000000190015;
    for (j, &c) in COEFFICIENTS.iter().enumerate() {
        ser += c / (x + j as f64);
    }

    (SQRT_2PI * ser).ln() - tmp
}

/// Gamma function Γ(x) = exp(ln Γ(x)).
///
/// # Examples
/// ```
/// use u_numstat::special::gamma;
/// // Γ(5) = 4! = 24
/// assert!((gamma(5.0).unwrap() - 24.0).abs() < 1e-7);
/// ```
pub fn gamma(x: f64) -> Result<f64> {
    ln_gamma(x).map(f64::exp)
}

// ============================================================================
// Factorials and Binomial Coefficients
// ============================================================================

/// Natural log of `n!`.
///
/// Returns 0 for `n ≤ 1`, otherwise `ln Γ(n + 1)`.
///
/// # Errors
/// [`NumericError::Domain`] when `n < 0`.
pub fn ln_factorial(n: i64) -> Result<f64> {
    if n < 0 {
        return Err(NumericError::domain(format!(
            "factorial requires n >= 0, got {n}"
        )));
    }
    if n <= 1 {
        return Ok(0.0);
    }
    Ok(lanczos_ln_gamma(n as f64 + 1.0))
}

/// Natural log of the binomial coefficient C(N, k).
///
/// # Errors
/// [`NumericError::Domain`] unless `0 ≤ k ≤ N`.
pub fn ln_binomial_coefficient(n: i64, k: i64) -> Result<f64> {
    if k < 0 || k > n {
        return Err(NumericError::domain(format!(
            "binomial coefficient requires 0 <= k <= N, got N={n}, k={k}"
        )));
    }
    Ok(ln_factorial(n)? - ln_factorial(k)? - ln_factorial(n - k)?)
}

/// Binomial coefficient C(N, k), rounded from its log-space value.
///
/// # Errors
/// [`NumericError::Domain`] for negative arguments, `k > N`, or a
/// coefficient too large for `u64`.
///
/// # Examples
/// ```
/// use u_numstat::special::binomial_coefficient;
/// assert_eq!(binomial_coefficient(4, 2).unwrap(), 6);
/// assert!(binomial_coefficient(4, 5).is_err());
/// ```
pub fn binomial_coefficient(n: i64, k: i64) -> Result<u64> {
    let value = ln_binomial_coefficient(n, k)?.exp().round();
    // u64::MAX as f64 rounds up to 2^64, which is itself out of range.
    if !(value < u64::MAX as f64) {
        return Err(NumericError::domain(format!(
            "binomial coefficient C({n}, {k}) does not fit in u64"
        )));
    }
    Ok(value as u64)
}

// ============================================================================
// Lower Incomplete Gamma Function
// ============================================================================

/// Regularized lower incomplete gamma function P(a, x) = γ(a, x) / Γ(a).
///
/// # Algorithm
/// - `x ≤ 0` → 0; `x > 10¹⁰` → 1.
/// - `x < a + 1`: power series, which converges quickly near 0.
/// - otherwise: continued fraction for Q(a, x) via [`LentzMethod`],
///   returned as `1 − Q`.
///
/// Reference: Press et al. (1992), *Numerical Recipes in C*, 2nd ed.,
/// §6.2 (`gammp`, `gser`, `gcf`).
///
/// # Errors
/// - [`NumericError::Domain`] when `a` is not finite and `> 0`, or `x` is NaN.
/// - [`NumericError::NonConvergence`] when the series or continued
///   fraction runs out of iterations.
///
/// # Examples
/// ```
/// use u_numstat::special::lower_incomplete_gamma;
/// // P(1, x) = 1 − exp(−x)
/// let p = lower_incomplete_gamma(1.0, 0.1).unwrap();
/// assert!((p - 0.0951626).abs() < 1e-6);
/// ```
pub fn lower_incomplete_gamma(a: f64, x: f64) -> Result<f64> {
    if !(a > 0.0) || !a.is_finite() {
        return Err(NumericError::domain(format!(
            "incomplete gamma requires finite a > 0, got {a}"
        )));
    }
    if x.is_nan() {
        return Err(NumericError::domain("incomplete gamma requires x to be a number"));
    }

    if x <= 0.0 {
        Ok(0.0)
    } else if x > INCOMPLETE_GAMMA_SATURATION {
        Ok(1.0)
    } else if x < a + 1.0 {
        incomplete_gamma_series(a, x)
    } else {
        incomplete_gamma_continued_fraction(a, x)
    }
}

/// Series expansion of P(a, x); caller guarantees `a > 0`, `x > 0`.
fn incomplete_gamma_series(a: f64, x: f64) -> Result<f64> {
    let mut ap = a;
    let mut term = 1.0 / a;
    let mut sum = term;
    for _ in 0..SERIES_MAX_ITERATIONS {
        ap += 1.0;
        term *= x / ap;
        sum += term;
        if term.abs() < sum.abs() * SERIES_EPS {
            return Ok(sum * (-x + a * x.ln() - lanczos_ln_gamma(a)).exp());
        }
    }
    log::warn!("incomplete gamma series failed to converge: a = {a}, x = {x}");
    Err(NumericError::NonConvergence {
        method: "incomplete gamma series",
        max_iterations: SERIES_MAX_ITERATIONS,
        context: format!(" (a = {a}, x = {x})"),
    })
}

/// Continued fraction for Q(a, x), returned as P(a, x) = 1 − Q(a, x).
fn incomplete_gamma_continued_fraction(a: f64, x: f64) -> Result<f64> {
    let mut lentz = LentzMethod::new();
    lentz.initialize(0.0);
    lentz.iterate(1.0, x + 1.0 - a);
    while lentz.keep_going() {
        let i = lentz.iteration() as f64;
        lentz.iterate(-i * (i - a), x + 2.0 * i + 1.0 - a);
    }

    let cf = lentz
        .finish("incomplete gamma continued fraction")
        .map_err(|e| {
            log::warn!("incomplete gamma continued fraction failed to converge: a = {a}, x = {x}");
            with_context(e, format!(" (a = {a}, x = {x})"))
        })?;
    Ok(1.0 - (-x + a * x.ln() - lanczos_ln_gamma(a)).exp() * cf)
}

// ============================================================================
// Beta Function
// ============================================================================

/// Log of the Beta function: `ln B(a, b) = ln Γ(a) + ln Γ(b) − ln Γ(a+b)`.
///
/// # Examples
/// ```
/// use u_numstat::special::ln_beta;
/// // B(1,1) = 1, so ln B(1,1) = 0
/// assert!(ln_beta(1.0, 1.0).unwrap().abs() < 1e-9);
/// ```
pub fn ln_beta(a: f64, b: f64) -> Result<f64> {
    Ok(ln_gamma(a)? + ln_gamma(b)? - ln_gamma(a + b)?)
}

/// Regularized incomplete beta function I_x(a, b).
///
/// # Algorithm
/// Evaluates the continued fraction on whichever side of the symmetry
/// relation `I_x(a, b) = 1 − I_{1−x}(b, a)` converges faster: the direct
/// form when `x < (a+1)/(a+b+2)`, the reflected form otherwise (including
/// the tie).
///
/// Reference: Press et al. (1992), *Numerical Recipes in C*, 2nd ed.,
/// §6.4 (`betai`, `betacf`).
///
/// # Errors
/// - [`NumericError::Domain`] when `x ∉ [0, 1]`, or `a`, `b` are not > 0.
/// - [`NumericError::NonConvergence`] carrying `(a, b, x)` when the
///   continued fraction exhausts its iterations.
///
/// # Examples
/// ```
/// use u_numstat::special::regularized_incomplete_beta;
/// assert_eq!(regularized_incomplete_beta(2.0, 3.0, 0.0).unwrap(), 0.0);
/// assert_eq!(regularized_incomplete_beta(2.0, 3.0, 1.0).unwrap(), 1.0);
/// let v = regularized_incomplete_beta(4.0, 8.0, 0.5).unwrap();
/// assert!((v - 0.886719).abs() < 1e-5);
/// ```
pub fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&x) {
        return Err(NumericError::domain(format!(
            "incomplete beta requires 0 <= x <= 1, got {x}"
        )));
    }
    if !(a > 0.0) || !(b > 0.0) {
        return Err(NumericError::domain(format!(
            "incomplete beta requires a > 0 and b > 0, got a={a}, b={b}"
        )));
    }
    if x == 0.0 {
        return Ok(0.0);
    }
    if x == 1.0 {
        return Ok(1.0);
    }

    let bt = (a * x.ln() + b * (1.0 - x).ln() - ln_beta(a, b)?).exp();

    if x < (a + 1.0) / (a + b + 2.0) {
        Ok(bt * incomplete_beta_continued_fraction(a, b, x)? / a)
    } else {
        Ok(1.0 - bt * incomplete_beta_continued_fraction(b, a, 1.0 - x)? / b)
    }
}

/// Continued fraction for I_x(a, b), alternating odd and even terms.
fn incomplete_beta_continued_fraction(a: f64, b: f64, x: f64) -> Result<f64> {
    let apb = a + b;
    let mut lentz = LentzMethod::new();
    lentz.initialize(0.0);
    lentz.iterate(1.0, 1.0);
    while lentz.keep_going() {
        let iteration = lentz.iteration();
        let m = (iteration / 2) as f64;
        let ap2m = a + 2.0 * m;

        let term = if iteration % 2 != 0 {
            -(a + m) * (apb + m) * x / (ap2m * (ap2m + 1.0))
        } else {
            m * (b - m) * x / ((ap2m - 1.0) * ap2m)
        };
        lentz.iterate(term, 1.0);
    }

    lentz
        .finish("incomplete beta continued fraction")
        .map_err(|e| {
            log::warn!("incomplete beta continued fraction failed to converge: a = {a}, b = {b}, x = {x}");
            with_context(e, format!(" (a = {a}, b = {b}, x = {x})"))
        })
}

/// Log of the multinomial Beta function:
/// `Σ ln Γ(aᵢ) − ln Γ(Σ aᵢ)`.
///
/// This is the log normalizer of the Dirichlet distribution.
///
/// # Errors
/// [`NumericError::Domain`] when any element is not > 0 (or the slice is empty).
///
/// # Examples
/// ```
/// use u_numstat::special::ln_multinomial_beta;
/// let v = ln_multinomial_beta(&[1.0, 2.0, 3.0]).unwrap();
/// assert!((v + 4.094345).abs() < 1e-5);
/// ```
pub fn ln_multinomial_beta(values: &[f64]) -> Result<f64> {
    let mut ln_sum = 0.0;
    let mut total = 0.0;
    for &ai in values {
        total += ai;
        ln_sum += ln_gamma(ai)?;
    }
    Ok(ln_sum - ln_gamma(total)?)
}

// ============================================================================
// Error Function
// ============================================================================

/// Error function erf(x).
///
/// # Definition
/// ```text
/// erf(x) = (2/√π) ∫₀ˣ exp(-t²) dt = sign(x) · P(1/2, x²)
/// ```
///
/// Evaluated through [`lower_incomplete_gamma`].
///
/// # Errors
/// [`NumericError::Domain`] for NaN input.
///
/// # Examples
/// ```
/// use u_numstat::special::erf;
/// assert!(erf(0.0).unwrap().abs() < 1e-12);
/// assert!((erf(1.0).unwrap() - 0.8427007929).abs() < 1e-6);
/// ```
pub fn erf(x: f64) -> Result<f64> {
    if x.is_nan() {
        return Err(NumericError::domain("erf requires x to be a number"));
    }
    let p = lower_incomplete_gamma(0.5, x * x)?;
    Ok(if x < 0.0 { -p } else { p })
}

/// Complementary error function erfc(x) = 1 − erf(x).
pub fn erfc(x: f64) -> Result<f64> {
    Ok(1.0 - erf(x)?)
}

fn with_context(err: NumericError, detail: String) -> NumericError {
    match err {
        NumericError::NonConvergence {
            method,
            max_iterations,
            ..
        } => NumericError::NonConvergence {
            method,
            max_iterations,
            context: detail,
        },
        other => other,
    }
}
