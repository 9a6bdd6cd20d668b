//! Distribution draws used by the sampler algebra.
//!
//! All draws consume the context RNG via inverse-transform accumulation so a
//! seed fully determines a sampling run.

use rand::{Rng, distributions::Standard, rngs::SmallRng};

use crate::error::{Result, SamplerError};

/// Tail of the exponential series starting at `d`:
/// `exp_tail(d, x) = e^x − Σ_{i<d} x^i / i!`.
///
/// This is the normalization of the truncated Poisson distribution used by
/// set samplers, and grammar authors need it when writing evaluation
/// transforms.
#[must_use]
pub fn exp_tail(d: usize, x: f64) -> f64 {
    let mut result = x.exp();
    let mut term = 1.0;
    for i in 0..d {
        result -= term;
        term *= x / (i as f64 + 1.0);
    }
    result
}

/// Bernoulli draw with success probability `p`.
pub(crate) fn bernoulli(rng: &mut SmallRng, p: f64) -> bool {
    let u: f64 = rng.sample(Standard);
    u <= p
}

/// Draws `k ≥ d` from a Poisson distribution with parameter `lambda`,
/// truncated to the `d`-tail.
///
/// Starts at `k = d` with probability mass `λ^d/d! / exp_tail(d, λ)` and
/// accumulates until the uniform draw is covered. A mass underflowing to
/// zero ends the walk at the current `k`.
///
/// # Errors
/// Returns [`SamplerError::DegenerateGrammar`] when `lambda` is zero but the
/// cutoff demands at least one element, leaving no mass anywhere.
pub(crate) fn poisson_tail(rng: &mut SmallRng, d: usize, lambda: f64) -> Result<usize> {
    if lambda <= 0.0 {
        if d == 0 {
            return Ok(0);
        }
        return Err(SamplerError::DegenerateGrammar {
            detail: format!("set sampler with cutoff {d} has zero rate"),
        });
    }
    let u: f64 = rng.sample(Standard);
    let mut cumulative = 0.0;
    let mut k = d;
    let mut mass = initial_tail_mass(d, lambda);
    loop {
        cumulative += mass;
        if cumulative >= u || mass == 0.0 {
            return Ok(k);
        }
        k += 1;
        mass *= lambda / k as f64;
    }
}

/// `λ^d/d! / exp_tail(d, λ)`, built iteratively to dodge factorial overflow.
fn initial_tail_mass(d: usize, lambda: f64) -> f64 {
    let mut mass = 1.0;
    for i in 1..=d {
        mass *= lambda / i as f64;
    }
    mass / exp_tail(d, lambda)
}

/// Geometric draw: the number of Bernoulli(`q`) successes before the first
/// failure. Callers guarantee `q < 1`.
pub(crate) fn geometric(rng: &mut SmallRng, q: f64) -> usize {
    let mut k = 0;
    while bernoulli(rng, q) {
        k += 1;
    }
    k
}

/// Logarithmic draw on `k ≥ 1` with `P(k) = q^k / (k · (−ln(1−q)))`.
/// Callers guarantee `0 < q < 1`.
pub(crate) fn logarithmic(rng: &mut SmallRng, q: f64) -> usize {
    let normalizer = -(1.0 - q).ln();
    let u: f64 = rng.sample(Standard);
    let mut cumulative = 0.0;
    let mut k = 1;
    let mut mass = q / normalizer;
    loop {
        cumulative += mass;
        if cumulative >= u || mass == 0.0 {
            return k;
        }
        k += 1;
        mass *= q * (k as f64 - 1.0) / k as f64;
    }
}
