// src/mc/estimators.rs
//! Turning payoff samples into discounted price estimates
//!
//! Every estimator returns an [`Estimate`] carrying the discounted value, the
//! standard error of that value and the number of payoff samples consumed.
//!
//! # Variance Reduction
//!
//! - **Antithetic**: payoffs from z and -z are pooled. The two halves are not
//!   independent, so the standard error comes from the N pair averages
//!   (f(z) + f(-z))/2, not from the 2N pooled samples.
//! - **Control variate**: with control X of known mean E\[X\],
//!   `V - b̂(X - E[X])` has the same expectation as V and smaller variance
//!   whenever X and V are correlated.
//! - **Moment matching**: terminal prices are rescaled so their sample mean
//!   equals the forward exactly.

use crate::error::{PricerError, PricerResult};
use crate::math_utils::{discount_and_average, mean, standard_error};
use crate::mc::regression::control_variate_coefficient;
use std::fmt;
use tracing::trace;

/// Discounted Monte Carlo estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub value: f64,
    pub std_error: f64,
    /// Payoff evaluations behind the estimate (2N for antithetic)
    pub samples: usize,
}

impl Estimate {
    /// Distance from `reference` in standard errors
    pub fn z_score(&self, reference: f64) -> f64 {
        let diff = self.value - reference;
        if self.std_error > 0.0 {
            diff / self.std_error
        } else if diff == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    }

    /// value ± k·std_error
    pub fn confidence_interval(&self, k: f64) -> (f64, f64) {
        (self.value - k * self.std_error, self.value + k * self.std_error)
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6} ± {:.6} (n = {})",
            self.value, self.std_error, self.samples
        )
    }
}

/// Plain Monte Carlo: mean(payoff)·discount
pub fn plain(payoffs: &[f64], discount: f64) -> PricerResult<Estimate> {
    Ok(Estimate {
        value: discount_and_average(payoffs, discount)?,
        std_error: standard_error(payoffs)? * discount,
        samples: payoffs.len(),
    })
}

/// Pool the payoffs of z and -z. `payoffs[i]` and `mirrored[i]` must come
/// from the same draw row.
pub fn antithetic(payoffs: &[f64], mirrored: &[f64], discount: f64) -> PricerResult<Estimate> {
    if payoffs.len() != mirrored.len() {
        return Err(PricerError::DimensionMismatch {
            context: "antithetic payoffs".to_string(),
            expected: payoffs.len(),
            actual: mirrored.len(),
        });
    }
    let pairs: Vec<f64> = payoffs
        .iter()
        .zip(mirrored)
        .map(|(a, b)| 0.5 * (a + b))
        .collect();
    Ok(Estimate {
        value: discount_and_average(&pairs, discount)?,
        std_error: standard_error(&pairs)? * discount,
        samples: 2 * pairs.len(),
    })
}

/// mean(V) - b̂·(mean(X) - E\[X\]), discounted, with b̂ the OLS slope of V on X
///
/// # Errors
/// - `DimensionMismatch` when the sample vectors differ in length
/// - `InvalidSampleSize` on empty samples
/// - `SingularRegression` when the control has no spread
pub fn control_variate(
    payoffs: &[f64],
    controls: &[f64],
    expectation: f64,
    discount: f64,
) -> PricerResult<Estimate> {
    let b = control_variate_coefficient(payoffs, controls)?;
    trace!(coefficient = b, expectation, "control variate");
    let adjusted: Vec<f64> = payoffs
        .iter()
        .zip(controls)
        .map(|(v, x)| v - b * (x - expectation))
        .collect();
    Ok(Estimate {
        value: discount_and_average(&adjusted, discount)?,
        std_error: standard_error(&adjusted)? * discount,
        samples: adjusted.len(),
    })
}

/// Rescale `values` in place so their sample mean equals `target`.
/// Returns the multiplier applied.
pub fn match_first_moment(values: &mut [f64], target: f64) -> PricerResult<f64> {
    let m = mean(values)?;
    if !(m > 0.0) || !m.is_finite() {
        return Err(PricerError::NumericalInstability {
            method: "moment matching".to_string(),
            reason: format!("sample mean {m} cannot be rescaled to {target}"),
        });
    }
    let factor = target / m;
    trace!(factor, sample_mean = m, target, "moment matching");
    values.iter_mut().for_each(|v| *v *= factor);
    Ok(factor)
}
