// src/mc/regression.rs
//! Ordinary least squares for control-variate coefficients
//!
//! The optimal control-variate coefficient is the OLS slope of the payoff
//! on the control:
//! ```text
//! b̂ = Σ(xᵢ - x̄)(yᵢ - ȳ) / Σ(xᵢ - x̄)²
//! ```
//! Both sums are taken around the sample means (two passes) rather than as
//! Σxy - N·x̄·ȳ, which loses most significant digits when the control has a
//! large mean relative to its spread (terminal prices around a forward of 50
//! with a spread of a few units, over a million samples).

use crate::error::{PricerError, PricerResult};
use tracing::trace;

/// Least-squares line y ≈ intercept + slope·x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Sample correlation between x and y. Zero when y is constant.
    pub correlation: f64,
}

impl LinearFit {
    /// Fit `dependent` on `independent`
    pub fn fit(dependent: &[f64], independent: &[f64]) -> PricerResult<Self> {
        if dependent.len() != independent.len() {
            return Err(PricerError::DimensionMismatch {
                context: "regression samples".to_string(),
                expected: independent.len(),
                actual: dependent.len(),
            });
        }
        let n = independent.len();
        if n == 0 {
            return Err(PricerError::InvalidSampleSize { size: 0 });
        }

        let nf = n as f64;
        let x_bar = independent.iter().sum::<f64>() / nf;
        let y_bar = dependent.iter().sum::<f64>() / nf;

        let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
        for (&y, &x) in dependent.iter().zip(independent) {
            let dx = x - x_bar;
            let dy = y - y_bar;
            sxx += dx * dx;
            sxy += dx * dy;
            syy += dy * dy;
        }

        // Spread indistinguishable from rounding noise in the mean
        let scale = independent.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
        let noise = 1e3 * f64::EPSILON * scale;
        if !(sxx > nf * noise * noise) {
            return Err(PricerError::SingularRegression {
                variance: sxx / nf,
            });
        }

        let slope = sxy / sxx;
        let correlation = if syy > 0.0 {
            sxy / (sxx * syy).sqrt()
        } else {
            0.0
        };
        trace!(slope, correlation, samples = n, "ols fit");

        Ok(LinearFit {
            slope,
            intercept: y_bar - slope * x_bar,
            correlation,
        })
    }
}

/// OLS slope of `dependent` on `independent`, the variance-minimizing
/// control-variate coefficient for this sample.
pub fn control_variate_coefficient(dependent: &[f64], independent: &[f64]) -> PricerResult<f64> {
    LinearFit::fit(dependent, independent).map(|fit| fit.slope)
}
