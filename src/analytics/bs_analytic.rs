// src/analytics/bs_analytic.rs
//! Analytical Black-Scholes-Merton formulas for European options and Greeks
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model with continuous dividend yield q, the
//! underlying asset follows:
//! ```text
//! dS_t = (r - q) S_t dt + σ S_t dW_t
//! ```
//!
//! The risk-neutral pricing formula gives:
//! ```text
//! V(S,t) = e^(-r(T-t)) * E^Q[payoff(S_T) | S_t = S]
//! ```
//!
//! These closed forms are benchmarks and control-variate targets for the
//! simulation engine. They take the contract by value and hold no state.

use crate::math_utils::{norm_cdf, norm_pdf};
use crate::mc::payoffs::OptionType;
use crate::models::OptionContract;

/// ```text
/// d₁ = [ln(S/K) + (r - q + σ²/2)T] / (σ√T)
/// d₂ = d₁ - σ√T
/// ```
fn d1_d2(c: &OptionContract) -> (f64, f64) {
    let vol_sqrt_t = c.volatility * c.maturity.sqrt();
    let d1 = ((c.spot / c.strike).ln()
        + (c.rate - c.dividend_yield + 0.5 * c.volatility * c.volatility) * c.maturity)
        / vol_sqrt_t;
    (d1, d1 - vol_sqrt_t)
}

fn yield_discount(c: &OptionContract) -> f64 {
    (-c.dividend_yield * c.maturity).exp()
}

/// Black-Scholes-Merton European call price
///
/// # Formula
/// ```text
/// C = S*e^(-qT)*Φ(d₁) - K*e^(-rT)*Φ(d₂)
/// ```
pub fn call_price(c: OptionContract) -> f64 {
    let (d1, d2) = d1_d2(&c);
    c.spot * yield_discount(&c) * norm_cdf(d1) - c.strike * c.discount_factor() * norm_cdf(d2)
}

/// Black-Scholes-Merton European put price
///
/// # Formula
/// ```text
/// P = K*e^(-rT)*Φ(-d₂) - S*e^(-qT)*Φ(-d₁)
/// ```
pub fn put_price(c: OptionContract) -> f64 {
    let (d1, d2) = d1_d2(&c);
    c.strike * c.discount_factor() * norm_cdf(-d2) - c.spot * yield_discount(&c) * norm_cdf(-d1)
}

pub fn price(c: OptionContract, option_type: OptionType) -> f64 {
    match option_type {
        OptionType::Call => call_price(c),
        OptionType::Put => put_price(c),
    }
}

/// Call delta ∂C/∂S = e^(-qT)Φ(d₁)
///
/// # Interpretation
/// - Hedge ratio: number of shares to buy per option sold
/// - Range: [0, e^(-qT)]
pub fn call_delta(c: OptionContract) -> f64 {
    let (d1, _) = d1_d2(&c);
    yield_discount(&c) * norm_cdf(d1)
}

/// Put delta ∂P/∂S = -e^(-qT)Φ(-d₁)
pub fn put_delta(c: OptionContract) -> f64 {
    let (d1, _) = d1_d2(&c);
    -yield_discount(&c) * norm_cdf(-d1)
}

pub fn delta(c: OptionContract, option_type: OptionType) -> f64 {
    match option_type {
        OptionType::Call => call_delta(c),
        OptionType::Put => put_delta(c),
    }
}

/// Vega ∂V/∂σ, identical for calls and puts
///
/// # Formula
/// ```text
/// ν = S * e^(-qT) * φ(d₁) * √T
/// ```
///
/// Units: price change per unit (not per 1%) volatility change.
pub fn vega(c: OptionContract) -> f64 {
    let (d1, _) = d1_d2(&c);
    c.spot * yield_discount(&c) * norm_pdf(d1) * c.maturity.sqrt()
}
