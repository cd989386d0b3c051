// src/models/gbm.rs
use super::contract::OptionContract;
use std::f64;

/// Geometric Brownian motion dS = μ S dt + σ S dW
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gbm {
    pub s0: f64,
    pub mu: f64,
    pub sigma: f64,
}

impl Gbm {
    pub fn new(s0: f64, mu: f64, sigma: f64) -> Self {
        Gbm { s0, mu, sigma }
    }

    /// Risk-neutral dynamics of the contract's underlying (μ = r - q)
    pub fn risk_neutral(contract: &OptionContract) -> Self {
        Gbm::new(
            contract.spot,
            contract.rate - contract.dividend_yield,
            contract.volatility,
        )
    }

    /// Exact transition over `dt`: S·exp((μ - σ²/2)dt + σ√dt·z)
    #[inline]
    pub fn exact_step(&self, s_t: f64, dt: f64, normal_draw: f64) -> f64 {
        s_t * ((self.mu - 0.5 * self.sigma * self.sigma) * dt
            + self.sigma * dt.sqrt() * normal_draw)
            .exp()
    }

    /// Price at time `t` reached from s0 in one exact step
    #[inline]
    pub fn terminal(&self, t: f64, normal_draw: f64) -> f64 {
        self.exact_step(self.s0, t, normal_draw)
    }
}
