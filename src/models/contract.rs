// src/models/contract.rs
use crate::error::{validation::*, PricerResult};

/// European option contract on a single asset under Black-Scholes dynamics
///
/// The option side (call or put) is chosen per pricing call; the contract
/// only carries market and strike data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionContract {
    pub spot: f64,           // S
    pub strike: f64,         // K
    pub maturity: f64,       // T in years
    pub volatility: f64,     // σ
    pub rate: f64,           // r, continuously compounded
    pub dividend_yield: f64, // q, continuous
}

impl OptionContract {
    pub fn new(
        spot: f64,
        strike: f64,
        maturity: f64,
        volatility: f64,
        rate: f64,
        dividend_yield: f64,
    ) -> PricerResult<Self> {
        let contract = OptionContract {
            spot,
            strike,
            maturity,
            volatility,
            rate,
            dividend_yield,
        };
        contract.validate()?;
        Ok(contract)
    }

    pub fn validate(&self) -> PricerResult<()> {
        validate_positive("spot", self.spot)?;
        validate_finite("spot", self.spot)?;
        validate_positive("strike", self.strike)?;
        validate_finite("strike", self.strike)?;
        validate_positive("maturity", self.maturity)?;
        validate_finite("maturity", self.maturity)?;
        validate_positive("volatility", self.volatility)?;
        validate_finite("volatility", self.volatility)?;
        validate_finite("rate", self.rate)?;
        validate_finite("dividend_yield", self.dividend_yield)?;
        Ok(())
    }

    /// e^(-rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.maturity).exp()
    }

    /// Risk-neutral expectation of the terminal price, S·e^((r-q)T)
    pub fn forward(&self) -> f64 {
        self.spot * ((self.rate - self.dividend_yield) * self.maturity).exp()
    }

    pub fn with_strike(&self, strike: f64) -> Self {
        OptionContract { strike, ..*self }
    }

    pub fn with_spot(&self, spot: f64) -> Self {
        OptionContract { spot, ..*self }
    }
}
