//! # fast-mc-pricer: Monte Carlo Option Pricing with Variance Reduction
//!
//! A Rust library for pricing options by Monte Carlo simulation under the
//! Black-Scholes (geometric Brownian motion) model, including assets that
//! pay discrete proportional and cash dividends.
//!
//! ## Key Features
//!
//! - **Exact Simulation**: GBM steps use the exact transition density, on uniform grids or
//!   on dividend-date grids
//! - **Variance Reduction**: Antithetic variates, control variates, moment matching and
//!   their combination
//! - **Payoffs**: European calls and puts, discretely monitored barriers, arithmetic Asian options
//! - **Discrete Dividends**: Value and pathwise delta with the dividend-free option as
//!   control variate
//! - **Reproducible**: Every pricing call reseeds the stream it is handed
//! - **Parallel**: Rayon workers with independent per-worker streams
//!
//! ## Quick Start
//!
//! ```rust
//! use fast_mc_pricer::mc::mc_engine::{EuropeanOptionAnalyzer, PricingMode};
//! use fast_mc_pricer::mc::payoffs::OptionType;
//! use fast_mc_pricer::models::OptionContract;
//! use fast_mc_pricer::rng::StdNormalStream;
//!
//! // S=41, K=42, T=0.75, σ=25%, r=3%, q=1%
//! let contract = OptionContract::new(41.0, 42.0, 0.75, 0.25, 0.03, 0.01)
//!     .expect("Valid contract");
//! let analyzer = EuropeanOptionAnalyzer::new(contract).expect("Valid contract");
//! let mut stream = StdNormalStream::default();
//!
//! let estimate = analyzer
//!     .estimate(&mut stream, OptionType::Call, PricingMode::ControlVariate, 100_000, 1)
//!     .expect("Valid configuration");
//! println!("Call price: {:.4} ± {:.4}", estimate.value, estimate.std_error);
//! ```
//!
//! ## Mathematical Foundation
//!
//! Under the risk-neutral measure the price of a payoff h paid at T is
//! e^(-rT)·E\[h(S)\]. The engine draws standard normal matrices, maps them
//! to price paths, evaluates the payoff on each path and averages, with the
//! estimators in [`mc::estimators`] reducing the variance of that average.

// Module declarations
pub mod error;
pub mod rng;
pub mod math_utils;
pub mod models;
pub mod mc;
pub mod analytics;

// Re-export commonly used types for convenience
pub use error::{PricerError, PricerResult};
pub use mc::estimators::Estimate;
pub use mc::mc_engine::{mc_price_option, EuropeanOptionAnalyzer, McConfig, PricingMode};
pub use mc::payoffs::{OptionType, Payoff};
pub use models::{DividendSchedule, OptionContract};
