// src/mc/path_engine.rs
//! Monte Carlo pricing of path-dependent payoffs on a uniform time grid
//!
//! Paths start at the spot (node 0) and take `path_length` exact GBM steps
//! of T/path_length. Barrier payoffs are monitored at every node, so the
//! estimate converges to the continuously monitored closed form only as the
//! grid is refined.

use crate::analytics::{barrier, bs_analytic};
use crate::error::{validation::*, PricerError, PricerResult};
use crate::mc::estimators::{self, Estimate};
use crate::mc::mc_engine::PricingMode;
use crate::mc::paths::PathGenerator;
use crate::mc::payoffs::Payoff;
use crate::models::OptionContract;
use crate::rng::NormalSource;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct PathOptionAnalyzer {
    contract: OptionContract,
    payoff: Payoff,
}

impl PathOptionAnalyzer {
    /// The payoff's own strike is used; the contract supplies the market
    /// data.
    pub fn new(contract: OptionContract, payoff: Payoff) -> PricerResult<Self> {
        contract.validate()?;
        validate_positive("strike", payoff.strike())?;
        if let Payoff::Barrier { barrier, .. } = payoff {
            validate_positive("barrier", barrier)?;
            validate_finite("barrier", barrier)?;
        }
        Ok(PathOptionAnalyzer { contract, payoff })
    }

    pub fn payoff(&self) -> &Payoff {
        &self.payoff
    }

    pub fn contract(&self) -> &OptionContract {
        &self.contract
    }

    /// Price estimate with standard error
    ///
    /// Supports `Vanilla`, `Antithetic` and `ControlVariate` (terminal
    /// price as control, expectation S·e^((r-q)T)). Rescaling whole paths to
    /// a matched terminal mean would distort every intermediate node, so the
    /// moment-matching modes fail with `UnsupportedOperation`.
    pub fn estimate<R: NormalSource + ?Sized>(
        &self,
        stream: &mut R,
        path_length: usize,
        num_paths: usize,
        mode: PricingMode,
        seed: u64,
    ) -> PricerResult<Estimate> {
        validate_paths(num_paths)?;
        validate_steps(path_length)?;
        if matches!(
            mode,
            PricingMode::MomentMatching | PricingMode::MomentMatchingControlVariate
        ) {
            return Err(PricerError::UnsupportedOperation {
                operation: format!("{mode:?}"),
                context: "path-dependent pricing".to_string(),
            });
        }
        debug!(
            ?mode,
            payoff = ?self.payoff,
            path_length,
            num_paths,
            seed,
            "pricing path-dependent option"
        );

        let generator = PathGenerator::new(&self.contract);
        let discount = self.contract.discount_factor();

        stream.reseed(seed);
        let draws = stream.standard_normal_matrix(num_paths, path_length);
        let paths = generator.uniform_paths(&draws)?;
        let payoffs: Vec<f64> = paths.paths().map(|p| self.payoff.evaluate(p)).collect();

        match mode {
            PricingMode::Antithetic => {
                let mirrored = generator.uniform_paths(&draws.mapv(|z| -z))?;
                let mirrored_payoffs: Vec<f64> =
                    mirrored.paths().map(|p| self.payoff.evaluate(p)).collect();
                estimators::antithetic(&payoffs, &mirrored_payoffs, discount)
            }
            PricingMode::ControlVariate => estimators::control_variate(
                &payoffs,
                &paths.terminal_prices(),
                self.contract.forward(),
                discount,
            ),
            _ => estimators::plain(&payoffs, discount),
        }
    }

    /// Plain Monte Carlo price on `path_length` equal steps
    pub fn price<R: NormalSource + ?Sized>(
        &self,
        path_length: usize,
        num_paths: usize,
        seed: u64,
        stream: &mut R,
    ) -> PricerResult<f64> {
        self.estimate(stream, path_length, num_paths, PricingMode::Vanilla, seed)
            .map(|e| e.value)
    }

    /// Closed-form benchmark, when one exists
    ///
    /// Vanilla payoffs get Black-Scholes-Merton; Down-and-Out and
    /// Down-and-In calls get the continuously monitored barrier formula.
    /// Everything else, Asian payoffs included, returns `None`.
    pub fn closed_form(&self) -> Option<f64> {
        let contract = self.contract.with_strike(self.payoff.strike());
        match self.payoff {
            Payoff::Vanilla { option_type, .. } => Some(bs_analytic::price(contract, option_type)),
            Payoff::Barrier {
                option_type,
                barrier,
                direction,
                style,
                ..
            } => barrier::barrier_price(contract, option_type, barrier, direction, style),
            Payoff::Asian { .. } => None,
        }
    }
}
