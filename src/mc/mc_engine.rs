// src/mc/mc_engine.rs
use crate::analytics::bs_analytic;
use crate::error::{validation::*, PricerResult};
use crate::mc::estimators::{self, Estimate};
use crate::mc::path_engine::PathOptionAnalyzer;
use crate::mc::paths::PathGenerator;
use crate::mc::payoffs::{OptionType, Payoff};
use crate::models::{DividendSchedule, OptionContract};
use crate::rng::NormalSource;
use tracing::debug;

/// Estimator used to turn simulated payoffs into a price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PricingMode {
    /// Plain Monte Carlo
    #[default]
    Vanilla,
    /// Pair every draw z with -z and pool both payoff sets
    Antithetic,
    /// Terminal price as control with known mean equal to the forward
    ControlVariate,
    /// Rescale terminal prices so their sample mean equals the forward
    MomentMatching,
    /// Moment matching followed by the control-variate correction
    MomentMatchingControlVariate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct McConfig {
    pub paths: usize,
    /// Time steps per path. Ignored for vanilla payoffs, which are sampled
    /// exactly at maturity.
    pub steps: usize,
    pub seed: u64,
    pub mode: PricingMode,
}

impl McConfig {
    /// Validate the Monte Carlo configuration
    pub fn validate(&self) -> PricerResult<()> {
        validate_paths(self.paths)?;
        validate_steps(self.steps)?;
        Ok(())
    }
}

impl Default for McConfig {
    fn default() -> Self {
        McConfig {
            paths: 100_000,
            steps: 1,
            seed: 1,
            mode: PricingMode::Vanilla,
        }
    }
}

/// Monte Carlo pricing of European options under Geometric Brownian Motion
///
/// # Math Framework
///
/// Simulates the risk-neutral GBM SDE:
/// ```text
/// dS_t = (r - q) S_t dt + σ S_t dW_t
/// ```
///
/// With exact solution:
/// ```text
/// S_T = S_0 * exp((r - q - σ²/2)T + σ√T * Z)
/// ```
/// where Z ~ N(0,1). European payoffs only need S_T, so every path is a
/// single draw.
///
/// # Variance Reduction Techniques
///
/// See [`PricingMode`]. The control variate is S_T itself with
/// E\[S_T\] = S·e^((r-q)T); moment matching rescales the sample of S_T to
/// the same forward. Once matched, the sample mean of S_T equals the
/// forward, so the control-variate correction of the combined mode is
/// zero up to rounding.
///
/// Every call reseeds the stream it is given, so identical arguments give
/// bit-identical results.
#[derive(Debug, Clone, Copy)]
pub struct EuropeanOptionAnalyzer {
    contract: OptionContract,
}

/// Discounted Monte Carlo estimates of the call and put values, deltas and
/// vegas from one shared set of terminal prices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EuropeanOptionResults {
    pub call: f64,
    pub delta_call: f64,
    pub vega_call: f64,
    pub put: f64,
    pub delta_put: f64,
    pub vega_put: f64,
}

impl EuropeanOptionResults {
    /// The Black-Scholes-Merton values the estimates converge to
    pub fn closed_form(contract: OptionContract) -> Self {
        EuropeanOptionResults {
            call: bs_analytic::call_price(contract),
            delta_call: bs_analytic::call_delta(contract),
            vega_call: bs_analytic::vega(contract),
            put: bs_analytic::put_price(contract),
            delta_put: bs_analytic::put_delta(contract),
            vega_put: bs_analytic::vega(contract),
        }
    }
}

/// Value and delta of an option on an asset paying discrete dividends,
/// plain and corrected with the dividend-free option as control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DividendEstimates {
    pub value: Estimate,
    pub delta: Estimate,
    pub cv_value: Estimate,
    pub cv_delta: Estimate,
}

impl DividendEstimates {
    /// `[value, delta, cv_value, cv_delta]`
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.value.value,
            self.delta.value,
            self.cv_value.value,
            self.cv_delta.value,
        ]
    }
}

impl EuropeanOptionAnalyzer {
    pub fn new(contract: OptionContract) -> PricerResult<Self> {
        contract.validate()?;
        Ok(EuropeanOptionAnalyzer { contract })
    }

    pub fn contract(&self) -> &OptionContract {
        &self.contract
    }

    /// Price estimate with standard error in the requested mode
    ///
    /// # Errors
    /// - `InvalidSampleSize` when `num_paths` is zero
    /// - `SingularRegression` when a control-variate mode sees no spread
    ///   in the terminal prices
    pub fn estimate<R: NormalSource + ?Sized>(
        &self,
        stream: &mut R,
        option_type: OptionType,
        mode: PricingMode,
        num_paths: usize,
        seed: u64,
    ) -> PricerResult<Estimate> {
        validate_paths(num_paths)?;
        debug!(?mode, ?option_type, num_paths, seed, "pricing european option");

        let c = &self.contract;
        let generator = PathGenerator::new(c);
        let discount = c.discount_factor();
        let forward = c.forward();
        let intrinsic = |s: &f64| option_type.intrinsic(*s, c.strike);

        stream.reseed(seed);
        let draws = stream.standard_normal_matrix(num_paths, 1);
        let mut terminal = generator.terminal_prices(&draws)?;

        match mode {
            PricingMode::Vanilla => {
                let payoffs: Vec<f64> = terminal.iter().map(intrinsic).collect();
                estimators::plain(&payoffs, discount)
            }
            PricingMode::Antithetic => {
                let mirrored = generator.terminal_prices(&draws.mapv(|z| -z))?;
                let payoffs: Vec<f64> = terminal.iter().map(intrinsic).collect();
                let mirrored_payoffs: Vec<f64> = mirrored.iter().map(intrinsic).collect();
                estimators::antithetic(&payoffs, &mirrored_payoffs, discount)
            }
            PricingMode::ControlVariate => {
                let payoffs: Vec<f64> = terminal.iter().map(intrinsic).collect();
                estimators::control_variate(&payoffs, &terminal, forward, discount)
            }
            PricingMode::MomentMatching => {
                estimators::match_first_moment(&mut terminal, forward)?;
                let payoffs: Vec<f64> = terminal.iter().map(intrinsic).collect();
                estimators::plain(&payoffs, discount)
            }
            PricingMode::MomentMatchingControlVariate => {
                estimators::match_first_moment(&mut terminal, forward)?;
                let payoffs: Vec<f64> = terminal.iter().map(intrinsic).collect();
                estimators::control_variate(&payoffs, &terminal, forward, discount)
            }
        }
    }

    /// Discounted price in the requested mode
    pub fn price<R: NormalSource + ?Sized>(
        &self,
        stream: &mut R,
        option_type: OptionType,
        mode: PricingMode,
        num_paths: usize,
        seed: u64,
    ) -> PricerResult<f64> {
        self.estimate(stream, option_type, mode, num_paths, seed)
            .map(|e| e.value)
    }

    /// Call and put value, delta and vega from one set of terminal prices
    ///
    /// # Pathwise Greeks
    /// ```text
    /// ∂S_T/∂S_0 = S_T / S_0
    /// ∂S_T/∂σ   = S_T (-σT + √T Z)
    /// ```
    /// multiplied by the payoff slope: 1{S_T > K} for calls, -1{S_T < K}
    /// for puts.
    pub fn analyze<R: NormalSource + ?Sized>(
        &self,
        stream: &mut R,
        num_paths: usize,
        seed: u64,
    ) -> PricerResult<EuropeanOptionResults> {
        validate_paths(num_paths)?;
        debug!(num_paths, seed, "analyzing european option");

        let c = &self.contract;
        let generator = PathGenerator::new(c);
        let sqrt_t = c.maturity.sqrt();

        stream.reseed(seed);
        let draws = stream.standard_normal_matrix(num_paths, 1);
        let terminal = generator.terminal_prices(&draws)?;

        let mut sums = [0.0_f64; 6];
        for (&s_t, &z) in terminal.iter().zip(draws.iter()) {
            let ds_dspot = s_t / c.spot;
            let ds_dvol = s_t * (-c.volatility * c.maturity + sqrt_t * z);
            if s_t > c.strike {
                sums[0] += s_t - c.strike;
                sums[1] += ds_dspot;
                sums[2] += ds_dvol;
            } else if s_t < c.strike {
                sums[3] += c.strike - s_t;
                sums[4] -= ds_dspot;
                sums[5] -= ds_dvol;
            }
        }

        let scale = c.discount_factor() / num_paths as f64;
        let [call, delta_call, vega_call, put, delta_put, vega_put] = sums.map(|v| v * scale);
        Ok(EuropeanOptionResults {
            call,
            delta_call,
            vega_call,
            put,
            delta_put,
            vega_put,
        })
    }

    /// Value and delta of the option when the asset pays the scheduled
    /// discrete dividends
    ///
    /// Paths are simulated on the merged dividend grid. The dividend-free
    /// counterfactual reuses the same draws with every dividend skipped and
    /// serves as a control variate whose expectations are the closed-form
    /// price and delta.
    ///
    /// The pathwise delta of one path is
    /// ```text
    /// sign · S_T^nodiv / S_0 · Π(1 - dᵢ) · 1{in the money at S_T}
    /// ```
    /// where the product runs over the proportional dividends. Fixed
    /// dividends shift S_T without changing ∂S_T/∂S_0, except on paths a
    /// cash dividend absorbs at zero, whose delta is zero.
    ///
    /// # Errors
    /// - `InvalidSchedule` when a dividend falls after maturity
    /// - `SingularRegression` when the counterfactual payoffs or deltas are
    ///   constant over the sample (e.g. an option that never finishes in the
    ///   money)
    pub fn price_with_dividends<R: NormalSource + ?Sized>(
        &self,
        stream: &mut R,
        option_type: OptionType,
        schedule: &DividendSchedule,
        num_paths: usize,
        seed: u64,
    ) -> PricerResult<DividendEstimates> {
        validate_paths(num_paths)?;
        debug!(
            ?option_type,
            num_paths,
            seed,
            steps = schedule.step_count(),
            "pricing option with discrete dividends"
        );

        let c = &self.contract;
        let generator = PathGenerator::new(c);
        let discount = c.discount_factor();
        let sign = option_type.sign();
        let proportional_factor = schedule.proportional_factor();

        stream.reseed(seed);
        let draws = stream.standard_normal_matrix(num_paths, schedule.step_count());
        let with_dividends = generator.dividend_paths(&draws, schedule)?.terminal_prices();
        let without_dividends = generator.no_dividend_terminals(&draws, schedule)?;

        let n = with_dividends.len();
        let mut values = Vec::with_capacity(n);
        let mut deltas = Vec::with_capacity(n);
        let mut control_values = Vec::with_capacity(n);
        let mut control_deltas = Vec::with_capacity(n);
        for (&s_t, &s_nodiv) in with_dividends.iter().zip(&without_dividends) {
            let growth = s_nodiv / c.spot;
            values.push(option_type.intrinsic(s_t, c.strike));
            deltas.push(if s_t > 0.0 && option_type.in_the_money(s_t, c.strike) {
                sign * growth * proportional_factor
            } else {
                0.0
            });
            control_values.push(option_type.intrinsic(s_nodiv, c.strike));
            control_deltas.push(if option_type.in_the_money(s_nodiv, c.strike) {
                sign * growth
            } else {
                0.0
            });
        }

        // Closed forms are present values; the regressions run on
        // undiscounted samples
        let value_target = bs_analytic::price(*c, option_type) / discount;
        let delta_target = bs_analytic::delta(*c, option_type) / discount;

        Ok(DividendEstimates {
            value: estimators::plain(&values, discount)?,
            delta: estimators::plain(&deltas, discount)?,
            cv_value: estimators::control_variate(
                &values,
                &control_values,
                value_target,
                discount,
            )?,
            cv_delta: estimators::control_variate(
                &deltas,
                &control_deltas,
                delta_target,
                discount,
            )?,
        })
    }
}

/// Price `payoff` on `contract` as described by `cfg`
///
/// Vanilla payoffs go to [`EuropeanOptionAnalyzer`] with the payoff's
/// strike and are sampled exactly at maturity; path-dependent payoffs go to
/// [`PathOptionAnalyzer`] on a grid of `cfg.steps` equal steps.
pub fn mc_price_option<R: NormalSource + ?Sized>(
    contract: &OptionContract,
    payoff: &Payoff,
    cfg: &McConfig,
    stream: &mut R,
) -> PricerResult<Estimate> {
    cfg.validate()?;
    match *payoff {
        Payoff::Vanilla { option_type, k } => {
            validate_positive("strike", k)?;
            EuropeanOptionAnalyzer::new(contract.with_strike(k))?.estimate(
                stream,
                option_type,
                cfg.mode,
                cfg.paths,
                cfg.seed,
            )
        }
        _ => PathOptionAnalyzer::new(*contract, *payoff)?.estimate(
            stream,
            cfg.steps,
            cfg.paths,
            cfg.mode,
            cfg.seed,
        ),
    }
}
