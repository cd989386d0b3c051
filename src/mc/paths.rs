// src/mc/paths.rs
//! Asset Path Generation under Geometric Brownian Motion
//!
//! # Exact Discretization
//!
//! Every step uses the exact GBM transition
//! ```text
//! S_{i} = S_{i-1} * exp((r - q - σ²/2)Δtᵢ + σ√Δtᵢ * Zᵢ)
//! ```
//! so there is no discretization bias at the grid points, whatever the
//! step sizes.
//!
//! # Modes
//!
//! - **Endpoint**: one draw per path, S_T in a single step (no dividends)
//! - **Uniform path**: `cols` equal steps of T/cols
//! - **Dividend path**: steps given by the merged dividend schedule, with
//!   each dividend paid right after the GBM step that reaches its date
//!
//! Rows of the draw matrix are paths, columns are steps.

use crate::error::{PricerError, PricerResult};
use crate::models::{DividendSchedule, Gbm, OptionContract, ScheduledStep};
use ndarray::{Array1, Array2, ArrayView1, Zip};
use std::slice::ChunksExact;
use tracing::warn;

/// Simulated price paths, stored row-major.
///
/// Node 0 of every path is the initial spot; node `i` is the price after
/// step `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSet {
    prices: Vec<f64>,
    path_len: usize,
}

impl PathSet {
    pub fn num_paths(&self) -> usize {
        if self.path_len == 0 {
            0
        } else {
            self.prices.len() / self.path_len
        }
    }

    /// Nodes per path, including the initial spot
    pub fn path_len(&self) -> usize {
        self.path_len
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn paths(&self) -> ChunksExact<'_, f64> {
        self.prices.chunks_exact(self.path_len.max(1))
    }

    pub fn path(&self, i: usize) -> Option<&[f64]> {
        self.paths().nth(i)
    }

    pub fn terminal_prices(&self) -> Vec<f64> {
        self.paths().filter_map(|p| p.last().copied()).collect()
    }
}

/// Turns standard normal draws into asset prices for one contract
#[derive(Debug, Clone, Copy)]
pub struct PathGenerator {
    model: Gbm,
    maturity: f64,
}

impl PathGenerator {
    pub fn new(contract: &OptionContract) -> Self {
        PathGenerator {
            model: Gbm::risk_neutral(contract),
            maturity: contract.maturity,
        }
    }

    pub fn model(&self) -> &Gbm {
        &self.model
    }

    /// Endpoint mode: S_T = S·exp((r - q - σ²/2)T + σ√T·z) for each row's
    /// single draw.
    pub fn terminal_prices(&self, draws: &Array2<f64>) -> PricerResult<Vec<f64>> {
        expect_columns("endpoint prices", draws, 1)?;
        let (model, maturity) = (self.model, self.maturity);
        let mut prices = Array1::<f64>::zeros(draws.nrows());
        Zip::from(&mut prices)
            .and(draws.column(0))
            .par_for_each(|s, &z| *s = model.terminal(maturity, z));
        Ok(prices.to_vec())
    }

    /// Full paths on an equally spaced grid of `draws.ncols()` steps
    pub fn uniform_paths(&self, draws: &Array2<f64>) -> PricerResult<PathSet> {
        if draws.ncols() == 0 {
            return Err(PricerError::DimensionMismatch {
                context: "uniform paths".to_string(),
                expected: 1,
                actual: 0,
            });
        }
        let steps = ScheduledStep::uniform(self.maturity, draws.ncols());
        Ok(self.walk(draws, &steps))
    }

    /// Full paths on the merged dividend grid, paying every dividend except
    /// on the maturity node. A path whose price a cash dividend exhausts is
    /// absorbed at zero. `draws` must have exactly
    /// `schedule.step_count()` columns.
    pub fn dividend_paths(
        &self,
        draws: &Array2<f64>,
        schedule: &DividendSchedule,
    ) -> PricerResult<PathSet> {
        let steps = schedule.steps(self.maturity)?;
        expect_columns("dividend paths", draws, steps.len())?;
        let paths = self.walk(draws, &steps);

        let absorbed = paths.terminal_prices().iter().filter(|&&s| s <= 0.0).count();
        if absorbed > 0 {
            warn!(
                absorbed,
                paths = paths.num_paths(),
                "fixed dividends exhausted the asset on some paths"
            );
        }
        Ok(paths)
    }

    /// Terminal prices of the dividend-free counterfactual: the same draws
    /// and the same step sizes with every dividend skipped.
    pub fn no_dividend_terminals(
        &self,
        draws: &Array2<f64>,
        schedule: &DividendSchedule,
    ) -> PricerResult<Vec<f64>> {
        let steps = schedule.steps(self.maturity)?;
        expect_columns("no-dividend terminals", draws, steps.len())?;
        Ok(draws
            .rows()
            .into_iter()
            .map(|row| self.terminal_without_dividends(row, &steps))
            .collect())
    }

    fn walk(&self, draws: &Array2<f64>, steps: &[ScheduledStep]) -> PathSet {
        let path_len = steps.len() + 1;
        let mut prices = Vec::with_capacity(draws.nrows() * path_len);
        for row in draws.rows() {
            let mut s = self.model.s0;
            prices.push(s);
            for (&z, step) in row.iter().zip(steps) {
                s = step.apply(self.model.exact_step(s, step.dt, z));
                prices.push(s);
            }
        }
        PathSet { prices, path_len }
    }

    fn terminal_without_dividends(&self, row: ArrayView1<'_, f64>, steps: &[ScheduledStep]) -> f64 {
        row.iter()
            .zip(steps)
            .fold(self.model.s0, |s, (&z, step)| self.model.exact_step(s, step.dt, z))
    }
}

fn expect_columns(context: &str, draws: &Array2<f64>, expected: usize) -> PricerResult<()> {
    if draws.ncols() != expected {
        return Err(PricerError::DimensionMismatch {
            context: context.to_string(),
            expected,
            actual: draws.ncols(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DividendSchedule;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn contract() -> OptionContract {
        OptionContract::new(50.0, 55.55, 7.0 / 12.0, 0.2, 0.02, 0.0).unwrap()
    }

    #[test]
    fn test_endpoint_matches_closed_form_map() {
        let c = contract();
        let gen = PathGenerator::new(&c);
        let draws = array![[0.0], [1.0], [-2.0]];
        let s = gen.terminal_prices(&draws).unwrap();
        for (i, z) in [0.0, 1.0, -2.0].iter().enumerate() {
            let expected = c.spot
                * ((c.rate - c.volatility * c.volatility / 2.0) * c.maturity
                    + c.volatility * c.maturity.sqrt() * z)
                    .exp();
            assert_relative_eq!(s[i], expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_endpoint_rejects_wide_matrix() {
        let gen = PathGenerator::new(&contract());
        let draws = Array2::<f64>::zeros((3, 2));
        assert!(matches!(
            gen.terminal_prices(&draws),
            Err(PricerError::DimensionMismatch { expected: 1, actual: 2, .. })
        ));
    }

    #[test]
    fn test_uniform_paths_terminal_equals_endpoint() {
        let c = contract();
        let gen = PathGenerator::new(&c);
        let draws = array![[0.3, -0.7, 1.2, 0.1]];
        let paths = gen.uniform_paths(&draws).unwrap();
        assert_eq!(paths.num_paths(), 1);
        assert_eq!(paths.path_len(), 5);
        assert_eq!(paths.path(0).unwrap()[0], c.spot);

        // Sum of four N(0,1) scaled by √(T/4) equals one draw of (Σz)/2 over T
        let z_total: f64 = (0.3 - 0.7 + 1.2 + 0.1) / 2.0;
        let endpoint = gen.terminal_prices(&array![[z_total]]).unwrap()[0];
        assert_relative_eq!(paths.terminal_prices()[0], endpoint, epsilon = 1e-10);
    }

    #[test]
    fn test_dividend_paths_apply_adjustments() {
        let c = contract();
        let gen = PathGenerator::new(&c);
        let schedule = DividendSchedule::from_pairs(
            &[(4.0 / 12.0, 0.02)],
            &[(2.0 / 12.0, 0.5), (6.0 / 12.0, 0.5)],
        )
        .unwrap();
        let draws = Array2::<f64>::zeros((2, 4));
        let paths = gen.dividend_paths(&draws, &schedule).unwrap();
        assert_eq!(paths.path_len(), 5);

        // Zero draws: deterministic drift between the nodes
        let g = |dt: f64| ((c.rate - 0.5 * c.volatility * c.volatility) * dt).exp();
        let mut s = c.spot;
        s = s * g(2.0 / 12.0) - 0.5;
        s = s * g(2.0 / 12.0) * 0.98;
        s = s * g(2.0 / 12.0) - 0.5;
        s *= g(1.0 / 12.0);
        for p in paths.paths() {
            assert_relative_eq!(p[4], s, epsilon = 1e-10);
        }

        let nodiv = gen.no_dividend_terminals(&draws, &schedule).unwrap();
        assert_relative_eq!(nodiv[0], c.spot * g(7.0 / 12.0), epsilon = 1e-10);
    }

    #[test]
    fn test_dividend_paths_dimension_mismatch() {
        let gen = PathGenerator::new(&contract());
        let schedule = DividendSchedule::from_pairs(&[(0.25, 0.02)], &[]).unwrap();
        let draws = Array2::<f64>::zeros((5, 3));
        let err = gen.dividend_paths(&draws, &schedule).unwrap_err();
        assert_eq!(
            err,
            PricerError::DimensionMismatch {
                context: "dividend paths".to_string(),
                expected: 2,
                actual: 3,
            }
        );
        assert!(gen.no_dividend_terminals(&draws, &schedule).is_err());
    }

    #[test]
    fn test_empty_schedule_paths_match_single_step() {
        let c = contract();
        let gen = PathGenerator::new(&c);
        let draws = array![[0.8], [-0.4]];
        let with_grid = gen.dividend_paths(&draws, &DividendSchedule::none()).unwrap();
        let endpoint = gen.terminal_prices(&draws).unwrap();
        assert_eq!(with_grid.terminal_prices(), endpoint);
    }
}
