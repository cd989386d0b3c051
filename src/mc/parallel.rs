// src/mc/parallel.rs
//! Multi-threaded Monte Carlo pricing
//!
//! The path count is split across workers, each drawing from its own
//! stream derived from the base seed by [`RngFactory`]. Every worker folds
//! its payoffs into a [`RunningStats`]; the partial statistics are collected
//! in worker order and merged sequentially, so a fixed worker count gives
//! bit-identical results regardless of thread scheduling.

use crate::error::{validation::*, PricerError, PricerResult};
use crate::math_utils::RunningStats;
use crate::mc::estimators::Estimate;
use crate::mc::mc_engine::{McConfig, PricingMode};
use crate::mc::paths::PathGenerator;
use crate::mc::payoffs::Payoff;
use crate::models::OptionContract;
use crate::rng::{NormalSource, RngFactory};
use rayon::prelude::*;
use tracing::debug;

/// One worker per logical CPU
pub fn default_workers() -> usize {
    num_cpus::get().max(1)
}

/// Paths assigned to each worker: as even as possible, earlier workers
/// taking the remainder
fn partition(paths: usize, workers: usize) -> Vec<usize> {
    let base = paths / workers;
    let extra = paths % workers;
    (0..workers).map(|w| base + usize::from(w < extra)).collect()
}

/// Price `payoff` with the path count spread over `workers` threads
///
/// Supports `Vanilla` and `Antithetic`; the other modes need the whole
/// sample at once (a regression or a sample-mean rescaling) and fail with
/// `UnsupportedOperation`. Vanilla payoffs use a single exact step; others
/// use `cfg.steps` equal steps.
///
/// Results depend on the worker count, since each worker has its own
/// stream, but not on scheduling.
pub fn mc_price_option_parallel(
    contract: &OptionContract,
    payoff: &Payoff,
    cfg: &McConfig,
    workers: usize,
) -> PricerResult<Estimate> {
    cfg.validate()?;
    contract.validate()?;
    validate_positive("strike", payoff.strike())?;
    if workers == 0 {
        return Err(PricerError::InvalidConfiguration {
            field: "workers".to_string(),
            reason: "at least one worker is required".to_string(),
        });
    }
    let antithetic = match cfg.mode {
        PricingMode::Vanilla => false,
        PricingMode::Antithetic => true,
        mode => {
            return Err(PricerError::UnsupportedOperation {
                operation: format!("{mode:?}"),
                context: "parallel pricing".to_string(),
            })
        }
    };

    let workers = workers.min(cfg.paths);
    let steps = if payoff.is_path_dependent() { cfg.steps } else { 1 };
    debug!(
        mode = ?cfg.mode,
        paths = cfg.paths,
        steps,
        workers,
        seed = cfg.seed,
        "parallel pricing"
    );

    let factory = RngFactory::new(cfg.seed);
    let generator = PathGenerator::new(contract);
    let chunks = partition(cfg.paths, workers);

    let partials = chunks
        .par_iter()
        .enumerate()
        .map(|(worker, &n)| -> PricerResult<RunningStats> {
            let mut stream = factory.create_std_stream(worker as u64);
            let draws = stream.standard_normal_matrix(n, steps);
            let paths = generator.uniform_paths(&draws)?;
            let mut stats = RunningStats::new();
            if antithetic {
                let mirrored = generator.uniform_paths(&draws.mapv(|z| -z))?;
                stats.extend(
                    paths
                        .paths()
                        .zip(mirrored.paths())
                        .map(|(a, b)| 0.5 * (payoff.evaluate(a) + payoff.evaluate(b))),
                );
            } else {
                stats.extend(paths.paths().map(|p| payoff.evaluate(p)));
            }
            Ok(stats)
        })
        .collect::<PricerResult<Vec<_>>>()?;

    let total = partials
        .iter()
        .fold(RunningStats::new(), |acc, part| acc.merge(part));

    let discount = contract.discount_factor();
    let per_sample = if antithetic { 2 } else { 1 };
    Ok(Estimate {
        value: total.mean()? * discount,
        std_error: total.standard_error()? * discount,
        samples: total.count() * per_sample,
    })
}
