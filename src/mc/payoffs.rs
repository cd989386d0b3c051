// src/mc/payoffs.rs
//! Option Payoff Functions
//!
//! # Mathematical Definitions
//!
//! This module implements option payoff functions that operate on
//! simulated asset price paths. Each payoff represents a different contract type.
//!
//! ## European Options
//! - **Call**: max(S_T - K, 0) - right to buy at strike K
//! - **Put**: max(K - S_T, 0) - right to sell at strike K
//!
//! ## Path-Dependent Options
//! - **Asian**: vanilla payoff on the arithmetic average of the path
//! - **Barrier**: vanilla payoff on S_T, switched on (knock-in) or off
//!   (knock-out) by any node touching the barrier
//!
//! # Implementation Notes
//!
//! All payoffs operate on the full price path `&[f64]` (node 0 is the
//! initial spot, the last node is S_T). European payoffs only read the last
//! node, so a one-element slice holding S_T is a valid input for them.

use crate::error::{PricerError, PricerResult};
use crate::mc::paths::PathSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// max(S - K, 0) for calls, max(K - S, 0) for puts
    #[inline]
    pub fn intrinsic(&self, s: f64, k: f64) -> f64 {
        match self {
            OptionType::Call => (s - k).max(0.0),
            OptionType::Put => (k - s).max(0.0),
        }
    }

    /// +1 for calls, -1 for puts
    #[inline]
    pub fn sign(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Strictly in the money at `s`
    #[inline]
    pub fn in_the_money(&self, s: f64, k: f64) -> bool {
        match self {
            OptionType::Call => s > k,
            OptionType::Put => s < k,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierDirection {
    /// Crossed when a node is ≥ the barrier
    Up,
    /// Crossed when a node is ≤ the barrier
    Down,
}

impl BarrierDirection {
    #[inline]
    pub fn crossed(&self, s: f64, barrier: f64) -> bool {
        match self {
            BarrierDirection::Up => s >= barrier,
            BarrierDirection::Down => s <= barrier,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierStyle {
    In,
    Out,
}

/// Enumeration of supported option payoff types
///
/// Each variant contains the parameters needed to compute the payoff
/// from a simulated asset price path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payoff {
    /// European call or put on the terminal price
    Vanilla { option_type: OptionType, k: f64 },

    /// Discretely monitored barrier option
    Barrier {
        option_type: OptionType,
        k: f64,
        barrier: f64,
        direction: BarrierDirection,
        style: BarrierStyle,
    },

    /// Average-price option on the arithmetic mean of the path nodes
    Asian {
        option_type: OptionType,
        k: f64,
        /// Whether node 0 (today's spot) enters the average
        include_initial: bool,
    },
}

impl Payoff {
    pub fn call(k: f64) -> Self {
        Payoff::Vanilla {
            option_type: OptionType::Call,
            k,
        }
    }

    pub fn put(k: f64) -> Self {
        Payoff::Vanilla {
            option_type: OptionType::Put,
            k,
        }
    }

    pub fn barrier(
        option_type: OptionType,
        k: f64,
        barrier: f64,
        direction: BarrierDirection,
        style: BarrierStyle,
    ) -> Self {
        Payoff::Barrier {
            option_type,
            k,
            barrier,
            direction,
            style,
        }
    }

    pub fn asian(option_type: OptionType, k: f64, include_initial: bool) -> Self {
        Payoff::Asian {
            option_type,
            k,
            include_initial,
        }
    }

    pub fn option_type(&self) -> OptionType {
        match *self {
            Payoff::Vanilla { option_type, .. }
            | Payoff::Barrier { option_type, .. }
            | Payoff::Asian { option_type, .. } => option_type,
        }
    }

    pub fn strike(&self) -> f64 {
        match *self {
            Payoff::Vanilla { k, .. } | Payoff::Barrier { k, .. } | Payoff::Asian { k, .. } => k,
        }
    }

    /// Whether the payoff reads more than the terminal node
    pub fn is_path_dependent(&self) -> bool {
        !matches!(self, Payoff::Vanilla { .. })
    }

    /// Realized (undiscounted) payoff of one simulated path
    ///
    /// # Parameters
    /// - `path`: asset price path [S_0, S_1, ..., S_T]; must not be empty
    pub fn evaluate(&self, path: &[f64]) -> f64 {
        let s_t = match path.last() {
            Some(&s) => s,
            None => return 0.0,
        };
        match *self {
            Payoff::Vanilla { option_type, k } => option_type.intrinsic(s_t, k),

            // Knock-in returns at the first crossing; the payoff still uses
            // S_T since a European barrier pays only at maturity
            Payoff::Barrier {
                option_type,
                k,
                barrier,
                direction,
                style,
            } => {
                let crossed = path.iter().any(|&s| direction.crossed(s, barrier));
                match (style, crossed) {
                    (BarrierStyle::Out, false) | (BarrierStyle::In, true) => {
                        option_type.intrinsic(s_t, k)
                    }
                    _ => 0.0,
                }
            }

            Payoff::Asian {
                option_type,
                k,
                include_initial,
            } => {
                let nodes = if include_initial || path.len() == 1 {
                    path
                } else {
                    &path[1..]
                };
                let average = nodes.iter().sum::<f64>() / nodes.len() as f64;
                option_type.intrinsic(average, k)
            }
        }
    }

    /// Payoff of a terminal price alone. Only defined for vanilla payoffs.
    pub fn evaluate_terminal(&self, s_t: f64) -> PricerResult<f64> {
        match *self {
            Payoff::Vanilla { option_type, k } => Ok(option_type.intrinsic(s_t, k)),
            _ => Err(PricerError::UnsupportedOperation {
                operation: "evaluate_terminal".to_string(),
                context: "path-dependent payoffs need the full path".to_string(),
            }),
        }
    }

    /// Discounted sample mean of the payoff over a path set
    pub fn price(&self, paths: &PathSet, discount: f64) -> PricerResult<f64> {
        if paths.is_empty() {
            return Err(PricerError::InvalidSampleSize { size: 0 });
        }
        let total: f64 = paths.paths().map(|p| self.evaluate(p)).sum();
        Ok(total / paths.num_paths() as f64 * discount)
    }
}
