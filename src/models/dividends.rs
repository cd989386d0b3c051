// src/models/dividends.rs
//! Discrete Dividend Schedules
//!
//! # Model
//!
//! Two independent schedules are supported:
//! - **Proportional**: at time tᵢ the asset value is multiplied by (1 - dᵢ)
//! - **Fixed (cash)**: at time tᵢ the amount Dᵢ is subtracted from the asset value
//!
//! # Simulation Grid
//!
//! Merging both schedules and appending the maturity T partitions [0, T]
//! into `|proportional| + |fixed| + 1` sub-intervals:
//! ```text
//! 0 ── t₁ ── t₂ ── ... ── tₙ ── T
//!   Δ₁    Δ₂          Δₙ    Δₙ₊₁
//! ```
//! Path generation takes one exact GBM step per sub-interval and then pays
//! the dividend scheduled at the step's end point. The maturity node never
//! pays a dividend. When a proportional and a fixed dividend share a date,
//! the proportional one is applied first.

use crate::error::{validation::*, PricerError, PricerResult};
use chrono::NaiveDate;

/// Day count basis for calendar-date schedules (ACT/365F)
const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DividendKind {
    Proportional,
    Fixed,
}

/// A single dividend payment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dividend {
    pub time: f64,   // year fraction from valuation
    pub amount: f64, // rate for proportional, cash for fixed
}

impl Dividend {
    pub fn new(time: f64, amount: f64) -> Self {
        Dividend { time, amount }
    }
}

/// One sub-interval of the simulation grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledStep {
    /// End point of the sub-interval
    pub time: f64,
    /// Length of the sub-interval
    pub dt: f64,
    /// Dividend paid at `time`; `None` on the maturity node
    pub dividend: Option<(DividendKind, f64)>,
}

impl ScheduledStep {
    /// Equally spaced grid over [0, maturity] without dividends
    pub fn uniform(maturity: f64, steps: usize) -> Vec<ScheduledStep> {
        let dt = maturity / steps as f64;
        (1..=steps)
            .map(|i| ScheduledStep {
                time: dt * i as f64,
                dt,
                dividend: None,
            })
            .collect()
    }

    /// Asset value after the dividend paid at this node. A cash dividend
    /// larger than the price leaves the asset at zero.
    #[inline]
    pub fn apply(&self, s: f64) -> f64 {
        match self.dividend {
            Some((DividendKind::Proportional, d)) => s * (1.0 - d),
            Some((DividendKind::Fixed, d)) => (s - d).max(0.0),
            None => s,
        }
    }
}

/// Proportional and fixed dividend schedules of one underlying
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DividendSchedule {
    proportional: Vec<Dividend>,
    fixed: Vec<Dividend>,
}

impl DividendSchedule {
    pub fn new(proportional: Vec<Dividend>, fixed: Vec<Dividend>) -> PricerResult<Self> {
        validate_sequence("proportional", &proportional)?;
        validate_sequence("fixed", &fixed)?;
        for d in &proportional {
            validate_range("proportional dividend", d.amount, 0.0, 1.0)?;
        }
        for d in &fixed {
            validate_non_negative("fixed dividend", d.amount)?;
            validate_finite("fixed dividend", d.amount)?;
        }
        Ok(DividendSchedule {
            proportional,
            fixed,
        })
    }

    /// Schedule without any dividend
    pub fn none() -> Self {
        Self::default()
    }

    /// Build from `(time, amount)` pairs
    pub fn from_pairs(proportional: &[(f64, f64)], fixed: &[(f64, f64)]) -> PricerResult<Self> {
        let to_dividends = |pairs: &[(f64, f64)]| -> Vec<Dividend> {
            pairs.iter().map(|&(t, a)| Dividend::new(t, a)).collect()
        };
        Self::new(to_dividends(proportional), to_dividends(fixed))
    }

    /// Build from payment dates, measuring time from `valuation` in ACT/365F
    /// year fractions. Dates on or before the valuation date are rejected.
    pub fn from_dates(
        valuation: NaiveDate,
        proportional: &[(NaiveDate, f64)],
        fixed: &[(NaiveDate, f64)],
    ) -> PricerResult<Self> {
        let to_dividends = |pairs: &[(NaiveDate, f64)]| -> Vec<Dividend> {
            pairs
                .iter()
                .map(|&(date, amount)| Dividend::new(year_fraction(valuation, date), amount))
                .collect()
        };
        Self::new(to_dividends(proportional), to_dividends(fixed))
    }

    pub fn proportional(&self) -> &[Dividend] {
        &self.proportional
    }

    pub fn fixed(&self) -> &[Dividend] {
        &self.fixed
    }

    pub fn is_empty(&self) -> bool {
        self.proportional.is_empty() && self.fixed.is_empty()
    }

    /// Number of sub-intervals of the simulation grid, i.e. the number of
    /// draw columns a path needs
    pub fn step_count(&self) -> usize {
        self.proportional.len() + self.fixed.len() + 1
    }

    /// Π(1 - dᵢ) over proportional dividends: ∂S_T/∂S₀ relative to the
    /// dividend-free path
    pub fn proportional_factor(&self) -> f64 {
        self.proportional
            .iter()
            .map(|d| 1.0 - d.amount)
            .product()
    }

    /// Merge both schedules into the simulation grid ending at `maturity`
    pub fn steps(&self, maturity: f64) -> PricerResult<Vec<ScheduledStep>> {
        validate_positive("maturity", maturity)?;
        for (name, seq) in [("proportional", &self.proportional), ("fixed", &self.fixed)] {
            if let Some(last) = seq.last() {
                if last.time > maturity {
                    return Err(PricerError::InvalidSchedule {
                        reason: format!(
                            "{} dividend at t={} falls after maturity T={}",
                            name, last.time, maturity
                        ),
                    });
                }
            }
        }

        let mut merged = Vec::with_capacity(self.step_count());
        let mut p = self.proportional.iter().peekable();
        let mut f = self.fixed.iter().peekable();
        loop {
            let next = match (p.peek(), f.peek()) {
                (Some(a), Some(b)) if a.time <= b.time => {
                    p.next().map(|d| (DividendKind::Proportional, *d))
                }
                (Some(_), Some(_)) => f.next().map(|d| (DividendKind::Fixed, *d)),
                (Some(_), None) => p.next().map(|d| (DividendKind::Proportional, *d)),
                (None, Some(_)) => f.next().map(|d| (DividendKind::Fixed, *d)),
                (None, None) => None,
            };
            match next {
                Some((kind, d)) => merged.push((d.time, Some((kind, d.amount)))),
                None => break,
            }
        }
        merged.push((maturity, None));

        let mut previous = 0.0;
        Ok(merged
            .into_iter()
            .map(|(time, dividend)| {
                let step = ScheduledStep {
                    time,
                    dt: time - previous,
                    dividend,
                };
                previous = time;
                step
            })
            .collect())
    }
}

fn year_fraction(valuation: NaiveDate, date: NaiveDate) -> f64 {
    date.signed_duration_since(valuation).num_days() as f64 / DAYS_PER_YEAR
}

fn validate_sequence(name: &str, dividends: &[Dividend]) -> PricerResult<()> {
    let mut previous = 0.0;
    for (i, d) in dividends.iter().enumerate() {
        validate_finite("dividend time", d.time)?;
        if d.time <= previous {
            return Err(PricerError::InvalidSchedule {
                reason: if i == 0 {
                    format!("{} dividend times must be positive, got {}", name, d.time)
                } else {
                    format!(
                        "{} dividend times must be strictly increasing ({} after {})",
                        name, d.time, previous
                    )
                },
            });
        }
        previous = d.time;
    }
    Ok(())
}
