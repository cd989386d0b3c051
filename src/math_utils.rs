// src/math_utils.rs
use crate::error::{PricerError, PricerResult};
use statrs::function::erf;
use std::f64::consts::{PI, SQRT_2};

pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf::erf(x / SQRT_2))
}

/// Standard normal density φ(x) = exp(-x²/2) / √(2π)
pub fn norm_pdf(x: f64) -> f64 {
    (1.0 / (2.0 * PI).sqrt()) * (-0.5 * x * x).exp()
}

pub fn mean(values: &[f64]) -> PricerResult<f64> {
    if values.is_empty() {
        return Err(PricerError::InvalidSampleSize { size: 0 });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Unbiased sample variance, computed around the sample mean in a second
/// pass. A single observation has zero variance.
pub fn sample_variance(values: &[f64]) -> PricerResult<f64> {
    let m = mean(values)?;
    if values.len() < 2 {
        return Ok(0.0);
    }
    let ss = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>();
    Ok(ss / (values.len() - 1) as f64)
}

/// Standard error of the sample mean
pub fn standard_error(values: &[f64]) -> PricerResult<f64> {
    Ok((sample_variance(values)? / values.len() as f64).sqrt())
}

/// (Σ v) / N · discount
pub fn discount_and_average(values: &[f64], discount: f64) -> PricerResult<f64> {
    Ok(mean(values)? * discount)
}

/// Streaming mean/variance accumulator (Welford), mergeable across
/// partitions with Chan's pairwise update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStats {
    count: usize,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    pub fn merge(&self, other: &RunningStats) -> RunningStats {
        if self.count == 0 {
            return *other;
        }
        if other.count == 0 {
            return *self;
        }
        let count = self.count + other.count;
        let delta = other.mean - self.mean;
        let n_a = self.count as f64;
        let n_b = other.count as f64;
        let n = count as f64;
        RunningStats {
            count,
            mean: self.mean + delta * n_b / n,
            m2: self.m2 + other.m2 + delta * delta * n_a * n_b / n,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> PricerResult<f64> {
        if self.count == 0 {
            return Err(PricerError::InvalidSampleSize { size: 0 });
        }
        Ok(self.mean)
    }

    pub fn variance(&self) -> PricerResult<f64> {
        match self.count {
            0 => Err(PricerError::InvalidSampleSize { size: 0 }),
            1 => Ok(0.0),
            n => Ok(self.m2 / (n - 1) as f64),
        }
    }

    pub fn standard_error(&self) -> PricerResult<f64> {
        Ok((self.variance()? / self.count as f64).sqrt())
    }
}

impl Extend<f64> for RunningStats {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.push(x);
        }
    }
}

pub struct Timer {
    start_time: std::time::Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub fn new() -> Timer {
        Timer {
            start_time: std::time::Instant::now(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = std::time::Instant::now();
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }
}
