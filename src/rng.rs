// src/rng.rs
//! Random Number Generation for Monte Carlo Simulations
//!
//! # Design Philosophy
//!
//! Monte Carlo pricing requires random numbers with specific properties:
//! 1. **Reproducibility**: Same seed → same results (critical for debugging/validation)
//! 2. **Isolation**: The stream is an explicit value handed to each pricing
//!    call, which reseeds it before drawing. No process-wide state.
//! 3. **Parallel safety**: Different workers get independent streams
//!
//! # Draw Matrices
//!
//! Pricing calls consume an `rows × cols` matrix of independent N(0,1)
//! draws (one row per path, one column per time step). Matrices are filled
//! row by row, so a path's draws do not depend on how many columns later
//! paths use.
//!
//! # Box-Muller Transform
//!
//! [`CounterRng`] converts uniform random variables to normal draws:
//! ```text
//! Z₁ = √(-2ln(U₁)) * cos(2πU₂)
//! Z₂ = √(-2ln(U₁)) * sin(2πU₂)
//! ```
//! where U₁, U₂ ~ Uniform(0,1) and Z₁, Z₂ ~ N(0,1).

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

/// A reseedable source of standard normal draws
pub trait NormalSource {
    /// Reset the stream to a deterministic state
    fn reseed(&mut self, seed: u64);

    /// Draw a `rows × cols` matrix of independent N(0,1) numbers
    fn standard_normal_matrix(&mut self, rows: usize, cols: usize) -> Array2<f64>;
}

/// `StdRng` + `StandardNormal` (ziggurat) stream
#[derive(Debug, Clone)]
pub struct StdNormalStream {
    rng: StdRng,
}

impl StdNormalStream {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdNormalStream {
    fn default() -> Self {
        Self::new(1)
    }
}

impl NormalSource for StdNormalStream {
    fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    fn standard_normal_matrix(&mut self, rows: usize, cols: usize) -> Array2<f64> {
        let rng = &mut self.rng;
        Array2::from_shape_fn((rows, cols), |_| {
            let z: f64 = StandardNormal.sample(&mut *rng);
            z
        })
    }
}

/// Counter-based RNG with a Box-Muller normal transform
///
/// # Algorithm
///
/// Uses splitmix64-like algorithm for fast, high-quality random numbers:
/// ```text
/// z = base_seed + counter
/// z = (z ⊕ (z >> 30)) * 0xbf58476d1ce4e5b9
/// z = (z ⊕ (z >> 27)) * 0x94d049bb133111eb
/// output = z ⊕ (z >> 31)
/// ```
///
/// The second Box-Muller variate is cached in the instance and handed out
/// by the next call to [`CounterRng::normal`].
#[derive(Debug, Clone)]
pub struct CounterRng {
    base_seed: u64,
    counter: u64,
    spare: Option<f64>,
}

impl CounterRng {
    pub fn new(base_seed: u64, counter: u64) -> Self {
        Self {
            base_seed,
            counter,
            spare: None,
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.counter = self.counter.wrapping_add(1);
        let mut z = self.base_seed.wrapping_add(self.counter);
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9u64);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111ebu64);
        z ^ (z >> 31)
    }

    /// Uniform draw on the open interval (0, 1)
    pub fn uniform(&mut self) -> f64 {
        ((self.next_u64() >> 11) as f64 + 0.5) * (1.0 / 9007199254740992.0) // 2^53
    }

    pub fn normal(&mut self) -> f64 {
        if let Some(z) = self.spare.take() {
            return z;
        }

        let u1 = self.uniform();
        let u2 = self.uniform();

        let mag = (-2.0 * u1.ln()).sqrt();
        let angle = 2.0 * std::f64::consts::PI * u2;
        self.spare = Some(mag * angle.sin());
        mag * angle.cos()
    }
}

impl NormalSource for CounterRng {
    fn reseed(&mut self, seed: u64) {
        self.base_seed = seed;
        self.counter = 0;
        self.spare = None;
    }

    fn standard_normal_matrix(&mut self, rows: usize, cols: usize) -> Array2<f64> {
        Array2::from_shape_fn((rows, cols), |_| self.normal())
    }
}

/// Derives independent streams for parallel workers from one base seed
#[derive(Debug, Clone, Copy)]
pub struct RngFactory {
    base_seed: u64,
}

impl RngFactory {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    /// Counter RNG for a specific worker
    pub fn create_counter_rng(&self, worker_id: u64) -> CounterRng {
        CounterRng::new(self.worker_seed(worker_id), 0)
    }

    /// Standard stream for a specific worker
    pub fn create_std_stream(&self, worker_id: u64) -> StdNormalStream {
        StdNormalStream::new(self.worker_seed(worker_id))
    }

    /// Seed for a worker. Adjacent worker ids are spread across the seed
    /// space so that `StdRng` states are unrelated.
    pub fn worker_seed(&self, worker_id: u64) -> u64 {
        self.base_seed
            .wrapping_add(worker_id.wrapping_mul(0x9e3779b97f4a7c15u64))
    }
}
