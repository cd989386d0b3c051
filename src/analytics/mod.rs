pub mod barrier;
pub mod bs_analytic;
