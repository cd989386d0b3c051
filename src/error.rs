// src/error.rs
use thiserror::Error;

/// Error type for the pricing engine
///
/// Variants fall into two families: precondition violations (bad inputs,
/// mismatched shapes, empty samples) and numerical degeneracies (singular
/// regressions, non-finite estimates). See [`PricerError::is_numerical`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricerError {
    /// Invalid parameter values
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// Dividend schedule that is unordered or falls outside the contract life
    #[error("Invalid dividend schedule: {reason}")]
    InvalidSchedule { reason: String },

    /// Draw matrix or sample vectors whose shape disagrees with what the
    /// consumer expects
    #[error("Dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// Estimator invoked on an empty sample
    #[error("Invalid sample size {size}: at least one sample is required")]
    InvalidSampleSize { size: usize },

    /// Control variate with no sample variance
    #[error("Singular regression: control variate sample variance is {variance:e}")]
    SingularRegression { variance: f64 },

    /// Numerical instability or non-finite result
    #[error("Numerical instability in {method}: {reason}")]
    NumericalInstability { method: String, reason: String },

    /// Unsupported operation
    #[error("Unsupported operation '{operation}' in context: {context}")]
    UnsupportedOperation { operation: String, context: String },
}

impl PricerError {
    /// Numerical degeneracies. Callers may retry these with
    /// [`crate::mc::mc_engine::PricingMode::Vanilla`].
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            PricerError::SingularRegression { .. } | PricerError::NumericalInstability { .. }
        )
    }

    /// Caller errors. Retrying with the same inputs fails the same way.
    pub fn is_precondition(&self) -> bool {
        !self.is_numerical()
    }
}

/// Result type alias for pricing operations
pub type PricerResult<T> = Result<T, PricerError>;

/// Validation utilities
pub mod validation {
    use super::{PricerError, PricerResult};

    /// Largest path count accepted by a single pricing call
    pub const MAX_PATHS: usize = 100_000_000;

    /// Largest number of time steps per path
    pub const MAX_STEPS: usize = 100_000;

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> PricerResult<()> {
        if value.is_nan() || value <= 0.0 {
            Err(PricerError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> PricerResult<()> {
        if value.is_nan() || value < 0.0 {
            Err(PricerError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter lies in the half-open range [min, max)
    pub fn validate_range(name: &str, value: f64, min: f64, max: f64) -> PricerResult<()> {
        if value.is_nan() || value < min || value >= max {
            Err(PricerError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: format!("must be in range [{}, {})", min, max),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> PricerResult<()> {
        if !value.is_finite() {
            Err(PricerError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate paths count
    pub fn validate_paths(paths: usize) -> PricerResult<()> {
        if paths == 0 {
            Err(PricerError::InvalidSampleSize { size: paths })
        } else if paths > MAX_PATHS {
            Err(PricerError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: format!("exceeds maximum allowed ({})", MAX_PATHS),
            })
        } else {
            Ok(())
        }
    }

    /// Validate steps count
    pub fn validate_steps(steps: usize) -> PricerResult<()> {
        if steps == 0 {
            Err(PricerError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if steps > MAX_STEPS {
            Err(PricerError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: format!("exceeds maximum allowed ({})", MAX_STEPS),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("sigma", 0.2).is_ok());
        assert!(validate_positive("sigma", 0.0).is_err());
        assert!(validate_positive("sigma", -0.1).is_err());
        assert!(validate_positive("sigma", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("amount", 0.0, 0.0, 1.0).is_ok());
        assert!(validate_range("amount", 0.5, 0.0, 1.0).is_ok());
        assert!(validate_range("amount", 1.0, 0.0, 1.0).is_err());
        assert!(validate_range("amount", -0.1, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite("value", 1.0).is_ok());
        assert!(validate_finite("value", f64::NAN).is_err());
        assert!(validate_finite("value", f64::INFINITY).is_err());
        assert!(validate_finite("value", f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_zero_paths_is_sample_size_error() {
        assert_eq!(
            validate_paths(0),
            Err(PricerError::InvalidSampleSize { size: 0 })
        );
        assert!(matches!(
            validate_paths(MAX_PATHS + 1),
            Err(PricerError::InvalidConfiguration { .. })
        ));
        assert!(validate_steps(0).is_err());
        assert!(validate_steps(252).is_ok());
    }

    #[test]
    fn test_error_display() {
        let error = PricerError::InvalidParameters {
            parameter: "sigma".to_string(),
            value: -0.1,
            constraint: "must be positive".to_string(),
        };

        let display = format!("{}", error);
        assert!(display.contains("sigma"));
        assert!(display.contains("-0.1"));
        assert!(display.contains("positive"));

        let error = PricerError::DimensionMismatch {
            context: "dividend paths".to_string(),
            expected: 4,
            actual: 3,
        };
        let display = error.to_string();
        assert!(display.contains("expected 4"));
        assert!(display.contains("got 3"));
    }

    #[test]
    fn test_error_taxonomy() {
        assert!(PricerError::SingularRegression { variance: 0.0 }.is_numerical());
        assert!(PricerError::NumericalInstability {
            method: "mc".to_string(),
            reason: "nan".to_string()
        }
        .is_numerical());
        assert!(PricerError::InvalidSampleSize { size: 0 }.is_precondition());
        assert!(PricerError::DimensionMismatch {
            context: "paths".to_string(),
            expected: 2,
            actual: 1
        }
        .is_precondition());
    }
}
