//! Error and warning types for simulation runs

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal errors raised before a simulation starts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("Invalid parameter: {field}: {reason}")]
    InvalidParameter { field: String, reason: String },
}

impl SimulationError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        SimulationError::InvalidParameter {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type SimResult<T> = Result<T, SimulationError>;

/// Non-fatal conditions surfaced alongside a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimulationWarning {
    /// Rate was exactly zero, installment is principal / months
    LinearAmortization,
    /// Oversized single past prepayment could not be spread across the elapsed window
    LumpSumKeptWhole { paid_installments: u32 },
    /// Prepayment amount given without a usable frequency
    PrepaymentsDisabled { reason: String },
}

/// Reject NaN, infinities and values <= 0
pub(crate) fn require_positive(field: &str, value: f64) -> SimResult<()> {
    if !value.is_finite() {
        return Err(SimulationError::invalid(field, "must be a finite number"));
    }
    if value <= 0.0 {
        return Err(SimulationError::invalid(field, format!("must be greater than zero, got {}", value)));
    }
    Ok(())
}

/// Reject NaN, infinities and negative values
pub(crate) fn require_non_negative(field: &str, value: f64) -> SimResult<()> {
    if !value.is_finite() {
        return Err(SimulationError::invalid(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(SimulationError::invalid(field, format!("must not be negative, got {}", value)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_names_field() {
        let err = SimulationError::invalid("principal", "must be greater than zero");
        assert_eq!(err.to_string(), "Invalid parameter: principal: must be greater than zero");
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive("x", 1.0).is_ok());
        assert!(require_positive("x", 0.0).is_err());
        assert!(require_positive("x", f64::NAN).is_err());
        assert!(require_positive("x", f64::INFINITY).is_err());
    }

    #[test]
    fn test_require_non_negative() {
        assert!(require_non_negative("x", 0.0).is_ok());
        assert!(require_non_negative("x", -0.01).is_err());
    }
}
