//! Constant-installment (French system) payment calculation

use crate::error::{require_non_negative, SimResult, SimulationError};

/// Level monthly payment and how it was derived
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Installment {
    pub amount: f64,
    /// Rate was exactly zero and the principal is repaid in equal parts
    pub linear: bool,
}

/// Constant installment that repays `principal` over `total_months`
///
/// `principal * r / (1 - (1 + r)^-n)`, or `principal / n` when `r == 0`.
pub fn compute_installment(principal: f64, monthly_rate: f64, total_months: u32) -> SimResult<Installment> {
    require_non_negative("principal", principal)?;
    require_non_negative("monthly_rate", monthly_rate)?;
    if total_months == 0 {
        return Err(SimulationError::invalid("total_months", "must be greater than zero"));
    }

    let n = total_months as f64;
    if monthly_rate == 0.0 {
        return Ok(Installment { amount: principal / n, linear: true });
    }

    let amount = principal * monthly_rate / (1.0 - (1.0 + monthly_rate).powf(-n));
    Ok(Installment { amount, linear: false })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_annuity_installment() {
        let installment = compute_installment(100_000.0, 0.01, 12).unwrap();
        assert!(!installment.linear);
        assert_relative_eq!(installment.amount, 8884.88, epsilon = 0.01);
    }

    #[test]
    fn test_zero_rate_is_linear() {
        let installment = compute_installment(12_000.0, 0.0, 12).unwrap();
        assert!(installment.linear);
        assert_eq!(installment.amount, 1000.0);
    }

    #[test]
    fn test_rejects_degenerate_inputs() {
        assert!(compute_installment(1000.0, 0.01, 0).is_err());
        assert!(compute_installment(-1.0, 0.01, 12).is_err());
        assert!(compute_installment(1000.0, -0.01, 12).is_err());
    }
}
