//! Running balance for a month-by-month amortization pass

/// Relative residue below which a payment is treated as clearing the balance
const SETTLE_TOLERANCE: f64 = 1e-9;

/// Interest/principal split for one installment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthStep {
    /// Month index (1-based)
    pub month: u32,
    pub interest: f64,
    pub principal: f64,
}

impl MonthStep {
    pub fn payment(&self) -> f64 {
        self.interest + self.principal
    }
}

/// State of a loan balance during a simulation pass
///
/// Every pass (actual schedule, baseline, comparison runs) owns its own
/// state so runs never interfere.
#[derive(Debug, Clone)]
pub struct AmortizationState {
    /// Months elapsed in this pass
    pub month: u32,

    /// Outstanding balance after the last step, never negative
    pub balance: f64,

    /// Interest accumulated in this pass
    pub total_interest: f64,

    /// Scheduled principal repaid in this pass
    pub total_principal: f64,

    /// Extra principal repaid through prepayments in this pass
    pub total_prepaid: f64,

    /// Absolute residue absorbed into the payment that leaves it
    tolerance: f64,
}

impl AmortizationState {
    pub fn new(opening_balance: f64) -> Self {
        Self {
            month: 0,
            balance: opening_balance,
            total_interest: 0.0,
            total_principal: 0.0,
            total_prepaid: 0.0,
            tolerance: (opening_balance.abs() * SETTLE_TOLERANCE).max(SETTLE_TOLERANCE),
        }
    }

    /// Pay one installment: interest on the opening balance, the rest to principal
    ///
    /// The principal portion is clamped so the balance never overshoots zero.
    pub fn advance_month(&mut self, installment: f64, monthly_rate: f64) -> MonthStep {
        self.month += 1;

        let interest = self.balance * monthly_rate;
        let mut principal = (installment - interest).max(0.0).min(self.balance);
        if self.balance - principal <= self.tolerance {
            principal = self.balance;
        }

        self.balance -= principal;
        self.total_interest += interest;
        self.total_principal += principal;

        MonthStep {
            month: self.month,
            interest,
            principal,
        }
    }

    /// Last scheduled installment: interest plus whatever principal is left
    pub fn close_out(&mut self, monthly_rate: f64) -> MonthStep {
        self.month += 1;

        let interest = self.balance * monthly_rate;
        let principal = self.balance;

        self.balance = 0.0;
        self.total_interest += interest;
        self.total_principal += principal;

        MonthStep {
            month: self.month,
            interest,
            principal,
        }
    }

    /// Installment for the next month, closing out the loan on `final_month`
    pub fn advance_scheduled(&mut self, installment: f64, monthly_rate: f64, final_month: u32) -> MonthStep {
        if self.month + 1 >= final_month {
            self.close_out(monthly_rate)
        } else {
            self.advance_month(installment, monthly_rate)
        }
    }

    /// Apply an extra principal payment, returning the amount actually applied
    pub fn apply_prepayment(&mut self, amount: f64) -> f64 {
        let mut effective = amount.max(0.0).min(self.balance);
        if self.balance - effective <= self.tolerance {
            effective = self.balance;
        }
        self.balance -= effective;
        self.total_prepaid += effective;
        effective
    }

    pub fn is_paid_off(&self) -> bool {
        self.balance <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_step_splits_interest_and_principal() {
        let mut state = AmortizationState::new(1000.0);
        let step = state.advance_month(100.0, 0.01);

        assert_eq!(step.month, 1);
        assert_relative_eq!(step.interest, 10.0);
        assert_relative_eq!(step.principal, 90.0);
        assert_relative_eq!(step.payment(), 100.0);
        assert_relative_eq!(state.balance, 910.0);
    }

    #[test]
    fn test_principal_never_overshoots() {
        let mut state = AmortizationState::new(50.0);
        let step = state.advance_month(100.0, 0.0);

        assert_relative_eq!(step.principal, 50.0);
        assert!(state.is_paid_off());
    }

    #[test]
    fn test_prepayment_clamped_to_balance() {
        let mut state = AmortizationState::new(300.0);
        assert_relative_eq!(state.apply_prepayment(120.0), 120.0);
        assert_relative_eq!(state.apply_prepayment(1000.0), 180.0);
        assert_eq!(state.balance, 0.0);
        assert_relative_eq!(state.total_prepaid, 300.0);
    }

    #[test]
    fn test_final_month_clears_residue() {
        let mut state = AmortizationState::new(1000.0);
        state.advance_scheduled(600.0, 0.0, 2);
        let last = state.advance_scheduled(600.0, 0.0, 2);

        assert_eq!(last.month, 2);
        assert_relative_eq!(last.principal, 400.0);
        assert_eq!(state.balance, 0.0);
        assert_relative_eq!(state.total_principal, 1000.0);
    }

    #[test]
    fn test_residue_settles_to_zero() {
        let mut state = AmortizationState::new(100.0);
        let applied = state.apply_prepayment(100.0 - 1e-12);
        assert_eq!(state.balance, 0.0);
        assert_eq!(applied, 100.0);
    }
}
