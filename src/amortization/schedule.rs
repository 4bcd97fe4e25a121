//! Schedule rows and result structures returned by the engines

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SimulationWarning;
use super::prepayments::ProcessedPrepayment;
use super::state::MonthStep;

/// One month of a currency-denominated schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    /// Month index (1-based, contiguous)
    pub month: u32,
    /// Installment actually paid: `interest + principal`
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    /// Prepayment applied after the installment (0 if none)
    pub prepayment: f64,
    /// Balance after installment and prepayment
    pub balance: f64,
}

impl MonthlyRecord {
    pub fn from_step(step: &MonthStep, balance: f64) -> Self {
        Self {
            month: step.month,
            payment: step.payment(),
            interest: step.interest,
            principal: step.principal,
            prepayment: 0.0,
            balance,
        }
    }
}

/// Totals of the no-prepayment comparison run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BaselineTotals {
    pub total_paid: f64,
    pub total_interest: f64,
    pub months: u32,
}

/// Result of a fixed-currency simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub monthly_payment: f64,
    pub months_until_payoff: u32,
    pub years_until_payoff: f64,

    // Totals with prepayments
    pub total_paid: f64,
    pub total_interest: f64,
    pub total_prepaid: f64,
    pub total_prepayment_fees: f64,
    pub prepayments_made: u32,

    /// Same loan without prepayments
    pub baseline: BaselineTotals,

    // Savings versus baseline
    pub time_saved_months: u32,
    pub time_saved_years: f64,
    pub interest_saved: f64,

    pub schedule: Vec<MonthlyRecord>,
    pub warnings: Vec<SimulationWarning>,
}

impl SimulationResult {
    pub fn new(monthly_payment: f64) -> Self {
        Self {
            monthly_payment,
            months_until_payoff: 0,
            years_until_payoff: 0.0,
            total_paid: 0.0,
            total_interest: 0.0,
            total_prepaid: 0.0,
            total_prepayment_fees: 0.0,
            prepayments_made: 0,
            baseline: BaselineTotals::default(),
            time_saved_months: 0,
            time_saved_years: 0.0,
            interest_saved: 0.0,
            schedule: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add a schedule row
    pub fn add_record(&mut self, record: MonthlyRecord) {
        self.months_until_payoff = record.month;
        self.schedule.push(record);
    }

    /// Scheduled principal repaid across the schedule (excludes prepayments)
    pub fn total_principal(&self) -> f64 {
        self.schedule.iter().map(|r| r.principal).sum()
    }

    pub fn final_balance(&self) -> f64 {
        self.schedule.last().map(|r| r.balance).unwrap_or(0.0)
    }
}

/// One month of an index-denominated schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedMonthlyRecord {
    pub month: u32,
    pub date: NaiveDate,
    /// Installment in index units (`interest_units + principal_units`)
    pub installment_units: f64,
    /// Installment in currency; estimated historical value for paid months,
    /// today's value for projected months
    pub installment_currency: f64,
    pub principal_units: f64,
    pub interest_units: f64,
    /// Currency prepaid in this month (0 if none)
    pub prepayment: f64,
    /// Balance after the month, in index units
    pub balance_units: f64,
    /// Month already elapsed at the valuation date
    pub is_paid: bool,
}

/// Effect of prepayments already made
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PastPrepaymentSummary {
    /// Processed entries after sorting and lump-sum redistribution
    pub prepayments: Vec<ProcessedPrepayment>,
    /// Sum of the currency amounts as entered
    pub total_currency: f64,
    /// Index units actually applied during the elapsed months
    pub total_units: f64,
    pub time_already_saved_months: u32,
    /// Interest saved over the full term, in currency at today's index value
    pub interest_already_saved: f64,
}

/// Projection of a recurring prepayment plan from today onward
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FuturePrepaymentSummary {
    pub enabled: bool,
    pub amount: f64,
    pub frequency_months: u32,
    pub fee_percentage: f64,
    pub total_fees: f64,
    pub remaining_months_with_prepayments: u32,
    pub time_saved_months: u32,
    /// Installments, prepayments and fees still to pay, in currency
    pub total_remaining_with_prepayments: f64,
    pub interest_saved: f64,
}

/// Result of an index-denominated simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedSimulationResult {
    pub installment_units: f64,
    /// Installment at today's index value
    pub installment_currency: f64,
    pub remaining_balance_units: f64,
    pub remaining_balance_currency: f64,
    pub paid_installments: u32,
    pub total_installments: u32,

    /// Principal valued at the initial index value
    pub original_loan_amount: f64,
    pub initial_index_value: f64,
    pub current_index_value: f64,
    pub index_variation_percentage: f64,

    pub remaining_months: u32,
    /// Remaining installments at today's index value
    pub total_remaining_payments: f64,

    pub past: PastPrepaymentSummary,
    pub future: FuturePrepaymentSummary,

    pub schedule: Vec<IndexedMonthlyRecord>,
    pub warnings: Vec<SimulationWarning>,
}

impl IndexedSimulationResult {
    /// Rows already elapsed at the valuation date
    pub fn paid_records(&self) -> impl Iterator<Item = &IndexedMonthlyRecord> {
        self.schedule.iter().filter(|r| r.is_paid)
    }

    /// Rows still projected
    pub fn projected_records(&self) -> impl Iterator<Item = &IndexedMonthlyRecord> {
        self.schedule.iter().filter(|r| !r.is_paid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_record_tracks_payoff_month() {
        let mut result = SimulationResult::new(100.0);
        let step = MonthStep { month: 1, interest: 10.0, principal: 90.0 };
        result.add_record(MonthlyRecord::from_step(&step, 910.0));

        assert_eq!(result.months_until_payoff, 1);
        assert_eq!(result.schedule[0].payment, 100.0);
        assert_eq!(result.total_principal(), 90.0);
        assert_eq!(result.final_balance(), 910.0);
    }
}
