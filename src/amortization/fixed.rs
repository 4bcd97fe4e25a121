//! Currency-denominated loan with periodic fixed prepayments

use log::{debug, warn};

use crate::error::{SimResult, SimulationWarning};
use crate::loan::LoanParameters;
use super::installment::compute_installment;
use super::schedule::{BaselineTotals, MonthlyRecord, SimulationResult};
use super::state::AmortizationState;

/// Configuration for fixed-loan simulations
#[derive(Debug, Clone)]
pub struct FixedEngineConfig {
    /// Whether to keep the month-by-month schedule in the result
    pub detailed_output: bool,
}

impl Default for FixedEngineConfig {
    fn default() -> Self {
        Self { detailed_output: true }
    }
}

/// Annuity amortization engine for currency loans
#[derive(Debug, Clone, Default)]
pub struct FixedAmortizationEngine {
    config: FixedEngineConfig,
}

impl FixedAmortizationEngine {
    pub fn new(config: FixedEngineConfig) -> Self {
        Self { config }
    }

    /// Simulate the loan to payoff and compare against the no-prepayment baseline
    pub fn simulate(&self, params: &LoanParameters) -> SimResult<SimulationResult> {
        let mut warnings = params.validate()?;

        let total_months = params.total_months();
        let monthly_rate = params.monthly_rate();
        let installment = compute_installment(params.principal, monthly_rate, total_months)?;
        if installment.linear {
            warnings.push(SimulationWarning::LinearAmortization);
        }
        for warning in &warnings {
            warn!("Fixed simulation: {:?}", warning);
        }
        debug!(
            "Fixed simulation: principal={} rate={} months={} installment={:.2}",
            params.principal, monthly_rate, total_months, installment.amount
        );

        let mut result = SimulationResult::new(installment.amount);
        let mut state = AmortizationState::new(params.principal);
        let prepayments_enabled = params.prepayments_enabled();

        while !state.is_paid_off() && state.month < total_months {
            let step = state.advance_scheduled(installment.amount, monthly_rate, total_months);
            let mut record = MonthlyRecord::from_step(&step, state.balance);
            result.total_paid += step.payment();

            if prepayments_enabled && step.month % params.prepayment_frequency_months == 0 {
                let effective = state.apply_prepayment(params.prepayment_amount);
                if effective > 0.0 {
                    // Fee is paid on top, it does not reduce principal
                    let fee = effective * params.prepayment_fee_percentage / 100.0;
                    result.total_paid += effective + fee;
                    result.total_prepaid += effective;
                    result.total_prepayment_fees += fee;
                    result.prepayments_made += 1;

                    record.prepayment = effective;
                    record.balance = state.balance;
                }
            }

            result.months_until_payoff = step.month;
            if self.config.detailed_output {
                result.add_record(record);
            }
        }

        result.total_interest = state.total_interest;
        result.years_until_payoff = result.months_until_payoff as f64 / 12.0;

        result.baseline = self.baseline(params.principal, installment.amount, monthly_rate, total_months);
        result.time_saved_months = result.baseline.months.saturating_sub(result.months_until_payoff);
        result.time_saved_years = result.time_saved_months as f64 / 12.0;
        result.interest_saved = result.baseline.total_interest - result.total_interest;
        result.warnings = warnings;

        Ok(result)
    }

    /// Same recurrence without prepayments, at most `total_months` iterations
    fn baseline(&self, principal: f64, installment: f64, monthly_rate: f64, total_months: u32) -> BaselineTotals {
        let mut state = AmortizationState::new(principal);
        let mut total_paid = 0.0;

        while !state.is_paid_off() && state.month < total_months {
            let step = state.advance_scheduled(installment, monthly_rate, total_months);
            total_paid += step.payment();
        }

        BaselineTotals {
            total_paid,
            total_interest: state.total_interest,
            months: state.month,
        }
    }
}

/// Run a fixed simulation with the default configuration
pub fn run_fixed_amortization(params: &LoanParameters) -> SimResult<SimulationResult> {
    FixedAmortizationEngine::default().simulate(params)
}
