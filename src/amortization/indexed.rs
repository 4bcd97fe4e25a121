//! Index-denominated loan: elapsed installments, past prepayment
//! reconciliation, future prepayment projection and the full schedule

use chrono::NaiveDate;
use log::{debug, warn};

use crate::calendar::{add_months, month_key, whole_months_between};
use crate::error::{SimResult, SimulationWarning};
use crate::index::{IndexValueEstimator, DEFAULT_MONTHLY_GROWTH_RATE};
use crate::loan::{FuturePrepaymentPlan, IndexedLoanParameters};
use super::installment::compute_installment;
use super::prepayments::{
    group_by_month, process_past_prepayments, LumpSumRule, PrepaymentQueue, ProcessedPrepayment, Redistribution,
};
use super::schedule::{FuturePrepaymentSummary, IndexedMonthlyRecord, IndexedSimulationResult, PastPrepaymentSummary};
use super::state::AmortizationState;

/// Index value at origination, used for the original loan amount
pub const DEFAULT_INITIAL_INDEX_VALUE: f64 = 97.5;

/// Configuration for indexed-loan simulations
#[derive(Debug, Clone)]
pub struct IndexedEngineConfig {
    /// Assumed monthly growth used to back-project historical index values
    pub monthly_index_growth_rate: f64,

    /// Index value at origination
    pub initial_index_value: f64,

    /// Rule for spreading a single aggregated past prepayment
    pub lump_sum: LumpSumRule,

    /// Whether to keep the month-by-month schedule in the result
    pub detailed_output: bool,
}

impl Default for IndexedEngineConfig {
    fn default() -> Self {
        Self {
            monthly_index_growth_rate: DEFAULT_MONTHLY_GROWTH_RATE,
            initial_index_value: DEFAULT_INITIAL_INDEX_VALUE,
            lump_sum: LumpSumRule::default(),
            detailed_output: true,
        }
    }
}

/// Outcome of one pass over the loan term
#[derive(Debug, Clone, Copy)]
struct TermRun {
    months: u32,
    total_interest: f64,
}

/// Balance reached at the valuation date
#[derive(Debug, Clone, Copy)]
struct ElapsedWalk {
    balance: f64,
    prepaid_units: f64,
}

/// Inputs shared by every pass of one simulation
struct LoanTerms {
    principal_units: f64,
    installment: f64,
    monthly_rate: f64,
    total_months: u32,
    start_date: NaiveDate,
}

impl LoanTerms {
    /// Due date of installment `month` (1-based)
    fn payment_date(&self, month: u32) -> NaiveDate {
        add_months(self.start_date, month.saturating_sub(1))
    }
}

/// Amortization engine for index-denominated loans
#[derive(Debug, Clone)]
pub struct IndexedAmortizationEngine {
    config: IndexedEngineConfig,
    estimator: IndexValueEstimator,
}

impl IndexedAmortizationEngine {
    pub fn new(config: IndexedEngineConfig) -> Self {
        let estimator = IndexValueEstimator::new(config.monthly_index_growth_rate);
        Self { config, estimator }
    }

    pub fn simulate(&self, params: &IndexedLoanParameters) -> SimResult<IndexedSimulationResult> {
        let mut warnings = params.validate()?;

        let total_months = params.total_months();
        let monthly_rate = params.monthly_rate();
        let current_value = params.current_index_value;
        let valuation_date = params.valuation_date;

        // Constant for the life of the loan: the unit absorbs inflation
        let installment = compute_installment(params.principal_units, monthly_rate, total_months)?;
        if installment.linear {
            warnings.push(SimulationWarning::LinearAmortization);
        }
        let terms = LoanTerms {
            principal_units: params.principal_units,
            installment: installment.amount,
            monthly_rate,
            total_months,
            start_date: params.start_date,
        };
        let installment_currency = installment.amount * current_value;

        let elapsed = whole_months_between(params.start_date, valuation_date).max(0);
        let paid_installments = u32::try_from(elapsed).unwrap_or(0).min(total_months);
        debug!(
            "Indexed simulation: units={} months={} installment={:.4} paid={}",
            params.principal_units, total_months, installment.amount, paid_installments
        );

        // Past prepayments in index units, possibly spread out
        let processed = process_past_prepayments(&params.past_prepayments, &self.estimator, current_value, valuation_date);
        let (prepayments, outcome) =
            self.config.lump_sum.apply(processed, installment_currency, paid_installments, params.start_date);
        match outcome {
            Redistribution::Spread(count) => debug!("Spread single past prepayment over {} entries", count),
            Redistribution::KeptWhole => warnings.push(SimulationWarning::LumpSumKeptWhole { paid_installments }),
            Redistribution::NotApplicable => {}
        }
        for warning in &warnings {
            warn!("Indexed simulation: {:?}", warning);
        }

        let walk = self.walk_elapsed(&terms, paid_installments, &prepayments);

        // Full-term comparison decides how much time past prepayments saved
        let without_past = self.run_term(&terms, None);
        let with_past = self.run_term(&terms, Some(PrepaymentQueue::new(&prepayments)));

        let remaining_months = with_past.months.saturating_sub(paid_installments);
        let total_remaining_payments = installment.amount * remaining_months as f64 * current_value;

        let future = self.project_future(
            &params.future_prepayments,
            &terms,
            walk.balance,
            remaining_months,
            current_value,
            total_remaining_payments,
        );

        let schedule = if self.config.detailed_output {
            self.build_schedule(params, &terms, paid_installments, &prepayments)
        } else {
            Vec::new()
        };

        let initial_value = self.config.initial_index_value;
        Ok(IndexedSimulationResult {
            installment_units: installment.amount,
            installment_currency,
            remaining_balance_units: walk.balance,
            remaining_balance_currency: walk.balance * current_value,
            paid_installments,
            total_installments: total_months,
            original_loan_amount: params.principal_units * initial_value,
            initial_index_value: initial_value,
            current_index_value: current_value,
            index_variation_percentage: (current_value - initial_value) / initial_value * 100.0,
            remaining_months,
            total_remaining_payments,
            past: PastPrepaymentSummary {
                total_currency: params.past_prepayments.iter().map(|p| p.amount).sum(),
                total_units: walk.prepaid_units,
                time_already_saved_months: without_past.months.saturating_sub(with_past.months),
                interest_already_saved: (without_past.total_interest - with_past.total_interest) * current_value,
                prepayments,
            },
            future,
            schedule,
            warnings,
        })
    }

    /// Installments already paid, consuming at most one due past prepayment per month
    fn walk_elapsed(&self, terms: &LoanTerms, paid_installments: u32, prepayments: &[ProcessedPrepayment]) -> ElapsedWalk {
        let mut state = AmortizationState::new(terms.principal_units);
        let mut queue = PrepaymentQueue::new(prepayments);
        let mut prepaid_units = 0.0;

        for month in 1..=paid_installments {
            state.advance_scheduled(terms.installment, terms.monthly_rate, terms.total_months);
            if let Some(prepayment) = queue.take_due(terms.payment_date(month)) {
                state.apply_prepayment(prepayment.units);
                prepaid_units += prepayment.units;
            }
        }

        ElapsedWalk {
            balance: state.balance,
            prepaid_units,
        }
    }

    /// Whole term from origination, stopping once repaid
    fn run_term(&self, terms: &LoanTerms, mut prepayments: Option<PrepaymentQueue>) -> TermRun {
        let mut state = AmortizationState::new(terms.principal_units);

        while !state.is_paid_off() && state.month < terms.total_months {
            let step = state.advance_scheduled(terms.installment, terms.monthly_rate, terms.total_months);
            if let Some(queue) = prepayments.as_mut() {
                if let Some(prepayment) = queue.take_due(terms.payment_date(step.month)) {
                    state.apply_prepayment(prepayment.units);
                }
            }
        }

        TermRun {
            months: state.month,
            total_interest: state.total_interest,
        }
    }

    /// Remaining term with and without the recurring future prepayment
    fn project_future(
        &self,
        plan: &FuturePrepaymentPlan,
        terms: &LoanTerms,
        opening_balance: f64,
        remaining_months: u32,
        current_value: f64,
        total_remaining_payments: f64,
    ) -> FuturePrepaymentSummary {
        let mut summary = FuturePrepaymentSummary {
            enabled: plan.enabled,
            amount: plan.amount,
            frequency_months: plan.frequency_months,
            fee_percentage: plan.fee_percentage,
            total_fees: 0.0,
            remaining_months_with_prepayments: remaining_months,
            time_saved_months: 0,
            total_remaining_with_prepayments: total_remaining_payments,
            interest_saved: 0.0,
        };
        if !plan.is_active() {
            return summary;
        }

        let mut without = AmortizationState::new(opening_balance);
        while !without.is_paid_off() && without.month < remaining_months {
            without.advance_month(terms.installment, terms.monthly_rate);
        }

        let prepayment_units = plan.amount / current_value;
        let mut with = AmortizationState::new(opening_balance);
        let mut nominal_prepaid = 0.0;
        while !with.is_paid_off() && with.month < remaining_months {
            let step = with.advance_month(terms.installment, terms.monthly_rate);
            if step.month % plan.frequency_months == 0 {
                let effective = with.apply_prepayment(prepayment_units);
                if effective > 0.0 {
                    // Fee is charged on the nominal amount, even when clamped
                    summary.total_fees += plan.amount * plan.fee_percentage / 100.0;
                    nominal_prepaid += plan.amount;
                }
            }
        }

        summary.remaining_months_with_prepayments = with.month;
        summary.time_saved_months = remaining_months.saturating_sub(with.month);
        summary.total_remaining_with_prepayments =
            terms.installment * with.month as f64 * current_value + nominal_prepaid + summary.total_fees;
        summary.interest_saved = (without.total_interest - with.total_interest) * current_value;
        summary
    }

    /// Month-by-month schedule over the whole term, on its own running balance
    fn build_schedule(
        &self,
        params: &IndexedLoanParameters,
        terms: &LoanTerms,
        paid_installments: u32,
        prepayments: &[ProcessedPrepayment],
    ) -> Vec<IndexedMonthlyRecord> {
        let past_by_month = group_by_month(prepayments, month_key(terms.start_date));
        let plan = &params.future_prepayments;
        let current_value = params.current_index_value;

        let mut state = AmortizationState::new(terms.principal_units);
        let mut schedule = Vec::with_capacity(terms.total_months as usize);

        while !state.is_paid_off() && state.month < terms.total_months {
            let step = state.advance_scheduled(terms.installment, terms.monthly_rate, terms.total_months);
            let date = terms.payment_date(step.month);
            let is_paid = step.month <= paid_installments;
            let mut prepayment = 0.0;

            if let Some(past) = past_by_month.get(&month_key(date)) {
                prepayment += past.amount;
                state.apply_prepayment(past.units);
            }

            if !is_paid && plan.is_active() {
                let months_since_now = step.month - paid_installments;
                if months_since_now % plan.frequency_months == 0 {
                    prepayment += plan.amount;
                    state.apply_prepayment(plan.amount / current_value);
                }
            }

            // Projected months are priced at today's value, not a forecast
            let index_value = if is_paid {
                self.estimator.estimate_value_at(date, current_value, params.valuation_date)
            } else {
                current_value
            };

            schedule.push(IndexedMonthlyRecord {
                month: step.month,
                date,
                installment_units: step.payment(),
                installment_currency: step.payment() * index_value,
                principal_units: step.principal,
                interest_units: step.interest,
                prepayment,
                balance_units: state.balance,
                is_paid,
            });
        }

        schedule
    }
}

impl Default for IndexedAmortizationEngine {
    fn default() -> Self {
        Self::new(IndexedEngineConfig::default())
    }
}

/// Run an indexed simulation with the default configuration
pub fn run_indexed_amortization(params: &IndexedLoanParameters) -> SimResult<IndexedSimulationResult> {
    IndexedAmortizationEngine::default().simulate(params)
}
