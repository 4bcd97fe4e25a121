//! Loan parameter structures and their validation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{require_non_negative, require_positive, SimResult, SimulationError, SimulationWarning};

/// Monthly rate from an annual percentage (12 -> 0.01)
pub fn monthly_rate(annual_interest_rate: f64) -> f64 {
    annual_interest_rate / 100.0 / 12.0
}

/// Longest accepted loan term
pub const MAX_TERM_YEARS: u32 = 100;

fn require_term(term_years: u32) -> SimResult<()> {
    if term_years == 0 {
        return Err(SimulationError::invalid("term_years", "must be at least one year"));
    }
    if term_years > MAX_TERM_YEARS {
        return Err(SimulationError::invalid(
            "term_years",
            format!("must not exceed {} years", MAX_TERM_YEARS),
        ));
    }
    Ok(())
}

/// Validate a periodic prepayment triple, returning a warning when the
/// amount is set but the frequency disables it
fn check_prepayment_scheme(
    prefix: &str,
    amount: f64,
    frequency_months: u32,
    fee_percentage: f64,
) -> SimResult<Option<SimulationWarning>> {
    require_non_negative(&format!("{}amount", prefix), amount)?;
    require_non_negative(&format!("{}fee_percentage", prefix), fee_percentage)?;

    if amount > 0.0 && frequency_months == 0 {
        return Ok(Some(SimulationWarning::PrepaymentsDisabled {
            reason: format!("{}amount {} has no frequency", prefix, amount),
        }));
    }
    Ok(None)
}

/// Currency-denominated loan with an optional periodic prepayment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Amount borrowed (currency)
    pub principal: f64,

    /// Annual interest rate in percent (12.0 = 12%)
    pub annual_interest_rate: f64,

    /// Loan term in whole years
    pub term_years: u32,

    /// Extra payment applied every `prepayment_frequency_months` (0 = none)
    #[serde(default)]
    pub prepayment_amount: f64,

    /// Months between prepayments (0 = none)
    #[serde(default)]
    pub prepayment_frequency_months: u32,

    /// Fee charged on each prepayment, percent of the amount applied
    #[serde(default)]
    pub prepayment_fee_percentage: f64,
}

impl LoanParameters {
    pub fn new(principal: f64, annual_interest_rate: f64, term_years: u32) -> Self {
        Self {
            principal,
            annual_interest_rate,
            term_years,
            prepayment_amount: 0.0,
            prepayment_frequency_months: 0,
            prepayment_fee_percentage: 0.0,
        }
    }

    pub fn with_prepayments(mut self, amount: f64, frequency_months: u32, fee_percentage: f64) -> Self {
        self.prepayment_amount = amount;
        self.prepayment_frequency_months = frequency_months;
        self.prepayment_fee_percentage = fee_percentage;
        self
    }

    pub fn total_months(&self) -> u32 {
        self.term_years.saturating_mul(12)
    }

    pub fn monthly_rate(&self) -> f64 {
        monthly_rate(self.annual_interest_rate)
    }

    pub fn prepayments_enabled(&self) -> bool {
        self.prepayment_amount > 0.0 && self.prepayment_frequency_months > 0
    }

    /// Check all fields; non-fatal findings are returned as warnings
    pub fn validate(&self) -> SimResult<Vec<SimulationWarning>> {
        require_positive("principal", self.principal)?;
        require_non_negative("annual_interest_rate", self.annual_interest_rate)?;
        require_term(self.term_years)?;

        let warnings = check_prepayment_scheme(
            "prepayment_",
            self.prepayment_amount,
            self.prepayment_frequency_months,
            self.prepayment_fee_percentage,
        )?;
        Ok(warnings.into_iter().collect())
    }
}

/// Extra payment already made, recorded in currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PastPrepayment {
    pub date: NaiveDate,
    pub amount: f64,
}

/// How a "total prepaid so far" figure was entered
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PrepaidTotal {
    Currency(f64),
    IndexUnits(f64),
}

impl PastPrepayment {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self { date, amount }
    }

    /// Single aggregated entry dated at the valuation date
    ///
    /// Index-unit totals are converted at the current index value.
    pub fn total_to_date(total: PrepaidTotal, valuation_date: NaiveDate, current_index_value: f64) -> Self {
        let amount = match total {
            PrepaidTotal::Currency(amount) => amount,
            PrepaidTotal::IndexUnits(units) => units * current_index_value,
        };
        Self::new(valuation_date, amount)
    }
}

/// Recurring prepayment planned from the valuation date onward
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FuturePrepaymentPlan {
    pub enabled: bool,

    /// Currency amount, converted at the current index value
    pub amount: f64,

    pub frequency_months: u32,

    /// Fee charged on the nominal amount each time the prepayment triggers
    pub fee_percentage: f64,
}

impl FuturePrepaymentPlan {
    pub fn new(amount: f64, frequency_months: u32, fee_percentage: f64) -> Self {
        Self {
            enabled: true,
            amount,
            frequency_months,
            fee_percentage,
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    /// Enabled with a usable amount and frequency
    pub fn is_active(&self) -> bool {
        self.enabled && self.amount > 0.0 && self.frequency_months > 0
    }
}

/// Loan denominated in index units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedLoanParameters {
    /// Principal in index units
    pub principal_units: f64,

    /// Annual interest rate in percent, applied to the unit balance
    pub annual_interest_rate: f64,

    pub term_years: u32,

    /// Date the loan began; installment `m` falls `m - 1` months later
    pub start_date: NaiveDate,

    /// "Today" for the simulation, supplied by the caller's clock
    pub valuation_date: NaiveDate,

    /// Currency per index unit at `valuation_date`
    pub current_index_value: f64,

    #[serde(default)]
    pub past_prepayments: Vec<PastPrepayment>,

    #[serde(default)]
    pub future_prepayments: FuturePrepaymentPlan,
}

impl IndexedLoanParameters {
    pub fn new(
        principal_units: f64,
        annual_interest_rate: f64,
        term_years: u32,
        start_date: NaiveDate,
        valuation_date: NaiveDate,
        current_index_value: f64,
    ) -> Self {
        Self {
            principal_units,
            annual_interest_rate,
            term_years,
            start_date,
            valuation_date,
            current_index_value,
            past_prepayments: Vec::new(),
            future_prepayments: FuturePrepaymentPlan::disabled(),
        }
    }

    pub fn with_past_prepayments(mut self, prepayments: Vec<PastPrepayment>) -> Self {
        self.past_prepayments = prepayments;
        self
    }

    pub fn with_future_prepayments(mut self, plan: FuturePrepaymentPlan) -> Self {
        self.future_prepayments = plan;
        self
    }

    pub fn total_months(&self) -> u32 {
        self.term_years.saturating_mul(12)
    }

    pub fn monthly_rate(&self) -> f64 {
        monthly_rate(self.annual_interest_rate)
    }

    /// Check all fields; non-fatal findings are returned as warnings
    pub fn validate(&self) -> SimResult<Vec<SimulationWarning>> {
        require_positive("principal_units", self.principal_units)?;
        require_non_negative("annual_interest_rate", self.annual_interest_rate)?;
        require_term(self.term_years)?;
        require_positive("current_index_value", self.current_index_value)?;

        for (i, prepayment) in self.past_prepayments.iter().enumerate() {
            require_non_negative(&format!("past_prepayments[{}].amount", i), prepayment.amount)?;
        }

        let mut warnings = Vec::new();
        if self.future_prepayments.enabled {
            let plan = &self.future_prepayments;
            if let Some(warning) =
                check_prepayment_scheme("future_prepayment_", plan.amount, plan.frequency_months, plan.fee_percentage)?
            {
                warnings.push(warning);
            }
        }
        Ok(warnings)
    }
}
