//! Scenario runner for batch simulations
//!
//! Holds configured engines once and runs many independent simulations in
//! parallel. Every run owns its parameters and result; nothing is shared
//! between runs except the read-only engines.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::amortization::{
    FixedAmortizationEngine, FixedEngineConfig, IndexedAmortizationEngine, IndexedEngineConfig,
    IndexedSimulationResult, SimulationResult,
};
use crate::error::SimResult;
use crate::loan::{IndexedLoanParameters, LoanParameters};

/// A periodic prepayment scheme to try against a base loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrepaymentPlan {
    pub amount: f64,
    pub frequency_months: u32,
    pub fee_percentage: f64,
}

/// Outcome of one plan compared to the no-prepayment baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanComparison {
    pub plan: PrepaymentPlan,
    pub months_until_payoff: u32,
    pub time_saved_months: u32,
    pub interest_saved: f64,
    pub total_prepayment_fees: f64,
    /// Interest saved minus fees paid
    pub net_saving: f64,
}

/// Pre-configured runner for batch simulations
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let plans = [PrepaymentPlan { amount: 5_000.0, frequency_months: 12, fee_percentage: 1.0 }];
/// let comparisons = runner.compare_prepayment_plans(&loan, &plans)?;
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    fixed: FixedAmortizationEngine,
    indexed: IndexedAmortizationEngine,
}

impl ScenarioRunner {
    /// Create runner with default engine configurations
    pub fn new() -> Self {
        Self::with_configs(FixedEngineConfig::default(), IndexedEngineConfig::default())
    }

    pub fn with_configs(fixed: FixedEngineConfig, indexed: IndexedEngineConfig) -> Self {
        Self {
            fixed: FixedAmortizationEngine::new(fixed),
            indexed: IndexedAmortizationEngine::new(indexed),
        }
    }

    pub fn run_fixed(&self, params: &LoanParameters) -> SimResult<SimulationResult> {
        self.fixed.simulate(params)
    }

    pub fn run_indexed(&self, params: &IndexedLoanParameters) -> SimResult<IndexedSimulationResult> {
        self.indexed.simulate(params)
    }

    /// Run many fixed loans; results keep the input order
    pub fn run_fixed_batch(&self, loans: &[LoanParameters]) -> Vec<SimResult<SimulationResult>> {
        loans.par_iter().map(|params| self.fixed.simulate(params)).collect()
    }

    /// Run many indexed loans; results keep the input order
    pub fn run_indexed_batch(&self, loans: &[IndexedLoanParameters]) -> Vec<SimResult<IndexedSimulationResult>> {
        loans.par_iter().map(|params| self.indexed.simulate(params)).collect()
    }

    /// Try each plan against `base`, replacing any prepayment scheme it carries
    ///
    /// Comparisons only report totals, so they always run summary-only
    /// regardless of the configured `detailed_output`.
    pub fn compare_prepayment_plans(
        &self,
        base: &LoanParameters,
        plans: &[PrepaymentPlan],
    ) -> SimResult<Vec<PlanComparison>> {
        let engine = FixedAmortizationEngine::new(FixedEngineConfig { detailed_output: false });

        plans
            .par_iter()
            .map(|plan| {
                let params = base
                    .clone()
                    .with_prepayments(plan.amount, plan.frequency_months, plan.fee_percentage);
                let result = engine.simulate(&params)?;
                Ok(PlanComparison {
                    plan: *plan,
                    months_until_payoff: result.months_until_payoff,
                    time_saved_months: result.time_saved_months,
                    interest_saved: result.interest_saved,
                    total_prepayment_fees: result.total_prepayment_fees,
                    net_saving: result.interest_saved - result.total_prepayment_fees,
                })
            })
            .collect()
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
