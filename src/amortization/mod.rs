//! Amortization engines for fixed-currency and index-denominated loans

mod state;
mod installment;
mod schedule;
pub mod prepayments;
mod fixed;
mod indexed;

pub use state::{AmortizationState, MonthStep};
pub use installment::{compute_installment, Installment};
pub use schedule::{
    MonthlyRecord, BaselineTotals, SimulationResult, IndexedMonthlyRecord, IndexedSimulationResult,
    PastPrepaymentSummary, FuturePrepaymentSummary,
};
pub use prepayments::{ProcessedPrepayment, LumpSumRule};
pub use fixed::{FixedAmortizationEngine, FixedEngineConfig, run_fixed_amortization};
pub use indexed::{IndexedAmortizationEngine, IndexedEngineConfig, run_indexed_amortization, DEFAULT_INITIAL_INDEX_VALUE};
