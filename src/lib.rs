//! Mortgage Simulator - amortization engine for fixed and inflation-indexed loans
//!
//! This library provides:
//! - Constant-installment schedules with periodic prepayments and fees
//! - Index-denominated loans with elapsed installments and past prepayment reconciliation
//! - Projection of recurring future prepayments and their savings
//! - Batch and strategy-comparison runs
//!
//! Every simulation is a pure function of its parameters: "today" and the
//! current index value are inputs, never read from the environment.

pub mod error;
pub mod calendar;
pub mod index;
pub mod loan;
pub mod amortization;
pub mod scenario;

// Re-export commonly used types
pub use error::{SimulationError, SimulationWarning, SimResult};
pub use index::IndexValueEstimator;
pub use loan::{LoanParameters, IndexedLoanParameters, PastPrepayment, FuturePrepaymentPlan};
pub use amortization::{
    run_fixed_amortization, run_indexed_amortization, SimulationResult, IndexedSimulationResult,
    FixedAmortizationEngine, IndexedAmortizationEngine,
};
pub use scenario::ScenarioRunner;
