//! Loan definitions: parameters, prepayment records and history loading

mod params;
pub mod loader;

pub use params::{
    monthly_rate, LoanParameters, MAX_TERM_YEARS, IndexedLoanParameters, PastPrepayment, PrepaidTotal, FuturePrepaymentPlan,
};
pub use loader::{load_prepayments, load_prepayments_from_reader};
