//! Index unit valuation: historical estimates and current-value collaborators

mod estimator;
mod provider;

pub use estimator::{IndexValueEstimator, DEFAULT_MONTHLY_GROWTH_RATE};
pub use provider::{Clock, FixedClock, SystemClock, IndexValueSource, FixedIndexValue, FALLBACK_INDEX_VALUE};
