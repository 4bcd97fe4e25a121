//! Back-projection of index values using a fixed monthly growth assumption

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::whole_months_between;

/// Assumed average monthly growth of the index (3.5% per month)
pub const DEFAULT_MONTHLY_GROWTH_RATE: f64 = 0.035;

/// Estimates the index value at an arbitrary date from today's value
///
/// There is no historical table: the value is assumed to compound at
/// `monthly_growth_rate`, so past dates are discounted and future dates
/// are grown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexValueEstimator {
    pub monthly_growth_rate: f64,
}

impl IndexValueEstimator {
    pub fn new(monthly_growth_rate: f64) -> Self {
        Self { monthly_growth_rate }
    }

    /// Estimated index value at `date`, given `current_value` at `reference_now`
    ///
    /// Caller guarantees `current_value > 0`.
    pub fn estimate_value_at(&self, date: NaiveDate, current_value: f64, reference_now: NaiveDate) -> f64 {
        let months_difference = whole_months_between(date, reference_now);
        current_value / (1.0 + self.monthly_growth_rate).powi(months_difference)
    }
}

impl Default for IndexValueEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_MONTHLY_GROWTH_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_month_returns_current_value() {
        let estimator = IndexValueEstimator::default();
        let now = date(2025, 3, 10);
        assert_relative_eq!(estimator.estimate_value_at(now, 1200.0, now), 1200.0);
        // Less than a whole month back still counts as zero months
        assert_relative_eq!(estimator.estimate_value_at(date(2025, 2, 20), 1200.0, now), 1200.0);
    }

    #[test]
    fn test_past_dates_are_discounted() {
        let estimator = IndexValueEstimator::default();
        let now = date(2025, 3, 10);
        let value = estimator.estimate_value_at(date(2024, 3, 10), 1200.0, now);
        assert_relative_eq!(value, 1200.0 / 1.035_f64.powi(12), max_relative = 1e-12);
        assert!(value < 1200.0);
    }

    #[test]
    fn test_future_dates_are_grown() {
        let estimator = IndexValueEstimator::new(0.01);
        let now = date(2025, 3, 10);
        let value = estimator.estimate_value_at(date(2025, 5, 10), 100.0, now);
        assert_relative_eq!(value, 100.0 * 1.01 * 1.01, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_growth_is_flat() {
        let estimator = IndexValueEstimator::new(0.0);
        let value = estimator.estimate_value_at(date(2015, 1, 1), 420.75, date(2025, 1, 1));
        assert_relative_eq!(value, 420.75);
    }
}
