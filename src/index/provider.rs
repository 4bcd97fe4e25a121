//! Collaborators supplying "today" and the current index value
//!
//! The engines never read these themselves; a host resolves them once and
//! passes plain values into the simulation parameters.

use chrono::{Local, NaiveDate};

/// Index value used when the live figure cannot be obtained
pub const FALLBACK_INDEX_VALUE: f64 = 420.75;

/// Source of the current calendar date
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date (replays and tests)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Source of the current currency-per-unit index value
pub trait IndexValueSource {
    /// Latest known value, `None` when unavailable
    fn current_value(&self) -> Option<f64>;

    /// Latest value, or the documented fallback
    fn current_value_or_fallback(&self) -> f64 {
        match self.current_value() {
            Some(value) if value.is_finite() && value > 0.0 => value,
            other => {
                log::warn!(
                    "Index value unavailable ({:?}), using fallback {}",
                    other,
                    FALLBACK_INDEX_VALUE
                );
                FALLBACK_INDEX_VALUE
            }
        }
    }
}

/// Value supplied up front, e.g. from a command-line flag
#[derive(Debug, Clone, Copy)]
pub struct FixedIndexValue(pub Option<f64>);

impl IndexValueSource for FixedIndexValue {
    fn current_value(&self) -> Option<f64> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        assert_eq!(FixedClock(date).today(), date);
    }

    #[test]
    fn test_fallback_when_missing_or_invalid() {
        assert_eq!(FixedIndexValue(None).current_value_or_fallback(), FALLBACK_INDEX_VALUE);
        assert_eq!(FixedIndexValue(Some(0.0)).current_value_or_fallback(), FALLBACK_INDEX_VALUE);
        assert_eq!(FixedIndexValue(Some(1500.25)).current_value_or_fallback(), 1500.25);
    }
}
