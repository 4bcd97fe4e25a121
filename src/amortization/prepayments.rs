//! Past prepayment reconciliation
//!
//! Currency amounts are converted to index units at the estimated index
//! value of their date, sorted, optionally spread out (lump-sum rule) and
//! then consumed at most once each by a simulation pass.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{add_months, month_key, MonthKey};
use crate::index::IndexValueEstimator;
use crate::loan::PastPrepayment;

/// Past prepayment with its index-unit equivalent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedPrepayment {
    pub date: NaiveDate,
    /// Currency amount
    pub amount: f64,
    /// Index units the amount bought at its date
    pub units: f64,
}

/// Convert every entry to index units and sort chronologically
pub fn process_past_prepayments(
    past: &[PastPrepayment],
    estimator: &IndexValueEstimator,
    current_index_value: f64,
    valuation_date: NaiveDate,
) -> Vec<ProcessedPrepayment> {
    let mut processed: Vec<ProcessedPrepayment> = past
        .iter()
        .map(|p| {
            let value_at_date = estimator.estimate_value_at(p.date, current_index_value, valuation_date);
            ProcessedPrepayment {
                date: p.date,
                amount: p.amount,
                units: p.amount / value_at_date,
            }
        })
        .collect();

    processed.sort_by_key(|p| p.date);
    processed
}

/// When a single entry is read as an aggregate of several payments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LumpSumRule {
    /// Entry must exceed this many currency installments
    pub threshold_installments: f64,
    /// Upper bound on synthetic entries
    pub max_synthetic_entries: u32,
    /// One synthetic entry per this many elapsed installments
    pub installments_per_entry: u32,
}

impl Default for LumpSumRule {
    fn default() -> Self {
        Self {
            threshold_installments: 3.0,
            max_synthetic_entries: 4,
            installments_per_entry: 3,
        }
    }
}

/// Outcome of applying the lump-sum rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redistribution {
    /// Not a single oversized entry
    NotApplicable,
    /// Replaced by this many equal entries
    Spread(u32),
    /// Too few elapsed installments to spread it
    KeptWhole,
}

impl LumpSumRule {
    /// Spread a single oversized entry evenly over the elapsed window
    ///
    /// Synthetic entry `i` (0-based) of `n` is dated
    /// `start_date + floor(paid * (i + 1) / (n + 1))` months.
    pub fn apply(
        &self,
        prepayments: Vec<ProcessedPrepayment>,
        installment_currency: f64,
        paid_installments: u32,
        start_date: NaiveDate,
    ) -> (Vec<ProcessedPrepayment>, Redistribution) {
        let oversized = match prepayments.as_slice() {
            [single] => single.amount > self.threshold_installments * installment_currency,
            _ => false,
        };
        if !oversized {
            return (prepayments, Redistribution::NotApplicable);
        }

        let per_entry = self.installments_per_entry.max(1);
        let count = self.max_synthetic_entries.min(paid_installments / per_entry);
        if count == 0 {
            return (prepayments, Redistribution::KeptWhole);
        }

        let lump = &prepayments[0];
        let share_amount = lump.amount / count as f64;
        let share_units = lump.units / count as f64;

        let spread = (0..count)
            .map(|i| {
                let offset = paid_installments * (i + 1) / (count + 1);
                ProcessedPrepayment {
                    date: add_months(start_date, offset),
                    amount: share_amount,
                    units: share_units,
                }
            })
            .collect();

        (spread, Redistribution::Spread(count))
    }
}

/// Chronological prepayments with a consumption cursor
///
/// Each entry is handed out at most once. Entries are sorted, so the first
/// unconsumed entry is always the earliest candidate.
#[derive(Debug, Clone)]
pub struct PrepaymentQueue<'a> {
    entries: &'a [ProcessedPrepayment],
    cursor: usize,
}

impl<'a> PrepaymentQueue<'a> {
    pub fn new(entries: &'a [ProcessedPrepayment]) -> Self {
        Self { entries, cursor: 0 }
    }

    /// Take the earliest unconsumed entry dated in or before the month of `payment_date`
    pub fn take_due(&mut self, payment_date: NaiveDate) -> Option<&'a ProcessedPrepayment> {
        let next = self.entries.get(self.cursor)?;
        if month_key(next.date) <= month_key(payment_date) {
            self.cursor += 1;
            Some(next)
        } else {
            None
        }
    }

    #[cfg(test)]
    fn remaining(&self) -> usize {
        self.entries.len() - self.cursor
    }
}

/// Prepayments falling in one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonthlyPrepayment {
    pub amount: f64,
    pub units: f64,
}

/// Sum prepayments per calendar month
///
/// Entries dated before `first_month` are attributed to it.
pub fn group_by_month(entries: &[ProcessedPrepayment], first_month: MonthKey) -> BTreeMap<MonthKey, MonthlyPrepayment> {
    let mut grouped: BTreeMap<MonthKey, MonthlyPrepayment> = BTreeMap::new();
    for entry in entries {
        let key = month_key(entry.date).max(first_month);
        let slot = grouped.entry(key).or_default();
        slot.amount += entry.amount;
        slot.units += entry.units;
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(date: NaiveDate, amount: f64, units: f64) -> ProcessedPrepayment {
        ProcessedPrepayment { date, amount, units }
    }

    #[test]
    fn test_process_converts_and_sorts() {
        let estimator = IndexValueEstimator::new(0.01);
        let today = date(2025, 1, 10);
        let past = vec![
            PastPrepayment::new(date(2024, 12, 10), 1010.0),
            PastPrepayment::new(date(2024, 1, 10), 500.0),
        ];

        let processed = process_past_prepayments(&past, &estimator, 101.0, today);

        assert_eq!(processed[0].date, date(2024, 1, 10));
        assert_eq!(processed[1].date, date(2024, 12, 10));
        // One month back at 1%: value 100, so 1010 buys 10.1 units
        assert_relative_eq!(processed[1].units, 10.1, max_relative = 1e-12);
        assert_relative_eq!(processed[0].units, 500.0 / (101.0 / 1.01_f64.powi(12)), max_relative = 1e-12);
    }

    #[test]
    fn test_lump_sum_spread_over_elapsed_window() {
        let rule = LumpSumRule::default();
        let start = date(2024, 1, 15);
        let installment_currency = 1000.0;
        let lump = vec![entry(date(2024, 11, 15), 10.0 * installment_currency, 30.0)];

        let (spread, outcome) = rule.apply(lump, installment_currency, 10, start);

        assert_eq!(outcome, Redistribution::Spread(3));
        let dates: Vec<_> = spread.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date(2024, 3, 15), date(2024, 6, 15), date(2024, 8, 15)]);
        for p in &spread {
            assert_relative_eq!(p.amount, 10_000.0 / 3.0);
            assert_relative_eq!(p.units, 10.0);
        }
    }

    #[test]
    fn test_lump_sum_capped_at_four_entries() {
        let rule = LumpSumRule::default();
        let lump = vec![entry(date(2025, 1, 1), 50_000.0, 50.0)];
        let (spread, outcome) = rule.apply(lump, 1000.0, 60, date(2020, 1, 1));

        assert_eq!(outcome, Redistribution::Spread(4));
        assert_eq!(spread.len(), 4);
        // floor(60 * 1 / 5) = 12 months after start
        assert_eq!(spread[0].date, date(2021, 1, 1));
    }

    #[test]
    fn test_lump_sum_kept_whole_with_few_installments() {
        let rule = LumpSumRule::default();
        let lump = vec![entry(date(2025, 1, 1), 50_000.0, 50.0)];
        let (kept, outcome) = rule.apply(lump.clone(), 1000.0, 2, date(2024, 11, 1));

        assert_eq!(outcome, Redistribution::KeptWhole);
        assert_eq!(kept, lump);
    }

    #[test]
    fn test_lump_sum_rule_ignores_small_or_itemized_entries() {
        let rule = LumpSumRule::default();
        let small = vec![entry(date(2025, 1, 1), 3000.0, 3.0)];
        assert_eq!(rule.apply(small, 1000.0, 30, date(2022, 1, 1)).1, Redistribution::NotApplicable);

        let itemized = vec![
            entry(date(2024, 1, 1), 50_000.0, 50.0),
            entry(date(2024, 6, 1), 50_000.0, 50.0),
        ];
        assert_eq!(rule.apply(itemized, 1000.0, 30, date(2022, 1, 1)).1, Redistribution::NotApplicable);
    }

    #[test]
    fn test_queue_consumes_each_entry_once() {
        let entries = vec![
            entry(date(2024, 2, 20), 100.0, 1.0),
            entry(date(2024, 2, 25), 200.0, 2.0),
            entry(date(2024, 5, 1), 300.0, 3.0),
        ];
        let mut queue = PrepaymentQueue::new(&entries);

        // Same calendar month matches even when the day is later
        assert_eq!(queue.take_due(date(2024, 2, 1)).map(|p| p.amount), Some(100.0));
        assert_eq!(queue.take_due(date(2024, 3, 1)).map(|p| p.amount), Some(200.0));
        assert!(queue.take_due(date(2024, 4, 1)).is_none());
        assert_eq!(queue.take_due(date(2024, 6, 1)).map(|p| p.amount), Some(300.0));
        assert!(queue.take_due(date(2030, 1, 1)).is_none());
        assert_eq!(queue.remaining(), 0);
    }

    #[test]
    fn test_group_by_month_sums_shared_months() {
        let entries = vec![
            entry(date(2023, 12, 1), 50.0, 0.5),
            entry(date(2024, 2, 3), 100.0, 1.0),
            entry(date(2024, 2, 27), 200.0, 2.5),
        ];
        let grouped = group_by_month(&entries, (2024, 1));

        assert_eq!(grouped.len(), 2);
        assert_relative_eq!(grouped[&(2024, 1)].amount, 50.0);
        assert_relative_eq!(grouped[&(2024, 2)].amount, 300.0);
        assert_relative_eq!(grouped[&(2024, 2)].units, 3.5);
    }
}
