//! Calendar-month arithmetic on `NaiveDate`

use chrono::{Datelike, Months, NaiveDate};

/// Calendar (year, month) key used to match payments to schedule months
pub type MonthKey = (i32, u32);

pub fn month_key(date: NaiveDate) -> MonthKey {
    (date.year(), date.month())
}

/// Add whole months, clamping the day to the end of shorter months
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Number of whole calendar months from `from` to `to`
///
/// A month counts only once it is complete: Jan 15 to Feb 14 is 0 months,
/// Jan 15 to Feb 15 is 1. Negative when `to` precedes `from`.
pub fn whole_months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    if to < from {
        return -whole_months_between(to, from);
    }

    let mut months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    while months > 0 && add_months(from, months as u32) > to {
        months -= 1;
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_partial_month_not_counted() {
        assert_eq!(whole_months_between(date(2024, 1, 15), date(2024, 2, 14)), 0);
        assert_eq!(whole_months_between(date(2024, 1, 15), date(2024, 2, 15)), 1);
        assert_eq!(whole_months_between(date(2023, 11, 20), date(2024, 11, 19)), 11);
    }

    #[test]
    fn test_negative_when_reversed() {
        assert_eq!(whole_months_between(date(2024, 6, 1), date(2024, 1, 1)), -5);
        assert_eq!(whole_months_between(date(2024, 1, 1), date(2024, 1, 1)), 0);
    }

    #[test]
    fn test_end_of_month_clamping() {
        assert_eq!(add_months(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(whole_months_between(date(2024, 1, 31), date(2024, 2, 29)), 1);
    }

    #[test]
    fn test_month_key_ordering() {
        assert!(month_key(date(2023, 12, 31)) < month_key(date(2024, 1, 1)));
        assert_eq!(month_key(date(2024, 3, 1)), month_key(date(2024, 3, 31)));
    }
}
