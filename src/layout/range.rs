use chrono::NaiveDate;

use crate::model::DateRange;

/// Every day of `range`, in order. An inverted range yields nothing.
pub fn expand_range(range: &DateRange) -> Vec<NaiveDate> {
    if range.is_empty() {
        return Vec::new();
    }
    let mut days = Vec::with_capacity(range.len_days() as usize);
    days.extend(range.start.iter_days().take_while(|d| *d <= range.end));
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn inclusive_both_ends() {
        let days = expand_range(&DateRange::new(d(2024, 3, 4), d(2024, 3, 6)));
        assert_eq!(days, vec![d(2024, 3, 4), d(2024, 3, 5), d(2024, 3, 6)]);
    }

    #[test]
    fn single_day() {
        let days = expand_range(&DateRange::new(d(2024, 3, 4), d(2024, 3, 4)));
        assert_eq!(days, vec![d(2024, 3, 4)]);
    }

    #[test]
    fn crosses_month_and_leap_day() {
        let days = expand_range(&DateRange::new(d(2024, 2, 28), d(2024, 3, 1)));
        assert_eq!(days, vec![d(2024, 2, 28), d(2024, 2, 29), d(2024, 3, 1)]);
    }

    #[test]
    fn inverted_is_empty() {
        assert!(expand_range(&DateRange::new(d(2024, 3, 6), d(2024, 3, 4))).is_empty());
    }

    #[test]
    fn ends_at_max_date() {
        let days = expand_range(&DateRange::new(NaiveDate::MAX, NaiveDate::MAX));
        assert_eq!(days, vec![NaiveDate::MAX]);
    }
}
