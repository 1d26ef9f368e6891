use chrono::{Days, NaiveDate};

use crate::model::{is_weekend, Event, ResolvedSpan};

/// Last day covered by `event`.
pub fn resolve_end(event: &Event) -> NaiveDate {
    let length = event.effective_length();
    if event.skip_weekends {
        business_days_end(event.start_date, length)
    } else {
        add_days(event.start_date, length - 1)
    }
}

pub fn resolve(event: &Event) -> ResolvedSpan<'_> {
    ResolvedSpan {
        event,
        end: resolve_end(event),
    }
}

/// Day on which the `length`-th business day starting at `start` falls.
///
/// A weekend `start` does not consume any of `length`, so a one-day event
/// dropped on a Saturday ends on the following Monday.
pub fn business_days_end(start: NaiveDate, length: i64) -> NaiveDate {
    let mut remaining = length.max(1) - if is_weekend(start) { 0 } else { 1 };
    let mut current = start;

    // Any 7 consecutive days hold exactly 5 business days. Keep at least one
    // unit for the walk so the final step lands on a business day.
    if remaining > 5 {
        let weeks = (remaining - 1) / 5;
        current = add_days(current, weeks.saturating_mul(7));
        remaining -= weeks * 5;
    }

    while remaining > 0 {
        let Some(next) = current.succ_opt() else { break };
        current = next;
        if !is_weekend(current) {
            remaining -= 1;
        }
    }
    current
}

/// `day + n` days, saturating at the last representable date.
pub(crate) fn add_days(day: NaiveDate, n: i64) -> NaiveDate {
    day.checked_add_days(Days::new(n.max(0) as u64))
        .unwrap_or(NaiveDate::MAX)
}

/// `day - n` days, saturating at the first representable date.
pub(crate) fn sub_days(day: NaiveDate, n: i64) -> NaiveDate {
    day.checked_sub_days(Days::new(n.max(0) as u64))
        .unwrap_or(NaiveDate::MIN)
}
