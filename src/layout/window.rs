use chrono::NaiveDate;

use crate::model::{DateRange, Event};

use super::span::{add_days, resolve_end, sub_days};

/// Default visible range: earliest start to latest resolved end, widened by
/// `padding_days` on both sides. With no events, `today` ± `padding_days`.
pub fn visible_window(events: &[Event], today: NaiveDate, padding_days: i64) -> DateRange {
    let bounds = events.iter().fold(None, |acc: Option<(NaiveDate, NaiveDate)>, e| {
        let end = resolve_end(e);
        Some(match acc {
            Some((lo, hi)) => (lo.min(e.start_date), hi.max(end)),
            None => (e.start_date, end),
        })
    });
    let (lo, hi) = bounds.unwrap_or((today, today));
    DateRange::new(sub_days(lo, padding_days), add_days(hi, padding_days))
}
