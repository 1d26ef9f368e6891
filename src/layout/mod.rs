mod lanes;
mod order;
mod range;
mod span;
mod window;

pub use lanes::{assign_lanes, LaneAssignment};
pub use order::order_events;
pub use range::expand_range;
pub use span::{business_days_end, resolve, resolve_end};
pub use window::visible_window;

use std::time::Instant;

use crate::limits::MAX_LAYOUT_WINDOW_DAYS;
use crate::model::*;
use crate::observability::{LAYOUT_DURATION_SECONDS, LAYOUT_LANES, LAYOUT_RUNS_TOTAL};

/// Lay `events` out over every day of `range`.
///
/// Pure and deterministic: the same events (in any input order) and range
/// always produce the same layout. An inverted range produces an empty layout.
/// Events entirely outside the range get no slots and no placement.
///
/// Cost is O(days × events). Ranges wider than `MAX_LAYOUT_WINDOW_DAYS` are
/// truncated at the end; `Layout::range` reports the range actually laid out.
pub fn compute_layout(events: &[Event], range: DateRange) -> Layout {
    let started = Instant::now();
    metrics::counter!(LAYOUT_RUNS_TOTAL).increment(1);
    let range = clamp_window(range);

    let days = expand_range(&range);
    if days.is_empty() {
        tracing::debug!("layout {}..{}: empty range", range.start, range.end);
        return Layout::empty(range);
    }

    let spans: Vec<ResolvedSpan<'_>> = order_events(events)
        .into_iter()
        .map(resolve)
        .filter(|s| s.range().overlaps(&range))
        .collect();

    let LaneAssignment { buckets, lanes } = assign_lanes(&days, &spans);

    let placements = spans
        .iter()
        .filter_map(|s| {
            let lane = *lanes.get(&s.event.id)?;
            Some((
                s.event.id,
                Placement {
                    event_id: s.event.id,
                    calendar_id: s.event.calendar_id,
                    start: s.event.start_date,
                    end: s.end,
                    lane,
                    color: s.event.color.clone(),
                    title: s.event.title.clone(),
                },
            ))
        })
        .collect();

    let layout = Layout {
        range,
        days: buckets,
        placements,
    };

    let lanes_used = layout.max_lanes();
    metrics::histogram!(LAYOUT_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
    metrics::histogram!(LAYOUT_LANES).record(lanes_used as f64);
    tracing::debug!(
        "layout {}..{}: {} days, {} events placed, {} lanes",
        range.start,
        range.end,
        layout.days.len(),
        layout.placements.len(),
        lanes_used
    );
    layout
}

fn clamp_window(range: DateRange) -> DateRange {
    if range.len_days() <= MAX_LAYOUT_WINDOW_DAYS {
        return range;
    }
    let end = span::add_days(range.start, MAX_LAYOUT_WINDOW_DAYS - 1);
    tracing::warn!(
        "layout {}..{}: window wider than {} days, truncated to {}",
        range.start,
        range.end,
        MAX_LAYOUT_WINDOW_DAYS,
        end
    );
    DateRange::new(range.start, end)
}
