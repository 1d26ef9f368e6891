use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use ulid::Ulid;

use crate::model::{DayBucket, ResolvedSpan, Slot};

#[derive(Debug, Default)]
pub struct LaneAssignment {
    pub buckets: BTreeMap<NaiveDate, DayBucket>,
    /// Lane fixed for each event on its first visible day.
    pub lanes: HashMap<Ulid, usize>,
}

/// Build one bucket per day, keeping every event in a single lane across its span.
///
/// `ordered` must already be in global processing order (see `order_events`).
/// Within a day, an event whose lane is fixed pads the row with `Empty` up to
/// that lane; an event seen for the first time takes the lowest free lane.
/// Rows never end with padding.
pub fn assign_lanes(days: &[NaiveDate], ordered: &[ResolvedSpan<'_>]) -> LaneAssignment {
    let mut lanes: HashMap<Ulid, usize> = HashMap::new();
    let mut buckets = BTreeMap::new();

    for &day in days {
        let mut slots: Vec<Slot> = Vec::new();

        for span in ordered.iter().filter(|s| s.contains(day)) {
            let id = span.event.id;
            let lane = match lanes.get(&id) {
                Some(&lane) => {
                    if slots.len() <= lane {
                        slots.resize(lane + 1, Slot::Empty);
                    }
                    lane
                }
                None => {
                    let lane = slots
                        .iter()
                        .position(Slot::is_empty)
                        .unwrap_or(slots.len());
                    if lane == slots.len() {
                        slots.push(Slot::Empty);
                    }
                    lanes.insert(id, lane);
                    lane
                }
            };
            debug_assert!(
                slots[lane].is_empty(),
                "lane {lane} on {day} already holds {:?}, cannot place {id}",
                slots[lane].event_id()
            );
            slots[lane] = occupied(span, day);
        }

        while slots.last().is_some_and(Slot::is_empty) {
            slots.pop();
        }
        let mut bucket = DayBucket::new(day);
        bucket.slots = slots;
        buckets.insert(day, bucket);
    }

    LaneAssignment { buckets, lanes }
}

fn occupied(span: &ResolvedSpan<'_>, day: NaiveDate) -> Slot {
    let span_start = day == span.event.start_date;
    let span_end = day == span.end;
    Slot::Occupied {
        event_id: span.event.id,
        span_start,
        span_end,
        span_middle: !span_start && !span_end,
    }
}
