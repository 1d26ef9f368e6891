use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Fallback color for calendars created without one.
pub const DEFAULT_CALENDAR_COLOR: &str = "#cccccc";

/// Suggested calendar colors, in picker order.
pub const CALENDAR_COLORS: [&str; 10] = [
    "#4285F4", "#EA4335", "#FBBC05", "#34A853", "#8E24AA", "#F6BF26", "#0B8043", "#D50000",
    "#3F51B5", "#039BE5",
];

/// Saturday and Sunday.
pub fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Closed interval `[start, end]` of calendar days. Empty when `end < start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Number of days in the range, inclusive of both ends.
    pub fn len_days(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start).num_days() + 1
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        !self.is_empty() && !other.is_empty() && self.start <= other.end && other.start <= self.end
    }
}

/// A calendar event as the layout engine sees it: calendar settings already joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Ulid,
    pub calendar_id: Ulid,
    pub start_date: NaiveDate,
    /// Requested length in days. Values below 1 are treated as 1.
    pub length_days: i64,
    #[serde(default)]
    pub skip_weekends: bool,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub title: String,
}

impl Event {
    pub fn effective_length(&self) -> i64 {
        self.length_days.max(1)
    }
}

/// An event paired with its computed last day. Derived per layout run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSpan<'a> {
    pub event: &'a Event,
    pub end: NaiveDate,
}

impl ResolvedSpan<'_> {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.event.start_date, self.end)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.event.start_date <= day && day <= self.end
    }
}

/// One lane position within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Slot {
    /// Padding that keeps a later lane aligned with an earlier multi-day event.
    Empty,
    Occupied {
        event_id: Ulid,
        span_start: bool,
        span_end: bool,
        span_middle: bool,
    },
}

impl Slot {
    pub fn event_id(&self) -> Option<Ulid> {
        match self {
            Slot::Occupied { event_id, .. } => Some(*event_id),
            Slot::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }
}

/// Ordered lane slots for one calendar day. Index = lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub weekend: bool,
    pub slots: Vec<Slot>,
}

impl DayBucket {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            weekend: is_weekend(date),
            slots: Vec::new(),
        }
    }

    pub fn lane_of(&self, event_id: Ulid) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.event_id() == Some(event_id))
    }

    /// `(lane, event_id)` for every occupied slot, in lane order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, Ulid)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(lane, s)| s.event_id().map(|id| (lane, id)))
    }

    pub fn lane_count(&self) -> usize {
        self.slots.len()
    }
}

/// Where one event landed in a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub event_id: Ulid,
    pub calendar_id: Ulid,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub lane: usize,
    pub color: Option<String>,
    pub title: String,
}

/// Output of one layout run: a bucket for every day of `range`, plus per-event placements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub range: DateRange,
    pub days: BTreeMap<NaiveDate, DayBucket>,
    pub placements: BTreeMap<Ulid, Placement>,
}

impl Layout {
    pub fn empty(range: DateRange) -> Self {
        Self {
            range,
            days: BTreeMap::new(),
            placements: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayBucket> {
        self.days.get(&date)
    }

    pub fn lane_of(&self, event_id: Ulid, date: NaiveDate) -> Option<usize> {
        self.days.get(&date).and_then(|b| b.lane_of(event_id))
    }

    /// Widest row across all days.
    pub fn max_lanes(&self) -> usize {
        self.days.values().map(DayBucket::lane_count).max().unwrap_or(0)
    }

    /// Visible days grouped by `(year, month)`, for month-grid renderers.
    pub fn months(&self) -> BTreeMap<(i32, u32), Vec<NaiveDate>> {
        let mut months: BTreeMap<(i32, u32), Vec<NaiveDate>> = BTreeMap::new();
        for date in self.days.keys() {
            months
                .entry((date.year(), date.month()))
                .or_default()
                .push(*date);
        }
        months
    }
}

// ── Store records ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: Ulid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub skip_weekends: bool,
}

fn default_color() -> String {
    DEFAULT_CALENDAR_COLOR.to_string()
}

/// Mutable calendar fields, as accepted by create/update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSettings {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub skip_weekends: bool,
}

/// An event as stored. `skip_weekends: None` inherits the calendar's setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: Ulid,
    pub calendar_id: Ulid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    pub length_days: i64,
    #[serde(default)]
    pub skip_weekends: Option<bool>,
}

impl EventRecord {
    /// Join calendar-level settings onto this record.
    pub fn to_event(&self, calendar: &Calendar) -> Event {
        Event {
            id: self.id,
            calendar_id: self.calendar_id,
            start_date: self.start_date,
            length_days: self.length_days,
            skip_weekends: self.skip_weekends.unwrap_or(calendar.skip_weekends),
            color: Some(calendar.color.clone()),
            title: self.title.clone(),
        }
    }
}

/// Notifications sent to subscribers after a successful store mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreChange {
    CalendarCreated {
        id: Ulid,
    },
    CalendarUpdated {
        id: Ulid,
    },
    CalendarDeleted {
        id: Ulid,
    },
    EventCreated {
        id: Ulid,
        calendar_id: Ulid,
    },
    EventUpdated {
        id: Ulid,
        calendar_id: Ulid,
    },
    EventMoved {
        id: Ulid,
        calendar_id: Ulid,
        from: NaiveDate,
        to: NaiveDate,
    },
    EventDeleted {
        id: Ulid,
        calendar_id: Ulid,
    },
}

impl StoreChange {
    /// Calendar whose subscribers receive this change.
    pub fn calendar_id(&self) -> Ulid {
        match self {
            StoreChange::CalendarCreated { id }
            | StoreChange::CalendarUpdated { id }
            | StoreChange::CalendarDeleted { id } => *id,
            StoreChange::EventCreated { calendar_id, .. }
            | StoreChange::EventUpdated { calendar_id, .. }
            | StoreChange::EventMoved { calendar_id, .. }
            | StoreChange::EventDeleted { calendar_id, .. } => *calendar_id,
        }
    }
}

/// JSON document of calendars and events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub calendars: Vec<Calendar>,
    #[serde(default)]
    pub events: Vec<EventRecord>,
}
