use crate::model::StoreChange;

// ── Layout engine ───────────────────────────────────────────────

/// Counter: layout computations, including empty ranges.
pub const LAYOUT_RUNS_TOTAL: &str = "calgrid_layout_runs_total";

/// Histogram: layout computation time in seconds.
pub const LAYOUT_DURATION_SECONDS: &str = "calgrid_layout_duration_seconds";

/// Histogram: widest row (lanes) per layout.
pub const LAYOUT_LANES: &str = "calgrid_layout_lanes";

// ── Store ───────────────────────────────────────────────────────

/// Counter: successful store mutations. Labels: kind.
pub const STORE_MUTATIONS_TOTAL: &str = "calgrid_store_mutations_total";

/// Counter: rejected store mutations. Labels: reason.
pub const STORE_REJECTIONS_TOTAL: &str = "calgrid_store_rejections_total";

/// Gauge: events held by the store.
pub const STORE_EVENTS: &str = "calgrid_store_events";

/// Map a change to a short label for metrics.
pub fn change_label(change: &StoreChange) -> &'static str {
    match change {
        StoreChange::CalendarCreated { .. } => "create_calendar",
        StoreChange::CalendarUpdated { .. } => "update_calendar",
        StoreChange::CalendarDeleted { .. } => "delete_calendar",
        StoreChange::EventCreated { .. } => "create_event",
        StoreChange::EventUpdated { .. } => "update_event",
        StoreChange::EventMoved { .. } => "move_event",
        StoreChange::EventDeleted { .. } => "delete_event",
    }
}
