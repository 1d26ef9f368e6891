pub const MAX_CALENDARS: usize = 1_000;
pub const MAX_EVENTS_PER_CALENDAR: usize = 100_000;
pub const MAX_NAME_LEN: usize = 256;
pub const MAX_DESCRIPTION_LEN: usize = 4_096;

/// Longest event accepted by the store, in (calendar or business) days.
pub const MAX_EVENT_LENGTH_DAYS: i64 = 3_660;

/// Widest layout window the store will compute, in days.
pub const MAX_LAYOUT_WINDOW_DAYS: i64 = 3_660;

/// Days added before the earliest and after the latest event for the default window.
pub const DEFAULT_PADDING_DAYS: i64 = 7;
