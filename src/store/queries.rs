use std::collections::HashMap;

use chrono::NaiveDate;
use ulid::Ulid;

use crate::layout::{compute_layout, visible_window};
use crate::model::*;

use super::validate::validate_window;
use super::{EventStore, StoreError};

impl EventStore {
    pub fn get_calendar(&self, id: &Ulid) -> Option<Calendar> {
        self.calendars.get(id).map(|c| c.value().clone())
    }

    /// All calendars, ordered by id.
    pub fn calendars(&self) -> Vec<Calendar> {
        let mut out: Vec<Calendar> = self.calendars.iter().map(|c| c.value().clone()).collect();
        out.sort_by_key(|c| c.id);
        out
    }

    pub fn get_event(&self, id: &Ulid) -> Option<EventRecord> {
        self.events.get(id).map(|e| e.value().clone())
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Event records of one calendar, ordered by start date then id.
    pub fn events_for_calendar(&self, calendar_id: &Ulid) -> Result<Vec<EventRecord>, StoreError> {
        if !self.calendars.contains_key(calendar_id) {
            return Err(StoreError::NotFound(*calendar_id));
        }
        let ids = self
            .by_calendar
            .get(calendar_id)
            .map(|e| e.value().clone())
            .unwrap_or_default();
        let mut out: Vec<EventRecord> = ids.iter().filter_map(|id| self.get_event(id)).collect();
        out.sort_by_key(|r| (r.start_date, r.id));
        Ok(out)
    }

    /// Layout inputs: records joined with their calendar's settings.
    /// `calendar = None` means every calendar.
    pub fn joined_events(&self, calendar: Option<Ulid>) -> Result<Vec<Event>, StoreError> {
        if let Some(cid) = calendar
            && !self.calendars.contains_key(&cid)
        {
            return Err(StoreError::NotFound(cid));
        }
        // Copy calendar settings first so no calendar lock is held while
        // iterating events.
        let calendars: HashMap<Ulid, Calendar> = self
            .calendars
            .iter()
            .map(|c| (*c.key(), c.value().clone()))
            .collect();
        let mut out = Vec::with_capacity(self.events.len());
        for entry in self.events.iter() {
            let record = entry.value();
            if calendar.is_some_and(|cid| cid != record.calendar_id) {
                continue;
            }
            // A record whose calendar was deleted in between is skipped.
            if let Some(cal) = calendars.get(&record.calendar_id) {
                out.push(record.to_event(cal));
            }
        }
        Ok(out)
    }

    /// Lay out the store's events over `range`.
    pub fn layout(&self, range: DateRange, calendar: Option<Ulid>) -> Result<Layout, StoreError> {
        validate_window(&range)?;
        let events = self.joined_events(calendar)?;
        Ok(compute_layout(&events, range))
    }

    /// Lay out over the default window around the store's events.
    pub fn visible_layout(
        &self,
        today: NaiveDate,
        padding_days: i64,
        calendar: Option<Ulid>,
    ) -> Result<Layout, StoreError> {
        let events = self.joined_events(calendar)?;
        let range = visible_window(&events, today, padding_days);
        validate_window(&range)?;
        Ok(compute_layout(&events, range))
    }

    /// Calendars and events as a serializable document.
    pub fn snapshot(&self) -> Snapshot {
        let mut events: Vec<EventRecord> = self.events.iter().map(|e| e.value().clone()).collect();
        events.sort_by_key(|r| (r.calendar_id, r.start_date, r.id));
        Snapshot {
            calendars: self.calendars(),
            events,
        }
    }
}
