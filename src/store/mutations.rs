use chrono::NaiveDate;
use dashmap::mapref::entry::Entry;
use ulid::Ulid;

use crate::limits::*;
use crate::model::*;

use super::validate::{validate_record, validate_settings};
use super::{EventStore, StoreError};

impl EventStore {
    pub fn create_calendar(&self, id: Ulid, settings: CalendarSettings) -> Result<Calendar, StoreError> {
        validate_settings(&settings).map_err(|e| self.reject(e))?;
        if self.calendars.len() >= MAX_CALENDARS {
            return Err(self.reject(StoreError::LimitExceeded("too many calendars")));
        }

        let calendar = Calendar {
            id,
            name: settings.name,
            description: settings.description,
            color: settings
                .color
                .unwrap_or_else(|| DEFAULT_CALENDAR_COLOR.to_string()),
            skip_weekends: settings.skip_weekends,
        };
        match self.calendars.entry(id) {
            Entry::Occupied(_) => {
                return Err(self.reject(StoreError::AlreadyExists(id)));
            }
            Entry::Vacant(slot) => {
                slot.insert(calendar.clone());
            }
        }
        self.commit(StoreChange::CalendarCreated { id });
        Ok(calendar)
    }

    /// Replace a calendar's settings. A missing color keeps the current one.
    pub fn update_calendar(&self, id: Ulid, settings: CalendarSettings) -> Result<Calendar, StoreError> {
        validate_settings(&settings).map_err(|e| self.reject(e))?;
        let updated = {
            let mut cal = self
                .calendars
                .get_mut(&id)
                .ok_or_else(|| self.reject(StoreError::NotFound(id)))?;
            cal.name = settings.name;
            cal.description = settings.description;
            if let Some(color) = settings.color {
                cal.color = color;
            }
            cal.skip_weekends = settings.skip_weekends;
            cal.clone()
        };
        self.commit(StoreChange::CalendarUpdated { id });
        Ok(updated)
    }

    /// Delete an empty calendar and close its notification channel.
    pub fn delete_calendar(&self, id: Ulid) -> Result<(), StoreError> {
        if !self.calendars.contains_key(&id) {
            return Err(self.reject(StoreError::NotFound(id)));
        }
        // Checked under the calendar's shard lock so a concurrent create_event
        // cannot slip an event in between the check and the removal.
        let removed = self.calendars.remove_if(&id, |_, _| {
            self.by_calendar
                .get(&id)
                .is_none_or(|ids| ids.is_empty())
        });
        if removed.is_none() {
            // Lost a race with another delete of the same calendar.
            let err = if self.calendars.contains_key(&id) {
                StoreError::HasEvents(id)
            } else {
                StoreError::NotFound(id)
            };
            return Err(self.reject(err));
        }
        self.by_calendar.remove(&id);
        self.commit(StoreChange::CalendarDeleted { id });
        self.notify.remove(&id);
        Ok(())
    }

    pub fn create_event(&self, record: EventRecord) -> Result<(), StoreError> {
        validate_record(&record).map_err(|e| self.reject(e))?;
        let id = record.id;
        let calendar_id = record.calendar_id;

        // Hold the calendar entry so it cannot be deleted mid-insert.
        let calendar_guard = self
            .calendars
            .get(&calendar_id)
            .ok_or_else(|| self.reject(StoreError::NotFound(calendar_id)))?;
        if self
            .by_calendar
            .get(&calendar_id)
            .is_some_and(|ids| ids.len() >= MAX_EVENTS_PER_CALENDAR)
        {
            return Err(self.reject(StoreError::LimitExceeded("too many events in calendar")));
        }
        match self.events.entry(id) {
            Entry::Occupied(_) => {
                return Err(self.reject(StoreError::AlreadyExists(id)));
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
        }
        self.by_calendar.entry(calendar_id).or_default().push(id);
        drop(calendar_guard);

        self.commit(StoreChange::EventCreated { id, calendar_id });
        Ok(())
    }

    /// Replace an event record. Moving it to another calendar tells the old
    /// calendar's subscribers it was deleted there.
    pub fn update_event(&self, record: EventRecord) -> Result<(), StoreError> {
        validate_record(&record).map_err(|e| self.reject(e))?;
        let id = record.id;
        let calendar_id = record.calendar_id;

        let calendar_guard = self
            .calendars
            .get(&calendar_id)
            .ok_or_else(|| self.reject(StoreError::NotFound(calendar_id)))?;
        let previous_calendar = {
            let mut existing = self
                .events
                .get_mut(&id)
                .ok_or_else(|| self.reject(StoreError::NotFound(id)))?;
            let previous = existing.calendar_id;
            if previous != calendar_id {
                let mut ids = self.by_calendar.entry(calendar_id).or_default();
                if ids.len() >= MAX_EVENTS_PER_CALENDAR {
                    return Err(self.reject(StoreError::LimitExceeded("too many events in calendar")));
                }
                ids.push(id);
                drop(ids);
                if let Some(mut old) = self.by_calendar.get_mut(&previous) {
                    old.retain(|e| *e != id);
                }
            }
            *existing = record;
            previous
        };
        drop(calendar_guard);

        if previous_calendar != calendar_id {
            self.commit(StoreChange::EventDeleted {
                id,
                calendar_id: previous_calendar,
            });
        }
        self.commit(StoreChange::EventUpdated { id, calendar_id });
        Ok(())
    }

    /// Change an event's start date, keeping its length. Returns the old start.
    pub fn move_event(&self, id: Ulid, to: NaiveDate) -> Result<NaiveDate, StoreError> {
        let (calendar_id, from) = {
            let mut record = self
                .events
                .get_mut(&id)
                .ok_or_else(|| self.reject(StoreError::NotFound(id)))?;
            let from = record.start_date;
            record.start_date = to;
            (record.calendar_id, from)
        };
        self.commit(StoreChange::EventMoved {
            id,
            calendar_id,
            from,
            to,
        });
        Ok(from)
    }

    pub fn delete_event(&self, id: Ulid) -> Result<EventRecord, StoreError> {
        let (_, record) = self
            .events
            .remove(&id)
            .ok_or_else(|| self.reject(StoreError::NotFound(id)))?;
        if let Some(mut ids) = self.by_calendar.get_mut(&record.calendar_id) {
            ids.retain(|e| *e != id);
        }
        self.commit(StoreChange::EventDeleted {
            id,
            calendar_id: record.calendar_id,
        });
        Ok(record)
    }
}
