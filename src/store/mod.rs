mod error;
mod mutations;
mod queries;
#[cfg(test)]
mod tests;
mod validate;

pub use error::StoreError;

use std::sync::Arc;

use dashmap::DashMap;
use ulid::Ulid;

use crate::model::*;
use crate::notify::NotifyHub;
use crate::observability::{change_label, STORE_EVENTS, STORE_MUTATIONS_TOTAL, STORE_REJECTIONS_TOTAL};

/// Caller-owned calendars and events.
///
/// Every successful mutation is announced on `notify` under the affected
/// calendar; layouts are recomputed from scratch on request.
pub struct EventStore {
    pub(super) calendars: DashMap<Ulid, Calendar>,
    pub(super) events: DashMap<Ulid, EventRecord>,
    /// Calendar → event ids, for per-calendar listing and delete checks.
    pub(super) by_calendar: DashMap<Ulid, Vec<Ulid>>,
    pub notify: Arc<NotifyHub>,
}

impl EventStore {
    pub fn new(notify: Arc<NotifyHub>) -> Self {
        Self {
            calendars: DashMap::new(),
            events: DashMap::new(),
            by_calendar: DashMap::new(),
            notify,
        }
    }

    /// Build a store from a snapshot, validating every record on the way in.
    pub fn from_snapshot(snapshot: Snapshot, notify: Arc<NotifyHub>) -> Result<Self, StoreError> {
        let store = Self::new(notify);
        for cal in snapshot.calendars {
            let settings = CalendarSettings {
                name: cal.name,
                description: cal.description,
                color: Some(cal.color),
                skip_weekends: cal.skip_weekends,
            };
            store.create_calendar(cal.id, settings)?;
        }
        for record in snapshot.events {
            store.create_event(record)?;
        }
        tracing::info!(
            "loaded {} calendars, {} events",
            store.calendars.len(),
            store.events.len()
        );
        Ok(store)
    }

    /// Record metrics and notify subscribers for a change that has been applied.
    pub(super) fn commit(&self, change: StoreChange) {
        metrics::counter!(STORE_MUTATIONS_TOTAL, "kind" => change_label(&change)).increment(1);
        metrics::gauge!(STORE_EVENTS).set(self.events.len() as f64);
        self.notify.send(&change);
    }

    pub(super) fn reject(&self, err: StoreError) -> StoreError {
        metrics::counter!(STORE_REJECTIONS_TOTAL, "reason" => err.label()).increment(1);
        tracing::debug!("store mutation rejected: {err}");
        err
    }
}
