use dashmap::DashMap;
use tokio::sync::broadcast;
use ulid::Ulid;

use crate::model::StoreChange;

const CHANNEL_CAPACITY: usize = 256;

/// Broadcast hub for store changes, one channel per calendar.
pub struct NotifyHub {
    channels: DashMap<Ulid, broadcast::Sender<StoreChange>>,
}

impl Default for NotifyHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyHub {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Subscribe to changes on a calendar. Creates the channel if needed.
    pub fn subscribe(&self, calendar_id: Ulid) -> broadcast::Receiver<StoreChange> {
        let sender = self
            .channels
            .entry(calendar_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        sender.subscribe()
    }

    /// Send a change to its calendar's subscribers. No-op if nobody is listening.
    pub fn send(&self, change: &StoreChange) {
        if let Some(sender) = self.channels.get(&change.calendar_id()) {
            let _ = sender.send(change.clone());
        }
    }

    /// Drop a calendar's channel; its receivers see `Closed` after draining.
    pub fn remove(&self, calendar_id: &Ulid) {
        self.channels.remove(calendar_id);
    }

    pub fn subscriber_count(&self, calendar_id: &Ulid) -> usize {
        self.channels
            .get(calendar_id)
            .map_or(0, |s| s.receiver_count())
    }
}
