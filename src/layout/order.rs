use std::collections::HashMap;

use ulid::Ulid;

use crate::model::Event;

/// Global processing order: start ascending, then longer first, then id.
///
/// Events sharing an id keep only their last occurrence in `events`.
pub fn order_events(events: &[Event]) -> Vec<&Event> {
    let mut last_seen: HashMap<Ulid, usize> = HashMap::with_capacity(events.len());
    for (i, e) in events.iter().enumerate() {
        if last_seen.insert(e.id, i).is_some() {
            tracing::warn!("duplicate event id {}, keeping last occurrence", e.id);
        }
    }

    let mut ordered: Vec<&Event> = events
        .iter()
        .enumerate()
        .filter(|(i, e)| last_seen.get(&e.id) == Some(i))
        .map(|(_, e)| e)
        .collect();

    ordered.sort_by(|a, b| {
        a.start_date
            .cmp(&b.start_date)
            .then_with(|| b.effective_length().cmp(&a.effective_length()))
            .then_with(|| a.id.cmp(&b.id))
    });
    ordered
}
