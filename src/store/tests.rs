use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::broadcast::error::TryRecvError;
use ulid::Ulid;

use super::*;
use crate::limits::*;

// 2024-03-04 is a Monday.
fn d(m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, day).unwrap()
}

fn new_store() -> EventStore {
    EventStore::new(Arc::new(NotifyHub::new()))
}

fn settings(name: &str, skip_weekends: bool) -> CalendarSettings {
    CalendarSettings {
        name: name.into(),
        description: String::new(),
        color: None,
        skip_weekends,
    }
}

fn record(calendar_id: Ulid, start: NaiveDate, length_days: i64) -> EventRecord {
    EventRecord {
        id: Ulid::new(),
        calendar_id,
        title: "event".into(),
        description: String::new(),
        start_date: start,
        length_days,
        skip_weekends: None,
    }
}

fn store_with_calendar(skip_weekends: bool) -> (EventStore, Ulid) {
    let store = new_store();
    let cid = Ulid::new();
    store
        .create_calendar(cid, settings("Work", skip_weekends))
        .unwrap();
    (store, cid)
}

// ── Calendars ────────────────────────────────────────────

#[test]
fn create_calendar_defaults_color() {
    let (store, cid) = store_with_calendar(false);
    let cal = store.get_calendar(&cid).unwrap();
    assert_eq!(cal.name, "Work");
    assert_eq!(cal.color, DEFAULT_CALENDAR_COLOR);
}

#[test]
fn duplicate_calendar_rejected() {
    let (store, cid) = store_with_calendar(false);
    let result = store.create_calendar(cid, settings("Again", false));
    assert_eq!(result, Err(StoreError::AlreadyExists(cid)));
    assert_eq!(store.get_calendar(&cid).unwrap().name, "Work");
}

#[test]
fn calendar_name_limit() {
    let store = new_store();
    let long = "x".repeat(MAX_NAME_LEN + 1);
    let result = store.create_calendar(Ulid::new(), settings(&long, false));
    assert!(matches!(result, Err(StoreError::LimitExceeded(_))));
    assert!(store.calendars().is_empty());
}

#[test]
fn update_calendar_keeps_color_when_unset() {
    let store = new_store();
    let cid = Ulid::new();
    let mut s = settings("Work", false);
    s.color = Some(CALENDAR_COLORS[3].into());
    store.create_calendar(cid, s).unwrap();

    let updated = store.update_calendar(cid, settings("Office", true)).unwrap();
    assert_eq!(updated.name, "Office");
    assert!(updated.skip_weekends);
    assert_eq!(updated.color, CALENDAR_COLORS[3]);
}

#[test]
fn update_missing_calendar() {
    let store = new_store();
    let id = Ulid::new();
    assert_eq!(
        store.update_calendar(id, settings("x", false)),
        Err(StoreError::NotFound(id))
    );
}

#[test]
fn delete_calendar_with_events_rejected() {
    let (store, cid) = store_with_calendar(false);
    let rec = record(cid, d(3, 4), 1);
    let eid = rec.id;
    store.create_event(rec).unwrap();

    assert_eq!(store.delete_calendar(cid), Err(StoreError::HasEvents(cid)));
    store.delete_event(eid).unwrap();
    store.delete_calendar(cid).unwrap();
    assert!(store.get_calendar(&cid).is_none());
}

#[test]
fn racing_deletes_of_one_calendar_report_not_found() {
    for _ in 0..100 {
        let (store, cid) = store_with_calendar(false);
        let results: Vec<Result<(), StoreError>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| store.delete_calendar(cid)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        for err in results.into_iter().filter_map(Result::err) {
            assert_eq!(err, StoreError::NotFound(cid));
        }
    }
}

#[test]
fn calendars_listed_in_id_order() {
    let store = new_store();
    let a = Ulid(10);
    let b = Ulid(5);
    store.create_calendar(a, settings("a", false)).unwrap();
    store.create_calendar(b, settings("b", false)).unwrap();
    let ids: Vec<Ulid> = store.calendars().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![b, a]);
}

// ── Events ───────────────────────────────────────────────

#[test]
fn create_event_needs_calendar() {
    let store = new_store();
    let missing = Ulid::new();
    let result = store.create_event(record(missing, d(3, 4), 1));
    assert_eq!(result, Err(StoreError::NotFound(missing)));
    assert_eq!(store.event_count(), 0);
}

#[test]
fn duplicate_event_rejected() {
    let (store, cid) = store_with_calendar(false);
    let rec = record(cid, d(3, 4), 1);
    store.create_event(rec.clone()).unwrap();
    assert_eq!(store.create_event(rec.clone()), Err(StoreError::AlreadyExists(rec.id)));
    assert_eq!(store.events_for_calendar(&cid).unwrap().len(), 1);
}

#[test]
fn event_length_limit() {
    let (store, cid) = store_with_calendar(false);
    let result = store.create_event(record(cid, d(3, 4), MAX_EVENT_LENGTH_DAYS + 1));
    assert!(matches!(result, Err(StoreError::LimitExceeded(_))));
}

#[test]
fn zero_length_event_accepted() {
    let (store, cid) = store_with_calendar(false);
    store.create_event(record(cid, d(3, 4), 0)).unwrap();
    let layout = store
        .layout(DateRange::new(d(3, 4), d(3, 10)), None)
        .unwrap();
    assert_eq!(layout.day(d(3, 4)).unwrap().lane_count(), 1);
    assert_eq!(layout.day(d(3, 5)).unwrap().lane_count(), 0);
}

#[test]
fn events_for_calendar_sorted() {
    let (store, cid) = store_with_calendar(false);
    let late = record(cid, d(3, 9), 1);
    let early = record(cid, d(3, 2), 1);
    store.create_event(late.clone()).unwrap();
    store.create_event(early.clone()).unwrap();
    let listed = store.events_for_calendar(&cid).unwrap();
    assert_eq!(listed, vec![early, late]);
}

#[test]
fn move_event_returns_old_start() {
    let (store, cid) = store_with_calendar(false);
    let rec = record(cid, d(3, 4), 3);
    let eid = rec.id;
    store.create_event(rec).unwrap();

    assert_eq!(store.move_event(eid, d(3, 6)).unwrap(), d(3, 4));
    let moved = store.get_event(&eid).unwrap();
    assert_eq!(moved.start_date, d(3, 6));
    assert_eq!(moved.length_days, 3);
}

#[test]
fn move_missing_event() {
    let store = new_store();
    let id = Ulid::new();
    assert_eq!(store.move_event(id, d(3, 4)), Err(StoreError::NotFound(id)));
}

#[test]
fn update_event_switches_calendar() {
    let (store, home) = store_with_calendar(false);
    let work = Ulid::new();
    store.create_calendar(work, settings("Other", false)).unwrap();
    let mut rec = record(home, d(3, 4), 2);
    store.create_event(rec.clone()).unwrap();

    rec.calendar_id = work;
    rec.title = "renamed".into();
    store.update_event(rec.clone()).unwrap();

    assert!(store.events_for_calendar(&home).unwrap().is_empty());
    assert_eq!(store.events_for_calendar(&work).unwrap(), vec![rec]);
    store.delete_calendar(home).unwrap();
}

#[test]
fn delete_missing_event() {
    let store = new_store();
    let id = Ulid::new();
    assert_eq!(store.delete_event(id), Err(StoreError::NotFound(id)));
}

// ── Joining and layout ───────────────────────────────────

#[test]
fn calendar_weekend_setting_flows_into_layout() {
    let (store, cid) = store_with_calendar(true);
    let rec = record(cid, d(3, 8), 2); // Friday
    let eid = rec.id;
    store.create_event(rec).unwrap();

    let layout = store
        .layout(DateRange::new(d(3, 4), d(3, 17)), None)
        .unwrap();
    assert_eq!(layout.placements[&eid].end, d(3, 11));
    assert_eq!(layout.placements[&eid].color.as_deref(), Some(DEFAULT_CALENDAR_COLOR));
}

#[test]
fn event_override_beats_calendar_setting() {
    let (store, cid) = store_with_calendar(true);
    let mut rec = record(cid, d(3, 8), 2);
    rec.skip_weekends = Some(false);
    let eid = rec.id;
    store.create_event(rec).unwrap();

    let layout = store
        .layout(DateRange::new(d(3, 4), d(3, 17)), None)
        .unwrap();
    assert_eq!(layout.placements[&eid].end, d(3, 9));
}

#[test]
fn calendar_setting_change_applies_on_next_layout() {
    let (store, cid) = store_with_calendar(false);
    let rec = record(cid, d(3, 8), 2);
    let eid = rec.id;
    store.create_event(rec).unwrap();
    let range = DateRange::new(d(3, 4), d(3, 17));

    assert_eq!(store.layout(range, None).unwrap().placements[&eid].end, d(3, 9));
    store.update_calendar(cid, settings("Work", true)).unwrap();
    assert_eq!(store.layout(range, None).unwrap().placements[&eid].end, d(3, 11));
}

#[test]
fn layout_filters_by_calendar() {
    let (store, a) = store_with_calendar(false);
    let b = Ulid::new();
    store.create_calendar(b, settings("b", false)).unwrap();
    let ra = record(a, d(3, 5), 1);
    let rb = record(b, d(3, 5), 1);
    store.create_event(ra.clone()).unwrap();
    store.create_event(rb.clone()).unwrap();

    let range = DateRange::new(d(3, 4), d(3, 10));
    let all = store.layout(range, None).unwrap();
    assert_eq!(all.placements.len(), 2);
    let only_b = store.layout(range, Some(b)).unwrap();
    assert_eq!(only_b.placements.keys().copied().collect::<Vec<_>>(), vec![rb.id]);

    let missing = Ulid::new();
    assert_eq!(store.layout(range, Some(missing)), Err(StoreError::NotFound(missing)));
}

#[test]
fn layout_window_limit() {
    let store = new_store();
    let range = DateRange::new(d(1, 1), d(1, 1) + chrono::Days::new(MAX_LAYOUT_WINDOW_DAYS as u64));
    assert!(matches!(
        store.layout(range, None),
        Err(StoreError::LimitExceeded(_))
    ));
}

#[test]
fn visible_layout_pads_events() {
    let (store, cid) = store_with_calendar(false);
    store.create_event(record(cid, d(3, 10), 3)).unwrap();
    let layout = store.visible_layout(d(1, 1), DEFAULT_PADDING_DAYS, None).unwrap();
    assert_eq!(layout.range, DateRange::new(d(3, 3), d(3, 19)));
    assert_eq!(layout.days.len(), 17);
}

#[test]
fn move_then_relayout() {
    let (store, cid) = store_with_calendar(false);
    let long = record(cid, d(3, 4), 4);
    let short = record(cid, d(3, 5), 1);
    store.create_event(long.clone()).unwrap();
    store.create_event(short.clone()).unwrap();
    let range = DateRange::new(d(3, 4), d(3, 10));

    let before = store.layout(range, None).unwrap();
    assert_eq!(before.lane_of(short.id, d(3, 5)), Some(1));

    store.move_event(short.id, d(3, 8)).unwrap();
    let after = store.layout(range, None).unwrap();
    assert_eq!(after.lane_of(short.id, d(3, 5)), None);
    assert_eq!(after.lane_of(short.id, d(3, 8)), Some(0));
}

// ── Snapshot and notifications ───────────────────────────

#[test]
fn snapshot_round_trip() {
    let (store, cid) = store_with_calendar(true);
    store.create_event(record(cid, d(3, 4), 2)).unwrap();
    store.create_event(record(cid, d(3, 1), 5)).unwrap();

    let snapshot = store.snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();
    let parsed: Snapshot = serde_json::from_str(&json).unwrap();
    let copy = EventStore::from_snapshot(parsed, Arc::new(NotifyHub::new())).unwrap();
    assert_eq!(copy.snapshot(), snapshot);
}

#[test]
fn snapshot_with_orphan_event_fails() {
    let orphan = record(Ulid::new(), d(3, 4), 1);
    let snapshot = Snapshot {
        calendars: vec![],
        events: vec![orphan.clone()],
    };
    let result = EventStore::from_snapshot(snapshot, Arc::new(NotifyHub::new()));
    assert!(matches!(result, Err(StoreError::NotFound(id)) if id == orphan.calendar_id));
}

#[test]
fn mutations_notify_calendar_subscribers() {
    let (store, cid) = store_with_calendar(false);
    let mut rx = store.notify.subscribe(cid);

    let rec = record(cid, d(3, 4), 1);
    let eid = rec.id;
    store.create_event(rec).unwrap();
    store.move_event(eid, d(3, 6)).unwrap();
    store.delete_event(eid).unwrap();

    assert_eq!(
        rx.try_recv().unwrap(),
        StoreChange::EventCreated { id: eid, calendar_id: cid }
    );
    assert_eq!(
        rx.try_recv().unwrap(),
        StoreChange::EventMoved {
            id: eid,
            calendar_id: cid,
            from: d(3, 4),
            to: d(3, 6),
        }
    );
    assert_eq!(
        rx.try_recv().unwrap(),
        StoreChange::EventDeleted { id: eid, calendar_id: cid }
    );
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn rejected_mutation_sends_nothing() {
    let (store, cid) = store_with_calendar(false);
    let mut rx = store.notify.subscribe(cid);
    let _ = store.create_event(record(cid, d(3, 4), MAX_EVENT_LENGTH_DAYS + 1));
    let _ = store.delete_calendar(Ulid::new());
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn delete_calendar_notifies_then_closes() {
    let (store, cid) = store_with_calendar(false);
    let mut rx = store.notify.subscribe(cid);
    store.delete_calendar(cid).unwrap();
    assert_eq!(rx.try_recv().unwrap(), StoreChange::CalendarDeleted { id: cid });
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Closed)));
}
