use std::io::Write;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use ulid::Ulid;

use calgrid::limits::DEFAULT_PADDING_DAYS;
use calgrid::model::{DateRange, Snapshot};
use calgrid::notify::NotifyHub;
use calgrid::store::EventStore;

fn env_date(name: &str) -> Result<Option<NaiveDate>, Box<dyn std::error::Error>> {
    match std::env::var(name) {
        Ok(s) => Ok(Some(
            NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| format!("{name}={s}: {e}"))?,
        )),
        Err(_) => Ok(None),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the layout; logs go to stderr.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let input = std::env::var("CALGRID_INPUT").unwrap_or_else(|_| "./calendar.json".into());
    let padding_days: i64 = std::env::var("CALGRID_PADDING_DAYS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PADDING_DAYS);
    let calendar: Option<Ulid> = match std::env::var("CALGRID_CALENDAR") {
        Ok(s) => Some(Ulid::from_string(&s).map_err(|e| format!("CALGRID_CALENDAR={s}: {e}"))?),
        Err(_) => None,
    };
    let today = env_date("CALGRID_TODAY")?.unwrap_or_else(|| chrono::Local::now().date_naive());
    let start = env_date("CALGRID_START")?;
    let end = env_date("CALGRID_END")?;

    let file = std::fs::File::open(&input).map_err(|e| format!("{input}: {e}"))?;
    let snapshot: Snapshot = serde_json::from_reader(std::io::BufReader::new(file))?;
    let store = EventStore::from_snapshot(snapshot, Arc::new(NotifyHub::new()))?;

    let layout = match (start, end) {
        (Some(start), Some(end)) => store.layout(DateRange::new(start, end), calendar)?,
        _ => store.visible_layout(today, padding_days, calendar)?,
    };
    info!("input: {input}");
    info!("  range: {} .. {}", layout.range.start, layout.range.end);
    info!("  events placed: {}", layout.placements.len());
    info!("  lanes: {}", layout.max_lanes());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &layout)?;
    writeln!(out)?;
    Ok(())
}
