//! Poll cycle: fetch, derive, hand off.
//!
//! A cycle reads the latest record and the history snapshot from the store
//! and derives the dashboard views from them. Cycles share nothing; each one
//! starts from a fresh read. Store failures are logged and turned into the
//! same "no data" views an empty store produces.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{history, timestamp, Config, SensorReading, StatusResult, StoreClient, TimeSeriesPoint};

// ---

/// Latest reading with everything the status card shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestView {
    // ---
    /// `false` when the store had no reading at all.
    pub available: bool,
    pub reading: SensorReading,
    pub instant: Option<NaiveDateTime>,
    /// `instant` as `YYYY-MM-DD HH:MM:SS`.
    pub instant_label: Option<String>,
    pub status: StatusResult,
}

/// Reconstructed history series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryView {
    pub available: bool,
    pub points: Vec<TimeSeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollCycle {
    pub latest: LatestView,
    pub history: HistoryView,
}

pub fn derive_latest(record: Option<&Map<String, Value>>, cfg: &Config) -> LatestView {
    // ---
    let reading = record
        .map(|r| SensorReading::from_record(r, &cfg.fields))
        .unwrap_or_default();
    let instant = reading.instant();

    LatestView {
        available: record.is_some(),
        status: reading.status(&cfg.thresholds),
        instant_label: instant.as_ref().map(timestamp::format_instant),
        instant,
        reading,
    }
}

pub fn derive_history(snapshot: Option<&Value>, limit: usize, cfg: &Config) -> HistoryView {
    // ---
    match history::reconstruct(snapshot, limit, &cfg.fields) {
        Some(points) => HistoryView {
            available: true,
            points,
        },
        None => HistoryView {
            available: false,
            points: Vec::new(),
        },
    }
}

/// Fetch and derive the latest reading.
pub async fn latest_view(store: &StoreClient, cfg: &Config) -> LatestView {
    // ---
    let record = store.fetch_latest().await.unwrap_or_else(|e| {
        warn!("Latest reading unavailable: {}", e);
        None
    });
    derive_latest(record.as_ref(), cfg)
}

/// Fetch and derive the history series, capped to `limit` points.
pub async fn history_view(store: &StoreClient, cfg: &Config, limit: usize) -> HistoryView {
    // ---
    let snapshot = store.fetch_history().await.unwrap_or_else(|e| {
        warn!("History snapshot unavailable: {}", e);
        None
    });
    derive_history(snapshot.as_ref(), limit, cfg)
}

/// Run one full cycle with the configured history cap.
pub async fn poll_once(store: &StoreClient, cfg: &Config) -> PollCycle {
    // ---
    let latest = latest_view(store, cfg).await;
    let history = history_view(store, cfg, cfg.history_limit).await;
    PollCycle { latest, history }
}

/// Poll the store forever at the configured refresh interval.
///
/// Each cycle logs the derived status and the size of the history series.
pub async fn run_poll_loop(store: StoreClient, cfg: Config) {
    // ---
    let mut ticker = interval(cfg.refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Poll loop started, refresh every {:?}", cfg.refresh_interval);

    loop {
        ticker.tick().await;
        let cycle = poll_once(&store, &cfg).await;

        if !cycle.latest.available {
            info!("Status: {} (no reading in store)", cycle.latest.status.label);
        } else {
            info!(
                "Status: {} at {}",
                cycle.latest.status.label,
                cycle.latest.instant_label.as_deref().unwrap_or("no timestamp")
            );
        }
        debug!("Latest reading: {:?}", cycle.latest.reading);
        debug!(
            "History: {} points (available: {})",
            cycle.history.points.len(),
            cycle.history.available
        );
    }
}
