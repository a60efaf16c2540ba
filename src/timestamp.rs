//! Epoch normalization.
//!
//! The node has published timestamps both in seconds and in milliseconds
//! since the epoch. Values above [`MS_EPOCH_THRESHOLD`] are milliseconds,
//! everything else is seconds. Resolution never panics: a value that cannot
//! be placed on the clock is simply unresolved (`None`).

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde_json::Value;

use crate::models::coerce_f64;

// ---

/// Epoch values above this are milliseconds.
pub const MS_EPOCH_THRESHOLD: f64 = 1e12;

const INSTANT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Resolve a raw store value to a local wall-clock instant.
pub fn normalize(raw: Option<&Value>) -> Option<NaiveDateTime> {
    // ---
    raw.and_then(coerce_f64).and_then(from_epoch)
}

/// Resolve a numeric epoch value to a local wall-clock instant.
pub fn from_epoch(value: f64) -> Option<NaiveDateTime> {
    // ---
    resolve_utc(value).map(|utc| utc.with_timezone(&Local).naive_local())
}

/// Resolve a numeric epoch value to a UTC instant, rounded to microseconds.
pub fn resolve_utc(value: f64) -> Option<DateTime<Utc>> {
    // ---
    if !value.is_finite() {
        return None;
    }

    let seconds = if value > MS_EPOCH_THRESHOLD {
        value / 1000.0
    } else {
        value
    };

    let whole = seconds.floor();
    let micros = ((seconds - whole) * 1e6).round() as i64;

    // `as` saturates; anything that far out is rejected by chrono below.
    let (secs, micros) = if micros >= 1_000_000 {
        ((whole as i64).checked_add(1)?, 0)
    } else {
        (whole as i64, micros)
    };

    DateTime::from_timestamp(secs, (micros * 1_000) as u32)
}

/// Render an instant the way the dashboard labels it.
pub fn format_instant(instant: &NaiveDateTime) -> String {
    instant.format(INSTANT_FORMAT).to_string()
}
