//! History series reconstruction.
//!
//! The store keeps past readings as an unordered keyed collection. This
//! module turns one snapshot of it into a time-ascending series capped to
//! the most recent points.

use serde_json::Value;

use crate::config::FieldNames;
use crate::models::{SensorReading, TimeSeriesPoint};

// ---

/// Rebuild an ordered series from a history snapshot.
///
/// Returns `None` ("no data") when the snapshot is absent, empty, or when no
/// record survives. Non-object records and records whose timestamp cannot be
/// resolved are skipped. The result holds the `limit` chronologically latest
/// points, oldest first.
///
/// Ordering is deterministic for a given snapshot: records are visited in key
/// order and the sort is stable, so points sharing an instant keep that order.
pub fn reconstruct(
    snapshot: Option<&Value>,
    limit: usize,
    fields: &FieldNames,
) -> Option<Vec<TimeSeriesPoint>> {
    // ---
    let records: Vec<&Value> = match snapshot? {
        Value::Object(map) => map.values().collect(),
        // Keys that look like array indices come back as an array
        Value::Array(items) => items.iter().collect(),
        _ => return None,
    };

    if records.is_empty() {
        return None;
    }

    let total = records.len();
    let structured: Vec<_> = records.into_iter().filter_map(Value::as_object).collect();
    let malformed = total - structured.len();

    let mut points: Vec<TimeSeriesPoint> = structured
        .into_iter()
        .map(|record| SensorReading::from_record(record, fields))
        .filter_map(|reading| {
            let instant = reading.instant()?;
            Some(TimeSeriesPoint { instant, reading })
        })
        .collect();

    let untimed = total - malformed - points.len();
    if malformed > 0 || untimed > 0 {
        tracing::debug!(
            "History snapshot: skipped {} malformed and {} untimed of {} records",
            malformed,
            untimed,
            total
        );
    }

    points.sort_by_key(|p| p.instant);
    let excess = points.len().saturating_sub(limit);
    points.drain(..excess);

    if points.is_empty() {
        return None;
    }
    Some(points)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use serde_json::json;

    fn seconds(points: &[TimeSeriesPoint]) -> Vec<i64> {
        points
            .iter()
            .map(|p| p.reading.timestamp.unwrap() as i64)
            .collect()
    }

    fn mixed_snapshot() -> Value {
        // ---
        json!({
            "-Nb01": { "temperature": 21.0, "humidity": 40, "luminosity": 1500, "sound": 10, "timestamp": 1700000300 },
            "-Nb02": { "temperature": 22.0, "humidity": 41, "luminosity": 1400, "sound": 11, "timestamp": 1700000100000u64 },
            "-Nb03": 17,
            "-Nb04": { "temperature": 23.0, "humidity": 42, "luminosity": 1300, "sound": 12, "timestamp": 1700000500 },
            "-Nb05": "garbage",
            "-Nb06": { "temperature": 24.0, "humidity": 43, "luminosity": 1200, "sound": 13, "timestamp": 1700000200 },
            "-Nb07": { "temperature": 25.0, "humidity": 44, "luminosity": 1100, "sound": 14, "timestamp": 1700000400000u64 }
        })
    }

    #[test]
    fn test_keeps_latest_points_ascending() {
        // ---
        let points = reconstruct(Some(&mixed_snapshot()), 3, &FieldNames::default()).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(
            seconds(&points),
            vec![1_700_000_300, 1_700_000_400_000, 1_700_000_500]
        );
        assert!(points.windows(2).all(|w| w[0].instant <= w[1].instant));
        assert_eq!(points[0].reading.temperature, Some(21.0));
        assert_eq!(points[2].reading.temperature, Some(23.0));
    }

    #[test]
    fn test_limit_larger_than_series() {
        // ---
        let points = reconstruct(Some(&mixed_snapshot()), 200, &FieldNames::default()).unwrap();
        assert_eq!(points.len(), 5);
        assert_eq!(points[0].reading.temperature, Some(22.0));
    }

    #[test]
    fn test_no_data() {
        // ---
        let fields = FieldNames::default();
        assert_eq!(reconstruct(None, 10, &fields), None);
        assert_eq!(reconstruct(Some(&Value::Null), 10, &fields), None);
        assert_eq!(reconstruct(Some(&json!({})), 10, &fields), None);
        assert_eq!(reconstruct(Some(&json!([])), 10, &fields), None);
        assert_eq!(reconstruct(Some(&json!("scalar")), 10, &fields), None);
        assert_eq!(reconstruct(Some(&json!({ "a": 1, "b": [] })), 10, &fields), None);
        assert_eq!(reconstruct(Some(&mixed_snapshot()), 0, &fields), None);
    }

    #[test]
    fn test_partial_and_untimed_records() {
        // ---
        let snapshot = json!({
            "a": { "temperature": 20.5, "timestamp": 1700000000 },
            "b": { "temperature": 19.0, "humidity": 50 },
            "c": { "temperature": 18.0, "timestamp": "not-a-time" }
        });
        let points = reconstruct(Some(&snapshot), 10, &FieldNames::default()).unwrap();

        assert_eq!(points.len(), 1);
        let point = &points[0];
        assert_eq!(point.reading.temperature, Some(20.5));
        assert_eq!(point.reading.humidity, None);
        assert_eq!(point.reading.luminosity, None);
        assert_eq!(point.reading.sound, None);
    }

    #[test]
    fn test_array_snapshot() {
        // ---
        let snapshot = json!([
            null,
            { "temperature": 20.0, "timestamp": 1700000200 },
            { "temperature": 21.0, "timestamp": 1700000100 }
        ]);
        let points = reconstruct(Some(&snapshot), 10, &FieldNames::default()).unwrap();
        assert_eq!(seconds(&points), vec![1_700_000_100, 1_700_000_200]);
    }

    #[test]
    fn test_idempotent_with_ties() {
        // ---
        let snapshot = json!({
            "k3": { "temperature": 3.0, "timestamp": 1700000000 },
            "k1": { "temperature": 1.0, "timestamp": 1700000000000u64 },
            "k2": { "temperature": 2.0, "timestamp": 1700000000 },
            "k0": { "temperature": 0.0, "timestamp": 1699999999 }
        });
        let fields = FieldNames::default();

        let first = reconstruct(Some(&snapshot), 3, &fields).unwrap();
        let second = reconstruct(Some(&snapshot), 3, &fields).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert!(first.iter().all(|p| p.instant == first[0].instant));
    }
}
