//! Simple data models for the sensor relay.
//!
//! Store records arrive as loosely typed JSON. Every field is coerced on its
//! own so that one corrupted value never discards the rest of a reading.

use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::config::FieldNames;
use crate::status::{classify, StatusResult, Thresholds};
use crate::timestamp;

// ---

/// Coerce a JSON value to a finite float.
///
/// Accepts JSON numbers and numeric strings; anything else is absent.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    // ---
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Coerce a JSON value to an integer.
///
/// JSON floats are truncated toward zero; strings must hold an integer.
pub fn coerce_i64(value: &Value) -> Option<i64> {
    // ---
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// One sensor reading as published by the node.
///
/// Every field is optional: the store may omit or corrupt any of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SensorReading {
    // ---
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub luminosity: Option<i64>,
    pub sound: Option<i64>,
    /// Epoch value in seconds or milliseconds, unit not yet resolved.
    pub timestamp: Option<f64>,
}

/// A reading placed on the time axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    // ---
    pub instant: NaiveDateTime,
    #[serde(flatten)]
    pub reading: SensorReading,
}

/// Simple transformation helpers
impl SensorReading {
    // ---
    /// Build a reading from a raw store record using the configured field names.
    pub fn from_record(record: &Map<String, Value>, fields: &FieldNames) -> Self {
        // ---
        let field = |name: &str| record.get(name);

        SensorReading {
            temperature: field(&fields.temperature).and_then(coerce_f64),
            humidity: field(&fields.humidity).and_then(coerce_f64),
            luminosity: field(&fields.luminosity).and_then(coerce_i64),
            sound: field(&fields.sound).and_then(coerce_i64),
            timestamp: field(&fields.timestamp).and_then(coerce_f64),
        }
    }

    /// Resolved wall-clock instant of this reading, if any.
    pub fn instant(&self) -> Option<NaiveDateTime> {
        self.timestamp.and_then(timestamp::from_epoch)
    }

    pub fn status(&self, thresholds: &Thresholds) -> StatusResult {
        classify(self.temperature, self.luminosity, self.sound, thresholds)
    }
}

/// LED color, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Parse a `#rrggbb` color string (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        // ---
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(anyhow!("Invalid color '{}': expected #rrggbb", hex));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| anyhow!("Invalid color '{}': {}", hex, e))
        };

        Ok(Rgb {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

/// Device command relayed to the automation gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetColor(Rgb),
    SetNightMode(bool),
    ForceSend,
}

impl Command {
    pub fn led_off() -> Self {
        Command::SetColor(Rgb::OFF)
    }

    /// JSON body the gateway flow expects for this command.
    pub fn to_payload(&self) -> Value {
        // ---
        match self {
            Command::SetColor(rgb) => json!({ "rgb": rgb }),
            Command::SetNightMode(on) => json!({ "night": u8::from(*on) }),
            Command::ForceSend => json!({ "forceSend": 1 }),
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn record(value: Value) -> Map<String, Value> {
        // ---
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_full_record() {
        // ---
        let raw = record(json!({
            "temperature": 31.2,
            "humidity": 55,
            "luminosity": 1500,
            "sound": 100,
            "timestamp": 1700000000000u64
        }));
        let reading = SensorReading::from_record(&raw, &FieldNames::default());

        assert_eq!(reading.temperature, Some(31.2));
        assert_eq!(reading.humidity, Some(55.0));
        assert_eq!(reading.luminosity, Some(1500));
        assert_eq!(reading.sound, Some(100));
        assert_eq!(reading.timestamp, Some(1.7e12));
    }

    #[test]
    fn test_bad_field_does_not_fail_reading() {
        // ---
        let raw = record(json!({
            "temperature": "hot",
            "humidity": "48.5",
            "luminosity": "12.5",
            "sound": [1, 2],
            "timestamp": null
        }));
        let reading = SensorReading::from_record(&raw, &FieldNames::default());

        assert_eq!(reading.temperature, None);
        assert_eq!(reading.humidity, Some(48.5));
        assert_eq!(reading.luminosity, None);
        assert_eq!(reading.sound, None);
        assert_eq!(reading.timestamp, None);
        assert_eq!(reading.instant(), None);
    }

    #[test]
    fn test_integer_coercion() {
        // ---
        assert_eq!(coerce_i64(&json!(1500)), Some(1500));
        assert_eq!(coerce_i64(&json!(1500.9)), Some(1500));
        assert_eq!(coerce_i64(&json!(-3.7)), Some(-3));
        assert_eq!(coerce_i64(&json!(" 42 ")), Some(42));
        assert_eq!(coerce_i64(&json!(true)), None);
        assert_eq!(coerce_i64(&json!({})), None);
        assert_eq!(coerce_f64(&json!("NaN")), None);
        assert_eq!(coerce_f64(&json!("1e3")), Some(1000.0));
    }

    #[test]
    fn test_field_mapping() {
        // ---
        let raw = record(json!({ "light": 900, "luminosity": 4000 }));
        let fields = FieldNames {
            luminosity: "light".to_string(),
            ..FieldNames::default()
        };

        let reading = SensorReading::from_record(&raw, &fields);
        assert_eq!(reading.luminosity, Some(900));
    }

    #[test]
    fn test_status_of_partial_reading() {
        // ---
        let raw = record(json!({ "temperature": 40.0, "sound": 10 }));
        let reading = SensorReading::from_record(&raw, &FieldNames::default());

        assert_eq!(reading.status(&Thresholds::default()).label, "UNKNOWN");
    }

    #[test]
    fn test_rgb_from_hex() {
        // ---
        assert_eq!(
            Rgb::from_hex("#ff8000").unwrap(),
            Rgb {
                r: 255,
                g: 128,
                b: 0
            }
        );
        assert_eq!(Rgb::from_hex("00FF0a").unwrap(), Rgb { r: 0, g: 255, b: 10 });
        assert!(Rgb::from_hex("#fff").is_err());
        assert!(Rgb::from_hex("#gg0000").is_err());
        assert!(Rgb::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_command_payloads() {
        // ---
        let color = Command::SetColor(Rgb { r: 1, g: 2, b: 3 });
        assert_eq!(color.to_payload(), json!({ "rgb": { "r": 1, "g": 2, "b": 3 } }));

        assert_eq!(
            Command::led_off().to_payload(),
            json!({ "rgb": { "r": 0, "g": 0, "b": 0 } })
        );
        assert_eq!(Command::SetNightMode(true).to_payload(), json!({ "night": 1 }));
        assert_eq!(Command::SetNightMode(false).to_payload(), json!({ "night": 0 }));
        assert_eq!(Command::ForceSend.to_payload(), json!({ "forceSend": 1 }));
    }
}
