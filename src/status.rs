//! Status classification of the latest reading.
//!
//! The rules form an ordered table evaluated top to bottom; the first rule
//! whose predicate holds decides the status. Missing inputs are checked
//! before any rule runs.

use serde::{Deserialize, Serialize};

// ---

/// Classification thresholds. Overridable through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Temperature (°C) at or above which the node is `HOT`.
    pub temp_high: f64,
    /// Raw sound level at or above which the node is `NOISE`.
    pub sound_high: i64,
    /// Raw luminosity below which the node is `NIGHT`.
    pub lum_night: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temp_high: 30.0,
            sound_high: 2500,
            lum_night: 1200,
        }
    }
}

/// Closed set of status categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTag {
    Ok,
    Hot,
    Noise,
    Night,
    #[serde(rename = "unk")]
    Unknown,
}

impl StatusTag {
    /// Short category tag, e.g. for a badge CSS class.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Hot => "hot",
            Self::Noise => "noise",
            Self::Night => "night",
            Self::Unknown => "unk",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Hot => "HOT",
            Self::Noise => "NOISE",
            Self::Night => "NIGHT",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Derived status: label plus category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusResult {
    pub label: &'static str,
    pub tag: StatusTag,
}

impl From<StatusTag> for StatusResult {
    fn from(tag: StatusTag) -> Self {
        Self {
            label: tag.label(),
            tag,
        }
    }
}

/// Inputs the rules see once every value is known to be present.
#[derive(Debug, Clone, Copy)]
struct Inputs {
    temperature: f64,
    luminosity: i64,
    sound: i64,
}

type Rule = (fn(&Inputs, &Thresholds) -> bool, StatusTag);

/// Priority order, highest first.
const RULES: [Rule; 3] = [
    (|i: &Inputs, t: &Thresholds| i.temperature >= t.temp_high, StatusTag::Hot),
    (|i: &Inputs, t: &Thresholds| i.sound >= t.sound_high, StatusTag::Noise),
    (|i: &Inputs, t: &Thresholds| i.luminosity < t.lum_night, StatusTag::Night),
];

/// Classify a reading from its temperature, luminosity and sound values.
///
/// Any absent input yields `UNKNOWN`; otherwise the first matching rule of
/// `HOT`, `NOISE`, `NIGHT` wins and `OK` is the fallback.
pub fn classify(
    temperature: Option<f64>,
    luminosity: Option<i64>,
    sound: Option<i64>,
    thresholds: &Thresholds,
) -> StatusResult {
    // ---
    let (Some(temperature), Some(luminosity), Some(sound)) = (temperature, luminosity, sound)
    else {
        return StatusTag::Unknown.into();
    };

    let inputs = Inputs {
        temperature,
        luminosity,
        sound,
    };

    RULES
        .iter()
        .find(|(applies, _)| applies(&inputs, thresholds))
        .map_or(StatusTag::Ok, |(_, tag)| *tag)
        .into()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn tag(t: Option<f64>, lum: Option<i64>, snd: Option<i64>) -> StatusTag {
        classify(t, lum, snd, &Thresholds::default()).tag
    }

    #[test]
    fn test_any_missing_input_is_unknown() {
        // ---
        let t = [None, Some(35.0)];
        let lum = [None, Some(100)];
        let snd = [None, Some(4000)];

        for temp in t {
            for l in lum {
                for s in snd {
                    if temp.is_some() && l.is_some() && s.is_some() {
                        continue;
                    }
                    let status = classify(temp, l, s, &Thresholds::default());
                    assert_eq!(status.tag, StatusTag::Unknown);
                    assert_eq!(status.label, "UNKNOWN");
                }
            }
        }
    }

    #[test]
    fn test_priority_order() {
        // ---
        // Temperature wins even when sound and luminosity would also fire
        assert_eq!(tag(Some(31.0), Some(1), Some(5000)), StatusTag::Hot);

        // Sound beats night
        assert_eq!(tag(Some(20.0), Some(900), Some(3000)), StatusTag::Noise);

        // Dark and quiet
        assert_eq!(tag(Some(20.0), Some(900), Some(300)), StatusTag::Night);

        assert_eq!(tag(Some(20.0), Some(1300), Some(1)), StatusTag::Ok);
    }

    #[test]
    fn test_threshold_edges() {
        // ---
        assert_eq!(tag(Some(30.0), Some(1500), Some(0)), StatusTag::Hot);
        assert_eq!(tag(Some(29.99), Some(1500), Some(0)), StatusTag::Ok);
        assert_eq!(tag(Some(20.0), Some(1500), Some(2500)), StatusTag::Noise);
        assert_eq!(tag(Some(20.0), Some(1500), Some(2499)), StatusTag::Ok);
        assert_eq!(tag(Some(20.0), Some(1200), Some(0)), StatusTag::Ok);
        assert_eq!(tag(Some(20.0), Some(1199), Some(0)), StatusTag::Night);
    }

    #[test]
    fn test_custom_thresholds() {
        // ---
        let thresholds = Thresholds {
            temp_high: 25.0,
            sound_high: 100,
            lum_night: 10,
        };
        assert_eq!(
            classify(Some(26.0), Some(500), Some(0), &thresholds).tag,
            StatusTag::Hot
        );
        assert_eq!(
            classify(Some(20.0), Some(500), Some(150), &thresholds).tag,
            StatusTag::Noise
        );
        assert_eq!(
            classify(Some(20.0), Some(500), Some(50), &thresholds).tag,
            StatusTag::Ok
        );
    }

    #[test]
    fn test_labels_and_tags() {
        // ---
        let status = classify(Some(31.2), Some(1500), Some(100), &Thresholds::default());
        assert_eq!(status.label, "HOT");
        assert_eq!(status.tag.as_str(), "hot");
        assert_eq!(
            serde_json::to_value(StatusTag::Unknown).unwrap(),
            serde_json::json!("unk")
        );
    }
}
