//! Weekend and track information

use serde::{Deserialize, Serialize};

/// Weekend and track information
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct WeekendInfo {
    /// Track name
    pub track_name: String,
    /// Track ID
    #[serde(rename = "TrackID")]
    pub track_id: Option<i32>,
    /// Track length with unit, e.g. `5.43 km`
    pub track_length: String,
    /// Track display name
    pub track_display_name: String,
    /// Track short name
    pub track_display_short_name: Option<String>,
    /// Track configuration name
    pub track_config_name: Option<String>,
    /// Event type (`Race`, `Practice`, `Test`, ...)
    pub event_type: Option<String>,
    /// Category (Road, Oval, ...)
    pub category: Option<String>,
    /// Sub-session ID
    #[serde(rename = "SubSessionID")]
    pub sub_session_id: Option<i32>,
}

impl WeekendInfo {
    /// Track length in meters, `None` when missing or in an unknown unit.
    pub fn track_length_meters(&self) -> Option<f64> {
        let mut parts = self.track_length.split_whitespace();
        let value: f64 = parts.next()?.parse().ok()?;
        let scale = match parts.next().unwrap_or("km") {
            "km" => 1000.0,
            "mi" => 1609.344,
            "m" => 1.0,
            _ => return None,
        };
        Some(value * scale).filter(|meters| *meters > 0.0)
    }

    /// Short track name for titles, falling back to the display name.
    pub fn short_name(&self) -> &str {
        match self.track_display_short_name.as_deref() {
            Some(short) if !short.is_empty() => short,
            _ => &self.track_display_name,
        }
    }
}
