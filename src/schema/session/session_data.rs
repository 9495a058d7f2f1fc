//! Session list, live results and qualifying results
//!
//! Timing fields use the simulator's `-1` convention for "no time"; the
//! accessors on [`ResultPosition`] and [`QualifyResult`] turn that into
//! `Option` so callers never format a sentinel.

use serde::{Deserialize, Serialize};

fn unset_time() -> f64 {
    -1.0
}

fn valid_time(time: f64) -> Option<f64> {
    (time >= 0.0).then_some(time)
}

/// Session list
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct SessionInfoData {
    /// Current session number
    pub current_session_num: i32,
    /// List of sessions
    pub sessions: Vec<Session>,
}

impl SessionInfoData {
    /// Session entry by number.
    pub fn session(&self, session_num: i32) -> Option<&Session> {
        self.sessions.iter().find(|s| s.session_num == session_num)
    }
}

/// Individual session data
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct Session {
    /// Session number
    pub session_num: i32,
    /// Lap cap: an integer or `unlimited`
    pub session_laps: Option<serde_yaml_ng::Value>,
    /// Time cap: `1800.0000 sec` or `unlimited`
    pub session_time: Option<serde_yaml_ng::Value>,
    /// Session type (`Race`, `Lone Qualify`, `Practice`, ...)
    pub session_type: String,
    /// Session name
    pub session_name: Option<String>,
    /// Live results, ordered by overall position
    pub results_positions: Option<Vec<ResultPosition>>,
    /// Laps completed by the leader
    pub results_laps_complete: Option<i32>,
    /// Whether results are official
    pub results_official: Option<i32>,
}

impl Session {
    /// Lap cap, `None` when unlimited or not set.
    pub fn lap_limit(&self) -> Option<u32> {
        let laps: Option<u32> = match self.session_laps.as_ref()? {
            serde_yaml_ng::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            serde_yaml_ng::Value::String(s) => s.split_whitespace().next()?.parse().ok(),
            _ => None,
        };
        laps.filter(|&laps| laps > 0)
    }

    /// Time cap in seconds, `None` when unlimited or not set.
    pub fn time_limit(&self) -> Option<f64> {
        let secs: Option<f64> = match self.session_time.as_ref()? {
            serde_yaml_ng::Value::Number(n) => n.as_f64(),
            serde_yaml_ng::Value::String(s) => s.split_whitespace().next()?.parse().ok(),
            _ => None,
        };
        secs.filter(|&secs| secs > 0.0)
    }

    /// Non-empty live results.
    pub fn results(&self) -> Option<&[ResultPosition]> {
        self.results_positions.as_deref().filter(|r| !r.is_empty())
    }
}

/// One row of the live results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct ResultPosition {
    /// Overall position, 1-based
    pub position: i32,
    /// Class position, 0-based
    pub class_position: i32,
    /// Car index
    pub car_idx: i32,
    /// Current lap
    pub lap: i32,
    /// Accumulated race time in seconds
    pub time: f64,
    /// Lap number of the fastest lap
    pub fastest_lap: i32,
    /// Fastest lap time, `-1` when none
    pub fastest_time: f64,
    /// Last lap time, `-1` when none
    pub last_time: f64,
    /// Laps led
    pub laps_led: i32,
    /// Laps completed
    pub laps_complete: i32,
    /// Incident count
    pub incidents: i32,
    /// Reason out (`Running`, `Disconnected`, ...)
    pub reason_out_str: Option<String>,
}

impl Default for ResultPosition {
    fn default() -> Self {
        Self {
            position: 0,
            class_position: 0,
            car_idx: -1,
            lap: 0,
            time: 0.0,
            fastest_lap: 0,
            fastest_time: unset_time(),
            last_time: unset_time(),
            laps_led: 0,
            laps_complete: 0,
            incidents: 0,
            reason_out_str: None,
        }
    }
}

impl ResultPosition {
    /// Last lap time when one has been set.
    pub fn last_lap(&self) -> Option<f64> {
        valid_time(self.last_time)
    }

    /// Fastest lap time when one has been set.
    pub fn fastest_lap_time(&self) -> Option<f64> {
        valid_time(self.fastest_time)
    }
}

/// Qualifying results block
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct QualifyResultsInfo {
    /// Qualifying results, `None` before anybody has qualified
    pub results: Option<Vec<QualifyResult>>,
}

/// Individual qualifying result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct QualifyResult {
    /// Overall position, 0-based
    pub position: i32,
    /// Class position, 0-based
    pub class_position: i32,
    /// Car index
    pub car_idx: i32,
    /// Fastest lap number
    pub fastest_lap: i32,
    /// Fastest lap time, `-1` or `0` when none
    pub fastest_time: f64,
}

impl Default for QualifyResult {
    fn default() -> Self {
        Self { position: 0, class_position: 0, car_idx: -1, fastest_lap: 0, fastest_time: unset_time() }
    }
}

impl QualifyResult {
    /// Qualifying time when one was set.
    pub fn qualifying_time(&self) -> Option<f64> {
        (self.fastest_time > 0.0).then_some(self.fastest_time)
    }
}
