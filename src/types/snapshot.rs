//! One tick of telemetry as seen by the overlay engine.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{SessionState, TrackSurface};
use crate::SessionInfo;

/// Telemetry snapshot for a single tick.
///
/// Field names follow the simulator's variable names so recorded replays can
/// be deserialized directly. Per-car arrays are indexed by car index; reads
/// outside the arrays return "unknown" instead of panicking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct TelemetrySnapshot {
    /// Current session number
    pub session_num: i32,
    /// Current session phase
    pub session_state: SessionState,
    /// Seconds since the session started
    pub session_time: f64,
    /// Car index the camera is focused on
    pub cam_car_idx: i32,
    /// Counter bumped whenever the session string changes
    #[serde(rename = "SessionInfoUpdate")]
    pub session_version: u32,

    /// Player car speed in m/s
    pub speed: Option<f64>,
    /// Player car engine RPM
    #[serde(rename = "RPM")]
    pub rpm: Option<f64>,
    /// Player car gear, -1 reverse, 0 neutral
    pub gear: Option<i32>,
    /// Player car fuel in liters
    pub fuel_level: Option<f64>,
    /// Player car lap
    pub lap: Option<i32>,

    /// Whether a replay is being played back
    pub is_replay_playing: bool,
    /// Frames until the end of the replay buffer
    pub replay_frame_num_end: i32,

    /// Lap distance fraction per car, -1 when unknown
    pub car_idx_lap_dist_pct: Vec<f64>,
    /// Lap number per car
    pub car_idx_lap: Vec<i32>,
    /// Engine RPM per car
    #[serde(rename = "CarIdxRPM")]
    pub car_idx_rpm: Vec<f64>,
    /// Gear per car
    pub car_idx_gear: Vec<i32>,
    /// Track surface per car
    pub car_idx_track_surface: Vec<TrackSurface>,
    /// Pit road flag per car
    pub car_idx_on_pit_road: Vec<bool>,

    /// Parsed session string for `session_version`
    #[serde(skip)]
    pub session: Option<Arc<SessionInfo>>,
}

fn slot(car_idx: i32) -> Option<usize> {
    usize::try_from(car_idx).ok()
}

impl TelemetrySnapshot {
    /// Attach the parsed session string.
    pub fn with_session(mut self, session: Arc<SessionInfo>) -> Self {
        self.session = Some(session);
        self
    }

    /// Lap distance fraction of a car, `None` when unknown.
    pub fn lap_dist_pct(&self, car_idx: i32) -> Option<f64> {
        let pct = *self.car_idx_lap_dist_pct.get(slot(car_idx)?)?;
        (pct >= 0.0).then_some(pct)
    }

    /// Lap number of a car.
    pub fn car_lap(&self, car_idx: i32) -> Option<i32> {
        self.car_idx_lap.get(slot(car_idx)?).copied()
    }

    /// Engine RPM of a car.
    pub fn car_rpm(&self, car_idx: i32) -> Option<f64> {
        self.car_idx_rpm.get(slot(car_idx)?).copied()
    }

    /// Gear of a car.
    pub fn car_gear(&self, car_idx: i32) -> Option<i32> {
        self.car_idx_gear.get(slot(car_idx)?).copied()
    }

    /// Track surface of a car; cars outside the arrays are not in the world.
    pub fn track_surface(&self, car_idx: i32) -> TrackSurface {
        slot(car_idx)
            .and_then(|idx| self.car_idx_track_surface.get(idx).copied())
            .unwrap_or_default()
    }

    /// Whether a car is on pit road.
    pub fn on_pit_road(&self, car_idx: i32) -> bool {
        slot(car_idx)
            .and_then(|idx| self.car_idx_on_pit_road.get(idx).copied())
            .unwrap_or(false)
    }

    /// Whether a replay is running far enough from the live edge that player
    /// telemetry no longer matches the picture.
    pub fn replay_active(&self) -> bool {
        self.is_replay_playing && self.replay_frame_num_end > 10
    }

    /// Car index of the player, from the session roster.
    pub fn player_car_idx(&self) -> Option<i32> {
        self.session.as_ref()?.driver_info.as_ref()?.driver_car_idx
    }
}
