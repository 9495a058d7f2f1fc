//! Session-scoped constants, derived once per session change.

use crate::config::BroadcastSettings;
use crate::schema::session::SessionInfo;
use crate::{OverlayError, Result};

/// RPM range of the player car's gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RpmBand {
    /// RPM that maps to the start of the upper gauge range
    pub low: f64,
    /// Redline RPM
    pub high: f64,
}

impl RpmBand {
    /// Band from the shift-light first RPM and the redline.
    ///
    /// `None` when either value is unset or the two are out of order; the
    /// simulator reports `-1` or `0` for cars without shift lights.
    pub fn from_car(shift_light: Option<f64>, redline: Option<f64>) -> Option<Self> {
        let low = shift_light? * 2.0 / 3.0;
        let high = redline?;
        (low > 0.0 && high > low).then_some(Self { low, high })
    }
}

/// Constants of the current session.
///
/// Built all at once from a session string. When a block it depends on is
/// missing there is no context at all, never a partially filled one.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    /// Car index of the player
    pub player_car_idx: i32,
    /// Gauge range, `None` when the car reports no usable RPM bands
    pub rpm_band: Option<RpmBand>,
    /// Track length in meters
    pub track_length: f64,
    /// Lap cap, `None` when unlimited
    pub lap_limit: Option<u32>,
    /// Time cap in seconds, `None` when unlimited
    pub time_limit: Option<f64>,
    /// Session type label (`Race`, `Lone Qualify`, `Practice`, ...)
    pub session_type: String,
    /// Lap fraction where sector one ends
    pub first_sector_end: f64,
    pub event_type: String,
    pub track_short_name: String,
    /// Class of the player car, when the player is in the roster
    pub car_class: Option<String>,
    /// Broadcast status line filled from the configured template
    pub status_line: Option<String>,
}

impl SessionContext {
    /// Derive the context for `session_num`.
    ///
    /// Returns `Ok(None)` while a block is missing and an error when the blocks
    /// are present but inconsistent.
    pub fn derive(
        session: &SessionInfo,
        session_num: i32,
        broadcast: &BroadcastSettings,
    ) -> Result<Option<Self>> {
        let (Some(drivers), Some(weekend), Some(sessions), Some(splits)) = (
            session.driver_info.as_ref(),
            session.weekend_info.as_ref(),
            session.session_info.as_ref(),
            session.split_time_info.as_ref(),
        ) else {
            return Ok(None);
        };
        let Some(player_car_idx) = drivers.driver_car_idx else {
            return Ok(None);
        };
        let rpm_band = RpmBand::from_car(drivers.driver_car_sl_first_rpm, drivers.driver_car_red_line);

        let track_length = weekend.track_length_meters().ok_or_else(|| {
            OverlayError::context(format!("unreadable TrackLength {:?}", weekend.track_length))
        })?;

        let current = sessions.session(session_num).ok_or_else(|| {
            OverlayError::context(format!("session {session_num} not listed in SessionInfo"))
        })?;

        let first_sector_end = splits.first_sector_end().ok_or_else(|| {
            OverlayError::context("SplitTimeInfo lists fewer than two sectors")
        })?;

        let event_type = weekend.event_type.clone().unwrap_or_default();
        let track_short_name = weekend.short_name().to_string();
        let car_class = drivers.player().and_then(|d| d.class_label()).map(str::to_string);
        let status_line = car_class
            .as_deref()
            .and_then(|car| broadcast.render(&event_type, car, &track_short_name));

        Ok(Some(Self {
            player_car_idx,
            rpm_band,
            track_length,
            lap_limit: current.lap_limit(),
            time_limit: current.time_limit(),
            session_type: current.session_type.clone(),
            first_sector_end,
            event_type,
            track_short_name,
            car_class,
            status_line,
        }))
    }

    pub fn is_race(&self) -> bool {
        self.session_type == "Race"
    }

    pub fn is_qualifying(&self) -> bool {
        self.session_type.contains("Qualify")
    }

    /// Whether every configured output could be derived.
    pub fn is_complete(&self, broadcast: &BroadcastSettings) -> bool {
        broadcast.status_template.is_none() || self.status_line.is_some()
    }
}
