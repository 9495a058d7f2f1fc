//! Lap counter and session clock line.

use super::context::SessionContext;
use super::format::{clock, time_cap};
use crate::types::TelemetrySnapshot;

/// Render `Lap: n/N  Race: 12:34/45m`.
///
/// The lap part is blank before the first lap, while a replay is playing, or
/// when the lap is unknown.
pub fn render(snapshot: &TelemetrySnapshot, context: Option<&SessionContext>) -> String {
    let cam = snapshot.cam_car_idx;
    let lap = if snapshot.player_car_idx() == Some(cam) { snapshot.lap } else { snapshot.car_lap(cam) };
    let lap_limit = context.and_then(|c| c.lap_limit);
    let lap = match lap {
        Some(lap) if lap >= 1 && !snapshot.replay_active() => match lap_limit {
            Some(limit) => format!("Lap: {lap}/{limit}"),
            None => format!("Lap: {lap}"),
        },
        _ => String::new(),
    };

    let label = context.map_or("Session Time", |c| c.session_type.as_str());
    let mut time = clock(snapshot.session_time);
    if let Some(limit) = context.and_then(|c| c.time_limit) {
        time.push_str(&time_cap(limit));
    }
    format!("{lap}  {label}: {time}")
}
