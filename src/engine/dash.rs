//! Speed, RPM gauge, gear and fuel line for the camera car.

use super::context::SessionContext;
use super::speed::SpeedEstimator;
use crate::config::DashSettings;
use crate::types::TelemetrySnapshot;

/// Share of the gauge below the shift-light RPM.
const LOW_BAND: f64 = 0.3;

/// Gauge level in `[0, 1]`: the shift-light RPM sits at 0.3, redline at 1.
pub fn gauge_level(rpm: f64, low: f64, high: f64) -> f64 {
    let level = if rpm >= low {
        LOW_BAND + (1.0 - LOW_BAND) * (rpm - low) / (high - low)
    } else {
        LOW_BAND * rpm / low
    };
    level.clamp(0.0, 1.0)
}

/// Draw a gauge of `segments` cells framed by the vertical line glyph: whole
/// cells use the last block glyph, the remainder picks the nearest partial one.
pub fn gauge(level: f64, settings: &DashSettings) -> String {
    let blocks: Vec<char> = settings.blocks.chars().collect();
    let (Some(&full), false) = (blocks.last(), settings.segments == 0) else {
        return String::new();
    };
    let filled = level * settings.segments as f64;
    let full_cells = (filled.floor() as usize).min(settings.segments);

    let mut bar: String = std::iter::repeat_n(full, full_cells).collect();
    if full_cells < settings.segments {
        let partial = ((filled - full_cells as f64) * (blocks.len() - 1) as f64).round() as usize;
        bar.push(blocks[partial.min(blocks.len() - 1)]);
    }
    let drawn = bar.chars().count();
    bar.extend(std::iter::repeat_n(' ', settings.segments.saturating_sub(drawn)));
    format!("{line}{bar}{line}", line = settings.vertical_line)
}

/// `R`, `N` or the gear number.
pub fn gear_label(gear: i32) -> String {
    match gear {
        -1 => "R".to_string(),
        0 => "N".to_string(),
        n => n.to_string(),
    }
}

/// Render the dash line.
///
/// Blank while the camera car is not in the world or a replay is playing.
/// The player car reports its own speed and fuel; for other cars speed comes
/// from the estimator and fuel is not shown. The gauge needs usable RPM
/// bands for the player car.
pub fn render(
    snapshot: &TelemetrySnapshot,
    context: Option<&SessionContext>,
    estimator: &SpeedEstimator,
    settings: &DashSettings,
) -> String {
    let cam = snapshot.cam_car_idx;
    if !snapshot.track_surface(cam).in_world() || snapshot.replay_active() {
        return String::new();
    }

    let player = snapshot.player_car_idx() == Some(cam);
    let (speed, rpm, gear, fuel) = if player {
        (snapshot.speed, snapshot.rpm, snapshot.gear, snapshot.fuel_level)
    } else {
        (None, snapshot.car_rpm(cam), snapshot.car_gear(cam), None)
    };
    let speed = speed.unwrap_or_else(|| context.map_or(0.0, |c| estimator.estimate(c.track_length)));

    let gauge = match (rpm, context.and_then(|c| c.rpm_band)) {
        (Some(rpm), Some(band)) => gauge(gauge_level(rpm, band.low, band.high), settings),
        _ => String::new(),
    };
    let gear = gear.map(gear_label).unwrap_or_default();
    let fuel = fuel.map(|liters| format!("Fuel: {liters:.3}l")).unwrap_or_default();

    format!("{:3.0}km/h{gauge}{gear}  {fuel}", speed * 3.6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{SessionBuilder, SnapshotBuilder, entry};
    use std::sync::Arc;

    fn ascii() -> DashSettings {
        DashSettings { segments: 4, vertical_line: "|".to_string(), blocks: " -=#".to_string() }
    }

    #[test]
    fn gauge_levels() {
        assert_eq!(gauge_level(0.0, 4000.0, 7500.0), 0.0);
        assert!((gauge_level(2000.0, 4000.0, 7500.0) - 0.15).abs() < 1e-12);
        assert!((gauge_level(4000.0, 4000.0, 7500.0) - 0.3).abs() < 1e-12);
        assert_eq!(gauge_level(7500.0, 4000.0, 7500.0), 1.0);
        assert_eq!(gauge_level(9000.0, 4000.0, 7500.0), 1.0);
    }

    #[test]
    fn gauge_cells() {
        let settings = ascii();
        assert_eq!(gauge(0.0, &settings), "|    |");
        assert_eq!(gauge(1.0, &settings), "|####|");
        // two and a half cells of four
        assert_eq!(gauge(0.625, &settings), "|##= |");
        assert_eq!(gauge(0.5, &settings), "|##  |");
    }

    #[test]
    fn gears() {
        assert_eq!(gear_label(-1), "R");
        assert_eq!(gear_label(0), "N");
        assert_eq!(gear_label(5), "5");
    }

    #[test]
    fn player_car_line() {
        let session = Arc::new(SessionBuilder::race().driver(entry(0, "Ana Lopes", 11)).player(0).build());
        let context = crate::engine::SessionContext::derive(&session, 2, &Default::default()).unwrap();
        let mut snapshot = SnapshotBuilder::new(2).race_session(2).camera(0).car(0, 1, 0.5).build();
        snapshot.session = Some(session);
        snapshot.speed = Some(50.0);
        snapshot.rpm = Some(7500.0);
        snapshot.gear = Some(4);
        snapshot.fuel_level = Some(41.5);

        let line = render(&snapshot, context.as_ref(), &SpeedEstimator::new(), &ascii());
        assert_eq!(line, "180km/h|####|4  Fuel: 41.500l");
    }

    #[test]
    fn spectated_car_uses_estimate_and_hides_fuel() {
        let session = Arc::new(SessionBuilder::race().driver(entry(0, "Ana Lopes", 11)).player(0).build());
        let context = crate::engine::SessionContext::derive(&session, 2, &Default::default()).unwrap();
        let mut snapshot = SnapshotBuilder::new(2).race_session(2).camera(1).car(1, 1, 0.5).build();
        snapshot.session = Some(session);
        snapshot.car_idx_rpm[1] = 0.0;
        snapshot.car_idx_gear[1] = -1;
        snapshot.fuel_level = Some(12.0);

        let mut estimator = SpeedEstimator::new();
        estimator.record(Some(0.500), 10.0);
        estimator.record(Some(0.502), 10.5);
        let line = render(&snapshot, context.as_ref(), &estimator, &ascii());
        assert_eq!(line, " 72km/h|    |R  ");
    }

    #[test]
    fn blank_outside_the_world_or_in_replay() {
        let mut snapshot = SnapshotBuilder::new(2).race_session(2).camera(1).build();
        assert_eq!(render(&snapshot, None, &SpeedEstimator::new(), &ascii()), "");

        snapshot = SnapshotBuilder::new(2).race_session(2).camera(1).car(1, 1, 0.5).build();
        snapshot.is_replay_playing = true;
        snapshot.replay_frame_num_end = 400;
        assert_eq!(render(&snapshot, None, &SpeedEstimator::new(), &ascii()), "");
    }

    #[test]
    fn unusable_rpm_band_means_no_gauge() {
        let mut session = SessionBuilder::race().driver(entry(0, "Ana Lopes", 11)).player(0).build();
        if let Some(drivers) = session.driver_info.as_mut() {
            drivers.driver_car_sl_first_rpm = Some(0.0);
        }
        let session = Arc::new(session);
        let context = crate::engine::SessionContext::derive(&session, 2, &Default::default()).unwrap();
        let mut snapshot = SnapshotBuilder::new(2).race_session(2).camera(0).car(0, 1, 0.5).build();
        snapshot.session = Some(session);
        snapshot.speed = Some(50.0);
        snapshot.rpm = Some(7500.0);
        snapshot.gear = Some(4);

        let line = render(&snapshot, context.as_ref(), &SpeedEstimator::new(), &ascii());
        assert_eq!(line, "180km/h4  ");
    }

    #[test]
    fn no_context_means_no_gauge() {
        let mut snapshot = SnapshotBuilder::new(2).race_session(2).camera(1).car(1, 1, 0.5).build();
        snapshot.car_idx_gear[1] = 3;
        assert_eq!(render(&snapshot, None, &SpeedEstimator::new(), &ascii()), "  0km/h3  ");
    }
}
