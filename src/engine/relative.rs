//! The relative block: the car ahead on track, the viewed car and the car behind.
//!
//! Cars are ordered by how far ahead of the viewed car they are on the
//! circuit, not by race position, so a lapped car right in front shows up as
//! "ahead". Distances wrap at the start/finish line.

use tracing::debug;

use super::context::SessionContext;
use super::format::lap_time;
use super::registry::{DriverRecord, DriverRegistry};
use crate::config::RelativeSettings;
use crate::types::TelemetrySnapshot;

const LEADER: &str = "LEADER";

/// Fold a lap fraction difference into `(-0.5, 0.5]`.
pub fn wrap_lap_delta(diff: f64) -> f64 {
    if diff < -0.5 {
        diff + 1.0
    } else if diff > 0.5 {
        diff - 1.0
    } else {
        diff
    }
}

/// Render the three relative lines for the camera car.
///
/// Empty when the camera car has no record, is not in the world, or has no
/// known lap distance. Distances must be refreshed beforehand.
pub fn render(
    registry: &DriverRegistry,
    context: &SessionContext,
    snapshot: &TelemetrySnapshot,
    glyphs: &RelativeSettings,
) -> String {
    let cam = snapshot.cam_car_idx;
    let Some(viewed) = registry.get(cam) else {
        return String::new();
    };
    let Some(viewed_pct) = viewed.lap_distance else {
        return String::new();
    };
    if !snapshot.track_surface(cam).in_world() {
        return String::new();
    }

    let order = track_order(registry, viewed_pct);
    let Some(index) = order.iter().position(|record| record.car_idx == cam) else {
        return String::new();
    };

    let race = context.is_race();
    let sector_end = context.first_sector_end;

    let ahead = match index.checked_sub(1).and_then(|i| order.get(i)) {
        Some(record) => line(record, &glyphs.up_arrow, race, sector_end),
        None if viewed.class_position == 1 => format!("{:>24}", LEADER),
        None => String::new(),
    };
    let me = line(viewed, &glyphs.square, race, sector_end);
    let behind = match order.get(index + 1) {
        Some(record) if record.position.is_some() => line(record, &glyphs.down_arrow, race, sector_end),
        _ => String::new(),
    };

    debug!(car = cam, track_index = index, "Relative rendered");
    [ahead, me, behind].join("\n")
}

/// Records with a known lap distance, furthest ahead of `viewed_pct` first.
fn track_order(registry: &DriverRegistry, viewed_pct: f64) -> Vec<&DriverRecord> {
    let mut order: Vec<(f64, &DriverRecord)> = registry
        .iter()
        .filter_map(|record| Some((wrap_lap_delta(record.lap_distance? - viewed_pct), record)))
        .collect();
    order.sort_by(|a, b| b.0.total_cmp(&a.0));
    order.into_iter().map(|(_, record)| record).collect()
}

/// Time column: last lap in races; in other sessions the last lap while still
/// in sector one, else the fastest lap.
fn time_column(record: &DriverRecord, race: bool, first_sector_end: f64) -> String {
    let Some(position) = &record.position else {
        return String::new();
    };
    if race {
        return position.last_lap().map(lap_time).unwrap_or_default();
    }
    let in_first_sector = record.lap_distance.is_some_and(|pct| pct < first_sector_end);
    match (position.last_lap(), position.fastest_lap_time()) {
        (Some(last), _) if in_first_sector => format!("Last {}", lap_time(last)),
        (_, Some(fastest)) => lap_time(fastest),
        _ => String::new(),
    }
}

fn line(record: &DriverRecord, glyph: &str, race: bool, first_sector_end: f64) -> String {
    let time = time_column(record, race, first_sector_end);
    let position =
        if record.is_ranked() { format!("P{:2}", record.class_position) } else { String::new() };
    let driver = &record.driver;
    format!(
        "{time:>14} {glyph} {position:3} #{number:<3} {license} {rating} {irating:>4} {name}",
        number = driver.car_number.as_deref().unwrap_or(""),
        license = record.license,
        rating = record.safety_rating_label(),
        irating = driver.i_rating.unwrap_or(0),
        name = driver.user_name,
    )
}
