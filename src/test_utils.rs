//! Test utilities: fixture paths and builders for sessions and snapshots
//!
//! The builders produce small, fully consistent session strings and telemetry
//! ticks so engine tests only spell out what they assert on.

#![cfg(any(test, feature = "benchmark"))]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_yaml_ng::Value;

use crate::schema::session::{
    Driver, DriverInfoData, QualifyResult, QualifyResultsInfo, ResultPosition, Sector, Session,
    SessionInfoData, SplitTimeInfo, WeekendInfo,
};
use crate::types::{SessionState, TrackSurface};
use crate::{SessionInfo, TelemetrySnapshot};

/// Error returned when a required fixture cannot be located.
#[derive(Debug, Clone)]
pub struct FixtureError {
    message: String,
}

impl std::fmt::Display for FixtureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FixtureError {}

/// The crate's `test-data/` directory.
pub fn test_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data")
}

/// Require a file inside `test-data/` and return its path.
pub fn require_fixture<P: AsRef<Path>>(relative: P) -> Result<PathBuf, FixtureError> {
    let path = test_data_dir().join(relative.as_ref());
    if path.exists() {
        Ok(path)
    } else {
        Err(FixtureError { message: format!("Missing fixture: {}", path.display()) })
    }
}

/// Roster entry for car `car_idx`: B licence, 3.49 safety rating, car number
/// `car_idx + 1` and an abbreviation of the form `Surname, F`.
pub fn entry(car_idx: i32, full_name: &str, class_id: i32) -> Driver {
    let (first, surname) = full_name.split_once(' ').unwrap_or(("", full_name));
    let initial: String = first.chars().take(1).collect();
    Driver {
        car_idx,
        user_name: full_name.to_string(),
        abbrev_name: Some(format!("{surname}, {initial}")),
        user_id: Some(car_idx + 100),
        car_number: Some((car_idx + 1).to_string()),
        car_class_id: Some(class_id),
        car_class_short_name: Some("GT3".to_string()),
        i_rating: Some(2500),
        lic_level: Some(18),
        lic_sub_level: Some(349),
        is_spectator: Some(0),
        ..Default::default()
    }
}

fn session_entry(num: i32, session_type: &str, laps: Value, time: Value) -> Session {
    Session {
        session_num: num,
        session_laps: Some(laps),
        session_time: Some(time),
        session_type: session_type.to_string(),
        results_positions: None,
        ..Default::default()
    }
}

/// Builder for a complete session string.
///
/// Every session lists a 90 minute practice (0), a lone qualifying (1) and a
/// 12 lap race (2) on a 5 km track with sectors at 0, 0.3 and 0.6. Results
/// go to the builder's current session.
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    info: SessionInfo,
    current: i32,
}

impl SessionBuilder {
    fn with_current(current: i32) -> Self {
        let sessions = vec![
            session_entry(0, "Practice", Value::String("unlimited".to_string()), Value::String("5400.0000 sec".to_string())),
            session_entry(1, "Lone Qualify", Value::Number(2.into()), Value::String("unlimited".to_string())),
            session_entry(2, "Race", Value::Number(12.into()), Value::String("unlimited".to_string())),
        ];
        let info = SessionInfo {
            weekend_info: Some(WeekendInfo {
                track_name: "testring".to_string(),
                track_length: "5.0 km".to_string(),
                track_display_name: "Testring Circuit".to_string(),
                track_display_short_name: Some("Testring".to_string()),
                event_type: Some("Race".to_string()),
                ..Default::default()
            }),
            session_info: Some(SessionInfoData { current_session_num: current, sessions }),
            driver_info: Some(DriverInfoData {
                driver_car_idx: Some(0),
                driver_car_sl_first_rpm: Some(6000.0),
                driver_car_red_line: Some(7500.0),
                drivers: Some(Vec::new()),
                ..Default::default()
            }),
            split_time_info: Some(SplitTimeInfo {
                sectors: Some(
                    [0.0, 0.3, 0.6]
                        .iter()
                        .zip(0..)
                        .map(|(&pct, num)| Sector { sector_num: Some(num), sector_start_pct: Some(pct) })
                        .collect(),
                ),
            }),
            qualify_results_info: None,
        };
        Self { info, current }
    }

    /// Session 2, the race.
    pub fn race() -> Self {
        Self::with_current(2)
    }

    /// Session 0, the timed practice.
    pub fn practice() -> Self {
        Self::with_current(0)
    }

    /// Session 1, the lone qualifying.
    pub fn lone_qualify() -> Self {
        Self::with_current(1)
    }

    pub fn driver(mut self, driver: Driver) -> Self {
        if let Some(drivers) = self.info.driver_info.as_mut().and_then(|d| d.drivers.as_mut()) {
            drivers.push(driver);
        }
        self
    }

    pub fn player(mut self, car_idx: i32) -> Self {
        if let Some(info) = self.info.driver_info.as_mut() {
            info.driver_car_idx = Some(car_idx);
        }
        self
    }

    /// Results row without lap times.
    pub fn result(self, car_idx: i32, class_position: i32, time: f64, laps_complete: i32) -> Self {
        self.result_row(ResultPosition {
            position: class_position + 1,
            class_position,
            car_idx,
            time,
            laps_complete,
            lap: laps_complete + 1,
            ..Default::default()
        })
    }

    /// Results row whose last lap is also its fastest.
    pub fn result_with_laps(
        self,
        car_idx: i32,
        class_position: i32,
        time: f64,
        laps_complete: i32,
        last_time: f64,
    ) -> Self {
        self.result_row(ResultPosition {
            position: class_position + 1,
            class_position,
            car_idx,
            time,
            laps_complete,
            lap: laps_complete + 1,
            last_time,
            fastest_time: last_time,
            fastest_lap: laps_complete,
            ..Default::default()
        })
    }

    pub fn result_row(mut self, row: ResultPosition) -> Self {
        let current = self.current;
        if let Some(session) = self
            .info
            .session_info
            .as_mut()
            .and_then(|s| s.sessions.iter_mut().find(|s| s.session_num == current))
        {
            session.results_positions.get_or_insert_with(Vec::new).push(row);
        }
        self
    }

    /// Qualifying row; a zero time means no time was set.
    pub fn qualifying(mut self, car_idx: i32, position: i32, time: f64) -> Self {
        let info = self.info.qualify_results_info.get_or_insert_with(QualifyResultsInfo::default);
        info.results.get_or_insert_with(Vec::new).push(QualifyResult {
            position,
            class_position: position,
            car_idx,
            fastest_lap: 1,
            fastest_time: time,
        });
        self
    }

    pub fn build(self) -> SessionInfo {
        self.info
    }
}

/// Builder for a telemetry tick over `n` car slots.
///
/// Slots start outside the world with an unknown lap distance.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    snapshot: TelemetrySnapshot,
}

impl SnapshotBuilder {
    pub fn new(cars: usize) -> Self {
        Self {
            snapshot: TelemetrySnapshot {
                car_idx_lap_dist_pct: vec![-1.0; cars],
                car_idx_lap: vec![0; cars],
                car_idx_rpm: vec![0.0; cars],
                car_idx_gear: vec![0; cars],
                car_idx_track_surface: vec![TrackSurface::NotInWorld; cars],
                car_idx_on_pit_road: vec![false; cars],
                ..Default::default()
            },
        }
    }

    /// Session `num` under green.
    pub fn race_session(self, num: i32) -> Self {
        self.session(num, SessionState::Racing)
    }

    pub fn session(mut self, num: i32, state: SessionState) -> Self {
        self.snapshot.session_num = num;
        self.snapshot.session_state = state;
        self
    }

    pub fn camera(mut self, car_idx: i32) -> Self {
        self.snapshot.cam_car_idx = car_idx;
        self
    }

    /// Put a car on track at `lap` + `pct`.
    pub fn car(mut self, car_idx: i32, lap: i32, pct: f64) -> Self {
        if let Ok(slot) = usize::try_from(car_idx) {
            if slot < self.snapshot.car_idx_lap.len() {
                self.snapshot.car_idx_lap[slot] = lap;
                self.snapshot.car_idx_lap_dist_pct[slot] = pct;
                self.snapshot.car_idx_track_surface[slot] = TrackSurface::OnTrack;
            }
        }
        self
    }

    pub fn time(mut self, session_time: f64) -> Self {
        self.snapshot.session_time = session_time;
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.snapshot.session_version = version;
        self
    }

    pub fn with_session(mut self, session: Arc<SessionInfo>) -> Self {
        self.snapshot.session = Some(session);
        self
    }

    pub fn build(self) -> TelemetrySnapshot {
        self.snapshot
    }
}
