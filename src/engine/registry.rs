//! Per-car records merged from the roster, live results and qualifying results.
//!
//! The three blocks arrive independently and any of them can be missing or
//! stale on a given tick. Merging only ever adds or refreshes sub-records: a
//! car missing from a block keeps what it had, so a board never loses a row
//! because one update came through without results.

use std::collections::BTreeMap;
use std::fmt;

use crate::TelemetrySnapshot;
use crate::schema::session::{Driver, QualifyResult, ResultPosition, SessionInfo};

/// License class derived from `LicLevel` (five sub-levels per class).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LicenseClass {
    Rookie,
    D,
    C,
    B,
    A,
    Pro,
    WorldChampionship,
}

impl LicenseClass {
    const TABLE: [LicenseClass; 7] = [
        LicenseClass::Rookie,
        LicenseClass::D,
        LicenseClass::C,
        LicenseClass::B,
        LicenseClass::A,
        LicenseClass::Pro,
        LicenseClass::WorldChampionship,
    ];

    /// Class for a raw license level, clamped to the table.
    pub fn from_level(level: i32) -> Self {
        let bucket = usize::try_from(level / 5).unwrap_or(0);
        Self::TABLE[bucket.min(Self::TABLE.len() - 1)]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LicenseClass::Rookie => "R",
            LicenseClass::D => "D",
            LicenseClass::C => "C",
            LicenseClass::B => "B",
            LicenseClass::A => "A",
            LicenseClass::Pro => "P",
            LicenseClass::WorldChampionship => "WC",
        }
    }
}

impl fmt::Display for LicenseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Everything the overlays know about one car.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverRecord {
    pub car_idx: i32,
    pub license: LicenseClass,
    /// Safety rating, `LicSubLevel / 100`
    pub safety_rating: f64,
    /// 1-based class position, 0 until results rank the car
    pub class_position: u32,
    /// Lap distance fraction from the last refresh
    pub lap_distance: Option<f64>,
    /// Laps plus lap distance fraction
    pub overall_distance: Option<f64>,
    /// Roster entry
    pub driver: Driver,
    /// Row of the live results, once the car appeared in them
    pub position: Option<ResultPosition>,
    /// Row of the qualifying results, once the car appeared in them
    pub qualifying: Option<QualifyResult>,
}

impl DriverRecord {
    fn new(driver: &Driver) -> Self {
        Self {
            car_idx: driver.car_idx,
            license: LicenseClass::from_level(driver.lic_level.unwrap_or(0)),
            safety_rating: f64::from(driver.lic_sub_level.unwrap_or(0)) / 100.0,
            class_position: 0,
            lap_distance: None,
            overall_distance: None,
            driver: driver.clone(),
            position: None,
            qualifying: None,
        }
    }

    /// Whether results have ranked this car yet.
    pub fn is_ranked(&self) -> bool {
        self.class_position > 0
    }

    /// Safety rating with two decimals.
    pub fn safety_rating_label(&self) -> String {
        format!("{:.2}", self.safety_rating)
    }
}

/// Records keyed by car index, rebuilt once per session.
#[derive(Debug, Clone, Default)]
pub struct DriverRegistry {
    records: BTreeMap<i32, DriverRecord>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record; called when the session changes.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Merge the roster, the results of `session_num` and the qualifying
    /// results of a session string.
    pub fn merge(&mut self, session: &SessionInfo, session_num: i32) {
        self.merge_roster(session.roster());
        if let Some(results) = session.results(session_num) {
            self.merge_results(results);
        }
        if let Some(results) = session.qualifying() {
            self.merge_qualifying(results);
        }
    }

    /// Add new roster entries and refresh the roster data of known ones.
    /// Spectators and empty slots are skipped.
    pub fn merge_roster(&mut self, roster: &[Driver]) {
        for driver in roster.iter().filter(|d| d.is_racing_entry()) {
            self.records
                .entry(driver.car_idx)
                .and_modify(|record| record.driver = driver.clone())
                .or_insert_with(|| DriverRecord::new(driver));
        }
    }

    /// Attach live results to known cars.
    pub fn merge_results(&mut self, results: &[ResultPosition]) {
        for row in results {
            if let Some(record) = self.records.get_mut(&row.car_idx) {
                record.class_position = u32::try_from(row.class_position + 1).unwrap_or(0);
                record.position = Some(row.clone());
            }
        }
    }

    /// Attach qualifying results to known cars.
    pub fn merge_qualifying(&mut self, results: &[QualifyResult]) {
        for row in results {
            if let Some(record) = self.records.get_mut(&row.car_idx) {
                record.qualifying = Some(row.clone());
            }
        }
    }

    /// Refresh lap and overall distances from the per-car arrays.
    pub fn refresh_distances(&mut self, snapshot: &TelemetrySnapshot) {
        for (car_idx, record) in &mut self.records {
            record.lap_distance = snapshot.lap_dist_pct(*car_idx);
            record.overall_distance = record
                .lap_distance
                .map(|pct| f64::from(snapshot.car_lap(*car_idx).unwrap_or(0)) + pct);
        }
    }

    pub fn get(&self, car_idx: i32) -> Option<&DriverRecord> {
        self.records.get(&car_idx)
    }

    /// Records in car index order.
    pub fn iter(&self) -> impl Iterator<Item = &DriverRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
