//! Driver roster structures
//!
//! `DriverInfo` carries the player's own car parameters (RPM bands, car index)
//! next to the roster of every car in the session.

use serde::{Deserialize, Serialize};

/// Driver information block: player car parameters plus the roster
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct DriverInfoData {
    /// Car index of the player car
    pub driver_car_idx: Option<i32>,
    /// Player user ID
    #[serde(rename = "DriverUserID")]
    pub driver_user_id: Option<i32>,
    /// Pace car index
    pub pace_car_idx: Option<i32>,
    /// Player car idle RPM
    #[serde(rename = "DriverCarIdleRPM")]
    pub driver_car_idle_rpm: Option<f64>,
    /// Player car redline RPM
    pub driver_car_red_line: Option<f64>,
    /// Player car shift light first RPM
    #[serde(rename = "DriverCarSLFirstRPM")]
    pub driver_car_sl_first_rpm: Option<f64>,
    /// Player car shift light shift RPM
    #[serde(rename = "DriverCarSLShiftRPM")]
    pub driver_car_sl_shift_rpm: Option<f64>,
    /// Player car fuel tank capacity (liters)
    pub driver_car_fuel_max_ltr: Option<f64>,
    /// All cars in the session
    pub drivers: Option<Vec<Driver>>,
}

impl DriverInfoData {
    /// Roster entry for a car index.
    pub fn driver(&self, car_idx: i32) -> Option<&Driver> {
        self.drivers.as_deref()?.iter().find(|d| d.car_idx == car_idx)
    }

    /// Roster entry of the player car.
    pub fn player(&self) -> Option<&Driver> {
        self.driver(self.driver_car_idx?)
    }
}

/// One roster entry
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct Driver {
    /// Car index number
    pub car_idx: i32,
    /// Driver name
    pub user_name: String,
    /// Abbreviated name, `Surname, F`
    pub abbrev_name: Option<String>,
    /// Driver initials
    pub initials: Option<String>,
    /// User ID, `-1` for unused slots
    #[serde(rename = "UserID")]
    pub user_id: Option<i32>,
    /// Team name
    pub team_name: Option<String>,
    /// Car number (display)
    pub car_number: Option<String>,
    /// Car path (directory name)
    pub car_path: Option<String>,
    /// Car class ID
    #[serde(rename = "CarClassID")]
    pub car_class_id: Option<i32>,
    /// Car screen name
    pub car_screen_name: Option<String>,
    /// Car class short name
    pub car_class_short_name: Option<String>,
    /// Whether this is the pace car
    pub car_is_pace_car: Option<i32>,
    /// iRating
    pub i_rating: Option<i32>,
    /// License level, 5 levels per class
    pub lic_level: Option<i32>,
    /// License sub-level (safety rating x100)
    pub lic_sub_level: Option<i32>,
    /// Whether this is a spectator
    pub is_spectator: Option<i32>,
}

impl Driver {
    /// Spectators and empty slots never appear on the overlays.
    pub fn is_racing_entry(&self) -> bool {
        self.is_spectator.unwrap_or(0) == 0 && self.user_id.is_some_and(|id| id != -1)
    }

    /// Name used on the standings board: the abbreviation, else the full name.
    pub fn display_abbrev(&self) -> &str {
        match self.abbrev_name.as_deref() {
            Some(abbrev) if !abbrev.is_empty() => abbrev,
            _ => &self.user_name,
        }
    }

    /// Class label shown in broadcast titles: short class name, else car path.
    pub fn class_label(&self) -> Option<&str> {
        self.car_class_short_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.car_path.as_deref())
    }
}
