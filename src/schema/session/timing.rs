//! Split timing and sector information

use serde::{Deserialize, Serialize};

/// Split timing information
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct SplitTimeInfo {
    /// Sector boundaries, sector 0 starts at the start/finish line
    pub sectors: Option<Vec<Sector>>,
}

impl SplitTimeInfo {
    /// Lap fraction where the second sector begins, i.e. the end of sector one.
    pub fn first_sector_end(&self) -> Option<f64> {
        self.sectors.as_deref()?.get(1)?.sector_start_pct
    }
}

/// Individual sector boundary
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct Sector {
    /// Sector number
    pub sector_num: Option<i32>,
    /// Sector start as a lap fraction
    pub sector_start_pct: Option<f64>,
}
