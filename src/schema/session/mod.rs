//! # Session Information
//!
//! Typed view of the simulator's session string. Only the blocks the overlays
//! read are modelled; unknown keys are ignored.
//!
//! Every block is optional. Right after a connection, and between sessions,
//! the simulator publishes partial documents (a roster with no results, a
//! session list with no sectors). Consumers match on presence instead of
//! assuming a block exists.
//!
//! ```text
//! WeekendInfo         track length, names, event type
//! SessionInfo         session list, live ResultsPositions per session
//! DriverInfo          player car RPM bands, roster
//! SplitTimeInfo       sector boundaries
//! QualifyResultsInfo  qualifying order
//! ```
//!
//! Raw strings go through [`crate::yaml_utils::preprocess_session_yaml`]
//! before parsing; see [`SessionInfoParser`].

use serde::{Deserialize, Serialize};

pub mod cache;
pub mod driver;
pub mod session_data;
pub mod timing;
pub mod weekend;

pub use cache::{SessionInfoCache, SessionInfoParser};
pub use driver::{Driver, DriverInfoData};
pub use session_data::{QualifyResult, QualifyResultsInfo, ResultPosition, Session, SessionInfoData};
pub use timing::{Sector, SplitTimeInfo};
pub use weekend::WeekendInfo;

/// Session information parsed from the simulator's session string
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct SessionInfo {
    /// Weekend and track information
    pub weekend_info: Option<WeekendInfo>,
    /// Session list with live results
    pub session_info: Option<SessionInfoData>,
    /// Player car parameters and roster
    pub driver_info: Option<DriverInfoData>,
    /// Sector boundaries
    pub split_time_info: Option<SplitTimeInfo>,
    /// Qualifying results
    pub qualify_results_info: Option<QualifyResultsInfo>,
}

impl SessionInfo {
    /// Parse already-cleaned YAML.
    pub fn parse(yaml: &str) -> crate::Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            crate::OverlayError::parse("SessionInfo deserialization", e.to_string())
        })
    }

    /// Session entry for a session number.
    pub fn session(&self, session_num: i32) -> Option<&Session> {
        self.session_info.as_ref()?.session(session_num)
    }

    /// Roster entries, empty when the roster block is absent.
    pub fn roster(&self) -> &[Driver] {
        self.driver_info.as_ref().and_then(|d| d.drivers.as_deref()).unwrap_or_default()
    }

    /// Non-empty live results of a session.
    pub fn results(&self, session_num: i32) -> Option<&[ResultPosition]> {
        self.session(session_num)?.results()
    }

    /// Non-empty qualifying results.
    pub fn qualifying(&self) -> Option<&[QualifyResult]> {
        self.qualify_results_info
            .as_ref()?
            .results
            .as_deref()
            .filter(|results| !results.is_empty())
    }

    /// Whether any block the overlays read is present.
    pub fn has_known_blocks(&self) -> bool {
        self.weekend_info.is_some()
            || self.session_info.is_some()
            || self.driver_info.is_some()
            || self.split_time_info.is_some()
            || self.qualify_results_info.is_some()
    }
}
