//! Replay provider for recorded snapshot files
//!
//! A replay document is YAML:
//!
//! ```yaml
//! TickRate: 4
//! Sessions:
//!   - Version: 1
//!     Yaml: |
//!       WeekendInfo:
//!        TrackLength: 5.00 km
//!       ...
//! Frames:
//!   - SessionNum: 2
//!     SessionState: 4
//!     SessionTime: 120.0
//!     CamCarIdx: 1
//!     SessionInfoUpdate: 1
//!     CarIdxLapDistPct: [0.30, 0.25]
//! ```
//!
//! Session strings are stored raw, exactly as the simulator publishes them,
//! and go through the same cleanup and version cache as live strings.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tokio::time::{Duration, Interval, MissedTickBehavior, interval};
use tracing::{debug, info, trace, warn};

use crate::provider::SnapshotProvider;
use crate::schema::SessionInfoParser;
use crate::types::TelemetrySnapshot;
use crate::{OverlayError, Result, SessionInfo};

fn default_tick_rate() -> f64 {
    60.0
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ReplayDocument {
    #[serde(default = "default_tick_rate")]
    tick_rate: f64,
    #[serde(default)]
    sessions: Vec<RecordedSession>,
    #[serde(default)]
    frames: Vec<TelemetrySnapshot>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RecordedSession {
    version: u32,
    yaml: String,
}

/// Replay provider that plays back a recorded document
pub struct ReplayProvider {
    frames: std::vec::IntoIter<TelemetrySnapshot>,
    total_frames: usize,

    /// Raw session strings by version
    sessions: HashMap<u32, String>,
    parser: SessionInfoParser,
    /// Session attached to the previous frame
    current: Option<Arc<SessionInfo>>,

    /// Playback speed multiplier (1.0 = normal, 2.0 = double speed)
    speed: f64,
    interval: Interval,
    tick_rate: f64,
}

impl std::fmt::Debug for ReplayProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplayProvider")
            .field("total_frames", &self.total_frames)
            .field("remaining", &self.frames.len())
            .field("sessions", &self.sessions.len())
            .field("speed", &self.speed)
            .field("tick_rate", &self.tick_rate)
            .finish()
    }
}

impl ReplayProvider {
    /// Load a replay document from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| OverlayError::file_error(path.to_path_buf(), e))?;
        let provider = Self::from_yaml(&text)?;
        info!(path = %path.display(), "Opened replay file");
        Ok(provider)
    }

    /// Parse a replay document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let document: ReplayDocument = serde_yaml_ng::from_str(text)
            .map_err(|e| OverlayError::parse("Replay document", e.to_string()))?;
        if !(document.tick_rate.is_finite() && document.tick_rate > 0.0) {
            return Err(OverlayError::parse(
                "Replay document",
                format!("TickRate must be positive, got {}", document.tick_rate),
            ));
        }

        let sessions: HashMap<u32, String> =
            document.sessions.into_iter().map(|s| (s.version, s.yaml)).collect();
        let total_frames = document.frames.len();
        let tick_rate = document.tick_rate;
        info!(frames = total_frames, sessions = sessions.len(), tick_rate, "Loaded replay document");

        Ok(Self {
            frames: document.frames.into_iter(),
            total_frames,
            sessions,
            parser: SessionInfoParser::new(),
            current: None,
            speed: 1.0,
            interval: Self::pacing(tick_rate, 1.0),
            tick_rate,
        })
    }

    /// Set playback speed, clamped to `0.1..=100`.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.set_speed(speed);
        self
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.clamp(0.1, 100.0);
        self.interval = Self::pacing(self.tick_rate, self.speed);
        debug!(speed = self.speed, "Playback speed set");
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    /// Frames not yet played.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    /// Recorded duration in seconds at normal speed.
    pub fn duration(&self) -> f64 {
        self.total_frames as f64 / self.tick_rate
    }

    fn pacing(tick_rate: f64, speed: f64) -> Interval {
        let mut interval = interval(Duration::from_secs_f64(1.0 / (tick_rate * speed)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    }

    /// Session string for `version`, parsed once per version. Frames that
    /// reference an unrecorded version keep the previous session.
    fn session_for(&mut self, version: u32) -> Result<Option<Arc<SessionInfo>>> {
        match self.sessions.get(&version) {
            Some(raw) => {
                let session = self.parser.parse_versioned(raw, version)?;
                self.current = Some(Arc::clone(&session));
                Ok(Some(session))
            }
            None => {
                if self.current.is_some() {
                    warn!(version, "Session version not recorded, keeping previous session");
                }
                Ok(self.current.clone())
            }
        }
    }
}

#[async_trait::async_trait]
impl SnapshotProvider for ReplayProvider {
    async fn next_snapshot(&mut self) -> Result<Option<TelemetrySnapshot>> {
        self.interval.tick().await;

        let Some(mut snapshot) = self.frames.next() else {
            debug!("Reached end of replay");
            return Ok(None);
        };

        snapshot.session = self.session_for(snapshot.session_version)?;
        trace!(
            frame = self.total_frames - self.frames.len(),
            total = self.total_frames,
            version = snapshot.session_version,
            "Replay frame"
        );
        Ok(Some(snapshot))
    }

    fn tick_rate(&self) -> f64 {
        self.tick_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionState;

    const DOCUMENT: &str = r#"
TickRate: 20
Sessions:
  - Version: 1
    Yaml: |
      WeekendInfo:
       TrackLength: 5.00 km
       TrackDisplayShortName: Testring
      DriverInfo:
       DriverCarIdx: 0
       Drivers:
       - CarIdx: 0
         UserName: Jim O'Neill
         UserID: 11
  - Version: 2
    Yaml: "garbage: ["
Frames:
  - SessionNum: 2
    SessionState: 4
    SessionTime: 10.0
    SessionInfoUpdate: 1
    CarIdxLapDistPct: [0.25]
  - SessionTime: 10.05
    SessionInfoUpdate: 7
  - SessionTime: 10.10
    SessionInfoUpdate: 2
"#;

    #[tokio::test(start_paused = true)]
    async fn frames_carry_their_session() {
        let mut provider = ReplayProvider::from_yaml(DOCUMENT).unwrap();
        assert_eq!(provider.total_frames(), 3);
        assert_eq!(provider.tick_rate(), 20.0);

        let first = provider.next_snapshot().await.unwrap().unwrap();
        assert_eq!(first.session_state, SessionState::Racing);
        assert_eq!(first.lap_dist_pct(0), Some(0.25));
        let session = first.session.clone().unwrap();
        assert_eq!(session.roster()[0].user_name, "Jim O'Neill");

        // unrecorded version keeps the previous session
        let second = provider.next_snapshot().await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&second.session.unwrap(), &session));

        // malformed session string is an error for that frame only
        assert!(provider.next_snapshot().await.is_err());
        assert!(provider.next_snapshot().await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn paces_at_tick_rate_times_speed() {
        let mut provider = ReplayProvider::from_yaml(DOCUMENT).unwrap().with_speed(2.0);
        let start = tokio::time::Instant::now();
        provider.next_snapshot().await.unwrap();
        provider.next_snapshot().await.unwrap();
        // first tick is immediate, the second waits 1 / (20 * 2) s
        assert_eq!(start.elapsed(), Duration::from_millis(25));
    }

    #[tokio::test]
    async fn rejects_bad_documents() {
        assert!(ReplayProvider::from_yaml("TickRate: 0\nFrames: []").is_err());
        assert!(ReplayProvider::from_yaml("Frames: {").is_err());
        let empty = ReplayProvider::from_yaml("Frames: []").unwrap();
        assert_eq!(empty.duration(), 0.0);
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = ReplayProvider::open("/definitely/not/here.yml").unwrap_err();
        assert!(matches!(err, OverlayError::File { .. }));
    }
}
