//! # Overlay Engine
//!
//! Turns one [`TelemetrySnapshot`] per tick into four blocks of overlay text.
//!
//! ```text
//! snapshot ─► ChangeDetector ─┬─ session changed ─► SessionContext::derive, registry cleared
//!                             └─ camera changed  ─► samples and gates cleared
//!          ─► DriverRegistry::merge (new session string)
//!          ─► dash (every tick)     clock (2 Hz)     relative (1 Hz)     standings (1 Hz)
//! ```
//!
//! Gates run on session time, so a paused replay freezes the slow blocks and
//! a skipped recomputation keeps the previous text. Nothing here blocks or
//! fails: missing data produces blank text, and a context fault is logged and
//! retried on the next tick with the previous state left in place.

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::config::OverlaySettings;
use crate::types::TelemetrySnapshot;
use crate::Result;

pub mod change;
pub mod clock;
pub mod context;
pub mod dash;
pub mod format;
pub mod registry;
pub mod relative;
pub mod speed;
pub mod standings;
pub mod throttle;

pub use change::{ChangeDetector, SessionKey};
pub use context::{RpmBand, SessionContext};
pub use registry::{DriverRecord, DriverRegistry, LicenseClass};
pub use speed::SpeedEstimator;
pub use throttle::SessionTimeGate;

/// The text of every overlay after a tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverlayText {
    /// Speed, RPM gauge, gear and fuel
    pub speed_rpm: String,
    /// Lap counter and session clock
    pub lap_session_time: String,
    /// Ahead / viewed / behind lines
    pub relative: String,
    /// Header plus board rows
    pub standings: String,
    /// Broadcast status line for the stream channel, empty when unset
    pub status: String,
}

impl OverlayText {
    pub fn is_blank(&self) -> bool {
        self.speed_rpm.is_empty()
            && self.lap_session_time.is_empty()
            && self.relative.is_empty()
            && self.standings.is_empty()
            && self.status.is_empty()
    }
}

/// State carried from tick to tick.
#[derive(Debug)]
pub struct OverlayEngine {
    settings: OverlaySettings,
    detector: ChangeDetector,
    context: Option<SessionContext>,
    registry: DriverRegistry,
    /// Session string version last merged; `None` forces a merge
    merged_version: Option<u32>,
    speed: SpeedEstimator,
    clock_gate: SessionTimeGate,
    relative_gate: SessionTimeGate,
    standings_gate: SessionTimeGate,
    output: OverlayText,
}

impl OverlayEngine {
    pub fn new(settings: OverlaySettings) -> Self {
        Self {
            settings,
            detector: ChangeDetector::new(),
            context: None,
            registry: DriverRegistry::new(),
            merged_version: None,
            speed: SpeedEstimator::new(),
            clock_gate: SessionTimeGate::new(0.5),
            relative_gate: SessionTimeGate::new(1.0),
            standings_gate: SessionTimeGate::new(1.0),
            output: OverlayText::default(),
        }
    }

    /// Process one snapshot and return the current overlay text.
    pub fn tick(&mut self, snapshot: &TelemetrySnapshot) -> &OverlayText {
        let now = snapshot.session_time;
        let cam = snapshot.cam_car_idx;
        trace!(session_time = now, cam, version = snapshot.session_version, "Tick");

        let mut camera_reset = false;
        let complete = self.context.as_ref().is_some_and(|c| c.is_complete(&self.settings.broadcast));
        if self.detector.session_changed(SessionKey::of(snapshot), complete) {
            match self.on_session_change(snapshot) {
                Ok(()) => {
                    camera_reset = true;
                    let status = self.status_line().unwrap_or_default().to_string();
                    self.output.status = status;
                }
                Err(e) => {
                    warn!(error = %e, session = snapshot.session_num, "Session context rebuild failed, retrying");
                    self.detector.invalidate_session();
                }
            }
        }
        if self.detector.camera_changed(cam) || camera_reset {
            self.on_camera_change();
        }

        self.speed.record(snapshot.lap_dist_pct(cam), now);
        self.merge_registry(snapshot);

        self.output.speed_rpm =
            dash::render(snapshot, self.context.as_ref(), &self.speed, &self.settings.rpm_speed);

        if self.clock_gate.ready(now) {
            self.output.lap_session_time = clock::render(snapshot, self.context.as_ref());
            debug!(text = %self.output.lap_session_time, "Clock rendered");
        }

        if self.relative_gate.ready(now) {
            self.registry.refresh_distances(snapshot);
            self.output.relative = match &self.context {
                Some(context) => relative::render(&self.registry, context, snapshot, &self.settings.position),
                None => String::new(),
            };
        }

        if self.standings_gate.ready(now) {
            self.output.standings = match (&self.context, snapshot.session.as_deref()) {
                (Some(context), Some(session)) => {
                    standings::render(&self.registry, context, session, snapshot, &self.settings.standing)
                }
                _ => String::new(),
            };
        }

        &self.output
    }

    /// Forget everything, as after a disconnect; the output becomes blank.
    pub fn reset(&mut self) {
        info!("Overlay engine reset");
        self.detector.reset();
        self.context = None;
        self.registry.clear();
        self.merged_version = None;
        self.on_camera_change();
        self.output = OverlayText::default();
    }

    pub fn output(&self) -> &OverlayText {
        &self.output
    }

    pub fn context(&self) -> Option<&SessionContext> {
        self.context.as_ref()
    }

    pub fn registry(&self) -> &DriverRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    /// Broadcast status line of the current session, when configured.
    pub fn status_line(&self) -> Option<&str> {
        self.context.as_ref()?.status_line.as_deref()
    }

    fn on_session_change(&mut self, snapshot: &TelemetrySnapshot) -> Result<()> {
        let context = match snapshot.session.as_deref() {
            Some(session) => SessionContext::derive(session, snapshot.session_num, &self.settings.broadcast)?,
            None => None,
        };
        match &context {
            Some(new) if self.context.as_ref() != Some(new) => info!(
                session = snapshot.session_num,
                session_type = %new.session_type,
                track = %new.track_short_name,
                "Session changed"
            ),
            Some(_) => {}
            None => debug!(session = snapshot.session_num, "Session info incomplete"),
        }
        self.context = context;
        self.registry.clear();
        self.merged_version = None;
        Ok(())
    }

    fn on_camera_change(&mut self) {
        self.speed.clear();
        self.clock_gate.reset();
        self.relative_gate.reset();
        self.standings_gate.reset();
    }

    fn merge_registry(&mut self, snapshot: &TelemetrySnapshot) {
        let Some(session) = snapshot.session.as_deref() else {
            return;
        };
        if self.merged_version == Some(snapshot.session_version) {
            return;
        }
        self.registry.merge(session, snapshot.session_num);
        self.merged_version = Some(snapshot.session_version);
        debug!(version = snapshot.session_version, drivers = self.registry.len(), "Registry merged");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BroadcastSettings;
    use crate::test_utils::{SessionBuilder, SnapshotBuilder, entry};
    use crate::types::SessionState;
    use std::sync::Arc;

    fn race() -> Arc<crate::SessionInfo> {
        Arc::new(
            SessionBuilder::race()
                .driver(entry(0, "Ana Lopes", 11))
                .driver(entry(1, "Ben Okafor", 11))
                .result_with_laps(0, 0, 270.0, 3, 90.0)
                .result_with_laps(1, 1, 275.3, 3, 90.5)
                .build(),
        )
    }

    fn snapshot_at(time: f64, session: &Arc<crate::SessionInfo>) -> TelemetrySnapshot {
        SnapshotBuilder::new(2)
            .race_session(2)
            .camera(1)
            .car(0, 4, 0.30)
            .car(1, 4, 0.25)
            .time(time)
            .version(1)
            .with_session(Arc::clone(session))
            .build()
    }

    #[test]
    fn first_tick_renders_everything() {
        let session = race();
        let mut engine = OverlayEngine::new(OverlaySettings::default());
        let text = engine.tick(&snapshot_at(100.0, &session)).clone();
        assert!(engine.context().is_some());
        assert_eq!(engine.registry().len(), 2);
        assert!(text.speed_rpm.contains("km/h"));
        assert!(text.lap_session_time.starts_with("Lap: 4/12  Race: 1:40"));
        assert_eq!(text.relative.split('\n').count(), 3);
        assert!(text.relative.contains("Ana Lopes"));
        assert_eq!(text.standings.lines().count(), 3);
        assert!(!text.is_blank());
    }

    #[test]
    fn slow_blocks_keep_their_text_between_gates() {
        let session = race();
        let mut engine = OverlayEngine::new(OverlaySettings::default());
        engine.tick(&snapshot_at(100.0, &session));
        let before = engine.output().clone();

        let mut moved = snapshot_at(100.4, &session);
        moved.car_idx_lap_dist_pct = vec![0.20, 0.25];
        let after = engine.tick(&moved).clone();
        assert_eq!(after.relative, before.relative);
        assert_eq!(after.standings, before.standings);

        let mut later = moved.clone();
        later.session_time = 101.2;
        let refreshed = engine.tick(&later).clone();
        assert_ne!(refreshed.relative, before.relative);
    }

    #[test]
    fn camera_change_reopens_the_gates() {
        let session = race();
        let mut engine = OverlayEngine::new(OverlaySettings::default());
        engine.tick(&snapshot_at(100.0, &session));
        let mut switched = snapshot_at(100.2, &session);
        switched.cam_car_idx = 0;
        let text = engine.tick(&switched).clone();
        assert_eq!(text.relative.lines().next(), Some(format!("{:>24}", "LEADER").as_str()));
    }

    #[test]
    fn incomplete_session_retries_until_blocks_arrive() {
        let mut partial = SessionBuilder::race().driver(entry(0, "Ana Lopes", 11)).build();
        partial.split_time_info = None;
        let mut engine = OverlayEngine::new(OverlaySettings::default());
        let text = engine.tick(&snapshot_at(10.0, &Arc::new(partial))).clone();
        assert!(engine.context().is_none());
        assert_eq!(text.relative, "");
        assert_eq!(text.standings, "");
        assert!(text.lap_session_time.ends_with("Session Time: 0:10"));

        let text = engine.tick(&snapshot_at(10.1, &race())).clone();
        assert!(engine.context().is_some());
        assert!(text.lap_session_time.contains("Race"));
    }

    #[test]
    fn context_fault_keeps_previous_state() {
        let session = race();
        let mut engine = OverlayEngine::new(OverlaySettings::default());
        engine.tick(&snapshot_at(100.0, &session));
        let before = engine.output().clone();

        // the session moves on but its entry is missing from the list
        let mut broken = snapshot_at(100.1, &session);
        broken.session_num = 5;
        engine.tick(&broken);
        assert_eq!(engine.context().map(|c| c.session_type.as_str()), Some("Race"));
        assert_eq!(engine.registry().len(), 2);
        assert_eq!(engine.output().standings, before.standings);

        // retried on the next tick once the data is consistent again
        let mut fixed = snapshot_at(100.2, &session);
        fixed.session_state = SessionState::Checkered;
        engine.tick(&fixed);
        assert!(engine.context().is_some());
    }

    #[test]
    fn zero_shift_light_only_drops_the_gauge() {
        let mut session = SessionBuilder::race()
            .driver(entry(0, "Ana Lopes", 11))
            .driver(entry(1, "Ben Okafor", 11))
            .result_with_laps(0, 0, 270.0, 3, 90.0)
            .result_with_laps(1, 1, 275.3, 3, 90.5)
            .build();
        if let Some(drivers) = session.driver_info.as_mut() {
            drivers.driver_car_sl_first_rpm = Some(0.0);
        }
        let session = Arc::new(session);
        let mut engine = OverlayEngine::new(OverlaySettings::default());
        for i in 0..5 {
            engine.tick(&snapshot_at(100.0 + 2.0 * f64::from(i), &session));
        }
        assert!(engine.context().is_some_and(|c| c.rpm_band.is_none()));
        let text = engine.output();
        assert_eq!(text.standings.lines().count(), 3);
        assert_eq!(text.relative.split('\n').count(), 3);
        assert!(!text.speed_rpm.contains('│'), "{:?}", text.speed_rpm);
    }

    #[test]
    fn status_template_waits_for_the_player() {
        let settings = OverlaySettings {
            broadcast: BroadcastSettings {
                status_template: Some("{event} {car} {track}".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let without_player = Arc::new(
            SessionBuilder::race().driver(entry(1, "Ben Okafor", 11)).player(0).build(),
        );
        let mut engine = OverlayEngine::new(settings);
        engine.tick(&snapshot_at(5.0, &without_player));
        assert!(engine.status_line().is_none());
        assert_eq!(engine.output().status, "");

        let with_player = Arc::new(
            SessionBuilder::race().driver(entry(0, "Ana Lopes", 11)).player(0).build(),
        );
        let mut next = snapshot_at(5.1, &with_player);
        next.session_version = 2;
        engine.tick(&next);
        assert_eq!(engine.status_line(), Some("Race GT3 Testring"));
        assert_eq!(engine.output().status, "Race GT3 Testring");

        engine.reset();
        assert_eq!(engine.output().status, "");
    }

    #[test]
    fn registry_keeps_results_when_a_version_drops_them() {
        let session = race();
        let mut engine = OverlayEngine::new(OverlaySettings::default());
        engine.tick(&snapshot_at(100.0, &session));

        let roster_only = Arc::new(
            SessionBuilder::race()
                .driver(entry(0, "Ana Lopes", 11))
                .driver(entry(1, "Ben Okafor", 11))
                .build(),
        );
        let mut next = snapshot_at(101.0, &roster_only);
        next.session_version = 2;
        engine.tick(&next);
        assert!(engine.registry().get(1).is_some_and(|r| r.position.is_some()));
        assert_eq!(engine.output().standings.lines().count(), 3);
    }

    #[test]
    fn reset_blanks_the_output() {
        let session = race();
        let mut engine = OverlayEngine::new(OverlaySettings::default());
        engine.tick(&snapshot_at(100.0, &session));
        engine.reset();
        assert!(engine.output().is_blank());
        assert!(engine.context().is_none());
        assert!(engine.registry().is_empty());
    }
}
