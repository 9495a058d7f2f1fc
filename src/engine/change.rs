//! Session and camera change detection.

use crate::types::{SessionState, TelemetrySnapshot};

/// Identity of a session phase: number plus state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionKey {
    pub num: i32,
    pub state: SessionState,
}

impl SessionKey {
    pub fn of(snapshot: &TelemetrySnapshot) -> Self {
        Self { num: snapshot.session_num, state: snapshot.session_state }
    }
}

/// Remembers the last session key and camera car.
///
/// `None` is the invalid sentinel: it never equals a real key, so the next
/// observation always reports a change.
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    session: Option<SessionKey>,
    camera: Option<i32>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key` and report whether the session context must be rebuilt.
    /// An incomplete context keeps reporting a change so it is retried.
    pub fn session_changed(&mut self, key: SessionKey, context_complete: bool) -> bool {
        let changed = self.session != Some(key) || !context_complete;
        self.session = Some(key);
        changed
    }

    /// Record the camera car and report whether it moved.
    pub fn camera_changed(&mut self, cam_car_idx: i32) -> bool {
        let changed = self.camera != Some(cam_car_idx);
        self.camera = Some(cam_car_idx);
        changed
    }

    /// Forget the session key after a failed rebuild so the next tick retries.
    pub fn invalidate_session(&mut self) {
        self.session = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
