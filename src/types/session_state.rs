//! Session phase and track surface enumerations

use serde::{Deserialize, Serialize};

/// Phase of the current session (`SessionState`).
///
/// Ordered by progression, so `state >= SessionState::Racing` means the green
/// flag has dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum SessionState {
    #[default]
    Invalid,
    GetInCar,
    Warmup,
    ParadeLaps,
    Racing,
    Checkered,
    CoolDown,
}

impl From<i32> for SessionState {
    fn from(value: i32) -> Self {
        match value {
            1 => SessionState::GetInCar,
            2 => SessionState::Warmup,
            3 => SessionState::ParadeLaps,
            4 => SessionState::Racing,
            5 => SessionState::Checkered,
            6 => SessionState::CoolDown,
            _ => SessionState::Invalid,
        }
    }
}

impl From<SessionState> for i32 {
    fn from(state: SessionState) -> Self {
        state as i32
    }
}

/// Where a car is relative to the racing surface (`CarIdxTrackSurface`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum TrackSurface {
    /// Not loaded into the world: in the garage, disconnected or an unused slot
    #[default]
    NotInWorld,
    OffTrack,
    InPitStall,
    ApproachingPits,
    OnTrack,
}

impl TrackSurface {
    /// Whether the car exists on the circuit at all.
    pub fn in_world(self) -> bool {
        self != TrackSurface::NotInWorld
    }
}

impl From<i32> for TrackSurface {
    fn from(value: i32) -> Self {
        match value {
            0 => TrackSurface::OffTrack,
            1 => TrackSurface::InPitStall,
            2 => TrackSurface::ApproachingPits,
            3 => TrackSurface::OnTrack,
            _ => TrackSurface::NotInWorld,
        }
    }
}

impl From<TrackSurface> for i32 {
    fn from(surface: TrackSurface) -> Self {
        match surface {
            TrackSurface::NotInWorld => -1,
            TrackSurface::OffTrack => 0,
            TrackSurface::InPitStall => 1,
            TrackSurface::ApproachingPits => 2,
            TrackSurface::OnTrack => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_states_are_ordered_by_progression() {
        assert!(SessionState::Racing > SessionState::ParadeLaps);
        assert!(SessionState::Checkered > SessionState::Racing);
        assert!(SessionState::from(4) >= SessionState::Racing);
        assert_eq!(SessionState::from(42), SessionState::Invalid);
        assert_eq!(i32::from(SessionState::CoolDown), 6);
    }

    #[test]
    fn track_surface_codes() {
        assert_eq!(TrackSurface::from(-1), TrackSurface::NotInWorld);
        assert_eq!(TrackSurface::from(3), TrackSurface::OnTrack);
        assert_eq!(TrackSurface::from(17), TrackSurface::NotInWorld);
        assert_eq!(i32::from(TrackSurface::NotInWorld), -1);
        assert!(TrackSurface::InPitStall.in_world());
        assert!(!TrackSurface::NotInWorld.in_world());
    }

    #[test]
    fn deserializes_from_raw_codes() {
        let states: Vec<SessionState> = serde_yaml_ng::from_str("[0, 4, 5]").unwrap();
        assert_eq!(states, vec![SessionState::Invalid, SessionState::Racing, SessionState::Checkered]);
        let surfaces: Vec<TrackSurface> = serde_yaml_ng::from_str("[-1, 1, 3]").unwrap();
        assert_eq!(surfaces, vec![TrackSurface::NotInWorld, TrackSurface::InPitStall, TrackSurface::OnTrack]);
    }
}
