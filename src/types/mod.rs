//! Core types for the per-tick input of the overlay engine.
//!
//! - [`TelemetrySnapshot`] carries the scalars and per-car arrays of one tick
//!   plus the parsed session string it refers to
//! - [`SessionState`] and [`TrackSurface`] map the simulator's enum codes
//! - [`OutputRate`] controls how often subscribers see new overlay text
//!
//! ```rust
//! use pitboard::types::{TelemetrySnapshot, TrackSurface};
//!
//! let snapshot = TelemetrySnapshot {
//!     cam_car_idx: 0,
//!     car_idx_lap_dist_pct: vec![0.42],
//!     car_idx_track_surface: vec![TrackSurface::OnTrack],
//!     ..Default::default()
//! };
//! assert_eq!(snapshot.lap_dist_pct(0), Some(0.42));
//! assert_eq!(snapshot.lap_dist_pct(5), None);
//! ```

mod output_rate;
mod session_state;
mod snapshot;

pub use output_rate::OutputRate;
pub use session_state::{SessionState, TrackSurface};
pub use snapshot::TelemetrySnapshot;
