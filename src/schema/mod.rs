//! Typed models of the simulator's session string.
//!
//! Telemetry arrays arrive every tick inside [`crate::TelemetrySnapshot`];
//! everything that changes rarely (roster, results, track, sectors) arrives as
//! the YAML session string modelled here.

pub mod session;

pub use session::{SessionInfo, SessionInfoParser};
