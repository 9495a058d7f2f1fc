//! Stream combinators for overlay subscribers

pub mod throttle;

pub use throttle::{Sample, SampleExt};
