//! Publication rate control for overlay streams

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rate at which a subscriber receives overlay text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputRate {
    /// Every change, at the provider's tick rate
    Native,

    /// At most this many updates per second.
    /// Rates at or above the tick rate (and zero) fall back to `Native`.
    Max(u32),
}

impl OutputRate {
    /// Normalize rate against the provider tick rate
    pub fn normalize(self, source_hz: f64) -> Self {
        match self {
            OutputRate::Native | OutputRate::Max(0) => OutputRate::Native,
            OutputRate::Max(hz) if f64::from(hz) >= source_hz => OutputRate::Native,
            OutputRate::Max(hz) => OutputRate::Max(hz),
        }
    }

    /// Sampling period if the rate needs limiting
    pub fn sample_period(self, source_hz: f64) -> Option<Duration> {
        match self.normalize(source_hz) {
            OutputRate::Native => None,
            OutputRate::Max(hz) => Some(Duration::from_secs_f64(1.0 / f64::from(hz))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_rates_fall_back_to_native() {
        assert_eq!(OutputRate::Max(60).normalize(25.0), OutputRate::Native);
        assert_eq!(OutputRate::Max(0).normalize(25.0), OutputRate::Native);
        assert_eq!(OutputRate::Max(5).normalize(25.0), OutputRate::Max(5));
    }

    #[test]
    fn sample_period_matches_rate() {
        assert_eq!(OutputRate::Native.sample_period(25.0), None);
        assert_eq!(OutputRate::Max(4).sample_period(25.0), Some(Duration::from_millis(250)));
    }
}
