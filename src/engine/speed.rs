//! Speed inferred from lap distance samples of a spectated car.

use std::collections::VecDeque;

use super::relative::wrap_lap_delta;

/// Number of samples kept; at 25 Hz this spans 0.4 s.
pub const SAMPLE_CAPACITY: usize = 10;

/// Anything faster is a teleport (pit exit, tow, replay jump), in m/s.
pub const MAX_PLAUSIBLE_SPEED: f64 = 110.0;

/// Rolling buffer of `(lap fraction, session time)` samples.
#[derive(Debug, Clone, Default)]
pub struct SpeedEstimator {
    samples: VecDeque<(f64, f64)>,
}

impl SpeedEstimator {
    pub fn new() -> Self {
        Self { samples: VecDeque::with_capacity(SAMPLE_CAPACITY) }
    }

    /// Record a sample. An unknown fraction breaks the series and clears it.
    pub fn record(&mut self, fraction: Option<f64>, session_time: f64) {
        let Some(fraction) = fraction else {
            self.samples.clear();
            return;
        };
        if self.samples.len() == SAMPLE_CAPACITY {
            self.samples.pop_front();
        }
        self.samples.push_back((fraction, session_time));
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Speed in m/s between the oldest and newest sample; zero when either
    /// delta is not positive or the result is implausible.
    pub fn estimate(&self, track_length: f64) -> f64 {
        let (Some(&(first_pct, first_time)), Some(&(last_pct, last_time))) =
            (self.samples.front(), self.samples.back())
        else {
            return 0.0;
        };
        let distance = wrap_lap_delta(last_pct - first_pct);
        let elapsed = last_time - first_time;
        if distance <= 0.0 || elapsed <= 0.0 {
            return 0.0;
        }
        let speed = track_length * distance / elapsed;
        if speed > MAX_PLAUSIBLE_SPEED { 0.0 } else { speed }
    }
}
