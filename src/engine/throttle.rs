//! Session-time gates for the slower overlays.

/// Lets a computation run at most once per `period` seconds of session time.
///
/// A gate with no mark is always open. Session time running backwards (a
/// replay rewind) also opens it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionTimeGate {
    period: f64,
    last: Option<f64>,
}

impl SessionTimeGate {
    pub const fn new(period: f64) -> Self {
        Self { period, last: None }
    }

    /// Returns `true` and records `now` when the gate is open.
    pub fn ready(&mut self, now: f64) -> bool {
        if let Some(last) = self.last {
            let elapsed = now - last;
            if (0.0..self.period).contains(&elapsed) {
                return false;
            }
        }
        self.last = Some(now);
        true
    }

    /// Forget the last mark so the next call runs.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_once_per_period() {
        let mut gate = SessionTimeGate::new(1.0);
        assert!(gate.ready(10.0));
        assert!(!gate.ready(10.4));
        assert!(!gate.ready(10.99));
        assert!(gate.ready(11.0));
        assert!(!gate.ready(11.5));
    }

    #[test]
    fn reset_and_rewind_reopen() {
        let mut gate = SessionTimeGate::new(0.5);
        assert!(gate.ready(100.0));
        gate.reset();
        assert!(gate.ready(100.1));
        assert!(gate.ready(20.0));
    }
}
