//! Provider trait for snapshot sources

use crate::Result;
use crate::types::TelemetrySnapshot;

/// Trait for telemetry snapshot sources
///
/// Providers abstract over where ticks come from (a recorded replay, a live
/// bridge, a test script) and handle their own pacing. Each snapshot carries
/// the parsed session string for its `SessionInfoUpdate` version; providers
/// parse a version once and share it via `Arc`.
#[async_trait::async_trait]
pub trait SnapshotProvider: Send + 'static {
    /// Get the next snapshot
    ///
    /// Returns:
    /// - `Ok(Some(snapshot))` - New tick available
    /// - `Ok(None)` - Source ended (disconnect)
    /// - `Err(e)` - Error occurred; the driver retries with backoff
    async fn next_snapshot(&mut self) -> Result<Option<TelemetrySnapshot>>;

    /// Native tick rate in Hz
    fn tick_rate(&self) -> f64;
}
