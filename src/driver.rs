//! Driver spawns and manages the tick loop task

use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::engine::{OverlayEngine, OverlayText};
use crate::provider::SnapshotProvider;

/// Result of spawning the tick loop
pub struct DriverChannels {
    /// Latest overlay text; `None` until the first tick
    pub overlays: watch::Receiver<Option<Arc<OverlayText>>>,
    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,
}

/// Driver runs the tick loop
///
/// One task owns both the provider and the engine: it reads a snapshot, runs
/// the engine over it and publishes the text. Subscribers only ever see whole
/// `OverlayText` values.
pub struct Driver;

impl Driver {
    /// Spawn the tick loop for `provider`.
    pub fn spawn<P>(provider: P, engine: OverlayEngine) -> DriverChannels
    where
        P: SnapshotProvider,
    {
        let (overlay_tx, overlay_rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let cancel_loop = cancel.clone();

        tokio::spawn(async move {
            Self::tick_loop(provider, engine, overlay_tx, cancel_loop).await;
        });

        DriverChannels { overlays: overlay_rx, cancel }
    }

    async fn tick_loop<P>(
        mut provider: P,
        mut engine: OverlayEngine,
        overlay_tx: watch::Sender<Option<Arc<OverlayText>>>,
        cancel: CancellationToken,
    ) where
        P: SnapshotProvider,
    {
        info!(tick_rate = provider.tick_rate(), "Tick loop started");
        let mut tick_count = 0u64;
        let mut error_count = 0u32;
        const MAX_ERRORS: u32 = 10;

        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Tick loop cancelled");
                    break;
                }
                result = provider.next_snapshot() => result,
            };

            match result {
                Ok(Some(snapshot)) => {
                    tick_count += 1;
                    error_count = 0;
                    trace!(tick = tick_count, session_time = snapshot.session_time, "Snapshot received");

                    let text = engine.tick(&snapshot);
                    let changed = overlay_tx.borrow().as_deref() != Some(text);
                    if changed && overlay_tx.send(Some(Arc::new(text.clone()))).is_err() {
                        debug!("Overlay receivers dropped, shutting down");
                        break;
                    }
                }
                Ok(None) => {
                    info!(ticks = tick_count, "Provider ended, clearing overlays");
                    Self::disconnect(&mut engine, &overlay_tx);
                    break;
                }
                Err(e) => {
                    error_count += 1;
                    error!(error = %e, attempt = error_count, max = MAX_ERRORS, "Provider error");

                    if error_count >= MAX_ERRORS {
                        error!("Too many provider errors, shutting down");
                        Self::disconnect(&mut engine, &overlay_tx);
                        break;
                    }

                    // Exponential backoff: 100ms, 200ms, ... capped at 1.6s
                    let backoff = std::time::Duration::from_millis(50 * (1 << error_count.min(5)));
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
            }
        }

        info!(ticks = tick_count, "Tick loop ended");
    }

    /// Reset the engine and publish its blank output.
    fn disconnect(engine: &mut OverlayEngine, overlay_tx: &watch::Sender<Option<Arc<OverlayText>>>) {
        engine.reset();
        let _ = overlay_tx.send(Some(Arc::new(engine.output().clone())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlaySettings;
    use crate::test_utils::SnapshotBuilder;
    use crate::types::TelemetrySnapshot;
    use crate::{OverlayError, Result};
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Scripted provider: each entry is one `next_snapshot` result.
    struct Scripted {
        script: VecDeque<Result<Option<TelemetrySnapshot>>>,
    }

    #[async_trait::async_trait]
    impl SnapshotProvider for Scripted {
        async fn next_snapshot(&mut self) -> Result<Option<TelemetrySnapshot>> {
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.script.pop_front().unwrap_or(Ok(None))
        }

        fn tick_rate(&self) -> f64 {
            100.0
        }
    }

    fn on_track(time: f64) -> TelemetrySnapshot {
        SnapshotBuilder::new(2).race_session(2).camera(1).car(1, 3, 0.5).time(time).build()
    }

    async fn final_overlay(mut rx: watch::Receiver<Option<Arc<OverlayText>>>) -> Option<Arc<OverlayText>> {
        while rx.changed().await.is_ok() {}
        rx.borrow().clone()
    }

    #[tokio::test(start_paused = true)]
    async fn end_of_stream_publishes_blank_overlay() {
        let provider = Scripted { script: VecDeque::from([Ok(Some(on_track(1.0))), Ok(Some(on_track(2.0)))]) };
        let channels = Driver::spawn(provider, OverlayEngine::new(OverlaySettings::default()));

        let mut rx = channels.overlays.clone();
        rx.changed().await.unwrap();
        assert!(rx.borrow().as_ref().is_some_and(|text| text.speed_rpm.contains("km/h")));

        let last = final_overlay(rx).await.unwrap();
        assert!(last.is_blank());
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_are_retried() {
        let script = VecDeque::from([
            Err(OverlayError::provider_failed("hiccup")),
            Err(OverlayError::provider_failed("hiccup")),
            Ok(Some(on_track(1.0))),
        ]);
        let channels = Driver::spawn(Scripted { script }, OverlayEngine::new(OverlaySettings::default()));

        let mut rx = channels.overlays.clone();
        rx.changed().await.unwrap();
        assert!(rx.borrow().as_ref().is_some_and(|text| !text.is_blank()));
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_errors_stop_the_loop() {
        let script = (0..12).map(|_| Err(OverlayError::provider_failed("gone"))).collect();
        let channels = Driver::spawn(Scripted { script }, OverlayEngine::new(OverlaySettings::default()));

        let last = final_overlay(channels.overlays.clone()).await;
        assert!(last.is_some_and(|text| text.is_blank()));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_the_loop() {
        let script = (0..1000).map(|i| Ok(Some(on_track(f64::from(i))))).collect();
        let channels = Driver::spawn(Scripted { script }, OverlayEngine::new(OverlaySettings::default()));

        channels.cancel.cancel();
        let mut rx = channels.overlays.clone();
        let closed = tokio::time::timeout(Duration::from_secs(1), async {
            while rx.changed().await.is_ok() {}
        })
        .await;
        assert!(closed.is_ok());
    }
}
