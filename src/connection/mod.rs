//! Connection handle for a running overlay
//!
//! [`OverlayConnection`] owns the receiving end of the tick loop. Subscribers
//! get a stream of whole [`OverlayText`] values, optionally rate limited;
//! dropping the connection stops the loop.

use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::driver::{Driver, DriverChannels};
use crate::engine::{OverlayEngine, OverlayText};
use crate::provider::SnapshotProvider;
use crate::stream::SampleExt;
use crate::types::OutputRate;


/// Handle to a running tick loop
pub struct OverlayConnection {
    /// Overlay watch receiver
    overlays: watch::Receiver<Option<Arc<OverlayText>>>,

    /// Provider tick rate
    source_hz: f64,

    /// Cancellation token for stopping the loop
    cancel: CancellationToken,
}

impl OverlayConnection {
    /// Start the tick loop for `provider`.
    pub fn start<P: SnapshotProvider>(provider: P, engine: OverlayEngine) -> Self {
        let source_hz = provider.tick_rate();
        let DriverChannels { overlays, cancel } = Driver::spawn(provider, engine);
        info!(source_hz, "Overlay connection started");
        Self { overlays, source_hz, cancel }
    }

    /// Subscribe to overlay text.
    ///
    /// The stream yields the current text (if any) first, then every change,
    /// sampled down to `rate`. It ends when the tick loop ends.
    pub fn subscribe(&self, rate: OutputRate) -> impl Stream<Item = Arc<OverlayText>> + 'static {
        let overlays = WatchStream::new(self.overlays.clone()).filter_map(|opt| async move { opt });

        match rate.sample_period(self.source_hz) {
            None => overlays.boxed(),
            Some(period) => overlays.sample_every(period).boxed(),
        }
    }

    /// Latest overlay text, `None` before the first tick.
    pub fn current(&self) -> Option<Arc<OverlayText>> {
        self.overlays.borrow().clone()
    }

    /// Provider tick rate in Hz
    pub fn source_hz(&self) -> f64 {
        self.source_hz
    }

    /// Stop the tick loop; open subscriptions end.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Whether the tick loop has been asked to stop.
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for OverlayConnection {
    fn drop(&mut self) {
        debug!("Dropping overlay connection");
        self.cancel.cancel();
    }
}
