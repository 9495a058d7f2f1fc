//! Background polled values
//!
//! Some overlay inputs live outside the simulator (stream viewer counts, the
//! latest follower) and are slow to fetch. [`PolledFeed`] fetches them on a
//! timer in its own task so the tick loop only ever reads the last good value.

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::Result;

/// A value that can be fetched on demand
#[async_trait::async_trait]
pub trait FeedSource: Send + 'static {
    type Output: Clone + Send + Sync + 'static;

    /// Fetch the current value.
    async fn fetch(&mut self) -> Result<Self::Output>;

    /// Name used in logs.
    fn name(&self) -> &str {
        "feed"
    }
}

/// Last good value of a [`FeedSource`], refreshed in the background
pub struct PolledFeed<T> {
    latest: watch::Receiver<Option<T>>,
    cancel: CancellationToken,
}

impl<T: Clone + Send + Sync + 'static> PolledFeed<T> {
    /// Start polling `source` every `period`; the first fetch runs immediately.
    pub fn spawn<S>(mut source: S, period: Duration) -> Self
    where
        S: FeedSource<Output = T>,
    {
        let (tx, rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let cancel_task = cancel.clone();

        tokio::spawn(async move {
            let name = source.name().to_string();
            info!(feed = %name, ?period, "Polled feed started");
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut failures = 0u32;

            loop {
                tokio::select! {
                    _ = cancel_task.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                let result = tokio::select! {
                    _ = cancel_task.cancelled() => break,
                    result = source.fetch() => result,
                };
                match result {
                    Ok(value) => {
                        failures = 0;
                        debug!(feed = %name, "Feed refreshed");
                        if tx.send(Some(value)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        failures += 1;
                        warn!(feed = %name, error = %e, failures, "Feed fetch failed, keeping last value");
                    }
                }
            }
            info!(feed = %name, "Polled feed stopped");
        });

        Self { latest: rx, cancel }
    }

    /// Last good value, `None` until the first successful fetch. Never blocks.
    pub fn latest(&self) -> Option<T> {
        self.latest.borrow().clone()
    }

    /// Wait for the next successful fetch.
    pub async fn changed(&mut self) -> Option<T> {
        self.latest.changed().await.ok()?;
        self.latest()
    }
}

impl<T> Drop for PolledFeed<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
