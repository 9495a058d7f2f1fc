//! Stream audience texts
//!
//! Viewer and follower counts come from the streaming platform, polled in the
//! background by a [`PolledFeed`]. [`AudienceOverlay::text`] renders the last
//! good counts through the broadcast templates without waiting on the network.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::BroadcastSettings;
use crate::feed::{FeedSource, PolledFeed};

/// Audience counts of the stream channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamStats {
    /// Live viewers, zero while offline
    pub viewers: u64,
    /// Total channel followers
    pub followers: u64,
    /// Display name of the newest follower
    pub latest_follower: Option<String>,
}

/// The two audience texts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AudienceText {
    pub viewers_followers: String,
    pub latest_follower: String,
}

impl AudienceText {
    pub fn render(stats: &StreamStats, settings: &BroadcastSettings) -> Self {
        Self {
            viewers_followers: settings.render_viewers_followers(stats.viewers, stats.followers),
            latest_follower: settings.render_latest_follower(stats.latest_follower.as_deref()),
        }
    }
}

/// Polled audience counts plus the templates that render them
pub struct AudienceOverlay {
    feed: PolledFeed<StreamStats>,
    settings: BroadcastSettings,
}

impl AudienceOverlay {
    /// Start polling `source` every `period`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<S>(source: S, period: Duration, settings: BroadcastSettings) -> Self
    where
        S: FeedSource<Output = StreamStats>,
    {
        Self { feed: PolledFeed::spawn(source, period), settings }
    }

    /// Last good counts, `None` before the first successful fetch.
    pub fn stats(&self) -> Option<StreamStats> {
        self.feed.latest()
    }

    /// Texts for the last good counts; blank before the first successful
    /// fetch. Never blocks.
    pub fn text(&self) -> AudienceText {
        self.stats().map(|stats| AudienceText::render(&stats, &self.settings)).unwrap_or_default()
    }

    /// Wait for the next successful fetch and render it.
    pub async fn changed(&mut self) -> Option<AudienceText> {
        let stats = self.feed.changed().await?;
        Some(AudienceText::render(&stats, &self.settings))
    }
}
