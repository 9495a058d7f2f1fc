//! Text overlays for iRacing broadcasts.
//!
//! Pitboard turns simulator telemetry into four blocks of plain text that a
//! streaming tool can show on screen:
//!
//! - **Dash**: speed, RPM gauge, gear and fuel of the camera car
//! - **Clock**: lap counter and session clock
//! - **Relative**: the cars directly ahead of and behind the camera car on track
//! - **Standings**: the class board with gaps and intervals
//!
//! The per-tick work happens in [`OverlayEngine`], a plain state object with
//! no I/O. [`Overlay`] wires an engine to a [`SnapshotProvider`] in a tokio
//! task and hands back an [`OverlayConnection`] to subscribe to.
//! [`Overlay::audience`] polls the stream channel's viewer and follower counts
//! next to it.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use pitboard::{OutputRate, Overlay, OverlaySettings};
//!
//! #[tokio::main]
//! async fn main() -> pitboard::Result<()> {
//!     let settings = OverlaySettings::load("settings.json")?;
//!     let connection = Overlay::replay("race.yml", settings).await?;
//!     let mut overlays = connection.subscribe(OutputRate::Max(10));
//!
//!     while let Some(text) = overlays.next().await {
//!         println!("{}\n{}", text.lap_session_time, text.standings);
//!     }
//!     Ok(())
//! }
//! ```

mod error;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;
mod yaml_utils;

pub mod config;
pub mod engine;
pub mod schema;

pub mod audience;
pub mod connection;
pub mod driver;
pub mod feed;
pub mod provider;
pub mod providers;
pub mod stream;

pub use error::*;
pub use types::*;

pub use audience::{AudienceOverlay, AudienceText, StreamStats};
pub use config::OverlaySettings;
pub use connection::OverlayConnection;
pub use engine::{OverlayEngine, OverlayText};
pub use feed::{FeedSource, PolledFeed};
pub use provider::SnapshotProvider;
pub use providers::ReplayProvider;
pub use schema::{SessionInfo, SessionInfoParser};
pub use yaml_utils::preprocess_session_yaml;

/// Entry point for running overlays.
///
/// # Examples
///
/// ```rust,no_run
/// use pitboard::{Overlay, OverlaySettings};
///
/// #[tokio::main]
/// async fn main() -> pitboard::Result<()> {
///     let connection = Overlay::replay("race.yml", OverlaySettings::default()).await?;
///     println!("{:?}", connection.current());
///     Ok(())
/// }
/// ```
pub struct Overlay;

impl Overlay {
    /// Run overlays over any snapshot source.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<P: SnapshotProvider>(provider: P, settings: OverlaySettings) -> OverlayConnection {
        OverlayConnection::start(provider, OverlayEngine::new(settings))
    }

    /// Run overlays over a recorded replay document at its own pace.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid replay
    /// document.
    pub async fn replay<P: AsRef<std::path::Path>>(
        path: P,
        settings: OverlaySettings,
    ) -> Result<OverlayConnection> {
        let provider = ReplayProvider::open(path)?;
        Ok(Self::start(provider, settings))
    }

    /// Poll stream audience counts every `period` and render them with the
    /// broadcast templates of `settings`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn audience<S>(source: S, period: std::time::Duration, settings: &OverlaySettings) -> AudienceOverlay
    where
        S: FeedSource<Output = StreamStats>,
    {
        AudienceOverlay::spawn(source, period, settings.broadcast.clone())
    }
}
