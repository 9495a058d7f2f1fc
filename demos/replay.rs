//! Play a recorded replay and print the overlays as they change.
//!
//! ```text
//! cargo run --example replay -- test-data/replay/short_race.yml [settings.json] [speed]
//! RUST_LOG=pitboard=debug cargo run --example replay -- race.yml
//! ```

use anyhow::{Context, Result};
use futures::StreamExt;
use pitboard::{OutputRate, Overlay, OverlaySettings, ReplayProvider};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let replay = args.next().context("usage: replay <replay.yml> [settings.json] [speed]")?;
    let settings = match args.next() {
        Some(path) => OverlaySettings::load(&path).with_context(|| format!("loading settings from {path}"))?,
        None => OverlaySettings::default(),
    };
    let speed: f64 = match args.next() {
        Some(speed) => speed.parse().with_context(|| format!("invalid speed {speed:?}"))?,
        None => 1.0,
    };

    let provider = ReplayProvider::open(&replay)
        .with_context(|| format!("opening replay {replay}"))?
        .with_speed(speed);
    info!(frames = provider.total_frames(), seconds = provider.duration(), speed, "Playing replay");

    let connection = Overlay::start(provider, settings);
    let mut overlays = connection.subscribe(OutputRate::Max(4));
    while let Some(text) = overlays.next().await {
        if text.is_blank() {
            info!("Replay finished");
            continue;
        }
        println!("{}", "=".repeat(60));
        if !text.status.is_empty() {
            println!("[{}]", text.status);
        }
        println!("{}", text.speed_rpm);
        println!("{}", text.lap_session_time);
        println!();
        println!("{}", text.relative);
        println!();
        println!("{}", text.standings);
    }
    Ok(())
}
