//! Overlay settings
//!
//! Settings are a JSON or YAML document; lines whose first non-blank
//! characters are `//` are treated as comments. Every field has a default, so
//! a document only needs the keys it changes:
//!
//! ```text
//! {
//!     // wider gauge
//!     "rpm_speed": { "segments": 14 },
//!     "standing": { "max": 12, "window": 4 },
//!     "broadcast": {
//!         "status_template": "{event} | {car} @ {track}",
//!         "latest_follower_template": "Welcome {follower}!"
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::{OverlayError, Result};

/// All overlay settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// Speed / RPM gauge line
    pub rpm_speed: DashSettings,
    /// Relative (ahead / viewed / behind) block
    pub position: RelativeSettings,
    /// Standings board
    pub standing: StandingsSettings,
    /// Stream channel status and audience texts
    pub broadcast: BroadcastSettings,
}

/// Speed / RPM gauge glyphs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashSettings {
    /// Number of cells in the RPM gauge
    pub segments: usize,
    /// Glyph framing the gauge on both sides
    pub vertical_line: String,
    /// Partial-fill glyphs from empty to full; the last one fills a cell
    pub blocks: String,
}

impl Default for DashSettings {
    fn default() -> Self {
        Self {
            segments: 10,
            vertical_line: "│".to_string(),
            blocks: " ▏▎▍▌▋▊▉█".to_string(),
        }
    }
}

/// Relative block glyphs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelativeSettings {
    pub up_arrow: String,
    pub square: String,
    pub down_arrow: String,
}

impl Default for RelativeSettings {
    fn default() -> Self {
        Self { up_arrow: "▲".to_string(), square: "■".to_string(), down_arrow: "▼".to_string() }
    }
}

/// Standings board layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandingsSettings {
    /// Maximum number of rows below the header
    pub max: usize,
    /// Rows kept around the viewed car once it falls below the head segment
    pub window: usize,
    /// Marker in front of the viewed car
    pub right_arrow: String,
    /// Glyph repeated to draw the separator row
    pub horizontal_bar: String,
}

impl Default for StandingsSettings {
    fn default() -> Self {
        Self {
            max: 15,
            window: 6,
            right_arrow: "►".to_string(),
            horizontal_bar: "─".to_string(),
        }
    }
}

/// Stream channel texts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastSettings {
    /// Channel status with `{event}`, `{car}` and `{track}` placeholders
    pub status_template: Option<String>,
    /// Audience line with `{viewers}` and `{followers}` placeholders
    pub viewers_followers_template: String,
    /// Newest follower line with a `{follower}` placeholder
    pub latest_follower_template: String,
}

impl Default for BroadcastSettings {
    fn default() -> Self {
        Self {
            status_template: None,
            viewers_followers_template: "Viewers: {viewers}  Followers: {followers}".to_string(),
            latest_follower_template: "Latest follower: {follower}".to_string(),
        }
    }
}

impl BroadcastSettings {
    /// Fill the status template, `None` when no template is configured.
    pub fn render(&self, event: &str, car: &str, track: &str) -> Option<String> {
        let template = self.status_template.as_deref()?;
        Some(template.replace("{event}", event).replace("{car}", car).replace("{track}", track))
    }

    /// Fill the audience template.
    pub fn render_viewers_followers(&self, viewers: u64, followers: u64) -> String {
        self.viewers_followers_template
            .replace("{viewers}", &viewers.to_string())
            .replace("{followers}", &followers.to_string())
    }

    /// Fill the newest follower template; empty without a follower.
    pub fn render_latest_follower(&self, follower: Option<&str>) -> String {
        follower.map(|name| self.latest_follower_template.replace("{follower}", name)).unwrap_or_default()
    }
}

impl OverlaySettings {
    /// Load settings from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| OverlayError::file_error(path.to_path_buf(), e))?;
        let settings = Self::parse(&text)?;
        info!(path = %path.display(), "Settings loaded");
        Ok(settings)
    }

    /// Parse settings from a JSON or YAML document with `//` comment lines.
    pub fn parse(text: &str) -> Result<Self> {
        let stripped = strip_comment_lines(text);
        if stripped.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_yaml_ng::from_str(&stripped)
            .map_err(|e| OverlayError::parse("settings", e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject layouts the renderers cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.rpm_speed.segments == 0 {
            return Err(OverlayError::config("rpm_speed.segments must be at least 1"));
        }
        if self.rpm_speed.blocks.chars().count() < 2 {
            return Err(OverlayError::config("rpm_speed.blocks needs an empty and a full glyph"));
        }
        if self.standing.window == 0 {
            return Err(OverlayError::config("standing.window must be at least 1"));
        }
        if self.standing.max <= self.standing.window {
            return Err(OverlayError::config(format!(
                "standing.max ({}) must be larger than standing.window ({})",
                self.standing.max, self.standing.window
            )));
        }
        Ok(())
    }
}

fn strip_comment_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}
