//! YAML cleanup for iRacing session strings
//!
//! The simulator's session string is *almost* YAML. Two things break standard
//! parsers:
//! - stray control characters inside the string
//! - unquoted free-text values (driver and team names) containing `'`, `"`,
//!   `&`, `:` or a leading comma
//!
//! See: <https://forums.iracing.com/discussion/comment/374646#Comment_374646>

use crate::{OverlayError, Result};

/// Keys whose values are free text typed by users.
const FREE_TEXT_KEYS: &[&str] = &[
    "AbbrevName:",
    "TeamName:",
    "UserName:",
    "Initials:",
    "DriverSetupName:",
    "CarDesignStr:",
];

/// Clean an iRacing session string so `serde_yaml_ng` can parse it.
///
/// Control characters other than `\n`, `\r` and `\t` are dropped, and unquoted
/// values of [`FREE_TEXT_KEYS`] are wrapped in single quotes (embedded single
/// quotes doubled).
pub fn preprocess_session_yaml(yaml: &str) -> Result<String> {
    let cleaned: String = yaml
        .chars()
        .filter(|ch| !ch.is_control() || matches!(ch, '\n' | '\r' | '\t'))
        .collect();

    if cleaned.trim().is_empty() {
        return Err(OverlayError::parse("YAML preprocessing", "session string is empty"));
    }

    let lines: Vec<String> = cleaned.lines().map(quote_free_text).collect();
    Ok(lines.join("\n"))
}

fn quote_free_text(line: &str) -> String {
    for key in FREE_TEXT_KEYS {
        let Some(key_pos) = line.find(key) else {
            continue;
        };
        let after_key = key_pos + key.len();
        let Some(value_offset) = line[after_key..].find(|c: char| !c.is_whitespace()) else {
            return line.to_string();
        };
        let value_start = after_key + value_offset;
        let value = line[value_start..].trim_end();

        if value.starts_with('\'') || value.starts_with('"') {
            return line.to_string();
        }
        return format!("{} '{}'", &line[..after_key], value.replace('\'', "''"));
    }
    line.to_string()
}
